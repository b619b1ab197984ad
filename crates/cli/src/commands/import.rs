//! Product import from a JSON catalog export.
//!
//! The export comes from an OCR pass over suppliers' catalogs, so records
//! arrive with a coarse `product_type` and noisy names. Categorization runs
//! an explicit rule table in priority order over the product name; the first
//! matching rule wins, and records no rule matches fall back to the category
//! mapped from their `product_type`.

use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;

use super::CliError;

const MAX_NAME_LEN: usize = 100;
const MAX_SLUG_BASE_LEN: usize = 50;
const DEFAULT_STOCK: i32 = 10;
const DEFAULT_CATEGORY: &str = "accesorios";
const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// A product record in the JSON export.
#[derive(Debug, Deserialize)]
pub struct ImportRecord {
    pub name: String,
    pub final_price: f64,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    pub product_type: String,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// `product_type` values mapped to category slugs. Anything unlisted falls
/// back to [`DEFAULT_CATEGORY`].
const TYPE_DEFAULTS: &[(&str, &str)] = &[
    ("aretes", "aretes"),
    ("collares", "collares"),
    ("pulseras", "pulseras"),
    ("anillos", "anillos"),
    ("bolsos", "bolsos"),
    ("moñas", "monas"),
    ("tobilleras", "tobilleras"),
    ("sin_clasificar", "accesorios"),
];

/// One categorization rule: matches when the lowercased product name
/// contains every `all_of` keyword, at least one `any_of` keyword, and no
/// `none_of` keyword.
struct CategoryRule {
    slug: &'static str,
    any_of: &'static [&'static str],
    all_of: &'static [&'static str],
    none_of: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, name: &str) -> bool {
        self.all_of.iter().all(|kw| name.contains(kw))
            && self.any_of.iter().any(|kw| name.contains(kw))
            && !self.none_of.iter().any(|kw| name.contains(kw))
    }
}

/// Rules evaluated top to bottom; the first match wins.
const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        slug: "conjuntos",
        any_of: &["conjunto"],
        all_of: &[],
        none_of: &[],
    },
    // "collar y topos" / "collar y aretes" sets sell as one unit.
    CategoryRule {
        slug: "conjuntos",
        any_of: &["topo", "arete"],
        all_of: &["collar"],
        none_of: &[],
    },
    CategoryRule {
        slug: "accesorios",
        any_of: &["cofre", "bolsa", "joyero", "caja", "estuche", "denario"],
        all_of: &[],
        none_of: &[],
    },
    // "anillado" names a chain style, not a ring.
    CategoryRule {
        slug: "anillos",
        any_of: &["anillo"],
        all_of: &[],
        none_of: &["anillado"],
    },
    CategoryRule {
        slug: "tobilleras",
        any_of: &["tobillera"],
        all_of: &[],
        none_of: &[],
    },
    CategoryRule {
        slug: "pulseras",
        any_of: &["pulsera", "brazalete", "manilla"],
        all_of: &[],
        none_of: &[],
    },
    CategoryRule {
        slug: "collares",
        any_of: &["collar", "cadena", "gargantilla"],
        all_of: &[],
        none_of: &["anillo"],
    },
    CategoryRule {
        slug: "aretes",
        any_of: &["arete", "topo", "candonga", "argolla", "piercing"],
        all_of: &[],
        none_of: &[],
    },
    CategoryRule {
        slug: "monas",
        any_of: &["moña", "mona", "diadema"],
        all_of: &[],
        none_of: &[],
    },
];

/// Pick the category slug for a record.
fn categorize(name: &str, product_type: &str) -> &'static str {
    let name = name.to_lowercase();
    for rule in CATEGORY_RULES {
        if rule.matches(&name) {
            return rule.slug;
        }
    }

    let product_type = product_type.to_lowercase();
    TYPE_DEFAULTS
        .iter()
        .find(|(ty, _)| *ty == product_type)
        .map_or(DEFAULT_CATEGORY, |(_, slug)| slug)
}

/// Strip Spanish diacritics so slugs stay ASCII.
fn fold_accent(c: char) -> char {
    match c {
        'á' => 'a',
        'é' => 'e',
        'í' => 'i',
        'ó' => 'o',
        'ú' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Build a slug: lowercased accent-folded name, non-alphanumerics collapsed
/// to single dashes, truncated, with the product code appended for
/// uniqueness.
fn generate_slug(name: &str, code: &str) -> String {
    let mut base = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.to_lowercase().chars().map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            base.push(c);
            last_dash = false;
        } else if !last_dash {
            base.push('-');
            last_dash = true;
        }
    }
    let base: String = base.trim_matches('-').chars().take(MAX_SLUG_BASE_LEN).collect();
    let base = base.trim_matches('-');

    format!("{base}-{}", code.to_lowercase())
}

/// OCR sometimes emits a bare price where the name should be.
fn is_price_only_name(name: &str) -> bool {
    let trimmed = name.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

/// Import products from the JSON export at `file`.
///
/// A fresh export supersedes the previous catalog, so the old one is
/// deactivated first and each record then upserts by slug. Rows are never
/// deleted: order_items keeps referencing products sold under earlier
/// exports.
pub async fn run(file: &Path) -> Result<(), CliError> {
    let pool = super::connect().await?;

    let data = std::fs::read_to_string(file)?;
    let records: Vec<ImportRecord> = serde_json::from_str(&data)?;
    tracing::info!("Found {} products in {}", records.len(), file.display());

    let deactivated = sqlx::query("UPDATE products SET is_active = FALSE, updated_at = now()")
        .execute(&pool)
        .await?
        .rows_affected();
    tracing::info!("Deactivated {deactivated} existing products");

    let mut imported = 0u32;
    let mut skipped = 0u32;
    let mut errors = 0u32;

    for record in &records {
        if is_price_only_name(&record.name) {
            tracing::warn!(code = %record.code, "Skipping record without a usable name");
            skipped += 1;
            continue;
        }

        match import_record(&pool, record).await {
            Ok(true) => imported += 1,
            Ok(false) => skipped += 1,
            Err(e) => {
                tracing::error!(code = %record.code, "Import failed: {e}");
                errors += 1;
            }
        }
    }

    tracing::info!(imported, skipped, errors, total = records.len(), "Import finished");
    Ok(())
}

/// Insert one record. Returns `Ok(false)` if its category is missing.
async fn import_record(pool: &PgPool, record: &ImportRecord) -> Result<bool, CliError> {
    let category = categorize(&record.name, &record.product_type);

    let Some(category_id) = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM categories WHERE slug = $1 AND is_active = TRUE",
    )
    .bind(category)
    .fetch_optional(pool)
    .await?
    else {
        tracing::warn!(code = %record.code, category, "Category not found, skipping");
        return Ok(false);
    };

    let name: String = record.name.chars().take(MAX_NAME_LEN).collect();
    let slug = generate_slug(&record.name, &record.code);
    let description = record
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{}. Código: {}", record.name, record.code));

    #[allow(clippy::cast_possible_truncation)]
    let price = record.final_price.round() as i64;
    let stock = record.stock.filter(|&s| s > 0).unwrap_or(DEFAULT_STOCK);
    let images = record
        .images
        .clone()
        .filter(|imgs| !imgs.is_empty())
        .unwrap_or_else(|| vec![PLACEHOLDER_IMAGE.to_string()]);

    sqlx::query(
        "INSERT INTO products \
         (name, slug, description, price, stock, images, material, category_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (slug) DO UPDATE SET \
           name = EXCLUDED.name, \
           description = EXCLUDED.description, \
           price = EXCLUDED.price, \
           stock = EXCLUDED.stock, \
           images = EXCLUDED.images, \
           material = EXCLUDED.material, \
           category_id = EXCLUDED.category_id, \
           is_active = TRUE, \
           updated_at = now()",
    )
    .bind(&name)
    .bind(&slug)
    .bind(&description)
    .bind(price)
    .bind(stock)
    .bind(&images)
    .bind(&record.material)
    .bind(category_id)
    .execute(pool)
    .await?;

    tracing::info!(code = %record.code, slug, "Imported {name}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjunto_wins_over_collar() {
        assert_eq!(categorize("Conjunto Collar y Aretes", "collares"), "conjuntos");
        assert_eq!(categorize("Collar y Topos Flor", "collares"), "conjuntos");
    }

    #[test]
    fn test_anillado_is_a_chain_not_a_ring() {
        assert_eq!(categorize("Collar Anillado Dorado", "sin_clasificar"), "collares");
        assert_eq!(categorize("Anillo Solitario", "sin_clasificar"), "anillos");
    }

    #[test]
    fn test_storage_boxes_go_to_accessories() {
        assert_eq!(categorize("Cofre Joyero Grande", "anillos"), "accesorios");
    }

    #[test]
    fn test_keyword_buckets() {
        assert_eq!(categorize("Gargantilla Perlas", "sin_clasificar"), "collares");
        assert_eq!(categorize("Candongas Doradas", "sin_clasificar"), "aretes");
        assert_eq!(categorize("Manilla Trenzada", "sin_clasificar"), "pulseras");
        assert_eq!(categorize("Tobillera Mostacilla", "sin_clasificar"), "tobilleras");
        assert_eq!(categorize("Diadema Perlada", "sin_clasificar"), "monas");
    }

    #[test]
    fn test_falls_back_to_product_type() {
        assert_eq!(categorize("Producto Misterioso", "moñas"), "monas");
        assert_eq!(categorize("Producto Misterioso", "bolsos"), "bolsos");
        assert_eq!(categorize("Producto Misterioso", "sin_clasificar"), "accesorios");
        assert_eq!(categorize("Producto Misterioso", "desconocido"), "accesorios");
    }

    #[test]
    fn test_slug_strips_accents_and_appends_code() {
        assert_eq!(generate_slug("Moña Satinada", "P001"), "mona-satinada-p001");
        assert_eq!(
            generate_slug("Collar Corazón (Baño Oro)", "X42"),
            "collar-corazon-bano-oro-x42"
        );
    }

    #[test]
    fn test_slug_truncates_long_names() {
        let name = "a".repeat(80);
        let slug = generate_slug(&name, "C1");
        assert_eq!(slug.len(), MAX_SLUG_BASE_LEN + 3);
        assert!(slug.ends_with("-c1"));
    }

    #[test]
    fn test_price_only_names_are_detected() {
        assert!(is_price_only_name("$ 12,900"));
        assert!(is_price_only_name("15000.50"));
        assert!(!is_price_only_name("Collar 3 Hilos"));
        assert!(!is_price_only_name(""));
    }

    /// A new export must not break products already referenced by orders:
    /// they get deactivated, never deleted.
    #[tokio::test]
    #[ignore = "Requires PostgreSQL with migrations applied"]
    async fn test_import_keeps_products_referenced_by_orders() {
        let tag = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let pool = super::super::connect().await.expect("connect");

        sqlx::query(
            "INSERT INTO categories (name, slug, description) \
             VALUES ('Aretes', 'aretes', 'Aretes') ON CONFLICT (slug) DO NOTHING",
        )
        .execute(&pool)
        .await
        .expect("category insert");

        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (email, password_hash, first_name, last_name) \
             VALUES ($1, 'not-a-hash', 'Import', 'Fixture') RETURNING id",
        )
        .bind(format!("import-{tag}@example.com"))
        .fetch_one(&pool)
        .await
        .expect("user insert");

        let address_id: i32 = sqlx::query_scalar(
            "INSERT INTO addresses (user_id, full_name, phone, street, city, department) \
             VALUES ($1, 'Import Fixture', '3000000000', 'Calle 1', 'Bogotá', 'Cundinamarca') \
             RETURNING id",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .expect("address insert");

        let sold_product_id: i32 = sqlx::query_scalar(
            "INSERT INTO products (name, slug, description, price, stock, category_id) \
             SELECT 'Aretes Vendidos', $1, 'fixture', 10000, 5, c.id \
             FROM categories c WHERE c.slug = 'aretes' RETURNING id",
        )
        .bind(format!("aretes-vendidos-{tag}"))
        .fetch_one(&pool)
        .await
        .expect("product insert");

        let order_id: i32 = sqlx::query_scalar(
            "INSERT INTO orders \
             (order_number, user_id, address_id, subtotal, shipping_cost, total, payment_method) \
             VALUES ($1, $2, $3, 10000, 0, 10000, 'cash_on_delivery') RETURNING id",
        )
        .bind(format!("ORD-{tag}-FIXTURE00"))
        .bind(user_id)
        .bind(address_id)
        .fetch_one(&pool)
        .await
        .expect("order insert");

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal) \
             VALUES ($1, $2, 1, 10000, 10000)",
        )
        .bind(order_id)
        .bind(sold_product_id)
        .execute(&pool)
        .await
        .expect("order item insert");

        let catalog = serde_json::json!([{
            "name": format!("Aretes Nuevos {tag}"),
            "final_price": 12900.0,
            "code": format!("T{tag}"),
            "product_type": "aretes",
        }]);
        let file = std::env::temp_dir().join(format!("catalog-{tag}.json"));
        std::fs::write(&file, catalog.to_string()).expect("write catalog");

        run(&file).await.expect("import");
        std::fs::remove_file(&file).ok();

        // The sold product survived the import, deactivated.
        let active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM products WHERE id = $1")
                .bind(sold_product_id)
                .fetch_optional(&pool)
                .await
                .expect("product query");
        assert_eq!(active, Some(false));

        // The new export landed.
        let imported: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name = $1 AND is_active")
                .bind(format!("Aretes Nuevos {tag}"))
                .fetch_one(&pool)
                .await
                .expect("count query");
        assert_eq!(imported, 1);
    }
}
