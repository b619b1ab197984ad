//! Database seeding: demo users, the category set, and sample products.
//!
//! Every insert is idempotent (`ON CONFLICT DO NOTHING`), so the command is
//! safe to re-run against a partially seeded database.

use sqlx::PgPool;

use bella_store_storefront::services::auth::hash_password;

use super::CliError;

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Bolsos",
        slug: "bolsos",
        description: "Bolsos elegantes para toda ocasión",
    },
    SeedCategory {
        name: "Moñas",
        slug: "monas",
        description: "Moñas y accesorios para el cabello",
    },
    SeedCategory {
        name: "Collares",
        slug: "collares",
        description: "Collares y cadenas de moda",
    },
    SeedCategory {
        name: "Aretes",
        slug: "aretes",
        description: "Aretes para complementar tu estilo",
    },
    SeedCategory {
        name: "Pulseras",
        slug: "pulseras",
        description: "Pulseras y brazaletes únicos",
    },
    SeedCategory {
        name: "Anillos",
        slug: "anillos",
        description: "Anillos hermosos para cada ocasión",
    },
    SeedCategory {
        name: "Tobilleras",
        slug: "tobilleras",
        description: "Tobilleras y accesorios para el tobillo",
    },
    SeedCategory {
        name: "Conjuntos",
        slug: "conjuntos",
        description: "Sets y conjuntos de joyería",
    },
    SeedCategory {
        name: "Accesorios",
        slug: "accesorios",
        description: "Cofres, bolsas, joyeros y otros accesorios",
    },
];

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    image: &'static str,
    featured: bool,
    category: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Bolso Tote Elegante",
        slug: "bolso-tote-elegante",
        description: "Bolso tote de cuero sintético ideal para el día a día. Espacioso y con múltiples compartimentos.",
        price: 89_900,
        stock: 15,
        image: "/placeholder-bolso-1.jpg",
        featured: true,
        category: "bolsos",
    },
    SeedProduct {
        name: "Bolso Crossbody Chic",
        slug: "bolso-crossbody-chic",
        description: "Bolso pequeño perfecto para salidas. Correa ajustable y diseño moderno.",
        price: 65_900,
        stock: 20,
        image: "/placeholder-bolso-2.jpg",
        featured: true,
        category: "bolsos",
    },
    SeedProduct {
        name: "Bolso Clutch Noche",
        slug: "bolso-clutch-noche",
        description: "Elegante clutch para eventos especiales. Acabado brillante con cadena dorada.",
        price: 49_900,
        stock: 10,
        image: "/placeholder-bolso-3.jpg",
        featured: false,
        category: "bolsos",
    },
    SeedProduct {
        name: "Set 3 Moñas Satinadas",
        slug: "set-3-monas-satinadas",
        description: "Set de 3 moñas en colores pastel. Material satinado de alta calidad.",
        price: 24_900,
        stock: 30,
        image: "/placeholder-mona-1.jpg",
        featured: true,
        category: "monas",
    },
    SeedProduct {
        name: "Moña XL Terciopelo",
        slug: "mona-xl-terciopelo",
        description: "Moña grande de terciopelo, perfecta para looks elegantes.",
        price: 19_900,
        stock: 25,
        image: "/placeholder-mona-2.jpg",
        featured: false,
        category: "monas",
    },
    SeedProduct {
        name: "Diadema con Moña",
        slug: "diadema-con-mona",
        description: "Diadema decorada con moña central. Cómoda y estilosa.",
        price: 29_900,
        stock: 18,
        image: "/placeholder-mona-3.jpg",
        featured: false,
        category: "monas",
    },
    SeedProduct {
        name: "Collar Cadena Corazón",
        slug: "collar-cadena-corazon",
        description: "Delicado collar con dije de corazón. Baño de oro 18k.",
        price: 45_900,
        stock: 22,
        image: "/placeholder-collar-1.jpg",
        featured: true,
        category: "collares",
    },
    SeedProduct {
        name: "Collar Perlas Cultivadas",
        slug: "collar-perlas-cultivadas",
        description: "Elegante collar de perlas cultivadas. Ideal para ocasiones especiales.",
        price: 89_900,
        stock: 12,
        image: "/placeholder-collar-2.jpg",
        featured: true,
        category: "collares",
    },
    SeedProduct {
        name: "Choker Ajustable",
        slug: "choker-ajustable",
        description: "Choker moderno con cierre ajustable. Diseño minimalista.",
        price: 32_900,
        stock: 28,
        image: "/placeholder-collar-3.jpg",
        featured: false,
        category: "collares",
    },
    SeedProduct {
        name: "Aretes Argolla Grandes",
        slug: "aretes-argolla-grandes",
        description: "Aretes de argolla grandes con acabado brillante. Muy ligeros.",
        price: 35_900,
        stock: 35,
        image: "/placeholder-arete-1.jpg",
        featured: true,
        category: "aretes",
    },
    SeedProduct {
        name: "Aretes Piedras Cristal",
        slug: "aretes-piedras-cristal",
        description: "Aretes con cristales brillantes. Perfectos para eventos.",
        price: 42_900,
        stock: 20,
        image: "/placeholder-arete-2.jpg",
        featured: true,
        category: "aretes",
    },
    SeedProduct {
        name: "Aretes Botón Perla",
        slug: "aretes-boton-perla",
        description: "Clásicos aretes de botón con perla. Elegancia atemporal.",
        price: 28_900,
        stock: 40,
        image: "/placeholder-arete-3.jpg",
        featured: false,
        category: "aretes",
    },
    SeedProduct {
        name: "Pulsera Cadena Dijes",
        slug: "pulsera-cadena-dijes",
        description: "Pulsera con cadena fina y múltiples dijes decorativos.",
        price: 38_900,
        stock: 25,
        image: "/placeholder-pulsera-1.jpg",
        featured: false,
        category: "pulseras",
    },
    SeedProduct {
        name: "Brazalete Rígido Dorado",
        slug: "brazalete-rigido-dorado",
        description: "Brazalete rígido con grabado elegante. Baño de oro.",
        price: 52_900,
        stock: 15,
        image: "/placeholder-pulsera-2.jpg",
        featured: false,
        category: "pulseras",
    },
    SeedProduct {
        name: "Anillo Solitario Zirconia",
        slug: "anillo-solitario-zirconia",
        description: "Hermoso anillo con zirconia central. Diseño clásico.",
        price: 45_900,
        stock: 18,
        image: "/placeholder-anillo-1.jpg",
        featured: false,
        category: "anillos",
    },
    SeedProduct {
        name: "Set 3 Anillos Apilables",
        slug: "set-3-anillos-apilables",
        description: "Set de 3 anillos finos para combinar. Diseño minimalista.",
        price: 34_900,
        stock: 22,
        image: "/placeholder-anillo-2.jpg",
        featured: false,
        category: "anillos",
    },
];

/// Seed the database.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    seed_users(&pool).await?;
    seed_categories(&pool).await?;
    seed_products(&pool).await?;
    seed_demo_address(&pool).await?;

    tracing::info!("Seed complete");
    tracing::info!("Admin login: admin@bellastore.com / admin123");
    tracing::info!("Customer login: cliente@bellastore.com / cliente123");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Seeding users...");

    let admin_hash = hash_password("admin123")?;
    sqlx::query(
        "INSERT INTO users (email, password_hash, first_name, last_name, phone, role) \
         VALUES ($1, $2, 'Admin', 'BellaStore', '3001234567', 'admin') \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind("admin@bellastore.com")
    .bind(&admin_hash)
    .execute(pool)
    .await?;

    let customer_hash = hash_password("cliente123")?;
    sqlx::query(
        "INSERT INTO users (email, password_hash, first_name, last_name, phone, role) \
         VALUES ($1, $2, 'María', 'González', '3009876543', 'customer') \
         ON CONFLICT (email) DO NOTHING",
    )
    .bind("cliente@bellastore.com")
    .bind(&customer_hash)
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Seeding {} categories...", CATEGORIES.len());

    for category in CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, slug, description) VALUES ($1, $2, $3) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(category.name)
        .bind(category.slug)
        .bind(category.description)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Seeding {} products...", PRODUCTS.len());

    for product in PRODUCTS {
        sqlx::query(
            "INSERT INTO products \
             (name, slug, description, price, stock, images, category_id, is_featured) \
             SELECT $1, $2, $3, $4, $5, $6, c.id, $7 FROM categories c WHERE c.slug = $8 \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(vec![product.image.to_string()])
        .bind(product.featured)
        .bind(product.category)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Give the demo customer a default shipping address if they have none.
async fn seed_demo_address(pool: &PgPool) -> Result<(), CliError> {
    sqlx::query(
        "INSERT INTO addresses \
         (user_id, full_name, phone, street, city, department, postal_code, is_default) \
         SELECT u.id, 'María González', '3009876543', 'Calle 123 #45-67, Apto 801', \
                'Bogotá', 'Cundinamarca', '110111', TRUE \
         FROM users u \
         WHERE u.email = 'cliente@bellastore.com' \
           AND NOT EXISTS (SELECT 1 FROM addresses a WHERE a.user_id = u.id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
