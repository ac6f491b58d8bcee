use menu_shaker_api::{
    db::{DbPool, create_pool},
    services::auth_service::{hash_password, normalize_email},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, &email, &password).await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let email = normalize_email(email);
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO admin_profiles (id, email, password_hash, display_name, role)
        VALUES ($1, $2, $3, $4, 'admin')
        ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash, role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(password_hash)
    .bind("Manager")
    .fetch_one(pool)
    .await?;

    println!("Ensured admin {email}");
    Ok(id)
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    let products = [
        ("Mango Tango Smoothie", "Fresh mango blended with passion fruit and ice", 4500, "Drinks", true),
        ("Hot Chocolate", "Thick cocoa with cinnamon and a pinch of chili", 3800, "Drinks", false),
        ("Açaí Bowl", "Açaí with granola, banana and honey", 5200, "Bowls", true),
        ("Café de Olla", "Clay-pot coffee with piloncillo and cinnamon", 3000, "Drinks", false),
        ("Ramen Picante", "Spicy miso broth, chashu pork and soft egg", 7900, "Mains", true),
        ("Lemon Tart", "Buttery crust with tangy lemon curd", 3500, "Desserts", false),
    ];

    for (name, description, price, category, featured) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price as i64)
        .bind(category)
        .bind(featured)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
