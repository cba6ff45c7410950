//! Demo server: seeds a categories table and a page of containers, registers
//! two listing resources, mounts them under /api/v1, and serves.

use axum::Router;
use listing_sdk::{
    common_routes_with_ready, ensure_container_table, ensure_database_exists, ContainerService,
    ListingConfig, Registry, Resource,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("listing_sdk=info".parse()?))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/listing_demo".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    seed(&pool).await?;
    ensure_container_table(&pool).await?;
    if ContainerService::list(&pool, 1).await?.is_empty() {
        ContainerService::add(&pool, 1, "header").await?;
        ContainerService::add(&pool, 1, "body").await?;
        ContainerService::add(&pool, 1, "footer").await?;
    }

    let mut registry = Registry::new(ListingConfig {
        prefix: "/api/v1".into(),
        cors: true,
    });
    registry.register(
        Resource::new("Category")
            .columns(["id", "name", "created_at"])
            .search_template("name ILIKE ?")
            .order_by("id desc"),
    );
    registry.register(
        Resource::new("Container")
            .columns(["id", "page_id", "kind", "display_order"])
            .search_column("kind")
            .order_by("display_order"),
    );
    let listing = registry.mount(pool.clone())?;

    let app = Router::new()
        .merge(common_routes_with_ready(pool))
        .merge(listing);

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn seed(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    if count.0 == 0 {
        for name in ["Books", "Music", "Games", "Tools", "Garden"] {
            sqlx::query("INSERT INTO categories (name) VALUES ($1)")
                .bind(name)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}
