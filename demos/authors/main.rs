//! Serves `/authors` and `/books` over a SQLite database.
//!
//! ```sh
//! TABLECRUD_URL=sqlite::memory: RUST_LOG=tablecrud=debug \
//!     cargo run -p tablecrud --example authors --features sqlite
//! curl 'localhost:3000/books?price_gte=1000&sort_field=price&sort_order=desc'
//! ```

mod tables;

use axum::Router;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr};
use tablecrud::{DatabaseConfig, Repository, routes::crud_router};
use tracing_subscriber::EnvFilter;

use tables::{Author, Book};

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    if db.get_database_backend() != DatabaseBackend::Sqlite {
        return Ok(());
    }
    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS authors (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            bio TEXT
        )",
    )
    .await?;
    db.execute_unprepared(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            author_id INTEGER NOT NULL REFERENCES authors (id),
            price INTEGER NOT NULL
        )",
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = DatabaseConfig::load()?;
    if config.url.starts_with("sqlite::memory:") {
        // Every pooled connection would otherwise get its own empty database
        config.max_connections = 1;
        config.min_connections = 1;
    }
    let db = config.connect().await?;
    create_tables(&db).await?;

    let authors = Repository::<Author>::new(db.clone());
    let books = Repository::<Book>::new(db);
    let (authors, books) = match config.statement_timeout() {
        Some(timeout) => (
            authors.with_statement_timeout(timeout),
            books.with_statement_timeout(timeout),
        ),
        None => (authors, books),
    };

    let app = Router::new()
        .nest("/authors", crud_router(authors))
        .nest("/books", crud_router(books));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("API: http://0.0.0.0:3000/authors and http://0.0.0.0:3000/books");
    axum::serve(listener, app).await?;
    Ok(())
}
