#![allow(dead_code)]

use axum::Router;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use tablecrud::{Repository, routes::crud_router};
use tracing_subscriber::EnvFilter;

pub mod author_table;
pub mod book_table;
pub mod executors;

pub use author_table::{Author, AuthorUpdate};
pub use book_table::{Book, BookUpdate};
pub use executors::{FailingExecutor, RecordingExecutor, SlowExecutor};

// Helper function to get database URL from environment or default to SQLite
fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

// Cleanup function for persistent databases
async fn cleanup_test_tables(db: &DatabaseConnection) {
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS books").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS authors").await;
}

// Statement logs from the repository show up with `RUST_LOG=tablecrud=debug`
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_test_tracing();
    let database_url = get_test_database_url();
    tracing::debug!(url = %database_url, "Connecting test database");
    let db = Database::connect(&database_url).await?;

    // For persistent databases, clean up any existing tables
    if !database_url.starts_with("sqlite::memory:") {
        cleanup_test_tables(&db).await;
    }

    db.execute_unprepared(
        "CREATE TABLE authors (
            id BIGINT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            bio TEXT
        )",
    )
    .await?;
    db.execute_unprepared(
        "CREATE TABLE books (
            id BIGINT PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            author_id BIGINT NOT NULL,
            price BIGINT NOT NULL,
            stock BIGINT NOT NULL
        )",
    )
    .await?;

    Ok(db)
}

pub fn sample_authors() -> Vec<Author> {
    vec![
        Author::new(1, "Alice", "alice@example.com", Some("Writes about rust")),
        Author::new(2, "Bob", "bob@example.com", None),
        Author::new(3, "Carol", "carol@example.com", Some("Poet")),
    ]
}

pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new(1, "Ownership", 1, 1500, 3),
        Book::new(2, "Borrowing", 1, 2500, 0),
        Book::new(3, "Lifetimes", 2, 4000, 7),
        Book::new(4, "Traits", 3, 900, 12),
    ]
}

/// Fresh database with the sample authors and books inserted.
pub async fn setup_seeded_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    let authors = Repository::<Author>::new(db.clone());
    for author in sample_authors() {
        authors
            .create_one(&author)
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))?;
    }
    let books = Repository::<Book>::new(db.clone());
    for book in sample_books() {
        books
            .create_one(&book)
            .await
            .map_err(|e| DbErr::Custom(e.to_string()))?;
    }
    Ok(db)
}

pub fn setup_test_app(db: &DatabaseConnection) -> Router {
    let api = Router::new()
        .nest("/authors", crud_router(Repository::<Author>::new(db.clone())))
        .nest("/books", crud_router(Repository::<Book>::new(db.clone())));

    Router::new().nest("/api/v1", api)
}
