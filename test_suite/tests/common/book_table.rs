use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};
use tablecrud::{CRUDTable, Changes, UpdateModel};

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub price: i64,
    pub stock: i64,
}

impl Book {
    pub fn new(id: i64, title: &str, author_id: i64, price: i64, stock: i64) -> Self {
        Self {
            id,
            title: title.to_string(),
            author_id,
            price,
            stock,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl UpdateModel for BookUpdate {
    fn changes(&self) -> Changes {
        Changes::new()
            .set_if("title", self.title.clone())
            .set_if("author_id", self.author_id)
            .set_if("price", self.price)
            .set_if("stock", self.stock)
    }
}

impl CRUDTable for Book {
    type Id = i64;
    type UpdateModel = BookUpdate;

    const TABLE_NAME: &'static str = "books";
    const RESOURCE_NAME_SINGULAR: &'static str = "book";

    fn columns() -> &'static [&'static str] {
        &["id", "title", "author_id", "price", "stock"]
    }

    fn filterable_columns() -> &'static [&'static str] {
        &["id", "title", "author_id", "price", "stock"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.title.clone().into(),
            self.author_id.into(),
            self.price.into(),
            self.stock.into(),
        ]
    }
}
