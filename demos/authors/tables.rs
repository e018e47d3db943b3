use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};
use tablecrud::{CRUDTable, Changes, UpdateModel};

#[derive(Clone, Debug, FromQueryResult, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "tablecrud::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
}

impl UpdateModel for AuthorUpdate {
    fn changes(&self) -> Changes {
        Changes::new()
            .set_if("name", self.name.clone())
            .set_if("email", self.email.clone())
            .set_if("bio", self.bio.clone())
    }
}

impl CRUDTable for Author {
    type Id = i64;
    type UpdateModel = AuthorUpdate;

    const TABLE_NAME: &'static str = "authors";
    const RESOURCE_NAME_SINGULAR: &'static str = "author";

    fn columns() -> &'static [&'static str] {
        &["id", "name", "email", "bio"]
    }

    // email is returned but never searchable
    fn filterable_columns() -> &'static [&'static str] {
        &["id", "name", "bio"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<Value> {
        vec![
            self.id.into(),
            self.name.clone().into(),
            self.email.clone().into(),
            self.bio.clone().into(),
        ]
    }
}

#[derive(Clone, Debug, FromQueryResult, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub price: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub price: Option<i64>,
}

impl UpdateModel for BookUpdate {
    fn changes(&self) -> Changes {
        Changes::new()
            .set_if("title", self.title.clone())
            .set_if("author_id", self.author_id)
            .set_if("price", self.price)
    }
}

impl CRUDTable for Book {
    type Id = i64;
    type UpdateModel = BookUpdate;

    const TABLE_NAME: &'static str = "books";
    const RESOURCE_NAME_SINGULAR: &'static str = "book";

    fn columns() -> &'static [&'static str] {
        &["id", "title", "author_id", "price"]
    }

    fn filterable_columns() -> &'static [&'static str] {
        Self::columns()
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
        ]
    }
}
