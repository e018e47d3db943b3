use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};
use tablecrud::{CRUDTable, Changes, UpdateModel};

/// `email` is stored but deliberately not filterable.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

impl Author {
    pub fn new(id: i64, name: &str, email: &str, bio: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            bio: bio.map(ToString::to_string),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthorUpdate {
    #[serde(default)]
    pub id: Option<i64>,
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
            .set_if("id", self.id)
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
