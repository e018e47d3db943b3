use crate::core::CRUDTable;
use crate::errors::CrudError;

/// Query key listing the only columns to return (`atts_require=id,name`).
pub const REQUIRED_FIELDS_KEY: &str = "atts_require";
/// Query key listing columns to leave out (`atts_omit=bio`).
pub const OMITTED_FIELDS_KEY: &str = "atts_omit";

/// Column selection requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection {
    pub required: Vec<String>,
    pub omitted: Vec<String>,
}

impl FieldProjection {
    #[must_use]
    pub fn require<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: fields.into_iter().map(Into::into).collect(),
            omitted: Vec::new(),
        }
    }

    #[must_use]
    pub fn omit<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: Vec::new(),
            omitted: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve against the table's columns. Unknown names are dropped, not reported.
    ///
    /// Required columns keep the caller's order; otherwise the table order is used.
    ///
    /// # Errors
    ///
    /// `NoSelectableColumns` when nothing is left to select.
    pub fn resolve<T: CRUDTable>(&self) -> Result<Vec<&'static str>, CrudError> {
        let mut selected: Vec<&'static str> = if self.required.is_empty() {
            T::columns().to_vec()
        } else {
            let mut picked = Vec::new();
            for name in &self.required {
                if let Some(column) = T::columns().iter().find(|c| **c == name.as_str())
                    && !picked.contains(column)
                {
                    picked.push(*column);
                }
            }
            picked
        };

        selected.retain(|column| !self.omitted.iter().any(|o| o == column));

        if selected.is_empty() {
            return Err(CrudError::NoSelectableColumns);
        }
        Ok(selected)
    }
}
