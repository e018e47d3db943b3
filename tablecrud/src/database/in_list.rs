use sea_orm::Value;

use crate::errors::CrudError;
use crate::sql::Compiled;

/// One argument for [`expand_in`].
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Bound to a single `?`.
    Scalar(Value),
    /// Expands its `?` into `?, ?, ...`, one placeholder per value.
    List(Vec<Value>),
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Value>> for Arg {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

/// Rewrite `IN (?)` placeholders against variable-length argument lists.
///
/// Placeholders are matched to `args` left to right. A `?` inside a
/// backtick-quoted identifier is not a placeholder.
///
/// ```rust,ignore
/// let c = expand_in("DELETE FROM `t` WHERE `id` IN (?)", vec![Arg::List(ids)])?;
/// // DELETE FROM `t` WHERE `id` IN (?, ?, ?)
/// ```
///
/// # Errors
///
/// `EmptyIdList` for an empty list argument; `InvalidValue` when the number of
/// placeholders and arguments differ.
pub fn expand_in(sql: &str, args: Vec<Arg>) -> Result<Compiled, CrudError> {
    let mismatch = || CrudError::InvalidValue {
        field: "arguments".to_string(),
        reason: "placeholder count does not match argument count",
    };

    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut args = args.into_iter();
    let mut quoted = false;

    for c in sql.chars() {
        match c {
            '`' => {
                quoted = !quoted;
                out.push(c);
            }
            '?' if !quoted => match args.next().ok_or_else(mismatch)? {
                Arg::Scalar(value) => {
                    out.push('?');
                    values.push(value);
                }
                Arg::List(list) => {
                    if list.is_empty() {
                        return Err(CrudError::EmptyIdList);
                    }
                    out.push_str(&vec!["?"; list.len()].join(", "));
                    values.extend(list);
                }
            },
            _ => out.push(c),
        }
    }

    if args.next().is_some() {
        return Err(mismatch());
    }
    Ok(Compiled { sql: out, values })
}
