use sea_orm::Value;
use std::fmt;

use crate::core::CRUDTable;
use crate::errors::{CrudError, LikeViolation};

// Basic safety limits
pub const MAX_FIELD_NAME_LENGTH: usize = 64;
pub const MAX_LIKE_VALUE_LENGTH: usize = 100;
pub const MAX_LIKE_WILDCARDS: usize = 2;

/// Characters that may never appear in a `LIKE` value. `%` is counted separately.
const FORBIDDEN_LIKE_CHARS: [char; 6] = ['_', '\\', '\'', '"', '`', ';'];

/// Comparison operators a condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl Operator {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
        }
    }

    /// Map a query-parameter suffix (`age_gte`) to an operator.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `field operator value` term of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Like, value)
    }
}

/// Check a field name against the length limit and the table whitelist.
pub(crate) fn validate_field<T: CRUDTable>(field: &str) -> Result<(), CrudError> {
    if field.is_empty() {
        return Err(CrudError::invalid_field(field, "field name is empty"));
    }
    if field.chars().count() > MAX_FIELD_NAME_LENGTH {
        return Err(CrudError::invalid_field(field, "field name too long"));
    }
    if !T::is_filterable(field) {
        return Err(CrudError::invalid_field(field, "field is not filterable"));
    }
    Ok(())
}

/// Validate a `LIKE` pattern. The value is checked, never rewritten.
pub fn validate_like_value(field: &str, value: &Value) -> Result<(), CrudError> {
    let fail = |violation| CrudError::InvalidLikeValue {
        field: field.to_string(),
        violation,
    };

    let Value::String(Some(text)) = value else {
        return Err(fail(LikeViolation::NotAString));
    };
    if text.chars().count() > MAX_LIKE_VALUE_LENGTH {
        return Err(fail(LikeViolation::TooLong));
    }
    if let Some(c) = text.chars().find(|c| FORBIDDEN_LIKE_CHARS.contains(c)) {
        return Err(fail(LikeViolation::ForbiddenCharacter(c)));
    }
    let wildcards = text.matches('%').count();
    if wildcards > MAX_LIKE_WILDCARDS {
        return Err(fail(LikeViolation::TooManyWildcards(wildcards)));
    }
    Ok(())
}

/// Resolve `key` to `(base_field, operator)`.
///
/// A key that is itself a filterable column is an equality test, which keeps
/// columns like `author_id` usable. Otherwise the key is split at its last
/// underscore and the suffix must be a known operator. A non-filterable base
/// that still ends in an operator suffix (`price_gt_lt`) is a stacked operator.
fn split_operator<'a, T: CRUDTable>(key: &'a str) -> Result<(&'a str, Operator), CrudError> {
    if T::is_filterable(key) {
        return Ok((key, Operator::Eq));
    }
    let Some((base, suffix)) = key.rsplit_once('_') else {
        return Err(CrudError::invalid_field(key, "field is not filterable"));
    };
    let operator = Operator::from_suffix(suffix).ok_or_else(|| CrudError::InvalidOperator {
        operator: suffix.to_string(),
    })?;
    if !T::is_filterable(base)
        && let Some((_, inner)) = base.rsplit_once('_')
        && Operator::from_suffix(inner).is_some()
    {
        return Err(CrudError::InvalidOperator {
            operator: format!("{inner}_{suffix}"),
        });
    }
    Ok((base, operator))
}

/// Parse one `field[_op]=value` query parameter into a validated condition.
///
/// # Errors
///
/// `InvalidField` for empty, overlong or non-whitelisted fields, `InvalidValue`
/// for an empty value, `InvalidOperator` for an unknown suffix and
/// `InvalidLikeValue` for a rejected pattern.
pub fn parse_condition<T: CRUDTable>(field: &str, value: &str) -> Result<Condition, CrudError> {
    if field.is_empty() {
        return Err(CrudError::invalid_field(field, "field name is empty"));
    }
    if value.is_empty() {
        return Err(CrudError::InvalidValue {
            field: field.to_string(),
            reason: "value is empty",
        });
    }
    if field.chars().count() > MAX_FIELD_NAME_LENGTH {
        return Err(CrudError::invalid_field(field, "field name too long"));
    }

    let (base, operator) = split_operator::<T>(field)?;
    validate_field::<T>(base)?;

    let value = Value::from(value);
    if operator == Operator::Like {
        validate_like_value(base, &value)?;
    }

    Ok(Condition::new(base, operator, value))
}
