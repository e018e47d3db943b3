// Query parameter parsing: condition keys, reserved keys, paging, sorting and projection

use sea_orm::Value;
use tablecrud::filtering::{
    FieldProjection, Operator, QueryParams, SortOrder, parse_condition, parse_conditions,
    parse_filter, parse_pagination, parse_projection, parse_sort,
};
use tablecrud::{CrudError, LikeViolation};

mod common;
use common::{Author, Book};

#[test]
fn test_suffixes_map_to_operators() {
    let cases = [
        ("price", Operator::Eq),
        ("price_gt", Operator::Gt),
        ("price_gte", Operator::Gte),
        ("price_lt", Operator::Lt),
        ("price_lte", Operator::Lte),
        ("title_like", Operator::Like),
    ];
    for (key, expected) in cases {
        let condition = parse_condition::<Book>(key, "10").unwrap();
        assert_eq!(condition.operator, expected, "key {key}");
    }

    let condition = parse_condition::<Book>("price_gte", "10").unwrap();
    assert_eq!(condition.field, "price");
    assert_eq!(condition.value, Value::from("10"));
}

#[test]
fn test_column_with_underscore_is_plain_equality() {
    let condition = parse_condition::<Book>("author_id", "3").unwrap();
    assert_eq!(condition.field, "author_id");
    assert_eq!(condition.operator, Operator::Eq);

    let condition = parse_condition::<Book>("author_id_gte", "3").unwrap();
    assert_eq!(condition.field, "author_id");
    assert_eq!(condition.operator, Operator::Gte);
}

#[test]
fn test_unknown_suffix_is_invalid_operator() {
    let err = parse_condition::<Book>("price_neq", "10").unwrap_err();
    assert!(matches!(err, CrudError::InvalidOperator { ref operator } if operator == "neq"));
}

#[test]
fn test_stacked_suffixes_are_rejected() {
    let err = parse_condition::<Book>("price_gt_lt", "10").unwrap_err();
    assert!(
        matches!(err, CrudError::InvalidOperator { ref operator } if operator == "gt_lt"),
        "{err:?}"
    );
    let err = parse_condition::<Author>("name_gte_like", "x").unwrap_err();
    assert!(matches!(err, CrudError::InvalidOperator { .. }), "{err:?}");

    // A filterable column containing an underscore still takes one suffix
    let condition = parse_condition::<Book>("author_id_lte", "3").unwrap();
    assert_eq!(condition.field, "author_id");
    assert_eq!(condition.operator, Operator::Lte);
}

#[test]
fn test_non_whitelisted_column_is_rejected() {
    // email is a real column, just not filterable
    for key in ["email", "email_like", "password", "nounderscore"] {
        let err = parse_condition::<Author>(key, "x").unwrap_err();
        assert!(matches!(err, CrudError::InvalidField { .. }), "{key}: {err:?}");
    }
}

#[test]
fn test_empty_and_overlong_inputs() {
    assert!(matches!(
        parse_condition::<Author>("", "x"),
        Err(CrudError::InvalidField { .. })
    ));
    assert!(matches!(
        parse_condition::<Author>("name", ""),
        Err(CrudError::InvalidValue { .. })
    ));
    let long_key = "n".repeat(65);
    assert!(matches!(
        parse_condition::<Author>(&long_key, "x"),
        Err(CrudError::InvalidField { .. })
    ));
}

#[test]
fn test_like_values_fail_fast() {
    assert!(parse_condition::<Author>("name_like", "%li%").is_ok());

    let err = parse_condition::<Author>("name_like", "%a%b%").unwrap_err();
    assert!(matches!(
        err,
        CrudError::InvalidLikeValue {
            violation: LikeViolation::TooManyWildcards(3),
            ..
        }
    ));

    for bad in ["a_b", "x'; DROP TABLE authors; --", "back\\slash", "`tick`"] {
        assert!(
            matches!(
                parse_condition::<Author>("name_like", bad),
                Err(CrudError::InvalidLikeValue { .. })
            ),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_reserved_keys_are_not_conditions() {
    let params: QueryParams = [
        ("page", "2"),
        ("page_size", "10"),
        ("sort_field", "name"),
        ("sort_order", "desc"),
        ("atts_require", "id"),
        ("atts_omit", "bio"),
        ("name", "Alice"),
    ]
    .into_iter()
    .collect();

    let conditions = parse_conditions::<Author>(&params).unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].field, "name");
}

#[test]
fn test_conditions_are_key_ordered_and_skip_empty_values() {
    let params: QueryParams = [
        ("stock_gt", "0"),
        ("title", ""),
        ("author_id", "1"),
        ("price_lt", "3000"),
    ]
    .into_iter()
    .collect();

    let conditions = parse_conditions::<Book>(&params).unwrap();
    let fields: Vec<&str> = conditions.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, vec!["author_id", "price", "stock"]);
}

#[test]
fn test_only_first_value_of_a_key_is_used() {
    let params: QueryParams = [("name", "Alice"), ("name", "Bob")].into_iter().collect();
    let conditions = parse_conditions::<Author>(&params).unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].value, Value::from("Alice"));
}

#[test]
fn test_one_bad_key_fails_the_whole_parse() {
    let params: QueryParams = [("name", "Alice"), ("email", "a@b.c")].into_iter().collect();
    assert!(parse_conditions::<Author>(&params).is_err());
    assert!(parse_filter::<Author>(&params).is_err());
}

#[test]
fn test_pagination_parsing() {
    let params: QueryParams = [("page", "2"), ("page_size", "10")].into_iter().collect();
    let pagination = parse_pagination(&params).unwrap().unwrap();
    assert_eq!((pagination.limit(), pagination.offset()), (10, 10));

    let params: QueryParams = [("page", "3")].into_iter().collect();
    let pagination = parse_pagination(&params).unwrap().unwrap();
    assert_eq!((pagination.limit(), pagination.offset()), (10, 20));

    assert!(parse_pagination(&QueryParams::new()).unwrap().is_none());

    for (key, value) in [
        ("page", "0"),
        ("page", "-1"),
        ("page", "two"),
        ("page_size", "0"),
        ("page_size", "101"),
    ] {
        let params: QueryParams = [(key, value)].into_iter().collect();
        assert!(
            matches!(
                parse_pagination(&params),
                Err(CrudError::InvalidPagination { .. })
            ),
            "{key}={value}"
        );
    }
}

#[test]
fn test_sort_parsing() {
    let params: QueryParams = [("sort_field", "name"), ("sort_order", "DeSc")]
        .into_iter()
        .collect();
    let sort = parse_sort::<Author>(&params).unwrap().unwrap();
    assert_eq!(sort.field, "name");
    assert_eq!(sort.order, SortOrder::Desc);

    let params: QueryParams = [("sort_field", "name")].into_iter().collect();
    assert_eq!(
        parse_sort::<Author>(&params).unwrap().unwrap().order,
        SortOrder::Asc
    );

    let params: QueryParams = [("sort_order", "desc")].into_iter().collect();
    assert!(parse_sort::<Author>(&params).unwrap().is_none());

    let params: QueryParams = [("sort_field", "email")].into_iter().collect();
    assert!(matches!(
        parse_sort::<Author>(&params),
        Err(CrudError::InvalidSort { .. })
    ));

    let params: QueryParams = [("sort_field", "name"), ("sort_order", "sideways")]
        .into_iter()
        .collect();
    assert!(matches!(
        parse_sort::<Author>(&params),
        Err(CrudError::InvalidSort { .. })
    ));
}

#[test]
fn test_parse_filter_combines_everything() {
    let params: QueryParams = [
        ("price_gte", "1000"),
        ("sort_field", "price"),
        ("sort_order", "desc"),
        ("page", "2"),
        ("page_size", "5"),
    ]
    .into_iter()
    .collect();

    let filter = parse_filter::<Book>(&params).unwrap().unwrap();
    assert_eq!(filter.conditions.len(), 1);
    assert_eq!(filter.sort.as_ref().map(|s| s.order), Some(SortOrder::Desc));
    assert_eq!(filter.limit, Some(5));
    assert_eq!(filter.offset, Some(5));
}

#[test]
fn test_parse_filter_without_anything_is_none() {
    let params: QueryParams = [("atts_omit", "bio")].into_iter().collect();
    assert!(parse_filter::<Author>(&params).unwrap().is_none());
}

#[test]
fn test_projection_parsing() {
    assert!(parse_projection(&QueryParams::new()).is_none());

    let params: QueryParams = [("atts_require", "id, name"), ("atts_require", "bio")]
        .into_iter()
        .collect();
    let projection = parse_projection(&params).unwrap();
    assert_eq!(projection.required, vec!["id", "name", "bio"]);
    assert!(projection.omitted.is_empty());
}

#[test]
fn test_projection_resolution() {
    let projection = FieldProjection::require(["name", "id", "name", "nope"]);
    assert_eq!(projection.resolve::<Author>().unwrap(), vec!["name", "id"]);

    let projection = FieldProjection::omit(["bio", "email"]);
    assert_eq!(projection.resolve::<Author>().unwrap(), vec!["id", "name"]);

    let projection = FieldProjection {
        required: vec!["id".to_string(), "bio".to_string()],
        omitted: vec!["bio".to_string()],
    };
    assert_eq!(projection.resolve::<Author>().unwrap(), vec!["id"]);

    let projection = FieldProjection::require(["unknown"]);
    assert!(matches!(
        projection.resolve::<Author>(),
        Err(CrudError::NoSelectableColumns)
    ));
}
