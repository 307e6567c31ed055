//! Build GraphQL documents over the root fields Hasura generates from a
//! database schema.
//!
//! Builders are pure: no I/O, and identical inputs always produce
//! byte-identical documents. Caller-supplied row data, `where` conditions, and
//! `_set` payloads are never spliced into the document text; they are bound
//! through the `variables` map using Hasura's derivable input types
//! (`<table>_insert_input`, `<table>_bool_exp`, `<table>_set_input`). Table
//! names cannot be bound as variables, so they are interpolated after
//! validation against an identifier-safe pattern.

use serde_json::{Value, json};

use crate::errors::RequestError;

/// A GraphQL operation ready to send: document text plus bound variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub document: String,
    pub variables: Option<Value>,
}

/// Introspection document listing the root query type's fields. With Hasura,
/// each tracked table contributes a root query field of the same name.
const LIST_TABLES_DOCUMENT: &str = "\
query {
  __schema {
    queryType {
      fields {
        name
        type {
          name
          kind
        }
      }
    }
  }
}";

/// An ad hoc operation supplied by the caller, with variables given as an
/// optional JSON string.
pub fn raw(query: &str, variables: Option<&str>) -> Result<Operation, RequestError> {
    let variables = variables
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|source| RequestError::InvalidJson {
            name: "variables",
            source,
        })?;
    Ok(Operation {
        document: query.to_string(),
        variables,
    })
}

pub fn list_tables() -> Operation {
    Operation {
        document: LIST_TABLES_DOCUMENT.to_string(),
        variables: None,
    }
}

/// Introspect one named type: field names, types, kinds, and one level of
/// wrapped (`ofType`) info.
pub fn describe_table(table_name: &str) -> Result<Operation, RequestError> {
    let table_name = validate_table_name(table_name)?;
    Ok(Operation {
        document: format!(
            "\
query {{
  __type(name: \"{table_name}\") {{
    name
    fields {{
      name
      type {{
        name
        kind
        ofType {{
          name
          kind
        }}
      }}
    }}
  }}
}}"
        ),
        variables: None,
    })
}

/// An `insert_<table>` mutation. `data` is a JSON string holding either a
/// single row object or an array of rows.
pub fn insert(table_name: &str, data: &str) -> Result<Operation, RequestError> {
    let table_name = validate_table_name(table_name)?;
    let objects = match parse_json("data", data)? {
        rows @ Value::Array(_) => rows,
        row => Value::Array(vec![row]),
    };
    Ok(Operation {
        document: format!(
            "\
mutation InsertRows($objects: [{table_name}_insert_input!]!) {{
  insert_{table_name}(objects: $objects) {{
    affected_rows
    returning {{
      id
    }}
  }}
}}"
        ),
        variables: Some(json!({ "objects": objects })),
    })
}

/// An `update_<table>` mutation. Both arguments are JSON strings: a Hasura
/// boolean expression for `where` and the column values for `_set`.
pub fn update(table_name: &str, where_clause: &str, set_data: &str) -> Result<Operation, RequestError> {
    let table_name = validate_table_name(table_name)?;
    let where_value = parse_json("where_clause", where_clause)?;
    let set_value = parse_json("set_data", set_data)?;
    Ok(Operation {
        document: format!(
            "\
mutation UpdateRows($where: {table_name}_bool_exp!, $_set: {table_name}_set_input!) {{
  update_{table_name}(where: $where, _set: $_set) {{
    affected_rows
    returning {{
      id
    }}
  }}
}}"
        ),
        variables: Some(json!({ "where": where_value, "_set": set_value })),
    })
}

/// A `delete_<table>` mutation with a Hasura boolean expression for `where`.
pub fn delete(table_name: &str, where_clause: &str) -> Result<Operation, RequestError> {
    let table_name = validate_table_name(table_name)?;
    let where_value = parse_json("where_clause", where_clause)?;
    Ok(Operation {
        document: format!(
            "\
mutation DeleteRows($where: {table_name}_bool_exp!) {{
  delete_{table_name}(where: $where) {{
    affected_rows
  }}
}}"
        ),
        variables: Some(json!({ "where": where_value })),
    })
}

/// Reject any table name that is not embeddable in a GraphQL document as a
/// plain name. This is the only value interpolated into document text.
fn validate_table_name(name: &str) -> Result<&str, RequestError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(RequestError::InvalidTableName {
            name: name.to_string(),
        })
    }
}

fn parse_json(name: &'static str, text: &str) -> Result<Value, RequestError> {
    serde_json::from_str(text).map_err(|source| RequestError::InvalidJson { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users")]
    #[case("_private")]
    #[case("Users2")]
    #[case("order_items")]
    fn valid_table_names_are_accepted(#[case] name: &str) {
        assert_eq!(validate_table_name(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case("2fast")]
    #[case("user-name")]
    #[case("users; drop")]
    #[case("users\") { id } #")]
    fn invalid_table_names_are_rejected(#[case] name: &str) {
        assert!(matches!(
            validate_table_name(name),
            Err(RequestError::InvalidTableName { .. })
        ));
    }

    #[test]
    fn raw_passes_query_through_verbatim() {
        let query = "query GetUser($id: ID!) { user(id: $id) { id name } }";
        let operation = raw(query, Some(r#"{"id": "123"}"#)).unwrap();
        assert_eq!(operation.document, query);
        assert_eq!(operation.variables, Some(json!({ "id": "123" })));
    }

    #[test]
    fn raw_omits_absent_variables() {
        let operation = raw("query { users { id } }", None).unwrap();
        assert_eq!(operation.variables, None);
    }

    #[test]
    fn raw_reports_unparseable_variables() {
        let result = raw("query { users { id } }", Some("{not valid json"));
        assert!(matches!(
            result,
            Err(RequestError::InvalidJson {
                name: "variables",
                ..
            })
        ));
    }

    #[test]
    fn list_tables_requests_root_query_fields() {
        let operation = list_tables();
        assert!(operation.document.contains("__schema"));
        assert!(operation.document.contains("queryType"));
        assert_eq!(operation.variables, None);
    }

    #[test]
    fn describe_table_interpolates_the_table_name() {
        let operation = describe_table("users").unwrap();
        assert!(operation.document.contains("__type(name: \"users\")"));
        assert!(operation.document.contains("ofType"));
        assert_eq!(operation.variables, None);
    }

    #[test]
    fn insert_binds_rows_as_variables() {
        let operation = insert("posts", r#"{"title":"a"}"#).unwrap();
        assert!(operation.document.contains("insert_posts(objects: $objects)"));
        assert!(operation.document.contains("[posts_insert_input!]!"));
        assert!(operation.document.contains("affected_rows"));
        assert_eq!(
            operation.variables,
            Some(json!({ "objects": [{ "title": "a" }] }))
        );
        // Row data must never leak into the document text
        assert!(!operation.document.contains("title"));
    }

    #[test]
    fn insert_accepts_an_array_of_rows() {
        let operation = insert("posts", r#"[{"title":"a"},{"title":"b"}]"#).unwrap();
        assert_eq!(
            operation.variables,
            Some(json!({ "objects": [{ "title": "a" }, { "title": "b" }] }))
        );
    }

    #[test]
    fn insert_reports_unparseable_data() {
        assert!(matches!(
            insert("posts", "{broken"),
            Err(RequestError::InvalidJson { name: "data", .. })
        ));
    }

    #[test]
    fn insert_rejects_an_unsafe_table_name() {
        assert!(matches!(
            insert("posts) { id } #", r#"{"title":"a"}"#),
            Err(RequestError::InvalidTableName { .. })
        ));
    }

    #[test]
    fn update_binds_where_and_set_as_variables() {
        let operation = update("users", r#"{"id":{"_eq":1}}"#, r#"{"name":"b"}"#).unwrap();
        assert!(
            operation
                .document
                .contains("update_users(where: $where, _set: $_set)")
        );
        assert!(operation.document.contains("users_bool_exp!"));
        assert!(operation.document.contains("users_set_input!"));
        assert_eq!(
            operation.variables,
            Some(json!({
                "where": { "id": { "_eq": 1 } },
                "_set": { "name": "b" },
            }))
        );
    }

    #[test]
    fn update_reports_which_argument_was_unparseable() {
        assert!(matches!(
            update("users", "{broken", r#"{"name":"b"}"#),
            Err(RequestError::InvalidJson {
                name: "where_clause",
                ..
            })
        ));
        assert!(matches!(
            update("users", r#"{"id":{"_eq":1}}"#, "{broken"),
            Err(RequestError::InvalidJson {
                name: "set_data",
                ..
            })
        ));
    }

    #[test]
    fn delete_binds_where_as_a_variable() {
        let operation = delete("users", r#"{"id":{"_eq":1}}"#).unwrap();
        assert!(operation.document.contains("delete_users(where: $where)"));
        assert!(operation.document.contains("affected_rows"));
        assert!(!operation.document.contains("returning"));
        assert_eq!(
            operation.variables,
            Some(json!({ "where": { "id": { "_eq": 1 } } }))
        );
    }

    #[test]
    fn builders_are_deterministic() {
        assert_eq!(
            insert("posts", r#"{"title":"a"}"#).unwrap(),
            insert("posts", r#"{"title":"a"}"#).unwrap()
        );
        assert_eq!(
            update("users", r#"{"id":{"_eq":1}}"#, r#"{"name":"b"}"#).unwrap(),
            update("users", r#"{"id":{"_eq":1}}"#, r#"{"name":"b"}"#).unwrap()
        );
        assert_eq!(describe_table("users").unwrap(), describe_table("users").unwrap());
    }
}
