//! Identifier to column-name translation.

use std::sync::LazyLock;

use regex::Regex;

static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

/// Translate a mixed-case identifier into the snake-case column name.
///
/// Two passes: a capitalized word gets an underscore in front of it, then any
/// lowercase letter or digit followed by an uppercase letter is split. The
/// result is lower-cased.
///
/// ```
/// use repokit_data::naming::to_column_name;
///
/// assert_eq!(to_column_name("CreatedAt"), "created_at");
/// assert_eq!(to_column_name("UserID"), "user_id");
/// assert_eq!(to_column_name("user_id"), "user_id");
/// ```
pub fn to_column_name(identifier: &str) -> String {
    let snake = FIRST_CAP.replace_all(identifier, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// Default table name for a record type: snake case plus a trailing `s`.
pub fn default_table_name(type_name: &str) -> String {
    format!("{}s", to_column_name(type_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_column_name("Username"), "username");
        assert_eq!(to_column_name("CreatedAt"), "created_at");
        assert_eq!(to_column_name("createdAt"), "created_at");
        assert_eq!(to_column_name("DeletedAt"), "deleted_at");
    }

    #[test]
    fn test_acronym_suffix() {
        assert_eq!(to_column_name("UserID"), "user_id");
        assert_eq!(to_column_name("ID"), "id");
    }

    #[test]
    fn test_acronym_prefix() {
        assert_eq!(to_column_name("HTTPServer"), "http_server");
    }

    #[test]
    fn test_digits() {
        assert_eq!(to_column_name("Address2Line"), "address2_line");
    }

    #[test]
    fn test_idempotent_on_snake_case() {
        for input in ["CreatedAt", "UserID", "HTTPServer", "birthday", "Address2Line"] {
            let once = to_column_name(input);
            assert_eq!(to_column_name(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_default_table_name() {
        assert_eq!(default_table_name("User"), "users");
        assert_eq!(default_table_name("OrderItem"), "order_items");
    }
}
