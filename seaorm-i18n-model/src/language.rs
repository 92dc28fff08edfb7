use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured language identifier.
///
/// Both textual codes (`"FR"`) and numeric identifiers are allowed; the
/// concrete column type backing `language_id` is fixed once, by scanning the
/// configured list (see [`LanguageKind::of`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageId {
    Code(String),
    Num(i64),
}

impl LanguageId {
    /// Bind value for statements touching the `language_id` column.
    pub fn as_db_value(&self) -> Value {
        match self {
            LanguageId::Code(code) => Value::from(code.clone()),
            LanguageId::Num(num) => Value::from(*num),
        }
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageId::Code(code) => write!(f, "{code}"),
            LanguageId::Num(num) => write!(f, "{num}"),
        }
    }
}

impl From<&str> for LanguageId {
    fn from(code: &str) -> Self {
        LanguageId::Code(code.to_owned())
    }
}

impl From<String> for LanguageId {
    fn from(code: String) -> Self {
        LanguageId::Code(code)
    }
}

impl From<i64> for LanguageId {
    fn from(num: i64) -> Self {
        LanguageId::Num(num)
    }
}

/// Column type backing the `language_id` column of translation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageKind {
    Text,
    Integer,
}

impl LanguageKind {
    /// An all-numeric language list maps to an integer column; any textual
    /// entry makes the whole column textual.
    pub fn of(languages: &[LanguageId]) -> Self {
        if languages
            .iter()
            .all(|language| matches!(language, LanguageId::Num(_)))
        {
            LanguageKind::Integer
        } else {
            LanguageKind::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_list_maps_to_text() {
        let languages = vec![LanguageId::from("FR"), LanguageId::from("EN")];
        assert_eq!(LanguageKind::of(&languages), LanguageKind::Text);
    }

    #[test]
    fn numeric_list_maps_to_integer() {
        let languages = vec![LanguageId::from(1), LanguageId::from(2)];
        assert_eq!(LanguageKind::of(&languages), LanguageKind::Integer);
    }

    #[test]
    fn mixed_list_maps_to_text() {
        let languages = vec![LanguageId::from("1"), LanguageId::from(2)];
        assert_eq!(LanguageKind::of(&languages), LanguageKind::Text);
    }
}
