use mongodb::bson::{doc, Document as BsonDocument};

/// Field holding the store key in every record.
pub const ID_FIELD: &str = "id";

/// Key selection understood by a [`DocumentCollection`](crate::DocumentCollection).
#[derive(Clone, Debug, PartialEq)]
pub enum KeyFilter {
    All,
    Ids(Vec<String>),
    /// Keys starting with the given string. MongoDB has no native key-prefix
    /// listing, so this is emulated with an anchored regex.
    Prefix(String),
}

impl KeyFilter {
    pub fn for_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some(prefix) if !prefix.is_empty() => KeyFilter::Prefix(prefix.to_string()),
            _ => KeyFilter::All,
        }
    }

    pub fn to_document(&self) -> BsonDocument {
        let mut filter = BsonDocument::new();
        match self {
            KeyFilter::All => {}
            KeyFilter::Ids(ids) => {
                filter.insert(ID_FIELD, doc! { "$in": ids.clone() });
            }
            KeyFilter::Prefix(prefix) => {
                filter.insert(
                    ID_FIELD,
                    doc! { "$regex": format!("^{}", escape_regex(prefix)) },
                );
            }
        }
        filter
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Ids(ids) => ids.iter().any(|id| id == key),
            KeyFilter::Prefix(prefix) => key.starts_with(prefix.as_str()),
        }
    }
}

fn escape_regex(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for ch in literal.chars() {
        if matches!(
            ch,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
                | '#' | '-' | '&' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_regex_escapes_metacharacters() {
        assert_eq!(escape_regex("a.b*c"), r"a\.b\*c");
        assert_eq!(escape_regex("docs/2024"), "docs/2024");
        assert_eq!(escape_regex(r"x\y"), r"x\\y");
    }
}
