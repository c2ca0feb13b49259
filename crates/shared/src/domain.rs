use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifiers arrive as JSON numbers (bigint keys) or strings (uuid keys)
/// depending on how the remote tables were created.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "RawId")]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawId> for $name {
            fn from(raw: RawId) -> Self {
                match raw {
                    RawId::Int(value) => Self(value.to_string()),
                    RawId::Text(value) => Self(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(CategoryId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// Embedded `categories(name)` join; null when the product has no category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRef>,
    /// Raw timestamp text; tables differ on whether it carries an offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ProductRecord {
    pub fn category_name(&self) -> Option<&str> {
        self.categories
            .as_ref()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

/// One page of rows plus the exact total across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub rows: Vec<ProductRecord>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_and_text_ids() {
        let row: ProductRecord = serde_json::from_str(
            r#"{"id":12,"name":"Desk Lamp","price":19.5,"stock_quantity":0,
                "category_id":"3f1c","categories":{"name":"Lighting"},
                "created_at":"2024-05-01T10:00:00+00:00"}"#,
        )
        .expect("decode product");

        assert_eq!(row.id, ProductId("12".to_string()));
        assert_eq!(row.category_id, Some(CategoryId("3f1c".to_string())));
        assert_eq!(row.category_name(), Some("Lighting"));
        assert!(!row.in_stock());
        assert_eq!(
            row.created_at_utc().map(|ts| ts.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn missing_category_join_has_no_name() {
        let row: ProductRecord = serde_json::from_str(
            r#"{"id":"a","name":"Loose Part","price":2,"stock_quantity":4,"categories":null}"#,
        )
        .expect("decode product");

        assert_eq!(row.category_name(), None);
        assert!(row.in_stock());
        assert_eq!(row.created_at_utc(), None);
    }
}
