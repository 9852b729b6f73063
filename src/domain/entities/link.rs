//! Link entity representing a short path to destination mapping.

use chrono::{DateTime, Utc};

/// A durable short link entry.
///
/// `key` is the short path (unique across the store, the empty string
/// included). `hits` is kept in the table but never consulted when resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub key: String,
    pub destination: String,
    pub hits: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(key: String, destination: String, hits: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            key,
            destination,
            hits,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub key: String,
    pub destination: String,
}

impl NewLink {
    pub fn new(key: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            "abc".to_string(),
            "https://example.com".to_string(),
            0,
            now,
        );

        assert_eq!(link.key, "abc");
        assert_eq!(link.destination, "https://example.com");
        assert_eq!(link.hits, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_new_link_accepts_empty_key() {
        let new_link = NewLink::new("", "https://www.example.org/");

        assert!(new_link.key.is_empty());
        assert_eq!(new_link.destination, "https://www.example.org/");
    }
}
