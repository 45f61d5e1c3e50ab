use serde::{Deserialize, Serialize};

use crate::constants::WILDCARD_CONTEXT;

/// What the opinion source knows about the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    /// Free-form profile (history, personality notes) forwarded to critics.
    #[serde(default)]
    pub profile: serde_json::Value,
}

/// What the opinion source knows about the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemContext {
    pub item_id: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// A single "how would this user rate this item" request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub user: UserContext,
    pub item: ItemContext,
    /// Numeric context features appended to the calibrator input.
    #[serde(default)]
    pub context_features: Vec<f64>,
}

impl PredictionRequest {
    pub fn new(user_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            user: UserContext {
                user_id: user_id.into(),
                profile: serde_json::Value::Null,
            },
            item: ItemContext {
                item_id: item_id.into(),
                genres: Vec::new(),
                attributes: serde_json::Value::Null,
            },
            context_features: Vec::new(),
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context_features(mut self, features: Vec<f64>) -> Self {
        self.context_features = features;
        self
    }

    pub fn routing_context(&self) -> RoutingContext {
        RoutingContext {
            genres: self.item.genres.clone(),
            user_id: Some(self.user.user_id.clone()),
        }
    }
}

/// The part of a request the router conditions on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingContext {
    pub genres: Vec<String>,
    pub user_id: Option<String>,
}

impl RoutingContext {
    pub fn for_genres<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genres: genres.into_iter().map(Into::into).collect(),
            user_id: None,
        }
    }

    /// Genre bucket key: trimmed, lower-cased, sorted, deduplicated, `|`-joined.
    pub fn key(&self) -> String {
        let mut genres: Vec<String> = self
            .genres
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        if genres.is_empty() {
            return WILDCARD_CONTEXT.to_string();
        }
        genres.sort();
        genres.dedup();
        genres.join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_and_case_insensitive() {
        let a = RoutingContext::for_genres(["Drama", "romance"]);
        let b = RoutingContext::for_genres([" Romance", "drama", "DRAMA"]);
        assert_eq!(a.key(), "drama|romance");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn empty_genres_use_wildcard() {
        assert_eq!(RoutingContext::default().key(), WILDCARD_CONTEXT);
        assert_eq!(RoutingContext::for_genres(["  "]).key(), WILDCARD_CONTEXT);
    }
}
