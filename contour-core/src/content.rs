//! Content entities.

use crate::ContentLink;
use crate::link::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tags carried by locally synthesized network error entities.
pub const NETWORK_ERROR_TYPE: [&str; 2] = ["Errors", "NetworkError"];

/// Provider name of locally synthesized network error entities.
pub const NETWORK_ERROR_PROVIDER: &str = "ContentDeliveryAPI_Errors";

/// Language of a content entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModel {
    /// Language tag, e.g. `en` or `nl-BE`.
    pub name: String,

    /// Human readable language name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// A content item fetched from the delivery API.
///
/// Entities are replaced wholesale on every fetch or event and never mutated
/// in place once shared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntity {
    /// Link to this item.
    pub content_link: ContentLink,

    /// Type hierarchy, most specific type last.
    #[serde(default)]
    pub content_type: Vec<String>,

    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Language of this version of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageModel>,

    /// Public url, used when the link carries no route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Remaining content properties.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ContentEntity {
    /// Create an entity without properties.
    pub fn new<I, S>(content_link: ContentLink, content_type: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content_link,
            content_type: content_type.into_iter().map(Into::into).collect(),
            name: name.into(),
            language: None,
            url: None,
            properties: Map::new(),
        }
    }

    /// Synthesize the placeholder rendered in place of content that failed to load.
    ///
    /// `error_id` must be unique per client so that two failures never share
    /// an identity.
    pub fn network_error(error_id: i64, path: impl Into<String>, reason: impl Into<String>) -> Self {
        let link = ContentLink {
            id: error_id,
            work_id: Some(0),
            guid_value: String::new(),
            provider_name: Some(NETWORK_ERROR_PROVIDER.to_string()),
            url: path.into(),
            expanded: None,
        };

        Self::new(link, NETWORK_ERROR_TYPE, "Error").with_property(
            "error",
            serde_json::json!({
                "propertyDataType": "Unknown",
                "value": reason.into(),
            }),
        )
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(LanguageModel {
            name: language.into(),
            display_name: None,
        });
        self
    }

    /// Set a property.
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Most specific type tag.
    pub fn type_name(&self) -> Option<&str> {
        self.content_type.last().map(String::as_str)
    }

    /// Language tag, ignoring empty names.
    pub fn language_name(&self) -> Option<&str> {
        self.language
            .as_ref()
            .map(|l| l.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Look up a property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Whether this entity was synthesized for a failed request.
    pub fn is_network_error(&self) -> bool {
        self.content_type.iter().map(String::as_str).eq(NETWORK_ERROR_TYPE)
    }
}
