//! Content references and canonical identifiers.

use crate::{ContentEntity, ContentLink, ReferenceError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Separator between the api id and the language tag of a [`CanonicalId`].
pub const LANGUAGE_SEPARATOR: &str = "___";

/// Anything that can point at a content item.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentReference {
    /// An opaque route or api id.
    Path(String),
    /// A content link.
    Link(ContentLink),
    /// A fully loaded entity.
    Entity(Box<ContentEntity>),
}

impl ContentReference {
    /// Classify an untyped JSON value.
    ///
    /// Entity shape is checked first (`contentType` and a non-empty `name`),
    /// then link shape (a non-empty `guidValue` or a non-zero numeric `id`),
    /// then plain strings.
    pub fn from_value(value: Value) -> Result<Self> {
        if is_entity_shape(&value) {
            return serde_json::from_value(value)
                .map(|entity| Self::Entity(Box::new(entity)))
                .map_err(|e| ReferenceError::InvalidReference(e.to_string()));
        }
        if is_link_shape(&value) {
            return serde_json::from_value(value)
                .map(Self::Link)
                .map_err(|e| ReferenceError::InvalidReference(e.to_string()));
        }
        match value {
            Value::String(path) => Ok(Self::Path(path)),
            other => Err(ReferenceError::InvalidReference(format!(
                "unsupported reference shape: {other}"
            ))),
        }
    }

    /// The link carried by this reference, if any.
    pub fn link(&self) -> Option<&ContentLink> {
        match self {
            Self::Path(_) => None,
            Self::Link(link) => Some(link),
            Self::Entity(entity) => Some(&entity.content_link),
        }
    }

    /// The entity carried by this reference, if any.
    pub fn entity(&self) -> Option<&ContentEntity> {
        match self {
            Self::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Delivery API identifier, see [`ContentLink::api_id`].
    ///
    /// Paths are returned unchanged.
    pub fn api_id(&self, prefer_guid: bool, edit_mode_revision: bool) -> Result<String> {
        match self {
            Self::Path(path) => Ok(path.clone()),
            Self::Link(link) => link.api_id(prefer_guid, edit_mode_revision),
            Self::Entity(entity) => entity.content_link.api_id(prefer_guid, edit_mode_revision),
        }
    }

    /// Language aware identifier, see [`CanonicalId`].
    pub fn canonical_id(&self, language: Option<&str>, edit_mode_revision: bool) -> Result<CanonicalId> {
        match self {
            Self::Entity(entity) => CanonicalId::for_entity(entity, language, edit_mode_revision),
            other => {
                let base = if edit_mode_revision {
                    other.api_id(true, true)?
                } else {
                    String::new()
                };
                CanonicalId::compose(base, language)
            }
        }
    }

    /// Route of the referenced item.
    pub fn route(&self) -> Option<String> {
        self.link().and_then(ContentLink::route).map(str::to_string)
    }

    /// Href of the referenced item below `base_path`.
    pub fn href(&self, base_path: &str) -> Option<String> {
        match self {
            Self::Path(_) => None,
            Self::Link(link) => Some(link.href(base_path)).filter(|h| !h.is_empty()),
            Self::Entity(entity) => {
                let href = entity.content_link.href(base_path);
                if href.is_empty() {
                    entity.url.clone().filter(|u| !u.is_empty())
                } else {
                    Some(href)
                }
            }
        }
    }
}

fn is_entity_shape(value: &Value) -> bool {
    let has_type = value.get("contentType").is_some_and(|t| !t.is_null());
    let has_name = value
        .get("name")
        .is_some_and(|n| n.as_str().is_some_and(|s| !s.is_empty()) || n.is_object());
    has_type && has_name
}

fn is_link_shape(value: &Value) -> bool {
    let has_guid = value
        .get("guidValue")
        .and_then(Value::as_str)
        .is_some_and(|g| !g.is_empty());
    let has_id = value
        .get("id")
        .and_then(Value::as_i64)
        .is_some_and(|id| id != 0);
    has_guid || has_id
}

impl From<&str> for ContentReference {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ContentReference {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<ContentLink> for ContentReference {
    fn from(link: ContentLink) -> Self {
        Self::Link(link)
    }
}

impl From<ContentEntity> for ContentReference {
    fn from(entity: ContentEntity) -> Self {
        Self::Entity(Box::new(entity))
    }
}

impl From<&Arc<ContentEntity>> for ContentReference {
    fn from(entity: &Arc<ContentEntity>) -> Self {
        Self::Entity(Box::new(ContentEntity::clone(entity)))
    }
}

/// Language and revision aware identity of a content item.
///
/// Composed as `<apiId>___<language>`. Two references denote the same
/// logical item iff their canonical ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Canonical id of an entity.
    ///
    /// The entity's own language wins over `language`; the edit-mode prefix
    /// uses the GUID preferring api id with the revision marker.
    pub fn for_entity(entity: &ContentEntity, language: Option<&str>, edit_mode_revision: bool) -> Result<Self> {
        let base = if edit_mode_revision {
            entity.content_link.api_id(true, true)?
        } else {
            String::new()
        };
        Self::compose(base, entity.language_name().or(language))
    }

    /// Canonical id of a link, always in the given language.
    pub fn for_link(link: &ContentLink, language: Option<&str>, edit_mode_revision: bool) -> Result<Self> {
        let base = if edit_mode_revision {
            link.api_id(true, true)?
        } else {
            String::new()
        };
        Self::compose(base, language)
    }

    fn compose(base: String, language: Option<&str>) -> Result<Self> {
        match language.filter(|l| !l.is_empty()) {
            Some(language) => Ok(Self(format!("{base}{LANGUAGE_SEPARATOR}{language}"))),
            None => Err(ReferenceError::MissingLanguage(base)),
        }
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language part of the identifier.
    pub fn language(&self) -> &str {
        self.0
            .rsplit_once(LANGUAGE_SEPARATOR)
            .map(|(_, language)| language)
            .unwrap_or_default()
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> ContentEntity {
        ContentEntity::new(
            ContentLink::new(42, "G1", "/en/products/widget"),
            ["Page", "Product"],
            "Widget",
        )
        .with_language("en")
    }

    #[test]
    fn test_classify_entity_first() {
        let reference = ContentReference::from_value(json!({
            "contentLink": { "id": 1, "guidValue": "G", "url": "/" },
            "contentType": ["Page"],
            "name": "Home",
            "id": 1
        }))
        .unwrap();
        assert!(reference.entity().is_some());
    }

    #[test]
    fn test_classify_link_then_string() {
        let link = ContentReference::from_value(json!({ "id": 7, "url": "/x" })).unwrap();
        assert!(matches!(link, ContentReference::Link(_)));

        let path = ContentReference::from_value(json!("/en/")).unwrap();
        assert_eq!(path, ContentReference::Path("/en/".to_string()));

        assert!(matches!(
            ContentReference::from_value(json!({ "id": 0 })),
            Err(ReferenceError::InvalidReference(_))
        ));
        assert!(ContentReference::from_value(json!(12)).is_err());
    }

    #[test]
    fn test_path_api_id_is_unchanged() {
        let reference = ContentReference::from("/en/about");
        assert_eq!(reference.api_id(true, true).unwrap(), "/en/about");
        assert_eq!(reference.route(), None);
        assert_eq!(reference.href("/"), None);
    }

    #[test]
    fn test_canonical_id_uses_entity_language() {
        let reference = ContentReference::from(widget());
        let id = reference.canonical_id(Some("nl"), true).unwrap();
        assert_eq!(id.as_str(), "G1___en");
        assert_eq!(id.language(), "en");

        let without_revision = reference.canonical_id(None, false).unwrap();
        assert_eq!(without_revision.as_str(), "___en");
    }

    #[test]
    fn test_canonical_id_differs_by_language() {
        let english = widget();
        let mut dutch = widget();
        dutch.language = Some(crate::LanguageModel {
            name: "nl".to_string(),
            display_name: None,
        });

        let a = CanonicalId::for_entity(&english, None, true).unwrap();
        let b = CanonicalId::for_entity(&dutch, None, true).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, CanonicalId::for_entity(&english, None, true).unwrap());
    }

    #[test]
    fn test_canonical_id_requires_language_for_links() {
        let reference = ContentReference::from(ContentLink::new(42, "G1", "/"));
        assert!(matches!(
            reference.canonical_id(None, true),
            Err(ReferenceError::MissingLanguage(_))
        ));
        assert_eq!(
            reference.canonical_id(Some("en"), true).unwrap().as_str(),
            "G1___en"
        );
    }

    #[test]
    fn test_link_and_entity_share_canonical_id() {
        let entity = widget();
        let link = ContentReference::from(entity.content_link.clone());
        assert_eq!(
            link.canonical_id(Some("en"), true).unwrap(),
            CanonicalId::for_entity(&entity, Some("en"), true).unwrap()
        );
    }

    #[test]
    fn test_network_error_canonical_id_resolves() {
        let entity = ContentEntity::network_error(1, "/en/missing", "");
        let id = CanonicalId::for_entity(&entity, Some("sv"), true).unwrap();
        assert_eq!(id.as_str(), "1__ContentDeliveryAPI_Errors___sv");
    }

    #[test]
    fn test_href_falls_back_to_entity_url() {
        let mut entity = widget();
        entity.content_link.url = String::new();
        entity.url = Some("https://example.com/widget".to_string());

        let reference = ContentReference::from(entity);
        assert_eq!(
            reference.href("/").as_deref(),
            Some("https://example.com/widget")
        );
        assert_eq!(reference.route(), None);
    }
}
