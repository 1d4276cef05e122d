//! Content links.

use crate::{ContentEntity, ReferenceError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Addressing record for a content item, as returned by the delivery API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLink {
    /// Numeric content id, `0` when the item has none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,

    /// Work id of an unpublished revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_id: Option<i64>,

    /// Content GUID, empty when unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub guid_value: String,

    /// Content provider, set for items served by a non-default provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    /// Route of the item, empty for non-routable content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Expanded content, when the API inlined it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<Box<ContentEntity>>,
}

impl ContentLink {
    /// Create a link from its numeric id, GUID and route.
    pub fn new(id: i64, guid: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            guid_value: guid.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the work id.
    pub fn with_work_id(mut self, work_id: i64) -> Self {
        self.work_id = Some(work_id);
        self
    }

    /// Set the provider name.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider_name = Some(provider.into());
        self
    }

    /// Numeric id, if the link has one.
    pub fn numeric_id(&self) -> Option<i64> {
        (self.id != 0).then_some(self.id)
    }

    /// GUID, if the link has one.
    pub fn guid(&self) -> Option<&str> {
        (!self.guid_value.is_empty()).then_some(self.guid_value.as_str())
    }

    /// Work id, if the link points at a specific revision.
    pub fn revision(&self) -> Option<i64> {
        self.work_id.filter(|id| *id != 0)
    }

    /// Provider name, ignoring empty values.
    pub fn provider(&self) -> Option<&str> {
        self.provider_name.as_deref().filter(|p| !p.is_empty())
    }

    /// Route, if the link has one.
    pub fn route(&self) -> Option<&str> {
        (!self.url.is_empty()).then_some(self.url.as_str())
    }

    /// A link with neither GUID nor route cannot be loaded.
    pub fn is_empty(&self) -> bool {
        self.guid().is_none() && self.route().is_none()
    }

    /// Build the delivery API identifier for this link.
    ///
    /// The GUID wins when `prefer_guid` is set and a GUID exists, or when the
    /// link has no numeric id. Otherwise the numeric id is used, suffixed with
    /// `_<workId>` for edit-mode revisions and `__<providerName>` when the
    /// item comes from a non-default provider.
    pub fn api_id(&self, prefer_guid: bool, edit_mode_revision: bool) -> Result<String> {
        let guid = self.guid();
        match self.numeric_id() {
            Some(id) if !(prefer_guid && guid.is_some()) => {
                let mut out = id.to_string();
                if edit_mode_revision && let Some(work_id) = self.revision() {
                    out = format!("{out}_{work_id}");
                }
                if let Some(provider) = self.provider() {
                    out = format!("{out}__{provider}");
                }
                Ok(out)
            }
            _ => guid.map(str::to_string).ok_or_else(|| {
                ReferenceError::InvalidReference(format!(
                    "link to '{}' has neither a GUID nor a numeric id",
                    self.url
                ))
            }),
        }
    }

    /// Resolve the link url into an href below `base_path`.
    ///
    /// Root-relative urls are rebased so that exactly one `/` separates the
    /// base path and the route; other urls are returned unchanged.
    pub fn href(&self, base_path: &str) -> String {
        match self.url.strip_prefix('/') {
            Some(route) if base_path.ends_with('/') => format!("{base_path}{route}"),
            Some(route) => format!("{base_path}/{route}"),
            None => self.url.clone(),
        }
    }
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
