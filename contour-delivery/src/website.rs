//! Site definitions returned by the site service.

use contour_core::ContentLink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A language enabled on a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLanguage {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_master_language: bool,
    #[serde(default)]
    pub url_segment: Option<String>,
}

/// A host name bound to a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteHost {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub language: Option<SiteLanguage>,
}

/// A website registered in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content_roots: HashMap<String, ContentLink>,
    #[serde(default)]
    pub languages: Vec<SiteLanguage>,
    #[serde(default)]
    pub hosts: Vec<SiteHost>,
}

impl Website {
    /// Link to the start page, when the site defines one.
    pub fn start_page(&self) -> Option<&ContentLink> {
        self.content_roots
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("startPage"))
            .map(|(_, link)| link)
    }

    /// The master language of the site.
    pub fn master_language(&self) -> Option<&SiteLanguage> {
        self.languages.iter().find(|l| l.is_master_language)
    }
}

/// All websites, in the order the CMS lists them.
pub type WebsiteList = Vec<Website>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_website() {
        let site: Website = serde_json::from_value(json!({
            "id": "8e2b1d6c",
            "name": "Demo",
            "contentRoots": {
                "StartPage": { "id": 5, "guidValue": "G5", "url": "/en/" }
            },
            "languages": [
                { "name": "en", "displayName": "English", "isMasterLanguage": true },
                { "name": "sv", "displayName": "Svenska", "isMasterLanguage": false }
            ],
            "hosts": [{ "name": "www.example.com", "type": "Primary" }]
        }))
        .unwrap();

        assert_eq!(site.start_page().map(|l| l.id), Some(5));
        assert_eq!(site.master_language().map(|l| l.name.as_str()), Some("en"));
        assert_eq!(site.hosts[0].kind.as_deref(), Some("Primary"));
    }
}
