//! Link click interception.

use url::Url;

/// What to do with a clicked link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The href could not be resolved; leave the click alone.
    Ignore,
    /// The link points at the page already shown; swallow the click.
    SamePage,
    /// Let the browser follow the link.
    External,
    /// Route to this in-app path.
    Push(String),
}

/// Attributes of the clicked anchor that affect navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAttributes {
    /// `data-force-reload` is present.
    pub force_reload: bool,
    /// Value of the `target` attribute.
    pub target: Option<String>,
}

impl LinkAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_reload(mut self) -> Self {
        self.force_reload = true;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Decide how to handle a click on a link to `href`.
///
/// Links to another origin are followed by the browser. Same-origin links
/// become in-app paths with their query kept and `base_path` stripped.
/// Forced reloads, `target="_blank"` and asset links under `/globalassets/`
/// are left to the browser as well.
pub fn resolve_navigation(
    current_url: &Url,
    href: &str,
    attrs: &LinkAttributes,
    base_path: &str,
    current_path: &str,
) -> Navigation {
    let Ok(target) = current_url.join(href) else {
        return Navigation::Ignore;
    };
    if target.origin() != current_url.origin() {
        return Navigation::External;
    }

    let mut path = target.path().to_string();
    if let Some(query) = target.query().filter(|q| !q.is_empty()) {
        path.push('?');
        path.push_str(query);
    }

    if path == current_path {
        return Navigation::SamePage;
    }

    if attrs.force_reload
        || attrs.target.as_deref() == Some("_blank")
        || path.contains("/globalassets/")
    {
        return Navigation::External;
    }

    if !base_path.is_empty()
        && let Some(rest) = path.strip_prefix(base_path)
    {
        path = if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{rest}")
        };
    }

    Navigation::Push(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Url {
        Url::parse("https://www.example.com/spa/en/").unwrap()
    }

    fn resolve(href: &str, attrs: &LinkAttributes) -> Navigation {
        resolve_navigation(&current(), href, attrs, "/spa", "/spa/en/")
    }

    #[test]
    fn test_same_origin_link_is_pushed_without_base_path() {
        assert_eq!(
            resolve("/spa/en/products/widget/", &LinkAttributes::new()),
            Navigation::Push("/en/products/widget/".to_string())
        );
        assert_eq!(
            resolve("products/?page=2", &LinkAttributes::new()),
            Navigation::Push("/en/products/?page=2".to_string())
        );
    }

    #[test]
    fn test_root_base_path() {
        let nav = resolve_navigation(
            &Url::parse("https://www.example.com/").unwrap(),
            "/en/about/",
            &LinkAttributes::new(),
            "/",
            "/",
        );
        assert_eq!(nav, Navigation::Push("/en/about/".to_string()));
    }

    #[test]
    fn test_other_origin_is_external() {
        assert_eq!(
            resolve("https://cdn.example.com/file.pdf", &LinkAttributes::new()),
            Navigation::External
        );
    }

    #[test]
    fn test_native_links() {
        assert_eq!(resolve("/spa/en/a/", &LinkAttributes::new().force_reload()), Navigation::External);
        assert_eq!(resolve("/spa/en/a/", &LinkAttributes::new().target("_blank")), Navigation::External);
        assert_eq!(
            resolve("/globalassets/brochure.pdf", &LinkAttributes::new()),
            Navigation::External
        );
    }

    #[test]
    fn test_same_page() {
        assert_eq!(resolve("/spa/en/", &LinkAttributes::new()), Navigation::SamePage);
    }

    #[test]
    fn test_unresolvable_href() {
        assert_eq!(resolve("http://[::1", &LinkAttributes::new()), Navigation::Ignore);
    }
}
