//! The view side of the action contract

use http::request::Parts;
use std::collections::HashMap;

use super::ActionRegistry;
use crate::config::AdminSettings;
use crate::i18n::{Translator, NULL_TRANSLATOR};

/// View name used when no return view is given
pub const DEFAULT_VIEW: &str = "index_view";

/// Resolves `endpoint.view` names to URLs for one admin view
///
/// Names starting with `.` are relative to the view's own endpoint. The map
/// also remembers which view is the landing page after an action.
///
/// ```rust
/// use acton_admin::actions::UrlMap;
///
/// let urls = UrlMap::new("user", "/admin/user").route("details_view", "/details/");
///
/// assert_eq!(urls.url_for(".index_view").as_deref(), Some("/admin/user/"));
/// assert_eq!(urls.url_for("user.details_view").as_deref(), Some("/admin/user/details/"));
/// assert_eq!(urls.url_for("post.index_view"), None);
/// ```
#[derive(Debug, Clone)]
pub struct UrlMap {
    endpoint: String,
    base_url: String,
    default_view: String,
    routes: HashMap<String, String>,
}

impl UrlMap {
    /// Map for `endpoint` mounted at `base_url`, with `index_view` at `/`
    #[must_use]
    pub fn new(endpoint: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut routes = HashMap::new();
        routes.insert(DEFAULT_VIEW.to_string(), "/".to_string());

        Self {
            endpoint: endpoint.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_view: DEFAULT_VIEW.to_string(),
            routes,
        }
    }

    /// Map for `endpoint` mounted under the configured admin base URL,
    /// landing on the configured default view
    #[must_use]
    pub fn from_settings(settings: &AdminSettings, endpoint: &str) -> Self {
        let base = settings.base_url.trim_end_matches('/');
        Self::new(endpoint, format!("{base}/{endpoint}"))
            .with_default_view(settings.default_view.clone())
    }

    /// Land on `view` after an action when no return view is requested
    #[must_use]
    pub fn with_default_view(mut self, view: impl Into<String>) -> Self {
        self.default_view = view.into();
        self
    }

    /// Add or replace a view route, relative to the base URL
    #[must_use]
    pub fn route(mut self, view: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(view.into(), path.into());
        self
    }

    /// Endpoint name of the owning view
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Base URL of the owning view
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// View redirected to when none is requested
    #[must_use]
    pub fn default_view(&self) -> &str {
        &self.default_view
    }

    /// Resolve `.view` or `endpoint.view`
    #[must_use]
    pub fn url_for(&self, name: &str) -> Option<String> {
        let (endpoint, view) = name.rsplit_once('.')?;
        if !endpoint.is_empty() && endpoint != self.endpoint {
            return None;
        }
        let path = self.routes.get(view)?;
        Some(format!("{}{path}", self.base_url))
    }
}

/// An admin view that exposes bulk actions
///
/// Implementors own an [`ActionRegistry`] built at construction. The
/// remaining methods have defaults and act as extension points.
pub trait ActionsView: Send + Sync + 'static {
    /// Registered actions
    fn actions(&self) -> &ActionRegistry;

    /// URL resolution for redirects
    fn urls(&self) -> &UrlMap;

    /// Whether `name` may be listed or run for this request
    ///
    /// Consulted both when listing and again when dispatching, so a
    /// permission revoked in between is honoured.
    fn is_action_allowed(&self, _name: &str, _request: &Parts) -> bool {
        true
    }

    /// View to return to after an action when none is requested
    fn default_view(&self) -> &str {
        self.urls().default_view()
    }

    /// Translation of labels and prompts
    fn translator(&self) -> &dyn Translator {
        &NULL_TRANSLATOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_absolute_names() {
        let urls = UrlMap::new("user", "/admin/user/");
        assert_eq!(urls.base_url(), "/admin/user");
        assert_eq!(urls.url_for(".index_view").as_deref(), Some("/admin/user/"));
        assert_eq!(urls.url_for("user.index_view").as_deref(), Some("/admin/user/"));
    }

    #[test]
    fn test_unknown_names_do_not_resolve() {
        let urls = UrlMap::new("user", "/admin/user");
        assert_eq!(urls.url_for(".edit_view"), None);
        assert_eq!(urls.url_for("other.index_view"), None);
        assert_eq!(urls.url_for("index_view"), None);
    }

    #[test]
    fn test_from_settings() {
        let settings = AdminSettings {
            base_url: "/backoffice/".to_string(),
            ..AdminSettings::default()
        };
        let urls = UrlMap::from_settings(&settings, "post");
        assert_eq!(urls.endpoint(), "post");
        assert_eq!(urls.default_view(), DEFAULT_VIEW);
        assert_eq!(urls.url_for(".index_view").as_deref(), Some("/backoffice/post/"));
    }

    #[test]
    fn test_from_settings_keeps_configured_default_view() {
        let settings = AdminSettings {
            default_view: "details_view".to_string(),
            ..AdminSettings::default()
        };
        let urls = UrlMap::from_settings(&settings, "user");
        assert_eq!(urls.default_view(), "details_view");
        assert_eq!(UrlMap::new("user", "/admin/user").default_view(), DEFAULT_VIEW);
    }
}
