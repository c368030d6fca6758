//! Configuration management for acton-admin
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_` prefix, `__` for nesting)
//! 2. `./config.toml` (development)
//! 3. `~/.config/acton-admin/{service}/config.toml` (user config, XDG)
//! 4. `/etc/acton-admin/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # config.toml
//! [admin]
//! base_url = "/admin"
//! default_view = "index_view"
//! htmx_redirects = true
//! body_limit_bytes = 65536
//!
//! [observability]
//! service_name = "backoffice"
//! json_logs = false
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_admin::config::AdminConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AdminConfig::load_for_service("my-app")?;
//! let base_url = &config.admin.base_url;
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Admin interface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// URL prefix every admin view is mounted under
    pub base_url: String,

    /// View to return to after a bulk action
    pub default_view: String,

    /// Answer HTMX requests with `HX-Redirect` instead of a 302
    pub htmx_redirects: bool,

    /// Largest accepted action form body
    pub body_limit_bytes: usize,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            base_url: "/admin".to_string(),
            default_view: crate::actions::DEFAULT_VIEW.to_string(),
            htmx_redirects: true,
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Service name attached to log output
    pub service_name: String,

    /// Emit JSON logs instead of pretty ones
    pub json_logs: bool,

    /// Filter directive used when `RUST_LOG` is unset
    pub default_directive: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            service_name: "acton-admin".to_string(),
            json_logs: !cfg!(debug_assertions),
            default_directive: if cfg!(debug_assertions) {
                "debug,acton_admin=trace".to_string()
            } else {
                "info".to_string()
            },
        }
    }
}

/// Complete acton-admin configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Admin interface settings
    #[serde(default)]
    pub admin: AdminSettings,

    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

impl AdminConfig {
    fn defaults() -> anyhow::Result<Figment> {
        Ok(Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?)))
    }

    fn env() -> Env {
        Env::prefixed("ACTON_").split("__").lowercase(true)
    }

    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - A configuration file cannot be read or parsed
    /// - Configuration values fail type conversion
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Self::defaults()?;

        let system_config = PathBuf::from("/etc/acton-admin")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./config.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        let config: Self = figment.merge(Self::env()).extract()?;
        tracing::debug!(
            service = service_name,
            base_url = %config.admin.base_url,
            "Loaded admin configuration"
        );
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Missing files fall back to defaults; environment variables still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values of the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;
        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./config.toml"),
            |config_dir| {
                config_dir
                    .join("acton-admin")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert_eq!(config.admin.base_url, "/admin");
        assert_eq!(config.admin.default_view, "index_view");
        assert!(config.admin.htmx_redirects);
        assert_eq!(config.admin.body_limit_bytes, 65536);
        assert_eq!(config.observability.service_name, "acton-admin");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[admin]\nbase_url = \"/backoffice\"\nhtmx_redirects = false\n",
        )
        .unwrap();

        let config = AdminConfig::load_from(&path).unwrap();
        assert_eq!(config.admin.base_url, "/backoffice");
        assert!(!config.admin.htmx_redirects);
        assert_eq!(config.admin.default_view, "index_view");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdminConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.admin.base_url, "/admin");
        assert_eq!(config.admin.default_view, "index_view");
    }

    #[test]
    fn test_default_view_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[admin]\ndefault_view = \"details_view\"\n").unwrap();

        let config = AdminConfig::load_from(&path).unwrap();
        assert_eq!(config.admin.default_view, "details_view");
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[admin]\nbody_limit_bytes = \"lots\"\n").unwrap();

        assert!(AdminConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_recommended_path_ends_with_service() {
        let path = AdminConfig::recommended_path("my-app");
        assert!(path.ends_with("config.toml"));
    }
}
