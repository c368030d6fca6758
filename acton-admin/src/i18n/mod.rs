//! Translation lookup for user-facing admin strings
//!
//! Action labels, confirmation prompts and filter operation names are passed
//! through a [`Translator`] right before they reach the presentation layer.
//! The admin core only depends on the single-argument lookup; locale
//! detection belongs to the application.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::i18n::{CatalogTranslator, Translator};
//!
//! let catalog = CatalogTranslator::from_toml_str(r#"
//! [messages]
//! "equals" = "ist gleich"
//!
//! [plurals."{n} row"]
//! one = "{n} Zeile"
//! other = "{n} Zeilen"
//! "#).unwrap();
//!
//! assert_eq!(catalog.gettext("equals"), "ist gleich");
//! assert_eq!(catalog.ngettext("{n} row", "{n} rows", 3), "{n} Zeilen");
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Gettext-style translation collaborator
pub trait Translator: Send + Sync {
    /// Translate a message id
    fn gettext(&self, msgid: &str) -> String;

    /// Translate a message with singular and plural forms
    fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        if n == 1 {
            self.gettext(singular)
        } else {
            self.gettext(plural)
        }
    }
}

/// Translator that returns every message unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn gettext(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

/// Shared identity translator for views that don't localize
pub static NULL_TRANSLATOR: NullTranslator = NullTranslator;

#[derive(Debug, Clone, Default, Deserialize)]
struct PluralForms {
    one: String,
    other: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Catalog {
    #[serde(default)]
    messages: HashMap<String, String>,
    #[serde(default)]
    plurals: HashMap<String, PluralForms>,
}

/// Translator backed by a TOML message catalog
///
/// Missing entries fall back to the message id.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalog: Catalog,
}

impl CatalogTranslator {
    /// Parse a catalog from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid catalog.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        let catalog = toml::from_str(source)?;
        Ok(Self { catalog })
    }

    /// Load a catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let translator = Self::from_toml_str(&source)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            messages = translator.catalog.messages.len(),
            "Loaded translation catalog"
        );
        Ok(translator)
    }
}

impl Translator for CatalogTranslator {
    fn gettext(&self, msgid: &str) -> String {
        self.catalog
            .messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }

    fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        match self.catalog.plurals.get(singular) {
            Some(forms) if n == 1 => forms.one.clone(),
            Some(forms) => forms.other.clone(),
            None if n == 1 => self.gettext(singular),
            None => self.gettext(plural),
        }
    }
}

/// Substitute `{name}` placeholders in an already translated message
///
/// Unknown placeholders are left in place.
///
/// ```rust
/// use acton_admin::i18n::interpolate;
///
/// let text = interpolate("{count} rows deleted", &[("count", "3")]);
/// assert_eq!(text, "3 rows deleted");
/// ```
#[must_use]
pub fn interpolate(message: &str, variables: &[(&str, &str)]) -> String {
    variables
        .iter()
        .fold(message.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}
