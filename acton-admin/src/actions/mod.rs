//! Bulk actions over selected rows
//!
//! A view declares its actions once, at construction, by registering
//! [`Action`]s with an [`ActionRegistry`]. Each action names a handler that
//! receives the identifiers of the rows the user selected.
//!
//! # Example
//!
//! ```rust
//! use acton_admin::actions::{Action, ActionRegistry, ActionResult};
//!
//! # fn example() -> Result<(), acton_admin::actions::ActionError> {
//! let registry = ActionRegistry::new([
//!     Action::new("delete", "Delete", |ids: Vec<String>| async move {
//!         tracing::info!(rows = ids.len(), "Deleting rows");
//!         ActionResult::Ok(None)
//!     })
//!     .confirmation("Delete the selected records?"),
//!     Action::new("publish", "Publish", |_ids: Vec<String>| async { ActionResult::Ok(None) })
//!         .dropdown(false),
//! ])?;
//!
//! assert_eq!(registry.len(), 2);
//! assert_eq!(registry.entries()[0].name, "delete");
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod form;
mod view;

pub use dispatch::{dispatch_action, get_actions_list, handle_action, ActionOutcome, AllowedActions};
pub use form::ActionForm;
pub use view::{ActionsView, UrlMap, DEFAULT_VIEW};

use axum::response::Response;
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::error::AdminError;

/// What an action handler returns: a custom response, or `None` to redirect
pub type ActionResult = Result<Option<Response>, AdminError>;

/// Boxed future returned by an action handler
pub type ActionFuture = BoxFuture<'static, ActionResult>;

/// Handler bound to whatever state it needs, called with the selected row ids
pub type ActionHandler = Arc<dyn Fn(Vec<String>) -> ActionFuture + Send + Sync>;

/// Errors raised by action registration and handlers
#[derive(Debug, Error)]
pub enum ActionError {
    /// Two actions were declared with the same name
    #[error("action '{0}' is declared more than once")]
    Duplicate(String),

    /// A handler gave up part way through
    #[error("action '{action}' failed: {message}")]
    Failed {
        /// Action name
        action: String,
        /// Failure description
        message: String,
    },
}

/// A named bulk operation bound to a handler
#[derive(Clone)]
pub struct Action {
    name: String,
    text: String,
    confirmation: Option<String>,
    dropdown: bool,
    handler: ActionHandler,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("confirmation", &self.confirmation)
            .field("dropdown", &self.dropdown)
            .finish_non_exhaustive()
    }
}

impl Action {
    /// Declare an action shown in the dropdown without confirmation
    pub fn new<F, Fut>(name: impl Into<String>, text: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            text: text.into(),
            confirmation: None,
            dropdown: true,
            handler: Arc::new(move |ids: Vec<String>| -> ActionFuture { Box::pin(handler(ids)) }),
        }
    }

    /// Ask the user to confirm before running
    #[must_use]
    pub fn confirmation(mut self, text: impl Into<String>) -> Self {
        self.confirmation = Some(text.into());
        self
    }

    /// Show in the dropdown menu (`true`) or inline (`false`)
    #[must_use]
    pub const fn dropdown(mut self, dropdown: bool) -> Self {
        self.dropdown = dropdown;
        self
    }

    /// Unique name submitted in the `action` form field
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Untranslated display label
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Untranslated confirmation prompt; empty prompts count as none
    #[must_use]
    pub fn confirmation_text(&self) -> Option<&str> {
        self.confirmation.as_deref().filter(|text| !text.is_empty())
    }

    /// Whether the action is listed in the dropdown
    #[must_use]
    pub const fn is_dropdown(&self) -> bool {
        self.dropdown
    }

    /// Run the handler
    pub async fn run(&self, ids: Vec<String>) -> ActionResult {
        (self.handler)(ids).await
    }
}

/// Menu entry for one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEntry {
    /// Action name
    pub name: String,
    /// Display label
    pub text: String,
    /// Show in the dropdown
    pub dropdown: bool,
}

/// Name → action table plus menu order
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
    actions: HashMap<String, Action>,
}

impl ActionRegistry {
    /// Build a registry from declarations, in menu order
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Duplicate`] if two actions share a name.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Result<Self, ActionError> {
        let mut registry = Self::default();
        registry.init(actions)?;
        Ok(registry)
    }

    /// Replace every registered action
    ///
    /// The previous state is kept if the new declarations are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Duplicate`] if two actions share a name.
    pub fn init(&mut self, actions: impl IntoIterator<Item = Action>) -> Result<(), ActionError> {
        let mut entries = Vec::new();
        let mut table = HashMap::new();

        for action in actions {
            if table.contains_key(action.name()) {
                return Err(ActionError::Duplicate(action.name));
            }
            entries.push(ActionEntry {
                name: action.name.clone(),
                text: action.text.clone(),
                dropdown: action.dropdown,
            });
            table.insert(action.name.clone(), action);
        }

        tracing::debug!(actions = entries.len(), "Initialized action registry");
        self.entries = entries;
        self.actions = table;
        Ok(())
    }

    /// Look up an action by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Every action in declaration order, regardless of permissions
    #[must_use]
    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    /// Number of registered actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no actions are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Action {
        Action::new(name, format!("{name} text"), |_ids: Vec<String>| async {
            ActionResult::Ok(None)
        })
    }

    #[test]
    fn test_registers_declared_actions_verbatim() {
        let registry = ActionRegistry::new([
            noop("delete").confirmation("Sure?"),
            noop("approve").dropdown(false),
            noop("export"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 3);
        let names: Vec<&str> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["delete", "approve", "export"]);

        let delete = registry.get("delete").unwrap();
        assert_eq!(delete.text(), "delete text");
        assert_eq!(delete.confirmation_text(), Some("Sure?"));
        assert!(delete.is_dropdown());
        assert!(!registry.get("approve").unwrap().is_dropdown());
        assert_eq!(registry.get("export").unwrap().confirmation_text(), None);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = ActionRegistry::new([noop("delete"), noop("delete")]).unwrap_err();
        assert!(matches!(err, ActionError::Duplicate(name) if name == "delete"));
    }

    #[test]
    fn test_init_replaces_previous_state() {
        let mut registry = ActionRegistry::new([noop("delete"), noop("export")]).unwrap();
        registry.init([noop("archive")]).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("delete").is_none());
        assert!(registry.get("archive").is_some());

        // Running it twice yields the same table
        registry.init([noop("archive")]).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_init_keeps_state() {
        let mut registry = ActionRegistry::new([noop("delete")]).unwrap();
        assert!(registry.init([noop("a"), noop("a")]).is_err());
        assert!(registry.get("delete").is_some());
    }

    #[test]
    fn test_empty_confirmation_counts_as_none() {
        assert_eq!(noop("x").confirmation("").confirmation_text(), None);
    }

    #[tokio::test]
    async fn test_run_passes_ids_to_handler() {
        let action = Action::new("count", "Count", |ids: Vec<String>| async move {
            ActionResult::Err(AdminError::from(ActionError::Failed {
                action: "count".to_string(),
                message: ids.join(","),
            }))
        });

        let err = action.run(vec!["1".into(), "2".into()]).await.unwrap_err();
        assert_eq!(err.to_string(), "Action error: action 'count' failed: 1,2");
    }
}
