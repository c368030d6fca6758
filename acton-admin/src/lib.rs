//! acton-admin: bulk actions and typed list filters for admin views
//!
//! Two pieces sit underneath every generated CRUD listing:
//! - **Actions**: a view registers named bulk operations once; a form POST
//!   names one of them plus the selected row ids and the dispatcher routes it.
//! - **Filters**: each column's declared type is converted into the filters a
//!   listing offers (equals, contains, in range, ...), which clean user input
//!   into typed values and narrow a query.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_admin::prelude::*;
//! use std::sync::Arc;
//!
//! struct UserView {
//!     actions: ActionRegistry,
//!     urls: UrlMap,
//! }
//!
//! impl ActionsView for UserView {
//!     fn actions(&self) -> &ActionRegistry {
//!         &self.actions
//!     }
//!
//!     fn urls(&self) -> &UrlMap {
//!         &self.urls
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdminConfig::load_for_service("backoffice")?;
//!     acton_admin::observability::init(&config.observability)?;
//!
//!     let view = UserView {
//!         actions: ActionRegistry::new([Action::new(
//!             "delete",
//!             "Delete",
//!             |ids: Vec<String>| async move {
//!                 tracing::info!(rows = ids.len(), "Deleting users");
//!                 ActionResult::Ok(None)
//!             },
//!         )
//!         .confirmation("Delete the selected users?")])?,
//!         urls: UrlMap::from_settings(&config.admin, "user"),
//!     };
//!
//!     let app = axum::Router::new().nest(
//!         "/admin/user",
//!         acton_admin::handlers::actions_router(Arc::new(view), &config),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod actions;
pub mod config;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod i18n;
pub mod observability;

pub mod prelude {
    //! Convenience re-exports for common types and traits

    pub use crate::actions::{
        dispatch_action, get_actions_list, handle_action, Action, ActionError, ActionForm,
        ActionOutcome, ActionRegistry, ActionResult, ActionsView, AllowedActions, UrlMap,
    };
    pub use crate::config::AdminConfig;
    pub use crate::error::AdminError;
    pub use crate::filters::{
        CleanedValue, Column, ColumnKind, ConvertOptions, Filter, FilterConverter, FilterError,
        FilterKind, FilterSet, FilterValue, Predicate, Query, SelectQuery,
    };
    pub use crate::i18n::{CatalogTranslator, NullTranslator, Translator};
}
