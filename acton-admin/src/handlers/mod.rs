//! HTTP handlers for admin views
//!
//! Mounts the action endpoints of one [`ActionsView`]:
//!
//! - `POST /action/` runs the submitted action and redirects
//! - `GET /action/` returns the actions the caller may use, as JSON
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use acton_admin::{config::AdminConfig, handlers};
//! use std::sync::Arc;
//!
//! let config = AdminConfig::load_for_service("backoffice")?;
//! let app = axum::Router::new()
//!     .nest("/admin/user", handlers::actions_router(Arc::new(user_view), &config));
//! ```

use axum::{
    body::to_bytes,
    extract::{Query as QueryParams, Request, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_htmx::{HxRedirect, HxRequest};
use serde::Deserialize;
use std::sync::Arc;

use crate::actions::{dispatch_action, get_actions_list, ActionForm, ActionOutcome, ActionsView};
use crate::config::AdminConfig;
use crate::error::AdminError;

/// Shared state of the action routes
pub struct ActionRoutes<V: ?Sized> {
    view: Arc<V>,
    htmx_redirects: bool,
    body_limit: usize,
}

impl<V: ?Sized> Clone for ActionRoutes<V> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            htmx_redirects: self.htmx_redirects,
            body_limit: self.body_limit,
        }
    }
}

/// Optional `?return_view=` on the action endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    /// View to redirect to instead of the default
    pub return_view: Option<String>,
}

/// Build the action routes for `view`
pub fn actions_router<V>(view: Arc<V>, config: &AdminConfig) -> Router
where
    V: ActionsView,
{
    let state = ActionRoutes {
        view,
        htmx_redirects: config.admin.htmx_redirects,
        body_limit: config.admin.body_limit_bytes,
    };

    Router::new()
        .route("/action/", post(action_view::<V>).get(list_actions::<V>))
        .with_state(state)
}

/// Run a bulk action
///
/// # Errors
///
/// Returns:
/// - `400 BAD_REQUEST` if the body is too large or not valid form data
/// - whatever status the action handler's error maps to
pub async fn action_view<V>(
    State(routes): State<ActionRoutes<V>>,
    HxRequest(is_htmx): HxRequest,
    QueryParams(params): QueryParams<ActionParams>,
    request: Request,
) -> Result<Response, AdminError>
where
    V: ActionsView,
{
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, routes.body_limit)
        .await
        .map_err(|e| AdminError::BadRequest(format!("failed to read action form: {e}")))?;
    let form = ActionForm::from_urlencoded(&body)?;

    let view = routes.view.as_ref();
    let outcome = dispatch_action(view, &parts, form, params.return_view.as_deref()).await?;

    let response = match outcome {
        ActionOutcome::Redirect(url) if is_htmx && routes.htmx_redirects => {
            (HxRedirect::from(url.as_str()), ()).into_response()
        }
        outcome => outcome.into_response(),
    };
    Ok(response)
}

/// List the actions the caller may use
pub async fn list_actions<V>(State(routes): State<ActionRoutes<V>>, request: Request) -> Response
where
    V: ActionsView,
{
    let (parts, _body) = request.into_parts();
    Json(get_actions_list(routes.view.as_ref(), &parts)).into_response()
}
