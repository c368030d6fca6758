//! Listing allowed actions and routing a submitted action to its handler

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use http::request::Parts;
use serde::Serialize;
use std::collections::HashMap;

use super::{ActionEntry, ActionForm, ActionsView};
use crate::error::AdminError;

/// Actions the current request may see, with translated text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedActions {
    /// Menu entries in declaration order
    pub actions: Vec<ActionEntry>,
    /// Confirmation prompts keyed by action name; absent means no prompt
    pub confirmations: HashMap<String, String>,
}

/// Everything `view` allows for this request
pub fn get_actions_list<V>(view: &V, request: &Parts) -> AllowedActions
where
    V: ActionsView + ?Sized,
{
    let translator = view.translator();
    let registry = view.actions();
    let mut allowed = AllowedActions::default();

    for entry in registry.entries() {
        if !view.is_action_allowed(&entry.name, request) {
            continue;
        }

        allowed.actions.push(ActionEntry {
            name: entry.name.clone(),
            text: translator.gettext(&entry.text),
            dropdown: entry.dropdown,
        });

        if let Some(confirmation) = registry
            .get(&entry.name)
            .and_then(|action| action.confirmation_text())
        {
            allowed
                .confirmations
                .insert(entry.name.clone(), translator.gettext(confirmation));
        }
    }

    allowed
}

/// What the dispatcher decided to send back
#[derive(Debug)]
pub enum ActionOutcome {
    /// The handler produced its own response
    Handled(Response),
    /// Redirect to this URL
    Redirect(String),
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Handled(response) => response,
            Self::Redirect(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        }
    }
}

fn redirect_url<V>(view: &V, return_view: Option<&str>) -> String
where
    V: ActionsView + ?Sized,
{
    let target = return_view
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| view.default_view());
    let urls = view.urls();

    urls.url_for(&format!(".{target}")).unwrap_or_else(|| {
        tracing::warn!(
            endpoint = urls.endpoint(),
            view = target,
            "Unknown return view, redirecting to view root"
        );
        format!("{}/", urls.base_url())
    })
}

/// Run the submitted action if it exists and is allowed, then decide where to go
///
/// Unknown and disallowed actions run nothing and redirect like a completed
/// action does. Handler errors are returned unchanged. The dispatcher opens
/// no transaction of its own.
///
/// # Errors
///
/// Returns whatever error the action handler returned.
pub async fn dispatch_action<V>(
    view: &V,
    request: &Parts,
    form: ActionForm,
    return_view: Option<&str>,
) -> Result<ActionOutcome, AdminError>
where
    V: ActionsView + ?Sized,
{
    let ActionForm { action, rowids } = form;
    let name = action.unwrap_or_default();

    match view.actions().get(&name) {
        Some(action) if view.is_action_allowed(&name, request) => {
            tracing::info!(
                endpoint = view.urls().endpoint(),
                action = %name,
                rows = rowids.len(),
                "Running action"
            );
            if let Some(response) = action.run(rowids).await? {
                return Ok(ActionOutcome::Handled(response));
            }
        }
        Some(_) => tracing::warn!(action = %name, "Action not allowed for this request"),
        None => tracing::warn!(action = %name, "Unknown action submitted"),
    }

    Ok(ActionOutcome::Redirect(redirect_url(view, return_view)))
}

/// [`dispatch_action`] turned into a response
///
/// # Errors
///
/// Returns whatever error the action handler returned.
pub async fn handle_action<V>(
    view: &V,
    request: &Parts,
    form: ActionForm,
    return_view: Option<&str>,
) -> Result<Response, AdminError>
where
    V: ActionsView + ?Sized,
{
    Ok(dispatch_action(view, request, form, return_view)
        .await?
        .into_response())
}
