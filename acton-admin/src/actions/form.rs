//! Form fields submitted with a bulk action

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};

use crate::error::AdminError;

/// `action` and repeated `rowid` fields from a form-encoded POST body
///
/// # Example
///
/// ```rust
/// use acton_admin::actions::ActionForm;
///
/// let form = ActionForm::from_urlencoded(b"action=delete&rowid=3&rowid=1").unwrap();
/// assert_eq!(form.action.as_deref(), Some("delete"));
/// assert_eq!(form.rowids, vec!["3", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionForm {
    /// Submitted action name
    pub action: Option<String>,
    /// Selected row identifiers, in submission order
    pub rowids: Vec<String>,
}

impl ActionForm {
    /// Create a form from already decoded values
    #[must_use]
    pub fn new<I, S>(action: impl Into<String>, rowids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: Some(action.into()),
            rowids: rowids.into_iter().map(Into::into).collect(),
        }
    }

    /// Decode an `application/x-www-form-urlencoded` body
    ///
    /// Only the first `action` value is used. Other fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::BadRequest`] if the body is not valid UTF-8
    /// after percent-decoding.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, AdminError> {
        let body = std::str::from_utf8(body)
            .map_err(|_| AdminError::BadRequest("form body is not valid UTF-8".to_string()))?;

        let mut form = Self::default();
        for pair in body.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match decode(key)?.as_str() {
                "action" if form.action.is_none() => form.action = Some(decode(value)?),
                "rowid" => form.rowids.push(decode(value)?),
                _ => {}
            }
        }
        Ok(form)
    }
}

fn decode(component: &str) -> Result<String, AdminError> {
    urlencoding::decode(&component.replace('+', " "))
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| AdminError::BadRequest("form field is not valid UTF-8".to_string()))
}

impl<S> FromRequest<S> for ActionForm
where
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AdminError::BadRequest(rejection.body_text()))?;
        Self::from_urlencoded(&body)
    }
}
