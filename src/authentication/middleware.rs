use std::{fmt::Display, ops::Deref};

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    FromRequest, HttpMessage,
};

use crate::{routes::login_page, session_state::TypedSession, utils::e500};

/// Display name of the logged-in user, attached to every gated request.
#[derive(Clone, Debug)]
pub struct CurrentUser(String);

impl CurrentUser {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CurrentUser {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Paths reachable without a session: the handshake itself.
pub fn is_public_path(path: &str) -> bool {
    path == "/login" || path.starts_with("/oauth-callback")
}

/// Anonymous requests get the login page in place of the route they asked
/// for; the target handler never runs. No redirect, so the URL is kept.
pub async fn require_login(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    if is_public_path(req.path()) {
        return next.call(req).await.map(ServiceResponse::map_into_boxed_body);
    }

    let session = {
        let (request, payload) = req.parts_mut();
        TypedSession::from_request(request, payload).await
    }?;
    match session.get_username().map_err(e500)? {
        Some(username) => {
            req.extensions_mut().insert(CurrentUser(username));
            next.call(req).await.map(ServiceResponse::map_into_boxed_body)
        }
        None => Ok(req.into_response(login_page())),
    }
}
