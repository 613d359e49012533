use actix_web::{web, HttpResponse};

use crate::authentication::WikiOAuth;
use crate::routes::layout::{html, page};
use crate::routes::PageError;
use crate::session_state::TypedSession;
use crate::utils::see_other;

/// What anonymous visitors get in place of any gated page.
pub fn login_page() -> HttpResponse {
    html(page(
        "Log in",
        None,
        &[],
        r#"<p id="login-required">You need to log in with your wiki account to use this tool.</p>
    <p><a href="/login">Log in</a></p>"#,
    ))
}

/// Starts the OAuth handshake and sends the browser to the provider.
#[tracing::instrument(name = "start login", skip_all)]
pub async fn login(
    oauth: web::Data<WikiOAuth>,
    session: TypedSession,
) -> Result<HttpResponse, PageError> {
    let request_token = oauth.initiate().await?;
    session
        .insert_request_token(&request_token)
        .map_err(|e| PageError::unexpected("failed to store the request token", e))?;

    Ok(see_other(oauth.authorize_url(&request_token).as_str()))
}
