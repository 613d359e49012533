use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::authentication::{OAuthError, WikiOAuth};
use crate::routes::PageError;
use crate::session_state::TypedSession;
use crate::utils::see_other;

#[derive(Deserialize)]
pub struct CallbackParams {
    oauth_verifier: String,
    oauth_token: String,
}

#[tracing::instrument(name = "complete login", skip_all)]
pub async fn oauth_callback(
    query: web::Query<CallbackParams>,
    oauth: web::Data<WikiOAuth>,
    session: TypedSession,
) -> Result<HttpResponse, PageError> {
    let request_token = session
        .take_request_token()
        .map_err(|e| PageError::unexpected("failed to read the session", e))?
        .ok_or(OAuthError::MissingRequestToken)?;
    if request_token.key != query.oauth_token {
        return Err(OAuthError::TokenMismatch.into());
    }

    let access_token = oauth
        .complete(&request_token, &query.oauth_verifier)
        .await?;
    let username = oauth.identify(&access_token).await?;
    tracing::info!(%username, "user logged in");

    session.renew();
    session
        .insert_username(&username)
        .map_err(|e| PageError::unexpected("failed to store the session", e))?;
    Ok(see_other("/"))
}
