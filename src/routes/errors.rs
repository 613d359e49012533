use actix_web::{http::header::ContentType, http::StatusCode, HttpResponse, ResponseError};

use super::layout::{page, Notice};
use crate::authentication::OAuthError;
use crate::domain::FormError;
use crate::mailgun_client::MailgunError;
use crate::utils::error_chain_fmt;

/// Failure of a page handler, rendered as an HTML page instead of a bare
/// status code.
#[derive(thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    Validation(#[from] FormError),
    #[error(transparent)]
    Upstream(#[from] MailgunError),
    #[error(transparent)]
    Login(#[from] OAuthError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl PageError {
    pub fn unexpected(context: &'static str, e: impl std::fmt::Display) -> Self {
        Self::UnexpectedError(anyhow::anyhow!("{context}: {e}"))
    }
}

impl std::fmt::Debug for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(e) if e.status().map(|s| s.as_u16()) == Some(404) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Login(OAuthError::Rejected(_)) => StatusCode::BAD_GATEWAY,
            Self::Login(OAuthError::UnexpectedError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Login(_) => StatusCode::BAD_REQUEST,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::UnexpectedError(_) | Self::Login(OAuthError::UnexpectedError(_)) => {
                "Something went wrong on our side".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(page(
                "Something went wrong",
                None,
                &[Notice::Error(message)],
                r#"<p><a href="javascript:history.back()">&lt;- Back</a> | <a href="/">Home</a></p>"#,
            ))
    }
}
