use actix_web::{error::ErrorInternalServerError, http::header::LOCATION, HttpResponse};
use std::fmt::{Debug, Display};

pub fn e500<E>(e: E) -> actix_web::Error
where
    E: Debug + Display + 'static,
{
    ErrorInternalServerError(e)
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// Debug output walking the whole `source()` chain, for error logs.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
