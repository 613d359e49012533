use crate::{session_state::TypedSession, utils::see_other};
use actix_web::HttpResponse;

pub async fn logout(session: TypedSession) -> HttpResponse {
    session.purge();
    see_other("/")
}
