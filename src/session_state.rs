use std::future::{ready, Ready};

use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::authentication::Token;

pub struct TypedSession(Session);

//NOTE: keeps the session keys in one place, handlers never touch raw keys
impl TypedSession {
    const USERNAME_KEY: &'static str = "username";
    const REQUEST_TOKEN_KEY: &'static str = "request_token";

    pub fn renew(&self) {
        self.0.renew();
    }
    pub fn purge(&self) {
        self.0.purge();
    }
    pub fn insert_username(&self, username: &str) -> Result<(), SessionInsertError> {
        self.0.insert(Self::USERNAME_KEY, username)
    }
    pub fn get_username(&self) -> Result<Option<String>, SessionGetError> {
        self.0.get(Self::USERNAME_KEY)
    }
    /// Held between the start of the OAuth handshake and its callback.
    pub fn insert_request_token(&self, token: &Token) -> Result<(), SessionInsertError> {
        self.0.insert(Self::REQUEST_TOKEN_KEY, token)
    }
    pub fn take_request_token(&self) -> Result<Option<Token>, SessionGetError> {
        let token = self.0.get(Self::REQUEST_TOKEN_KEY)?;
        self.0.remove(Self::REQUEST_TOKEN_KEY);
        Ok(token)
    }
}

impl FromRequest for TypedSession {
    type Error = <Session as FromRequest>::Error;

    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
