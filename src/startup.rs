use std::net::TcpListener;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    cookie::Key, dev::Server, middleware::from_fn, middleware::Logger, web, App, HttpServer,
};
use actix_web_flash_messages::{storage::CookieMessageStore, FlashMessagesFramework};
use secrecy::{ExposeSecret, Secret};

use crate::authentication::{middleware::require_login, WikiOAuth};
use crate::configuration::Settings;
use crate::mailgun_client::MailgunClient;
use crate::routes::*;

/// Urlencoded bodies up to this size are accepted; a bulk paste of a full
/// 1000-member upsert batch has to fit.
pub const FORM_LIMIT: usize = 256 * 1024;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let mailgun_client = configuration.mailgun.client()?;
        let oauth_client = configuration.oauth.client()?;

        let address = format!("{}:{}", configuration.app.host, configuration.app.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        tracing::info!(port, "listening");

        let server = run(
            listener,
            mailgun_client,
            oauth_client,
            configuration.app.hmac_secret,
            configuration.app.secure_cookie,
        )?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    mailgun_client: MailgunClient,
    oauth_client: WikiOAuth,
    hmac_secret: Secret<String>,
    secure_cookie: bool,
) -> Result<Server, anyhow::Error> {
    // Key::from panics below 64 bytes
    if hmac_secret.expose_secret().len() < 64 {
        anyhow::bail!("app.hmac_secret must be at least 64 bytes long");
    }
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    // an Arc<..> each worker clones
    let mailgun_client = web::Data::new(mailgun_client);
    let oauth_client = web::Data::new(oauth_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(require_login))
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookie)
                    .build(),
            )
            .wrap(Logger::default())
            .app_data(web::FormConfig::default().limit(FORM_LIMIT))
            .app_data(mailgun_client.clone())
            .app_data(oauth_client.clone())
            .route("/", web::get().to(compose_form))
            .route("/", web::post().to(send_message))
            .route("/login", web::get().to(login))
            .route("/oauth-callback", web::get().to(oauth_callback))
            .route("/logout", web::get().to(logout))
            .route("/maillists", web::get().to(maillists))
            .route("/maillists", web::post().to(create_maillist))
            .route("/maillists/{list}", web::get().to(maillist))
            .route("/maillists/{list}", web::post().to(update_maillist))
            .route("/maillists/{list}/{member}", web::get().to(maillist_member))
            .route(
                "/maillists/{list}/{member}",
                web::post().to(update_maillist_member),
            )
            .route("/templates", web::get().to(templates))
            .route("/templates/{name}", web::get().to(template))
            .route("/templates/{name}/{version}", web::get().to(template_version))
            .route(
                "/templates/{name}/{version}/content",
                web::get().to(template_version_content),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
