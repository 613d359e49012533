use std::sync::LazyLock;

use listmailer::{
    configuration::get_configuration,
    telemetry::{get_subscriber, init_subscriber},
    Application,
};
use reqwest::{redirect::Policy, Client, Response};
use serde::Serialize;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const DOMAIN: &str = "mg.example.org";
pub const LIST: &str = "dev@mg.example.org";
pub const USERNAME: &str = "Ada Lovelace";

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub mailgun_server: MockServer,
    pub oauth_server: MockServer,
    pub api_client: Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_html(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form<Body>(&self, path: &str, body: &Body) -> Response
    where
        Body: Serialize + ?Sized,
    {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_compose(&self, form: reqwest::multipart::Form) -> Response {
        self.api_client
            .post(&format!("{}/", &self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Mounts the provider's side of a successful handshake for `req-key`.
    pub async fn mock_oauth_provider(&self) {
        Mock::given(method("POST"))
            .and(path("/index.php"))
            .and(query_param("title", "Special:OAuth/initiate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("oauth_token=req-key&oauth_token_secret=req-secret"),
            )
            .mount(&self.oauth_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/index.php"))
            .and(query_param("title", "Special:OAuth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("oauth_token=acc-key&oauth_token_secret=acc-secret"),
            )
            .mount(&self.oauth_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": {"userinfo": {"id": 42, "name": USERNAME}}
            })))
            .mount(&self.oauth_server)
            .await;
    }

    pub async fn log_in(&self) {
        self.mock_oauth_provider().await;

        let response = self.get("/login").await;
        assert_eq!(response.status().as_u16(), 303);
        let response = self
            .get("/oauth-callback?oauth_verifier=v3rifier&oauth_token=req-key")
            .await;
        assert_is_redirect_to(&response, "/");
    }

    pub async fn mock_lists(&self) {
        Mock::given(method("GET"))
            .and(path("/lists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "address": LIST,
                    "name": "Developers",
                    "description": "People who build things",
                    "members_count": 2
                }]
            })))
            .mount(&self.mailgun_server)
            .await;
    }

    pub async fn mock_templates(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/{DOMAIN}/templates")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "name": "welcome",
                    "description": "Sent to new people",
                    "createdAt": "Tue, 01 Oct 2024 10:00:00 UTC"
                }]
            })))
            .mount(&self.mailgun_server)
            .await;
    }

    pub async fn mock_list_page(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/lists/{LIST}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": {"address": LIST, "name": "Developers", "members_count": 1}
            })))
            .mount(&self.mailgun_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/lists/{LIST}/members")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "address": "a@example.com",
                    "name": "Alice",
                    "subscribed": true,
                    "vars": {"color": "red"}
                }]
            })))
            .mount(&self.mailgun_server)
            .await;
    }

    pub async fn mock_member_page(&self, member: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/lists/{LIST}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": {"address": LIST, "name": "Developers", "members_count": 1}
            })))
            .mount(&self.mailgun_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/lists/{LIST}/members/{member}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "member": {
                    "address": member,
                    "name": "Alice",
                    "subscribed": true,
                    "vars": {"color": "red", "size": "L"}
                }
            })))
            .mount(&self.mailgun_server)
            .await;
    }

    /// Form fields of the single upstream request made with `verb`.
    pub async fn upstream_form(&self, verb: &str) -> Vec<(String, String)> {
        let requests = self.mailgun_server.received_requests().await.unwrap();
        let request = requests
            .iter()
            .find(|r| r.method.as_str() == verb)
            .expect("no such upstream request");
        serde_urlencoded::from_bytes(&request.body).unwrap()
    }
}

pub fn field<'a>(form: &'a [(String, String)], name: &str) -> &'a str {
    form.iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("no `{name}` field"))
}

pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let mailgun_server = MockServer::start().await;
    let oauth_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.app.host = "127.0.0.1".to_string();
        c.app.port = 0;
        c.mailgun.base_url = mailgun_server.uri();
        c.mailgun.domain = DOMAIN.to_string();
        c.oauth.base_url = oauth_server.uri();
        c.oauth.consumer_key = "consumer-key".to_string();
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);
    let _ = tokio::spawn(application.run_until_stopped());

    let api_client = Client::builder()
        .redirect(Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address,
        port,
        mailgun_server,
        oauth_server,
        api_client,
    }
}

pub fn assert_is_redirect_to(response: &Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
