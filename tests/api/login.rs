use wiremock::{matchers::any, Mock, ResponseTemplate};

use crate::helpers::{assert_is_redirect_to, spawn_app, USERNAME};

#[tokio::test]
async fn anonymous_visitors_get_the_login_page_instead() {
    let app = spawn_app().await;
    // gated handlers must not run at all
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailgun_server)
        .await;

    for path in [
        "/",
        "/maillists",
        "/maillists/dev%40mg.example.org",
        "/maillists/dev%40mg.example.org/a%40example.com",
        "/templates",
        "/templates/welcome/v1/content",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status().as_u16(), 200, "{path}");
        let html = response.text().await.unwrap();
        assert!(html.contains(r#"id="login-required""#), "{path}");
    }
}

#[tokio::test]
async fn anonymous_posts_are_not_forwarded() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailgun_server)
        .await;

    let response = app
        .post_form("/maillists", &[("address", "new@mg.example.org")])
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains(r#"id="login-required""#));
}

#[tokio::test]
async fn login_sends_the_browser_to_the_provider() {
    let app = spawn_app().await;
    app.mock_oauth_provider().await;

    let response = app.get("/login").await;

    assert_is_redirect_to(
        &response,
        &format!(
            "{}/index.php?title=Special%3AOAuth%2Fauthorize&oauth_token=req-key&oauth_consumer_key=consumer-key",
            app.oauth_server.uri()
        ),
    );
}

#[tokio::test]
async fn callback_without_a_login_attempt_is_refused() {
    let app = spawn_app().await;

    let response = app
        .get("/oauth-callback?oauth_verifier=v3rifier&oauth_token=req-key")
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn callback_for_another_request_token_is_refused() {
    let app = spawn_app().await;
    app.mock_oauth_provider().await;
    app.get("/login").await;

    let response = app
        .get("/oauth-callback?oauth_verifier=v3rifier&oauth_token=somebody-else")
        .await;

    assert_eq!(response.status().as_u16(), 400);
    // still anonymous
    assert!(app.get_html("/").await.contains(r#"id="login-required""#));
}

#[tokio::test]
async fn provider_refusing_the_exchange_is_a_bad_gateway() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401).set_body_string("Error: E001"))
        .mount(&app.oauth_server)
        .await;

    let response = app.get("/login").await;

    assert_eq!(response.status().as_u16(), 502);
}

#[tokio::test]
async fn logged_in_users_see_their_name() {
    let app = spawn_app().await;
    app.mock_lists().await;
    app.mock_templates().await;

    app.log_in().await;
    let html = app.get_html("/").await;

    assert!(html.contains(&format!("Logged in as {USERNAME}")));
    assert!(!html.contains(r#"id="login-required""#));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    app.log_in().await;

    let response = app.get("/logout").await;
    assert_is_redirect_to(&response, "/");

    assert!(app.get_html("/").await.contains(r#"id="login-required""#));
}
