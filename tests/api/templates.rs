use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{spawn_app, TestApp, DOMAIN};

async fn logged_in_app() -> TestApp {
    let app = spawn_app().await;
    app.log_in().await;
    app
}

async fn mock_version(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path(format!("/{DOMAIN}/templates/welcome/versions/v1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "template": {
                "name": "welcome",
                "description": "Sent to new people",
                "version": {
                    "tag": "v1",
                    "engine": "handlebars",
                    "active": true,
                    "comment": "first cut",
                    "template": "<h1>Hi {{name}}</h1>"
                }
            }
        })))
        .mount(&app.mailgun_server)
        .await;
}

#[tokio::test]
async fn templates_link_to_their_versions() {
    let app = logged_in_app().await;
    app.mock_templates().await;

    let html = app.get_html("/templates").await;

    assert!(html.contains(r#"href="/templates/welcome""#));
    assert!(html.contains("Sent to new people"));
}

#[tokio::test]
async fn template_page_lists_versions() {
    let app = logged_in_app().await;
    Mock::given(method("GET"))
        .and(path(format!("/{DOMAIN}/templates/welcome/versions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "template": {
                "name": "welcome",
                "versions": [
                    {"tag": "v1", "engine": "handlebars", "active": true},
                    {"tag": "v2", "engine": "handlebars", "active": false}
                ]
            }
        })))
        .mount(&app.mailgun_server)
        .await;

    let html = app.get_html("/templates/welcome").await;

    assert!(html.contains(r#"href="/templates/welcome/v1""#));
    assert!(html.contains(r#"href="/templates/welcome/v2""#));
}

#[tokio::test]
async fn version_page_frames_the_preview_and_escapes_the_source() {
    let app = logged_in_app().await;
    mock_version(&app).await;

    let html = app.get_html("/templates/welcome/v1").await;

    assert!(html.contains(r#"<iframe src="/templates/welcome/v1/content""#));
    assert!(html.contains("&lt;h1&gt;Hi {{name}}&lt;/h1&gt;"));
}

#[tokio::test]
async fn version_content_is_served_as_is() {
    let app = logged_in_app().await;
    mock_version(&app).await;

    let response = app.get("/templates/welcome/v1/content").await;

    assert_eq!(response.status().as_u16(), 200);
    let content_type = response.headers().get("Content-Type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(response.text().await.unwrap(), "<h1>Hi {{name}}</h1>");
}

#[tokio::test]
async fn unknown_template_is_not_found() {
    let app = logged_in_app().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "template not found"})),
        )
        .mount(&app.mailgun_server)
        .await;

    let response = app.get("/templates/missing").await;

    assert_eq!(response.status().as_u16(), 404);
}
