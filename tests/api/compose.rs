use reqwest::multipart::{Form, Part};
use wiremock::{
    matchers::{any, basic_auth, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{spawn_app, TestApp, DOMAIN, LIST};

fn compose_form(reply_to: &str) -> Form {
    Form::new()
        .text("from", "Team <team@example.org>")
        .text("subject", "October news")
        .text("template", "welcome")
        .text("list", LIST)
        .text("replyto", reply_to.to_string())
        .text("variable", "0")
        .text("variable-0", "month")
        .text("value-0", "October")
        .text("variable", "1")
        .text("variable-1", "")
        .text("value-1", "ignored")
}

async fn logged_in_app() -> TestApp {
    let app = spawn_app().await;
    app.mock_lists().await;
    app.mock_templates().await;
    app.log_in().await;
    app
}

async fn sent_body(app: &TestApp) -> String {
    let requests = app.mailgun_server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("no message was sent");
    String::from_utf8_lossy(&request.body).into_owned()
}

#[tokio::test]
async fn compose_form_offers_lists_and_templates() {
    let app = logged_in_app().await;

    let html = app.get_html("/").await;

    assert!(html.contains(r#"enctype="multipart/form-data""#));
    assert!(html.contains(r#"<option value="dev@mg.example.org">Developers (2 members)</option>"#));
    assert!(html.contains(r#"<option value="welcome">welcome</option>"#));
}

#[tokio::test]
async fn message_goes_to_the_list_with_its_variables() {
    let app = logged_in_app().await;
    Mock::given(method("POST"))
        .and(path(format!("/{DOMAIN}/messages")))
        .and(basic_auth("api", "key-change-me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "<20241016.1@mg.example.org>",
            "message": "Queued. Thank you."
        })))
        .expect(1)
        .mount(&app.mailgun_server)
        .await;

    let response = app.post_compose(compose_form("")).await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("Queued. Thank you."));

    let body = sent_body(&app).await;
    assert!(body.contains(r#"{"month":"October"}"#));
    assert!(body.contains(LIST));
    assert!(body.contains(r#"name="o:tag""#));
    assert!(!body.contains("ignored"));
    // a blank reply-to is left out
    assert!(!body.contains("h:Reply-To"));
}

#[tokio::test]
async fn attachment_and_reply_to_are_forwarded() {
    let app = logged_in_app().await;
    Mock::given(method("POST"))
        .and(path(format!("/{DOMAIN}/messages")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Queued."})),
        )
        .expect(1)
        .mount(&app.mailgun_server)
        .await;

    let form = compose_form("ops@example.org").part(
            "attachment",
            Part::bytes(b"agenda for the meeting".to_vec()).file_name("agenda.txt"),
        );
    let response = app.post_compose(form).await;

    assert_eq!(response.status().as_u16(), 200);
    let body = sent_body(&app).await;
    assert!(body.contains(r#"filename="agenda.txt""#));
    assert!(body.contains("agenda for the meeting"));
    assert!(body.contains("ops@example.org"));
}

#[tokio::test]
async fn missing_fields_are_rejected_before_sending() {
    let app = spawn_app().await;
    app.log_in().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailgun_server)
        .await;

    let test_cases = [
        (Form::new().text("from", "a@example.org"), "only a sender"),
        (
            Form::new()
                .text("from", "a@example.org")
                .text("subject", "hi")
                .text("template", "welcome"),
            "missing list",
        ),
        (
            Form::new()
                .text("from", "a@example.org")
                .text("subject", "hi")
                .text("template", "welcome")
                .text("list", "not-an-address"),
            "invalid list",
        ),
    ];
    for (form, case) in test_cases {
        let response = app.post_compose(form).await;
        assert_eq!(response.status().as_u16(), 400, "{case}");
    }
}

#[tokio::test]
async fn upstream_refusal_is_shown_on_the_form() {
    let app = logged_in_app().await;
    Mock::given(method("POST"))
        .and(path(format!("/{DOMAIN}/messages")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "template not found"})),
        )
        .expect(1)
        .mount(&app.mailgun_server)
        .await;

    let response = app.post_compose(compose_form("")).await;

    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"class="notice error""#));
    assert!(html.contains("400 Bad Request"));
    assert!(html.contains(r#"enctype="multipart/form-data""#));
}
