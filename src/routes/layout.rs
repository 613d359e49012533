use actix_web::{http::header::ContentType, HttpResponse};
use actix_web_flash_messages::{IncomingFlashMessages, Level};

/// A one-line message shown above the page content.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn from_flash(messages: &IncomingFlashMessages) -> Vec<Notice> {
        messages
            .iter()
            .map(|m| match m.level() {
                Level::Error | Level::Warning => Notice::Error(m.content().to_string()),
                _ => Notice::Info(m.content().to_string()),
            })
            .collect()
    }

    fn to_html(&self) -> String {
        match self {
            Notice::Info(msg) => format!(r#"<p class="notice"><i>{}</i></p>"#, esc(msg)),
            Notice::Error(msg) => format!(r#"<p class="notice error"><b>{}</b></p>"#, esc(msg)),
        }
    }
}

/// Escapes text for element content and double-quoted attribute values.
pub fn esc(s: &str) -> String {
    htmlescape::encode_minimal(s)
}

pub fn list_path(list: &str) -> String {
    format!("/maillists/{}", urlencoding::encode(list))
}

pub fn member_path(list: &str, member: &str) -> String {
    format!("{}/{}", list_path(list), urlencoding::encode(member))
}

pub fn template_path(name: &str) -> String {
    format!("/templates/{}", urlencoding::encode(name))
}

pub fn version_path(name: &str, tag: &str) -> String {
    format!("{}/{}", template_path(name), urlencoding::encode(tag))
}

pub fn page(title: &str, username: Option<&str>, notices: &[Notice], content: &str) -> String {
    let nav = match username {
        Some(name) => format!(
            r#"<nav>
      <a href="/">Send a message</a> |
      <a href="/maillists">Mailing lists</a> |
      <a href="/templates">Templates</a>
      <span class="user">Logged in as {} (<a href="/logout">log out</a>)</span>
    </nav>"#,
            esc(name)
        ),
        None => String::new(),
    };
    let notices: String = notices.iter().map(Notice::to_html).collect();
    let title = esc(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
  </head>
  <body>
    {nav}
    <h1>{title}</h1>
    {notices}
    {content}
  </body>
</html>"#
    )
}

pub fn html(page: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page)
}
