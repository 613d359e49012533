use actix_web::{http::header::ContentType, web, HttpResponse};
use anyhow::anyhow;
use std::fmt::Write;

use crate::authentication::middleware::CurrentUser;
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{esc, html, page, template_path, version_path};
use crate::routes::PageError;

pub async fn templates(
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let templates = client.templates().await?;

    let mut rows = String::new();
    for template in &templates {
        let _ = writeln!(
            rows,
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
            esc(&template_path(&template.name)),
            esc(&template.name),
            esc(&template.description),
            esc(&template.created_at)
        );
    }
    Ok(html(page(
        "Templates",
        Some(user.as_str()),
        &[],
        &format!(
            r#"<table>
      <tr><th>Name</th><th>Description</th><th>Created</th></tr>
      {rows}
    </table>"#
        ),
    )))
}

pub async fn template(
    path: web::Path<String>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let template = client.template(&path).await?;

    let mut rows = String::new();
    for version in &template.versions {
        let _ = writeln!(
            rows,
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            esc(&version_path(&template.name, &version.tag)),
            esc(&version.tag),
            if version.active { "active" } else { "" },
            esc(&version.engine),
            esc(&version.comment),
            esc(&version.created_at)
        );
    }
    let description = esc(&template.description);
    Ok(html(page(
        &template.name,
        Some(user.as_str()),
        &[],
        &format!(
            r#"<p>{description}</p>
    <table>
      <tr><th>Version</th><th></th><th>Engine</th><th>Comment</th><th>Created</th></tr>
      {rows}
    </table>
    <p><a href="/templates">&lt;- All templates</a></p>"#
        ),
    )))
}

pub async fn template_version(
    path: web::Path<(String, String)>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let (name, tag) = path.into_inner();
    let detail = client.template_version(&name, &tag).await?;
    let version = &detail.version;

    let preview = esc(&format!("{}/content", version_path(&detail.name, &version.tag)));
    let source = esc(version.template.as_deref().unwrap_or_default());
    let back = esc(&template_path(&detail.name));
    let comment = esc(&version.comment);
    let engine = esc(&version.engine);
    let created_at = esc(&version.created_at);
    let active = if version.active { "yes" } else { "no" };

    Ok(html(page(
        &format!("{} / {}", detail.name, version.tag),
        Some(user.as_str()),
        &[],
        &format!(
            r#"<dl>
      <dt>Engine</dt><dd>{engine}</dd>
      <dt>Active</dt><dd>{active}</dd>
      <dt>Comment</dt><dd>{comment}</dd>
      <dt>Created</dt><dd>{created_at}</dd>
    </dl>
    <iframe src="{preview}" width="100%" height="600"></iframe>
    <pre>{source}</pre>
    <p><a href="{back}">&lt;- All versions</a></p>"#
        ),
    )))
}

/// The version's HTML exactly as stored upstream, not wrapped in the layout,
/// so it can be framed as a preview.
pub async fn template_version_content(
    path: web::Path<(String, String)>,
    client: web::Data<MailgunClient>,
) -> Result<HttpResponse, PageError> {
    let (name, tag) = path.into_inner();
    let detail = client.template_version(&name, &tag).await?;
    let body = detail
        .version
        .template
        .ok_or_else(|| anyhow!("template {name} version {tag} has no content"))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
