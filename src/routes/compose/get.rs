use actix_web::{web, HttpResponse};
use std::fmt::Write;

use crate::authentication::middleware::CurrentUser;
use crate::domain::{MailingList, TemplateSummary};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{esc, html, page, Notice};
use crate::routes::PageError;

/// Empty variable rows offered by the form; unused rows are dropped.
const VARIABLE_ROWS: usize = 5;

pub async fn compose_form(
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    render_compose(&client, &user, &[]).await
}

pub(super) async fn render_compose(
    client: &MailgunClient,
    username: &str,
    notices: &[Notice],
) -> Result<HttpResponse, PageError> {
    let lists = client.lists().await?;
    let templates = client.templates().await?;
    Ok(html(page(
        "Send a message",
        Some(username),
        notices,
        &compose_html(&lists, &templates),
    )))
}

fn compose_html(lists: &[MailingList], templates: &[TemplateSummary]) -> String {
    let mut list_options = String::new();
    for list in lists {
        let label = if list.name.is_empty() { &list.address } else { &list.name };
        let _ = writeln!(
            list_options,
            r#"<option value="{}">{} ({} members)</option>"#,
            esc(&list.address),
            esc(label),
            list.members_count
        );
    }
    let mut template_options = String::new();
    for template in templates {
        let _ = writeln!(
            template_options,
            r#"<option value="{0}">{1}</option>"#,
            esc(&template.name),
            esc(&template.name)
        );
    }
    let mut variable_rows = String::new();
    for i in 0..VARIABLE_ROWS {
        let _ = writeln!(
            variable_rows,
            r#"<p><input type="hidden" name="variable" value="{i}">
        <input type="text" name="variable-{i}" placeholder="name">
        <input type="text" name="value-{i}" placeholder="value"></p>"#
        );
    }

    format!(
        r#"<form action="/" method="post" enctype="multipart/form-data">
      <label>From <input type="text" name="from" placeholder="Team &lt;team@example.org&gt;"></label>
      <label>Subject <input type="text" name="subject"></label>
      <label>Template <select name="template">{template_options}</select></label>
      <label>Mailing list <select name="list">{list_options}</select></label>
      <label>Reply-To <input type="text" name="replyto"></label>
      <fieldset>
        <legend>Template variables</legend>
        {variable_rows}
      </fieldset>
      <label>Attachment <input type="file" name="attachment"></label>
      <button type="submit">Send</button>
    </form>"#
    )
}
