use actix_web::{web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

use crate::authentication::middleware::CurrentUser;
use crate::domain::MailingList;
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{esc, html, list_path, page, Notice};
use crate::routes::PageError;

pub async fn maillists(
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, PageError> {
    render_maillists(&client, &user, &Notice::from_flash(&flash_messages)).await
}

pub(super) async fn render_maillists(
    client: &MailgunClient,
    username: &str,
    notices: &[Notice],
) -> Result<HttpResponse, PageError> {
    let lists = client.lists().await?;
    Ok(html(page(
        "Mailing lists",
        Some(username),
        notices,
        &maillists_html(&lists),
    )))
}

fn maillists_html(lists: &[MailingList]) -> String {
    let mut rows = String::new();
    for list in lists {
        let _ = writeln!(
            rows,
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            esc(&list_path(&list.address)),
            esc(&list.address),
            esc(&list.name),
            list.members_count,
            esc(&list.description)
        );
    }

    format!(
        r#"<table>
      <tr><th>Address</th><th>Name</th><th>Members</th><th>Description</th></tr>
      {rows}
    </table>
    <h2>Create a mailing list</h2>
    <form action="/maillists" method="post">
      <label>Address <input type="text" name="address" placeholder="list@example.org"></label>
      <label>Name <input type="text" name="name"></label>
      <label>Description <input type="text" name="description"></label>
      <button type="submit">Create</button>
    </form>"#
    )
}
