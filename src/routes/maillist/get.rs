use actix_web::{web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

use crate::authentication::middleware::CurrentUser;
use crate::domain::{MailingList, Member};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{esc, html, list_path, member_path, page, Notice};
use crate::routes::PageError;

pub async fn maillist(
    path: web::Path<String>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, PageError> {
    render_maillist(
        &client,
        &user,
        &path,
        &Notice::from_flash(&flash_messages),
    )
    .await
}

pub(super) async fn render_maillist(
    client: &MailgunClient,
    username: &str,
    address: &str,
    notices: &[Notice],
) -> Result<HttpResponse, PageError> {
    let list = client.list(address).await?;
    let members = client.members(address).await?;
    let title = if list.name.is_empty() {
        list.address.clone()
    } else {
        format!("{} ({})", list.name, list.address)
    };
    Ok(html(page(
        &title,
        Some(username),
        notices,
        &maillist_html(&list, &members),
    )))
}

fn maillist_html(list: &MailingList, members: &[Member]) -> String {
    let mut rows = String::new();
    for member in members {
        let vars = member
            .vars_as_text()
            .map(|(name, value)| format!("{}={}", esc(name), esc(&value)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            rows,
            r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            esc(&member_path(&list.address, &member.address)),
            esc(&member.address),
            esc(&member.name),
            if member.subscribed { "yes" } else { "no" },
            vars
        );
    }
    let action = esc(&list_path(&list.address));
    let description = esc(&list.description);
    let members_count = list.members_count;

    format!(
        r#"<p>{description}</p>
    <p>{members_count} members</p>
    <table>
      <tr><th>Address</th><th>Name</th><th>Subscribed</th><th>Variables</th></tr>
      {rows}
    </table>
    <h2>Add a member</h2>
    <form action="{action}" method="post">
      <label>Address <input type="text" name="address"></label>
      <label>Name <input type="text" name="name"></label>
      <label>Variable <input type="text" name="variable" placeholder="name"></label>
      <label>Value <input type="text" name="value"></label>
      <button type="submit">Add</button>
    </form>
    <h2>Add or update many members</h2>
    <form action="{action}" method="post">
      <label>Addresses, one per line <textarea name="addresses" rows="10"></textarea></label>
      <label>Variable for all <input type="text" name="variable" placeholder="name"></label>
      <label>Value <input type="text" name="value"></label>
      <button type="submit">Upload</button>
    </form>
    <h2>Delete this list</h2>
    <form action="{action}" method="post">
      <input type="hidden" name="type" value="delete">
      <button type="submit">Delete list</button>
    </form>"#
    )
}
