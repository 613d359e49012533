use actix_web::{web, HttpResponse};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

use crate::authentication::middleware::CurrentUser;
use crate::domain::{MailingList, Member};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{esc, html, list_path, member_path, page, Notice};
use crate::routes::PageError;

pub async fn maillist_member(
    path: web::Path<(String, String)>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
    flash_messages: IncomingFlashMessages,
) -> Result<HttpResponse, PageError> {
    let (list, member) = path.into_inner();
    render_member(
        &client,
        &user,
        &list,
        &member,
        &Notice::from_flash(&flash_messages),
    )
    .await
}

pub(super) async fn render_member(
    client: &MailgunClient,
    username: &str,
    list: &str,
    address: &str,
    notices: &[Notice],
) -> Result<HttpResponse, PageError> {
    let list = client.list(list).await?;
    let member = client.member(&list.address, address).await?;
    Ok(html(page(
        &member.address,
        Some(username),
        notices,
        &member_html(&list, &member),
    )))
}

/// Existing variables become indexed rows so they round-trip through the
/// update form; a blanked name removes the variable.
fn member_html(list: &MailingList, member: &Member) -> String {
    let mut variable_rows = String::new();
    for (i, (name, value)) in member.vars_as_text().enumerate() {
        let _ = writeln!(
            variable_rows,
            r#"<p><input type="hidden" name="variable" value="{i}">
        <input type="text" name="variable-{i}" value="{}">
        <input type="text" name="value-{i}" value="{}"></p>"#,
            esc(name),
            esc(&value)
        );
    }
    let action = esc(&member_path(&list.address, &member.address));
    let back = esc(&list_path(&list.address));
    let list_address = esc(&list.address);
    let name = esc(&member.name);
    let address = esc(&member.address);

    format!(
        r#"<p>Member of <a href="{back}">{list_address}</a></p>
    <form action="{action}" method="post">
      <input type="hidden" name="type" value="update">
      <label>Name <input type="text" name="name" value="{name}"></label>
      <label>Address <input type="text" name="address" value="{address}"></label>
      <fieldset>
        <legend>Variables</legend>
        {variable_rows}
        <p><input type="text" name="variable-new" placeholder="new variable">
        <input type="text" name="value-new" placeholder="value"></p>
      </fieldset>
      <button type="submit">Save</button>
    </form>
    <form action="{action}" method="post">
      <input type="hidden" name="type" value="delete">
      <button type="submit">Remove from list</button>
    </form>"#
    )
}
