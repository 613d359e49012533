use actix_web::{web, HttpResponse};
use actix_web_flash_messages::FlashMessage;

use super::get::render_member;
use crate::authentication::middleware::CurrentUser;
use crate::domain::{FormError, FormFields, MemberUpdate};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::{list_path, member_path, Notice};
use crate::routes::PageError;
use crate::utils::see_other;

#[tracing::instrument(name = "change list member", skip(form, client, user))]
pub async fn update_maillist_member(
    path: web::Path<(String, String)>,
    form: web::Form<Vec<(String, String)>>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let (list, member) = path.into_inner();
    let fields = FormFields::from(form.into_inner());

    match fields.value("type") {
        Some("update") => {
            let update = MemberUpdate::parse(&fields)?;
            let notice = match client.update_member(&list, &member, &update).await {
                Ok(receipt) => {
                    tracing::info!(%receipt, "member updated");
                    // the old address no longer resolves
                    let address = update.address.address().as_ref();
                    if address != member {
                        FlashMessage::info(receipt.message()).send();
                        return Ok(see_other(&member_path(&list, address)));
                    }
                    Notice::Info(receipt.message().to_string())
                }
                Err(e) => {
                    tracing::error!(error = ?e, "failed to update member");
                    Notice::Error(e.to_string())
                }
            };
            render_member(&client, &user, &list, &member, &[notice]).await
        }
        Some("delete") => match client.delete_member(&list, &member).await {
            Ok(receipt) => {
                tracing::info!(%receipt, "member deleted");
                FlashMessage::info(receipt.message()).send();
                Ok(see_other(&list_path(&list)))
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to delete member");
                render_member(&client, &user, &list, &member, &[Notice::Error(e.to_string())])
                    .await
            }
        },
        _ => Err(FormError::Invalid {
            field: "type",
            reason: "expected `update` or `delete`".to_string(),
        }
        .into()),
    }
}
