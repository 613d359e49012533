use actix_web::{web, HttpResponse};
use actix_web_flash_messages::FlashMessage;

use super::get::render_maillist;
use crate::authentication::middleware::CurrentUser;
use crate::domain::{FormFields, MemberBatch, NewMember, Receipt};
use crate::mailgun_client::{MailgunClient, MailgunError};
use crate::routes::layout::Notice;
use crate::routes::PageError;
use crate::utils::see_other;

/// One form endpoint for the list page: delete the list, bulk upsert from the
/// address box, or add a single member.
#[tracing::instrument(name = "update mailing list", skip(form, client, user))]
pub async fn update_maillist(
    path: web::Path<String>,
    form: web::Form<Vec<(String, String)>>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let address = path.into_inner();
    let fields = FormFields::from(form.into_inner());

    if fields.value("type") == Some("delete") {
        match client.delete_list(&address).await {
            Ok(receipt) => {
                tracing::info!(%receipt, "mailing list deleted");
                FlashMessage::info(receipt.message()).send();
                return Ok(see_other("/maillists"));
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to delete mailing list");
                let notice = Notice::Error(e.to_string());
                return render_maillist(&client, &user, &address, &[notice]).await;
            }
        }
    }

    let result = if fields.contains("addresses") {
        let batch = MemberBatch::parse(&fields)?;
        client.upsert_members(&address, &batch).await
    } else {
        let member = NewMember::parse(&fields)?;
        client.add_member(&address, &member).await
    };
    let notice = mutation_notice(result);
    render_maillist(&client, &user, &address, &[notice]).await
}

fn mutation_notice(result: Result<Receipt, MailgunError>) -> Notice {
    match result {
        Ok(receipt) => {
            tracing::info!(%receipt, "members updated");
            Notice::Info(receipt.message().to_string())
        }
        Err(e) => {
            tracing::error!(error = ?e, "failed to update members");
            Notice::Error(e.to_string())
        }
    }
}
