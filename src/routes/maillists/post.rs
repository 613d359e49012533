use actix_web::{web, HttpResponse};

use super::get::render_maillists;
use crate::authentication::middleware::CurrentUser;
use crate::domain::{FormFields, NewList};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::Notice;
use crate::routes::PageError;

#[tracing::instrument(name = "create mailing list", skip_all)]
pub async fn create_maillist(
    form: web::Form<Vec<(String, String)>>,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let fields = FormFields::from(form.into_inner());
    let list = NewList::parse(&fields)?;

    let notice = match client.create_list(&list).await {
        Ok(receipt) => {
            tracing::info!(%receipt, "mailing list created");
            Notice::Info(receipt.message().to_string())
        }
        Err(e) => {
            tracing::error!(error = ?e, "failed to create mailing list");
            Notice::Error(e.to_string())
        }
    };
    render_maillists(&client, &user, &[notice]).await
}
