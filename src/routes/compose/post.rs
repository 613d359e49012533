use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use super::get::render_compose;
use crate::authentication::middleware::CurrentUser;
use crate::domain::{Attachment, FormError, FormFields, OutboundMessage};
use crate::mailgun_client::MailgunClient;
use crate::routes::layout::Notice;
use crate::routes::PageError;

/// Upper bound on a whole compose submission, attachment included. Matches
/// the upstream's limit on a single message.
pub const MAX_MESSAGE_BYTES: usize = 25 * 1024 * 1024;

#[tracing::instrument(name = "send message", skip_all)]
pub async fn send_message(
    payload: Multipart,
    client: web::Data<MailgunClient>,
    user: web::ReqData<CurrentUser>,
) -> Result<HttpResponse, PageError> {
    let (fields, attachment) = read_multipart(payload).await?;
    let message = OutboundMessage::parse(&fields, attachment)?;

    let notice = match client.send_message(message).await {
        Ok(receipt) => {
            tracing::info!(%receipt, "message accepted");
            Notice::Info(receipt.message().to_string())
        }
        Err(e) => {
            tracing::error!(error = ?e, "message rejected");
            Notice::Error(e.to_string())
        }
    };
    render_compose(&client, &user, &[notice]).await
}

/// Text parts become form fields; a non-empty file under `attachment` is
/// kept aside to be forwarded.
async fn read_multipart(
    mut payload: Multipart,
) -> Result<(FormFields, Option<Attachment>), FormError> {
    let malformed = |e: actix_multipart::MultipartError| FormError::Malformed(e.to_string());

    let mut fields = FormFields::default();
    let mut attachment = None;
    let mut total = 0;
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            append_chunk(&mut content, &mut total, &chunk)?;
        }

        match file_name {
            Some(file_name) if name == "attachment" => {
                // browsers submit an empty part when no file was picked
                if !file_name.is_empty() {
                    attachment = Some(Attachment {
                        file_name,
                        content_type,
                        content,
                    });
                }
            }
            _ => {
                let value = String::from_utf8(content).map_err(|_| {
                    FormError::Malformed(format!("`{name}` is not valid UTF-8"))
                })?;
                fields.push(name, value);
            }
        }
    }
    Ok((fields, attachment))
}

fn append_chunk(content: &mut Vec<u8>, total: &mut usize, chunk: &[u8]) -> Result<(), FormError> {
    *total += chunk.len();
    if *total > MAX_MESSAGE_BYTES {
        return Err(FormError::Malformed(format!(
            "the message is larger than {} MiB",
            MAX_MESSAGE_BYTES / (1024 * 1024)
        )));
    }
    content.extend_from_slice(chunk);
    Ok(())
}
