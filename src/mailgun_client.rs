use std::time::Duration;

use reqwest::{
    multipart::{Form, Part},
    Client, ClientBuilder, Method, RequestBuilder, StatusCode, Url,
};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize};

use crate::domain::{
    MailingList, Member, MemberBatch, MemberUpdate, NewList, NewMember, OutboundMessage, Receipt,
    Template, TemplateSummary, TemplateVersionDetail,
};

/// Principal the API key is presented under.
const API_USER: &str = "api";
const BODY_SNIPPET_LEN: usize = 512;

#[derive(thiserror::Error, Debug)]
pub enum MailgunError {
    #[error("the email service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to reach the email service")]
    Transport(#[source] reqwest::Error),
    #[error("the email service sent an unexpected response")]
    Decode(#[source] reqwest::Error),
    #[error("failed to encode the request payload")]
    Encode(#[from] serde_json::Error),
    #[error("the attachment could not be encoded")]
    Attachment(#[source] reqwest::Error),
}

impl MailgunError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct OptionalItems<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ListEnvelope {
    list: MailingList,
}

#[derive(Deserialize)]
struct MemberEnvelope {
    member: Member,
}

#[derive(Deserialize)]
struct TemplateEnvelope<T> {
    template: T,
}

/// Client for the email service's REST API. Every path is resolved against
/// a fixed base URL and every request carries the account's API key.
#[derive(Debug)]
pub struct MailgunClient {
    http_client: Client,
    base_url: Url,
    domain: String,
    api_key: Secret<String>,
}

impl MailgunClient {
    pub fn new(
        base_url: Url,
        domain: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("{} cannot be used as a base url", base_url);
        }
        let http_client = ClientBuilder::new().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            domain,
            api_key,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http_client
            .request(method, self.url(segments))
            .basic_auth(API_USER, Some(self.api_key.expose_secret()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, MailgunError> {
        let response = request.send().await.map_err(MailgunError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailgunError::Status {
                status,
                body: body.chars().take(BODY_SNIPPET_LEN).collect(),
            });
        }
        response.json().await.map_err(MailgunError::Decode)
    }

    #[tracing::instrument(name = "fetch mailing lists", skip(self))]
    pub async fn lists(&self) -> Result<Vec<MailingList>, MailgunError> {
        let envelope: Items<MailingList> = self.send(self.request(Method::GET, &["lists"])).await?;
        Ok(envelope.items)
    }

    #[tracing::instrument(name = "fetch mailing list", skip(self))]
    pub async fn list(&self, address: &str) -> Result<MailingList, MailgunError> {
        let envelope: ListEnvelope = self
            .send(self.request(Method::GET, &["lists", address]))
            .await?;
        Ok(envelope.list)
    }

    #[tracing::instrument(name = "create mailing list", skip(self, list), fields(address = %list.address))]
    pub async fn create_list(&self, list: &NewList) -> Result<Receipt, MailgunError> {
        let mut form = vec![("address", list.address.as_ref())];
        if let Some(name) = &list.name {
            form.push(("name", name.as_str()));
        }
        if let Some(description) = &list.description {
            form.push(("description", description.as_str()));
        }
        self.send(self.request(Method::POST, &["lists"]).form(&form))
            .await
    }

    #[tracing::instrument(name = "delete mailing list", skip(self))]
    pub async fn delete_list(&self, address: &str) -> Result<Receipt, MailgunError> {
        self.send(self.request(Method::DELETE, &["lists", address]))
            .await
    }

    #[tracing::instrument(name = "fetch list members", skip(self))]
    pub async fn members(&self, list: &str) -> Result<Vec<Member>, MailgunError> {
        let envelope: OptionalItems<Member> = self
            .send(self.request(Method::GET, &["lists", list, "members"]))
            .await?;
        Ok(envelope.items)
    }

    #[tracing::instrument(name = "fetch list member", skip(self))]
    pub async fn member(&self, list: &str, address: &str) -> Result<Member, MailgunError> {
        let envelope: MemberEnvelope = self
            .send(self.request(Method::GET, &["lists", list, "members", address]))
            .await?;
        Ok(envelope.member)
    }

    #[tracing::instrument(name = "add list member", skip(self, member), fields(address = %member.address))]
    pub async fn add_member(&self, list: &str, member: &NewMember) -> Result<Receipt, MailgunError> {
        let vars = member.variables.to_json()?;
        let form = [
            ("address", member.address.as_ref()),
            ("name", member.name.as_str()),
            ("vars", vars.as_str()),
        ];
        self.send(
            self.request(Method::POST, &["lists", list, "members"])
                .form(&form),
        )
        .await
    }

    /// Existing members with the same address are updated, not duplicated.
    #[tracing::instrument(name = "upsert list members", skip(self, batch), fields(count = batch.len()))]
    pub async fn upsert_members(
        &self,
        list: &str,
        batch: &MemberBatch,
    ) -> Result<Receipt, MailgunError> {
        let members = batch.to_json()?;
        let form = [("upsert", "yes"), ("members", members.as_str())];
        self.send(
            self.request(Method::POST, &["lists", list, "members.json"])
                .form(&form),
        )
        .await
    }

    #[tracing::instrument(name = "update list member", skip(self, update))]
    pub async fn update_member(
        &self,
        list: &str,
        address: &str,
        update: &MemberUpdate,
    ) -> Result<Receipt, MailgunError> {
        let vars = update.variables.to_json()?;
        let form = [
            ("name", update.name.as_str()),
            ("address", update.address.as_ref()),
            ("vars", vars.as_str()),
        ];
        self.send(
            self.request(Method::PUT, &["lists", list, "members", address])
                .form(&form),
        )
        .await
    }

    #[tracing::instrument(name = "delete list member", skip(self))]
    pub async fn delete_member(&self, list: &str, address: &str) -> Result<Receipt, MailgunError> {
        self.send(self.request(Method::DELETE, &["lists", list, "members", address]))
            .await
    }

    #[tracing::instrument(
        name = "send templated message",
        skip(self, message),
        fields(to = %message.to, template = %message.template)
    )]
    pub async fn send_message(&self, message: OutboundMessage) -> Result<Receipt, MailgunError> {
        let mut form = Form::new()
            .text("h:X-Mailgun-Variables", message.variables.to_json()?)
            .text("from", message.from)
            .text("subject", message.subject)
            .text("template", message.template)
            .text("to", message.to.to_string())
            .text("o:tag", message.tag);
        if let Some(reply_to) = message.reply_to {
            form = form.text("h:Reply-To", reply_to);
        }
        if let Some(attachment) = message.attachment {
            let mut part = Part::bytes(attachment.content).file_name(attachment.file_name);
            if let Some(content_type) = &attachment.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(MailgunError::Attachment)?;
            }
            form = form.part("attachment", part);
        }
        self.send(
            self.request(Method::POST, &[self.domain.as_str(), "messages"])
                .multipart(form),
        )
        .await
    }

    #[tracing::instrument(name = "fetch templates", skip(self))]
    pub async fn templates(&self) -> Result<Vec<TemplateSummary>, MailgunError> {
        let envelope: OptionalItems<TemplateSummary> = self
            .send(self.request(Method::GET, &[self.domain.as_str(), "templates"]))
            .await?;
        Ok(envelope.items)
    }

    #[tracing::instrument(name = "fetch template versions", skip(self))]
    pub async fn template(&self, name: &str) -> Result<Template, MailgunError> {
        let envelope: TemplateEnvelope<Template> = self
            .send(self.request(Method::GET, &[self.domain.as_str(), "templates", name, "versions"]))
            .await?;
        Ok(envelope.template)
    }

    #[tracing::instrument(name = "fetch template version", skip(self))]
    pub async fn template_version(
        &self,
        name: &str,
        tag: &str,
    ) -> Result<TemplateVersionDetail, MailgunError> {
        let envelope: TemplateEnvelope<TemplateVersionDetail> = self
            .send(self.request(
                Method::GET,
                &[self.domain.as_str(), "templates", name, "versions", tag],
            ))
            .await?;
        Ok(envelope.template)
    }
}
