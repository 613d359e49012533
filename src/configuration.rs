use config::{Config, ConfigError, File};
use reqwest::Url;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

use crate::authentication::WikiOAuth;
use crate::mailgun_client::MailgunClient;

#[derive(Clone, Deserialize, Debug)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub mailgun: MailgunSettings,
    pub oauth: OAuthSettings,
}

#[derive(Clone, Deserialize, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    // signs the session and flash message cookies, at least 64 bytes
    pub hmac_secret: Secret<String>,
    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Clone, Deserialize, Debug)]
pub struct MailgunSettings {
    pub base_url: String,
    /// Sending domain, used as the prefix of message and template paths.
    pub domain: String,
    pub api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl MailgunSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<MailgunClient, anyhow::Error> {
        let base_url = Url::parse(&self.base_url)?;
        MailgunClient::new(
            base_url,
            self.domain.clone(),
            self.api_key.clone(),
            self.timeout(),
        )
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct OAuthSettings {
    /// Script path of the wiki, e.g. `https://meta.wikimedia.org/w`.
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl OAuthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<WikiOAuth, anyhow::Error> {
        WikiOAuth::new(
            &self.base_url,
            self.consumer_key.clone(),
            self.consumer_secret.clone(),
            self.timeout(),
        )
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "environment {} not found; use either `local` or `production`",
                s
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("failed to resolve current path: {e}")))?;
    let configuration_dir = base_path.join("configuration");
    let environ: Environment = std::env::var("APP_ENVIRONMENT") // "local" or "production"
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;
    let env_filename = format!("{}.yaml", environ.as_str());

    let mut builder = Config::builder()
        .add_source(File::from(configuration_dir.join("base.yaml")))
        .add_source(File::from(configuration_dir.join(env_filename)));

    // a deployment can point at its own file holding the secrets
    if let Ok(path) = std::env::var("APP_CONFIG_FILE") {
        builder = builder.add_source(File::from(base_path.join(path)));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}
