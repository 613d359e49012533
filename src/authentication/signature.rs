//! OAuth 1.0a request signing (RFC 5849), HMAC-SHA1 only: that is what the
//! wiki provider accepts for consumers holding a shared secret.

use base64::Engine;
use hmac::{digest::InvalidLength, Hmac, Mac};
use reqwest::{Method, Url};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are kept, everything else is escaped.
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Method, base URL and every parameter (the URL's query plus the `oauth_*`
/// protocol parameters), each encoded, joined by `&`.
pub fn base_string(method: &Method, url: &Url, oauth_params: &[(&str, &str)]) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (encode(&k), encode(&v)))
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    params.sort();
    let normalized = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        encode(base_url.as_str()),
        encode(&normalized)
    )
}

pub fn sign(
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, InvalidLength> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())?;
    mac.update(base_string.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Value of the `Authorization` header carrying the protocol parameters.
pub fn authorization_header(oauth_params: &[(&str, &str)], signature: &str) -> String {
    let params = oauth_params
        .iter()
        .copied()
        .chain(std::iter::once(("oauth_signature", signature)))
        .map(|(k, v)| format!(r#"{}="{}""#, encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {params}")
}
