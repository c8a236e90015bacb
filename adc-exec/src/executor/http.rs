use adc_core::{AdcError, HttpMethod};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::executor::types::TransportConfig;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid appliance url: {0}")]
    InvalidUrl(String),
    #[error("failed to create http client: {0}")]
    Client(String),
}

/// Performs one authenticated NITRO call. Implementations do not retry.
#[async_trait]
pub trait AdcTransport: Send + Sync {
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<JsonValue, AdcError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    config: TransportConfig,
    api_root: String,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        url::Url::parse(&config.credentials.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.credentials.url)))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("adc-exec/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(config.credentials.allow_unauthorized_certs)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        let api_root = config.credentials.api_root();
        Ok(Self {
            client,
            config,
            api_root,
        })
    }
}

#[async_trait]
impl AdcTransport for ReqwestTransport {
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<JsonValue, AdcError> {
        let url = format!("{}{}", self.api_root, path);
        let creds = &self.config.credentials;
        debug!(%method, %url, "sending NITRO request");

        let mut rb = self
            .client
            .request(to_reqwest_method(method), &url)
            .header("Content-Type", "application/json")
            .header("X-NITRO-USER", &creds.username)
            .header("X-NITRO-PASS", creds.expose_password());

        // NITRO rejects an empty JSON object as a body.
        if let Some(b) = body.filter(|b| !is_empty_object(b)) {
            rb = rb.json(b);
        }

        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(map_reqwest_error)?;
        debug!(
            %method,
            %url,
            status = status.as_u16(),
            len = bytes.len(),
            "received NITRO response"
        );

        if bytes.len() > self.config.max_response_bytes {
            return Err(AdcError::remote(
                Some(status.as_u16()),
                format!("response too large (>{} bytes)", self.config.max_response_bytes),
            ));
        }

        let parsed = parse_body(&bytes);
        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(nitro_message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(AdcError::remote(Some(status.as_u16()), message));
        }

        let value = match parsed {
            Some(v) => v,
            None if bytes.iter().all(u8::is_ascii_whitespace) => {
                JsonValue::Object(Default::default())
            }
            None => {
                return Err(AdcError::UnexpectedResponse(
                    "response body is not valid JSON".to_string(),
                ))
            }
        };
        check_nitro_error(status.as_u16(), &value)?;
        Ok(value)
    }
}

fn to_reqwest_method(m: HttpMethod) -> reqwest::Method {
    match m {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn is_empty_object(v: &JsonValue) -> bool {
    v.as_object().is_some_and(|m| m.is_empty())
}

fn parse_body(bytes: &[u8]) -> Option<JsonValue> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

fn nitro_message(v: &JsonValue) -> Option<String> {
    v.get("message")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

/// A 2xx payload can still carry a NITRO error (`errorcode != 0`, `severity: ERROR`).
fn check_nitro_error(status: u16, v: &JsonValue) -> Result<(), AdcError> {
    let code = v.get("errorcode").and_then(JsonValue::as_i64).unwrap_or(0);
    let severity = v.get("severity").and_then(JsonValue::as_str).unwrap_or("");
    if code != 0 && severity.eq_ignore_ascii_case("ERROR") {
        let message = nitro_message(v).unwrap_or_else(|| format!("errorcode {code}"));
        return Err(AdcError::remote(Some(status), message));
    }
    Ok(())
}

fn map_reqwest_error(e: reqwest::Error) -> AdcError {
    if e.is_timeout() {
        return AdcError::remote(None, "timeout");
    }
    AdcError::remote(e.status().map(|s| s.as_u16()), e.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nitro_error_payload_is_detected() {
        let v = json!({
            "errorcode": 1642,
            "message": "Invalid value [filelocation]",
            "severity": "ERROR"
        });
        let err = check_nitro_error(200, &v).unwrap_err();
        assert_eq!(err, AdcError::remote(Some(200), "Invalid value [filelocation]"));
    }

    #[test]
    fn nitro_warning_is_not_an_error() {
        let v = json!({"errorcode": 0, "message": "Done", "severity": "NONE"});
        assert!(check_nitro_error(200, &v).is_ok());
        let v = json!({"errorcode": 1067, "message": "warning", "severity": "WARNING"});
        assert!(check_nitro_error(200, &v).is_ok());
    }

    #[test]
    fn empty_object_bodies_are_detected() {
        assert!(is_empty_object(&json!({})));
        assert!(!is_empty_object(&json!({"a": 1})));
        assert!(!is_empty_object(&json!([])));
    }
}
