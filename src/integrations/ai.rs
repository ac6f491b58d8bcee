//! Client for the third-party AI script endpoint.
//!
//! Every call is a single `POST` of `{action, ...payload, token}` answered by
//! `{success, data}`. The token is a static shared secret.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::config::AiConfig;

const ACTION_TRIVIA: &str = "generate_trivia";
const ACTION_PAIRING: &str = "pair_flavor";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI endpoint rejected the request: {0}")]
    Rejected(String),

    #[error("malformed AI response: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Menu entry sent along with a pairing request.
#[derive(Debug, Clone, Serialize)]
pub struct MenuEntry {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Serialize)]
struct TriviaPayload<'a> {
    product_name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct PairingPayload<'a> {
    cravings: &'a [String],
    menu: &'a [MenuEntry],
}

#[derive(Debug, Deserialize)]
struct TriviaData {
    trivia: String,
}

/// What the AI proposed. Any field may be missing; callers resolve it
/// against the local menu.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pairing {
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Identifiers that are not UUIDs (numbers, slugs, blanks) count as absent so
/// the rest of the answer still reaches the matcher.
fn lenient_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s.trim()).ok()))
}

#[derive(Clone)]
pub struct AiClient {
    inner: Arc<AiClientInner>,
}

struct AiClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl AiClient {
    pub fn new(config: &AiConfig, timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(AiClientInner {
                client,
                endpoint: config.endpoint_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    #[instrument(skip(self, description))]
    pub async fn generate_trivia(
        &self,
        product_name: &str,
        description: &str,
    ) -> Result<String, AiError> {
        let data = self
            .call(
                ACTION_TRIVIA,
                TriviaPayload {
                    product_name,
                    description,
                },
            )
            .await?;
        let parsed: TriviaData =
            serde_json::from_value(data).map_err(|e| AiError::Malformed(e.to_string()))?;
        let trivia = parsed.trivia.trim();
        if trivia.is_empty() {
            return Err(AiError::Malformed("empty trivia".into()));
        }
        Ok(trivia.to_string())
    }

    #[instrument(skip(self, menu), fields(menu_len = menu.len()))]
    pub async fn pair_flavor(
        &self,
        cravings: &[String],
        menu: &[MenuEntry],
    ) -> Result<Pairing, AiError> {
        let data = self
            .call(ACTION_PAIRING, PairingPayload { cravings, menu })
            .await?;
        serde_json::from_value(data).map_err(|e| AiError::Malformed(e.to_string()))
    }

    async fn call<P: Serialize>(&self, action: &str, payload: P) -> Result<Value, AiError> {
        let body = request_body(action, payload, &self.inner.token)?;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|e| AiError::Malformed(e.to_string()))?;

        if !envelope.success {
            return Err(AiError::Rejected(
                envelope.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| AiError::Malformed("missing data".into()))
    }
}

fn request_body<P: Serialize>(action: &str, payload: P, token: &str) -> Result<Value, AiError> {
    let mut body = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(AiError::Malformed(e.to_string())),
    };
    body.insert("action".into(), Value::String(action.into()));
    body.insert("token".into(), Value::String(token.into()));
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_flattens_payload_next_to_action_and_token() {
        let body = request_body(
            ACTION_TRIVIA,
            TriviaPayload {
                product_name: "Mango Loco",
                description: "mango and chamoy",
            },
            "secret",
        )
        .expect("body");
        assert_eq!(body["action"], "generate_trivia");
        assert_eq!(body["token"], "secret");
        assert_eq!(body["product_name"], "Mango Loco");
        assert_eq!(body["description"], "mango and chamoy");
    }

    #[test]
    fn pairing_tolerates_missing_fields() {
        let pairing: Pairing =
            serde_json::from_value(serde_json::json!({ "product_name": "Berry Blast" }))
                .expect("pairing");
        assert_eq!(pairing.product_name.as_deref(), Some("Berry Blast"));
        assert!(pairing.product_id.is_none());
    }

    #[test]
    fn pairing_ignores_identifiers_that_are_not_uuids() {
        for id in [serde_json::json!(42), serde_json::json!("berry-blast"), serde_json::json!(null)] {
            let pairing: Pairing = serde_json::from_value(serde_json::json!({
                "product_id": id,
                "product_name": "Berry Blast",
                "reason": "tart and sweet"
            }))
            .expect("pairing");
            assert!(pairing.product_id.is_none());
            assert_eq!(pairing.product_name.as_deref(), Some("Berry Blast"));
        }

        let id = Uuid::new_v4();
        let pairing: Pairing =
            serde_json::from_value(serde_json::json!({ "product_id": id.to_string() }))
                .expect("pairing");
        assert_eq!(pairing.product_id, Some(id));
    }
}
