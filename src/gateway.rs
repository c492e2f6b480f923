//! Persistence gateway: REST client for the remote card store.
//!
//! One operation per mutation kind. Callers treat mutations as
//! fire-and-forget: failures are logged at the call site and never retried,
//! and mutation response bodies are discarded. Only `fetch_cards` parses a
//! body, and only `delete` distinguishes a 404 so the caller can keep the
//! card visible.

use std::time::Duration;

use serde::Serialize;

use crate::card::{Card, Urgency};
use crate::error::{Error, Result};

/// Wire body for `PUT /api/updateStatus`.
///
/// The remote store applies whichever fields are present: pause and unload
/// flushes send `isRunning`, stop flushes send the `stopped` form so the
/// terminal flag is persisted.
#[derive(Debug, Clone, Serialize)]
struct StatusUpdate {
    id: u64,
    time: u64,
    #[serde(rename = "isRunning", skip_serializing_if = "Option::is_none")]
    is_running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopped: Option<bool>,
}

/// Wire body for `PUT /api/updateUrgency`
#[derive(Debug, Clone, Serialize)]
struct UrgencyUpdate {
    id: u64,
    urgency: Urgency,
}

/// REST client bound to one remote card store
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    client: reqwest::Client,
}

impl Gateway {
    /// Build a gateway for `base_url` (scheme + host, no trailing path)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/getcards`. A non-2xx status or a body that is not a JSON
    /// array is an error; callers degrade it to an empty visible list.
    pub async fn fetch_cards(&self) -> Result<Vec<Card>> {
        let response = self.client.get(self.endpoint("/api/getcards")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteStatus {
                operation: "getcards",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        if !body.is_array() {
            return Err(Error::MalformedResponse(format!(
                "expected an array of cards, got {}",
                value_kind(&body)
            )));
        }
        Ok(serde_json::from_value(body)?)
    }

    /// `POST /api/add`: persist a freshly created card
    pub async fn create(&self, card: &Card) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("/api/add"))
            .json(card)
            .send()
            .await?;
        expect_success("add", response.status())
    }

    /// `PUT /api/updateStatus` with `{id, time, isRunning}` (pause/unload)
    pub async fn update_status(&self, id: u64, time: u64, is_running: bool) -> Result<()> {
        self.put_status(StatusUpdate {
            id,
            time,
            is_running: Some(is_running),
            stopped: None,
        })
        .await
    }

    /// `PUT /api/updateStatus` with `{id, time, stopped}` (stop)
    pub async fn update_stopped(&self, id: u64, time: u64) -> Result<()> {
        self.put_status(StatusUpdate {
            id,
            time,
            is_running: None,
            stopped: Some(true),
        })
        .await
    }

    async fn put_status(&self, update: StatusUpdate) -> Result<()> {
        let response = self
            .client
            .put(self.endpoint("/api/updateStatus"))
            .json(&update)
            .send()
            .await?;
        expect_success("updateStatus", response.status())
    }

    /// `PUT /api/updateUrgency`
    pub async fn update_urgency(&self, id: u64, urgency: Urgency) -> Result<()> {
        let response = self
            .client
            .put(self.endpoint("/api/updateUrgency"))
            .json(&UrgencyUpdate { id, urgency })
            .send()
            .await?;
        expect_success("updateUrgency", response.status())
    }

    /// `DELETE /api/delete/:id`. A 404 maps to [`Error::CardNotFound`] so the
    /// caller keeps the card in its local store.
    pub async fn delete(&self, id: u64) -> Result<()> {
        let response = self
            .client
            .delete(self.endpoint(&format!("/api/delete/{id}")))
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::CardNotFound(id));
        }
        expect_success("delete", status)
    }
}

fn expect_success(operation: &'static str, status: reqwest::StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::RemoteStatus {
            operation,
            status: status.as_u16(),
        })
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let gateway =
            Gateway::new("http://localhost:3000/", Duration::from_secs(5)).expect("gateway");
        assert_eq!(gateway.base_url(), "http://localhost:3000");
        assert_eq!(gateway.endpoint("/api/getcards"), "http://localhost:3000/api/getcards");
    }

    #[test]
    fn status_update_serializes_only_present_fields() {
        let pause = StatusUpdate {
            id: 7,
            time: 65,
            is_running: Some(false),
            stopped: None,
        };
        let json = serde_json::to_value(&pause).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "time": 65, "isRunning": false})
        );

        let stop = StatusUpdate {
            id: 7,
            time: 65,
            is_running: None,
            stopped: Some(true),
        };
        let json = serde_json::to_value(&stop).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "time": 65, "stopped": true})
        );
    }
}
