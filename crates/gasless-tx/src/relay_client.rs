//! HTTP client for a GSN relay server.
//!
//! Endpoints:
//! - GET /getaddr
//! - POST /relay

use std::time::Duration;

use alloy_primitives::Bytes;
use gasless_types::{RelayError, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::envelope::HttpRelayEnvelope;
use crate::fees::RelayServerConfig;

/// Body of `POST /relay`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub signed_tx: Option<Bytes>,
}

/// Relay client bound to one server and API key.
pub struct RelayHttpClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

/// Error body shapes relay servers are known to return.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    reason: Option<String>,
}

/// Pull a human-readable rejection reason out of an error body.
fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message).or(b.reason))
        .unwrap_or_else(|| body.trim().to_string())
}

impl RelayHttpClient {
    pub fn new(base_url: &str, api_key: &str, timeout_ms: Option<u64>) -> Self {
        let timeout_ms = timeout_ms.unwrap_or(30_000);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Fetch the relay server's live configuration.
    ///
    /// GET /getaddr
    pub async fn fetch_server_config(&self) -> Result<RelayServerConfig> {
        let url = format!("{}/getaddr", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("getaddr request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Network(format!(
                "relay server returned status {status}: {}",
                rejection_reason(&body)
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::Network(format!("failed to read getaddr response: {e}")))?;

        let config = RelayServerConfig::from_json(&body)?;
        info!(
            relay_worker = %config.relay_worker_address,
            chain_id = config.chain_id,
            ready = config.ready,
            version = %config.version,
            "fetched relay server config"
        );
        Ok(config)
    }

    /// Submit a signed relay request, returning the relay worker's signed transaction.
    ///
    /// POST /relay
    pub async fn submit(&self, envelope: &HttpRelayEnvelope) -> Result<Bytes> {
        let url = format!("{}/relay", self.base_url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(envelope)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("relay request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::Network(format!("failed to read relay response: {e}")))?;

        if !status.is_success() {
            return Err(RelayError::RelayRejected {
                status: Some(status.as_u16()),
                reason: rejection_reason(&body),
            });
        }

        // A 2xx body that is not JSON or lacks signedTx is a refusal.
        let signed_tx = match serde_json::from_str::<RelayResponse>(&body) {
            Ok(RelayResponse { signed_tx: Some(signed_tx) }) => signed_tx,
            Err(e) if e.is_data() => {
                return Err(RelayError::Schema(format!("malformed relay response: {e}")))
            }
            Ok(RelayResponse { signed_tx: None }) | Err(_) => {
                return Err(RelayError::RelayRejected {
                    status: Some(status.as_u16()),
                    reason: rejection_reason(&body),
                })
            }
        };

        debug!(
            relay_request_id = %envelope.metadata.relay_request_id,
            len = signed_tx.len(),
            "relay accepted request"
        );
        Ok(signed_tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};
    use gasless_types::{ForwardRequest, RelayData, RelayRequest};
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    use crate::envelope::RelayMetadata;

    const API_KEY: &str = "test-api-key";

    fn getaddr_body() -> Value {
        json!({
            "relayWorkerAddress": "0xb9950b71ec94cbb274aeb1be98e697678077a17f",
            "relayManagerAddress": "0x1111111111111111111111111111111111111111",
            "relayHubAddress": "0x6666666666666666666666666666666666666666",
            "ownerAddress": "0x2222222222222222222222222222222222222222",
            "minMaxPriorityFeePerGas": "1000000000",
            "maxMaxFeePerGas": "5000000000",
            "minMaxFeePerGas": "1",
            "maxAcceptanceBudget": "285252",
            "chainId": "137",
            "networkId": "137",
            "ready": true,
            "version": "3.0.0-beta.3"
        })
    }

    fn envelope() -> HttpRelayEnvelope {
        HttpRelayEnvelope {
            relay_request: RelayRequest {
                request: ForwardRequest {
                    from: Address::repeat_byte(0x11),
                    to: Address::repeat_byte(0x22),
                    value: U256::ZERO,
                    gas: U256::from(65512u64),
                    nonce: U256::from(1u64),
                    data: Bytes::from_static(&[0x4e, 0x71, 0xd9, 0x2d]),
                    valid_until_time: U256::from(1_700_172_800u64),
                },
                relay_data: RelayData {
                    max_fee_per_gas: U256::from(5_000_000_000u64),
                    max_priority_fee_per_gas: U256::from(1_400_000_000u64),
                    transaction_calldata_gas_used: U256::from(24_580u64),
                    relay_worker: Address::repeat_byte(0x33),
                    paymaster: Address::repeat_byte(0x44),
                    forwarder: Address::repeat_byte(0x55),
                    paymaster_data: Bytes::new(),
                    client_id: U256::from(1u64),
                },
            },
            metadata: RelayMetadata {
                max_acceptance_budget: U256::from(285_252u64),
                relay_hub_address: Address::repeat_byte(0x66),
                signature: Bytes::from(vec![0x1b; 65]),
                approval_data: Bytes::new(),
                relay_max_nonce: 4,
                relay_last_known_nonce: 1,
                domain_separator_name: "GSN Relayed Transaction".into(),
                relay_request_id: B256::repeat_byte(0x07),
            },
        }
    }

    #[tokio::test]
    async fn test_fetch_server_config() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/getaddr")
                    .header("authorization", format!("Bearer {API_KEY}"));
                then.status(200).json_body(getaddr_body());
            })
            .await;

        let client = RelayHttpClient::new(&format!("{}/", server.base_url()), API_KEY, None);
        let config = client.fetch_server_config().await.unwrap();

        mock.assert_async().await;
        assert_eq!(config.chain_id, 137);
        assert_eq!(config.max_max_fee_per_gas, U256::from(5_000_000_000u64));
    }

    #[tokio::test]
    async fn test_fetch_server_config_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/getaddr");
                then.status(401).json_body(json!({ "error": "invalid api key" }));
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        let err = client.fetch_server_config().await.unwrap_err();
        assert!(matches!(err, RelayError::Network(ref msg) if msg.contains("invalid api key")));

        let server = MockServer::start_async().await;
        let mut body = getaddr_body();
        body.as_object_mut().unwrap().remove("chainId");
        server
            .mock_async(|when, then| {
                when.method(GET).path("/getaddr");
                then.status(200).json_body(body);
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        assert!(matches!(client.fetch_server_config().await, Err(RelayError::Schema(_))));

        // Nothing listens on port 9 of the loopback interface.
        let client = RelayHttpClient::new("http://127.0.0.1:9", API_KEY, Some(1_000));
        assert!(matches!(client.fetch_server_config().await, Err(RelayError::Network(_))));
    }

    #[tokio::test]
    async fn test_submit_posts_envelope() {
        let envelope = envelope();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/relay")
                    .header("authorization", format!("Bearer {API_KEY}"))
                    .json_body(serde_json::to_value(&envelope).unwrap());
                then.status(200).json_body(json!({ "signedTx": "0x02f8aa0102" }));
            })
            .await;

        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        let signed = client.submit(&envelope).await.unwrap();

        mock.assert_async().await;
        assert_eq!(signed, Bytes::from_static(&[0x02, 0xf8, 0xaa, 0x01, 0x02]));
    }

    #[tokio::test]
    async fn test_submit_rejections() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/relay");
                then.status(400).json_body(json!({ "error": "paymaster rejected in local view call" }));
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        match client.submit(&envelope()).await.unwrap_err() {
            RelayError::RelayRejected { status, reason } => {
                assert_eq!(status, Some(400));
                assert_eq!(reason, "paymaster rejected in local view call");
            }
            other => panic!("unexpected error: {other}"),
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/relay");
                then.status(200).json_body(json!({ "error": "relay worker busy" }));
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        let err = client.submit(&envelope()).await.unwrap_err();
        assert_eq!(err.reason(), Some("relay worker busy"));
    }

    #[tokio::test]
    async fn test_submit_non_json_success_is_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/relay");
                then.status(200).body("<html>busy</html>");
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        match client.submit(&envelope()).await.unwrap_err() {
            RelayError::RelayRejected { status, reason } => {
                assert_eq!(status, Some(200));
                assert_eq!(reason, "<html>busy</html>");
            }
            other => panic!("unexpected error: {other}"),
        }

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/relay");
                then.status(200);
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        assert!(matches!(
            client.submit(&envelope()).await,
            Err(RelayError::RelayRejected { status: Some(200), .. })
        ));

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/relay");
                then.status(200).json_body(json!({ "signedTx": "0xzz" }));
            })
            .await;
        let client = RelayHttpClient::new(&server.base_url(), API_KEY, None);
        assert!(matches!(client.submit(&envelope()).await, Err(RelayError::Schema(_))));
    }

    #[test]
    fn test_rejection_reason() {
        assert_eq!(rejection_reason(r#"{"message":"nope"}"#), "nope");
        assert_eq!(rejection_reason("  plain text \n"), "plain text");
        assert_eq!(rejection_reason(r#"{"other":1}"#), r#"{"other":1}"#);
    }
}
