//! HTTP client the WebSocket bridge uses to call back into this process.
//!
//! The bridge does not call the relay service directly: it re-POSTs each
//! `conversationRequest` to `{server_url}/conversation` so WebSocket turns
//! go through exactly the same HTTP surface as everything else.

use parentline_types::protocol::{VendorConversationRequest, VendorReply};

/// Errors from the callback round trip. Any of them makes the bridge send
/// an apology envelope.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("callback request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("callback returned HTTP {0}")]
    Status(u16),
}

/// Client for `POST {server_url}/conversation`.
#[derive(Clone)]
pub struct ConversationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ConversationClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: conversation_endpoint(server_url),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward one vendor request and decode the `{answer, answerAvailable}` reply.
    pub async fn converse(
        &self,
        request: &VendorConversationRequest,
    ) -> Result<VendorReply, BridgeError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::Status(status.as_u16()));
        }

        Ok(response.json::<VendorReply>().await?)
    }
}

fn conversation_endpoint(server_url: &str) -> String {
    format!("{}/conversation", server_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parentline_types::protocol::{OptionalArgs, TextField};

    #[test]
    fn test_endpoint_joins_path() {
        assert_eq!(
            ConversationClient::new("http://localhost:5050").endpoint(),
            "http://localhost:5050/conversation"
        );
        assert_eq!(
            ConversationClient::new("http://localhost:5050/").endpoint(),
            "http://localhost:5050/conversation"
        );
    }

    #[tokio::test]
    async fn test_converse_unreachable_server_is_http_error() {
        // Port 9 (discard) is not served on test machines.
        let client = ConversationClient::new("http://127.0.0.1:9");
        let request = VendorConversationRequest {
            input: TextField::new("hello"),
            persona_id: Some("1".into()),
            optional_args: OptionalArgs::default(),
            variables: Default::default(),
        };

        let err = client.converse(&request).await.unwrap_err();
        assert!(matches!(err, BridgeError::Http(_)));
    }
}
