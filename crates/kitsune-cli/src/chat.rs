//! Client for the chat collaborator.
//!
//! The collaborator is a small HTTP service with two routes:
//!
//! ```text
//! GET  {endpoint}/health  -> 200
//! POST {endpoint}/chat    {message, max_tokens, temperature} -> {response}
//! ```
//!
//! Every chat call runs the health check first. Nothing here returns an
//! error to the caller: failures become the text shown in place of a reply
//! (see [`CliError::user_message`]).

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::CliConfig;
use crate::error::CliError;

/// Reply used when the collaborator answers without a `response` field.
pub const NO_RESPONSE: &str = "No response from LLM";

/// A source of chat replies.
///
/// The console is generic over this so it can run against the HTTP client
/// or a scripted responder.
pub trait ChatBackend {
    /// Base URL currently in use.
    fn endpoint(&self) -> &str;

    /// Point the backend at a new base URL.
    fn set_endpoint(&mut self, endpoint: &str);

    /// Whether the backend is reachable and healthy.
    fn health(&self) -> impl Future<Output = bool>;

    /// Reply to `message`. Failures are described in the returned text.
    fn chat(&self, message: &str) -> impl Future<Output = String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    max_tokens: u32,
    temperature: f64,
}

/// HTTP client for the chat collaborator.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: String,
    chat_timeout: Duration,
    health_timeout: Duration,
    max_tokens: u32,
    temperature: f64,
}

impl ChatClient {
    /// Client for `endpoint` using the deadlines and sampling parameters in
    /// `config`.
    pub fn new(endpoint: &str, config: &CliConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: normalize(endpoint),
            chat_timeout: config.chat_timeout,
            health_timeout: config.health_timeout,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    async fn check_health(&self) -> Result<(), CliError> {
        let url = format!("{}/health", self.endpoint);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "health check");
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(CliError::Status(status.as_u16()))
        }
    }

    async fn request(&self, message: &str) -> Result<String, CliError> {
        if !ChatBackend::health(self).await {
            return Err(CliError::Unhealthy {
                endpoint: self.endpoint.clone(),
            });
        }

        let url = format!("{}/chat", self.endpoint);
        let body = ChatRequest {
            message,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.chat_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CliError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response.json().await?;
        Ok(extract_response(&json))
    }
}

impl ChatBackend for ChatClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = normalize(endpoint);
        debug!(endpoint = %self.endpoint, "chat endpoint updated");
    }

    async fn health(&self) -> bool {
        match self.check_health().await {
            Ok(()) => true,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "chat server unhealthy");
                false
            }
        }
    }

    async fn chat(&self, message: &str) -> String {
        match self.request(message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "chat request failed");
                e.user_message()
            }
        }
    }
}

fn normalize(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_owned()
}

/// Extract the reply text from a `/chat` response body.
fn extract_response(json: &serde_json::Value) -> String {
    json.get("response")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| NO_RESPONSE.to_owned(), ToOwned::to_owned)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    // -----------------------------------------------------------------------
    // Response extraction
    // -----------------------------------------------------------------------

    #[test]
    fn extract_response_valid() {
        let json = serde_json::json!({"response": "Hello from the den"});
        assert_eq!(extract_response(&json), "Hello from the den");
    }

    #[test]
    fn extract_response_missing_or_wrong_type() {
        assert_eq!(extract_response(&serde_json::json!({})), NO_RESPONSE);
        assert_eq!(
            extract_response(&serde_json::json!({"response": 42})),
            NO_RESPONSE
        );
    }

    #[test]
    fn endpoint_is_normalized() {
        let mut client = ChatClient::new(" http://localhost:8000/ ", &CliConfig::default());
        assert_eq!(client.endpoint(), "http://localhost:8000");
        client.set_endpoint("http://gpu:9000//");
        assert_eq!(client.endpoint(), "http://gpu:9000");
    }

    // -----------------------------------------------------------------------
    // Local collaborator
    // -----------------------------------------------------------------------

    #[derive(Clone)]
    enum ChatReply {
        Json(u16, String),
        Stall,
    }

    type Requests = Arc<Mutex<Vec<String>>>;

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        if key.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    async fn spawn_server(health: u16, chat: ChatReply) -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::default();
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let chat = chat.clone();
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    let is_health = request.starts_with("GET /health");
                    seen.lock().unwrap().push(request);
                    let (status, body) = if is_health {
                        (health, String::new())
                    } else {
                        match chat {
                            ChatReply::Json(status, body) => (status, body),
                            ChatReply::Stall => {
                                tokio::time::sleep(Duration::from_secs(60)).await;
                                return;
                            }
                        }
                    };
                    let response = format!(
                        "HTTP/1.1 {status} STATUS\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{addr}"), requests)
    }

    fn fast_config() -> CliConfig {
        CliConfig {
            chat_timeout: Duration::from_millis(300),
            health_timeout: Duration::from_secs(2),
            ..CliConfig::default()
        }
    }

    #[tokio::test]
    async fn healthy_server_replies() {
        let (endpoint, requests) =
            spawn_server(200, ChatReply::Json(200, r#"{"response":"Konkon!"}"#.to_owned()))
                .await;
        let client = ChatClient::new(&endpoint, &fast_config());

        assert_eq!(client.chat("hello fox").await, "Konkon!");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET /health"));
        let chat = &requests[1];
        assert!(chat.starts_with("POST /chat"));
        assert!(chat.contains(r#""message":"hello fox""#));
        assert!(chat.contains(r#""max_tokens":500"#));
        assert!(chat.contains(r#""temperature":0.7"#));
    }

    #[tokio::test]
    async fn missing_response_field_uses_placeholder() {
        let (endpoint, _) =
            spawn_server(200, ChatReply::Json(200, r#"{"text":"hm"}"#.to_owned())).await;
        let client = ChatClient::new(&endpoint, &fast_config());
        assert_eq!(client.chat("hi").await, NO_RESPONSE);
    }

    #[tokio::test]
    async fn unhealthy_server_is_reported_without_chatting() {
        let (endpoint, requests) =
            spawn_server(503, ChatReply::Json(200, "{}".to_owned())).await;
        let client = ChatClient::new(&endpoint, &fast_config());

        assert!(!client.health().await);
        let reply = client.chat("hi").await;
        assert_eq!(
            reply,
            format!("❌ LLM connection failed. Check that the server is running on {endpoint}")
        );
        assert!(
            requests
                .lock()
                .unwrap()
                .iter()
                .all(|r| r.starts_with("GET /health"))
        );
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (endpoint, _) = spawn_server(200, ChatReply::Json(500, "{}".to_owned())).await;
        let client = ChatClient::new(&endpoint, &fast_config());
        assert_eq!(client.chat("hi").await, "❌ LLM error: 500");
    }

    #[tokio::test]
    async fn slow_reply_times_out() {
        let (endpoint, _) = spawn_server(200, ChatReply::Stall).await;
        let client = ChatClient::new(&endpoint, &fast_config());
        assert_eq!(client.chat("hi").await, "⏰ LLM request timed out");
    }

    #[tokio::test]
    async fn closed_port_fails_health_check() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ChatClient::new(&format!("http://{addr}"), &fast_config());
        assert!(!client.health().await);
        assert!(client.chat("hi").await.starts_with("❌ LLM connection failed."));
    }
}
