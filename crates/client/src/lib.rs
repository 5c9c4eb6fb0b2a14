//! # Yuki Client
//!
//! The HTTP side of the chat client: builds streaming completion
//! requests against an OpenAI-compatible `/chat/completions` endpoint
//! and hands the response body to the SSE decoder.
//!
//! Works with llama.cpp server, Ollama, vLLM, and anything else that
//! speaks the OpenAI streaming protocol.

pub mod sse;

use serde::Serialize;
use tracing::debug;
use yuki_core::error::ClientError;
use yuki_core::message::Message;
use yuki_core::sink::DeltaSink;

pub use sse::{StreamDecoder, decode_stream};

/// Generation parameters carried on every request. Both bounds come
/// from validated configuration, with documented defaults (256 tokens,
/// temperature 0.7).
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 256,
        }
    }
}

/// A chat client for one OpenAI-compatible server.
pub struct ChatClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a new client for the given base URL (for example
    /// `http://127.0.0.1:8080/v1`) and model name.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }

    /// Send one streaming chat turn and decode the response.
    ///
    /// Each content delta is forwarded to `sink` as it arrives; the
    /// returned string is the complete assistant text, the
    /// concatenation of every delta the sink saw.
    ///
    /// A non-success status short-circuits with
    /// [`ClientError::RequestRejected`] before any line of the body is
    /// decoded. Connection drops and read errors mid-stream surface as
    /// [`ClientError::Transport`].
    pub async fn stream_chat<S: DeltaSink>(
        &self,
        messages: &[Message],
        options: GenerationOptions,
        sink: &mut S,
    ) -> Result<String, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(model = %self.model, count = messages.len(), "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestRejected {
                status_code: status.as_u16(),
                message: error_body,
            });
        }

        decode_stream(response.bytes_stream(), sink).await
    }
}

/// The request payload for a streaming completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use yuki_core::sink::CollectingSink;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = ChatClient::new("http://localhost:8080/v1/", "local");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn request_payload_shape() {
        let messages = vec![Message::user("hi")];
        let req = ChatRequest {
            model: "local",
            messages: &messages,
            stream: true,
            temperature: 0.7,
            max_tokens: 256,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "local");
        assert_eq!(json["stream"], true);
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    /// Serve exactly one connection with a canned HTTP/1.1 response,
    /// then close it. Returns the bound address.
    async fn one_shot_server(response: &'static str) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request headers and body before answering.
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn non_success_status_is_request_rejected() {
        let addr = one_shot_server(
            "HTTP/1.1 500 Internal Server Error\r\n\
             Content-Length: 4\r\n\
             Connection: close\r\n\r\nboom",
        )
        .await;

        let client = ChatClient::new(format!("http://{addr}/v1"), "local");
        let mut sink = CollectingSink::new();
        let err = client
            .stream_chat(
                &[Message::user("hi")],
                GenerationOptions::default(),
                &mut sink,
            )
            .await
            .unwrap_err();

        match err {
            ClientError::RequestRejected {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected RequestRejected, got {other:?}"),
        }
        // Rejection must happen before any delta is emitted.
        assert!(sink.deltas.is_empty());
    }

    #[tokio::test]
    async fn streamed_body_decodes_end_to_end() {
        let addr = one_shot_server(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/event-stream\r\n\
             Connection: close\r\n\r\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\
             data: {\"choices\":[{\"delta\":{\"content\":\" there\"}}]}\n\
             data: [DONE]\n",
        )
        .await;

        let client = ChatClient::new(format!("http://{addr}/v1"), "local");
        let mut sink = CollectingSink::new();
        let text = client
            .stream_chat(
                &[Message::user("hi")],
                GenerationOptions::default(),
                &mut sink,
            )
            .await
            .unwrap();

        assert_eq!(sink.deltas, ["Hi", " there"]);
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_failure() {
        // Bind then drop a listener so the port is closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ChatClient::new(format!("http://{addr}/v1"), "local");
        let mut sink = CollectingSink::new();
        let err = client
            .stream_chat(
                &[Message::user("hi")],
                GenerationOptions::default(),
                &mut sink,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
