//! HttpChatTransport - REST implementation of the assistant service contract.
//!
//! Text turns are posted as JSON; image turns as `multipart/form-data` with
//! `image`, `prompt`, `sessionId` and `history` fields.

use async_trait::async_trait;
use parley_core::error::{ParleyError, TransportError};
use parley_core::transport::{
    ChatTransport, ImageReply, ImageTurnRequest, TextReply, TextTurnRequest,
};
use parley_core::WidgetConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

/// Transport that talks to the assistant backend over HTTP.
#[derive(Clone)]
pub struct HttpChatTransport {
    client: Client,
    chat_url: Url,
    vision_url: Url,
}

impl HttpChatTransport {
    /// Creates a transport for the given endpoints.
    pub fn new(chat_url: &str, vision_url: &str) -> Result<Self, ParleyError> {
        Ok(Self {
            client: Client::new(),
            chat_url: parse_endpoint(chat_url)?,
            vision_url: parse_endpoint(vision_url)?,
        })
    }

    /// Creates a transport for the endpoints named in `config`.
    pub fn from_config(config: &WidgetConfig) -> Result<Self, ParleyError> {
        Self::new(&config.chat_url(), &config.vision_url())
    }

    /// Replaces the underlying client (proxies, custom TLS, default timeout).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    pub fn vision_url(&self) -> &Url {
        &self.vision_url
    }

    fn build_image_form(request: &ImageTurnRequest) -> Result<Form, TransportError> {
        let attachment = &request.attachment;
        let image = Part::bytes(attachment.bytes().to_vec())
            .file_name(attachment.upload_file_name().to_string())
            .mime_str(attachment.media_type())
            .map_err(|err| {
                TransportError::request(format!(
                    "Unusable media type '{}': {err}",
                    attachment.media_type()
                ))
            })?;

        Ok(Form::new()
            .part("image", image)
            .text("prompt", request.prompt.clone())
            .text("sessionId", request.session_id.clone())
            .text("history", request.history_json()?))
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send_text(&self, request: TextTurnRequest) -> Result<TextReply, TransportError> {
        tracing::debug!(
            target: "parley::transport",
            url = %self.chat_url,
            history = request.history.len(),
            "Sending text turn"
        );

        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| TransportError::request(format!("Chat request failed: {err}")))?;

        decode_success(response).await
    }

    async fn send_image(&self, request: ImageTurnRequest) -> Result<ImageReply, TransportError> {
        tracing::debug!(
            target: "parley::transport",
            url = %self.vision_url,
            bytes = request.attachment.len(),
            history = request.history.len(),
            "Sending image turn"
        );

        let form = Self::build_image_form(&request)?;
        let response = self
            .client
            .post(self.vision_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransportError::request(format!("Image request failed: {err}")))?;

        decode_success(response).await
    }
}

fn parse_endpoint(url: &str) -> Result<Url, ParleyError> {
    let parsed = Url::parse(url)
        .map_err(|_| ParleyError::from(TransportError::InvalidEndpoint(url.to_string())))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(TransportError::InvalidEndpoint(url.to_string()).into()),
    }
}

/// Maps any non-2xx status to [`TransportError::Status`] and parses the body.
async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| TransportError::request(format!("Failed to read response body: {err}")))?;

    serde_json::from_slice(&body).map_err(|err| TransportError::decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_resolves_endpoints() {
        let config = WidgetConfig {
            base_url: "https://dash.example.com/".into(),
            ..WidgetConfig::default()
        };
        let transport = HttpChatTransport::from_config(&config).unwrap();

        assert_eq!(transport.chat_url().as_str(), "https://dash.example.com/api/chat");
        assert_eq!(transport.vision_url().as_str(), "https://dash.example.com/api/vision");
    }

    #[test]
    fn test_rejects_unusable_endpoints() {
        assert!(HttpChatTransport::new("not a url", "http://h/v").is_err());

        let err = HttpChatTransport::new("ftp://h/chat", "http://h/v").err().unwrap();
        assert!(matches!(
            err,
            ParleyError::Transport(TransportError::InvalidEndpoint(ref url)) if url == "ftp://h/chat"
        ));
    }
}
