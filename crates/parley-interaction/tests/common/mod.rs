//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_core::error::TransportError;
use parley_core::sink::{NotificationLevel, PresentationSink};
use parley_core::transport::{
    ChatTransport, ImageReply, ImageTurnRequest, TextReply, TextTurnRequest,
};
use parley_core::Role;
use tokio::sync::Notify;

/// Everything the widget asked the UI to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Text(Role, String),
    Image(Role, String),
    Typing(bool),
    SendEnabled(bool),
    Preview(bool),
    ClearInput,
    Window(bool),
    Focus,
    Notify(NotificationLevel, String),
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn rendered(&self) -> Vec<SinkEvent> {
        self.events()
            .into_iter()
            .filter(|e| matches!(e, SinkEvent::Text(..) | SinkEvent::Image(..)))
            .collect()
    }

    pub fn reset(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PresentationSink for RecordingSink {
    fn render_text_turn(&self, role: Role, text: &str, _timestamp: DateTime<Utc>) {
        self.push(SinkEvent::Text(role, text.to_string()));
    }

    fn render_image_turn(&self, role: Role, image_ref: &str, _timestamp: DateTime<Utc>) {
        self.push(SinkEvent::Image(role, image_ref.to_string()));
    }

    fn set_typing_indicator(&self, visible: bool) {
        self.push(SinkEvent::Typing(visible));
    }

    fn set_send_affordance_enabled(&self, enabled: bool) {
        self.push(SinkEvent::SendEnabled(enabled));
    }

    fn set_attachment_preview_visible(&self, visible: bool) {
        self.push(SinkEvent::Preview(visible));
    }

    fn clear_input(&self) {
        self.push(SinkEvent::ClearInput);
    }

    fn set_window_open(&self, open: bool) {
        self.push(SinkEvent::Window(open));
    }

    fn focus_input(&self) {
        self.push(SinkEvent::Focus);
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.push(SinkEvent::Notify(level, message.to_string()));
    }
}

/// Transport answering from queued replies and recording every request.
#[derive(Default)]
pub struct MockTransport {
    text_replies: Mutex<VecDeque<Result<TextReply, TransportError>>>,
    image_replies: Mutex<VecDeque<Result<ImageReply, TransportError>>>,
    text_requests: Mutex<Vec<TextTurnRequest>>,
    image_requests: Mutex<Vec<ImageTurnRequest>>,
}

impl MockTransport {
    pub fn reply_text(&self, output: &str) {
        self.text_replies.lock().unwrap().push_back(Ok(TextReply {
            output: output.to_string(),
        }));
    }

    pub fn fail_text(&self, err: TransportError) {
        self.text_replies.lock().unwrap().push_back(Err(err));
    }

    pub fn reply_image(&self, output: Option<&str>, image_url: Option<&str>) {
        self.image_replies.lock().unwrap().push_back(Ok(ImageReply {
            output: output.map(str::to_string),
            image_url: image_url.map(str::to_string),
        }));
    }

    pub fn fail_image(&self, err: TransportError) {
        self.image_replies.lock().unwrap().push_back(Err(err));
    }

    pub fn text_requests(&self) -> Vec<TextTurnRequest> {
        self.text_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<ImageTurnRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.text_requests.lock().unwrap().len() + self.image_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_text(&self, request: TextTurnRequest) -> Result<TextReply, TransportError> {
        self.text_requests.lock().unwrap().push(request);
        self.text_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::request("no reply queued")))
    }

    async fn send_image(&self, request: ImageTurnRequest) -> Result<ImageReply, TransportError> {
        self.image_requests.lock().unwrap().push(request);
        self.image_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::request("no reply queued")))
    }
}

/// Transport that holds each request until the test releases it.
#[derive(Default)]
pub struct GatedTransport {
    pub entered: Notify,
    pub release: Notify,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn hold(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl ChatTransport for GatedTransport {
    async fn send_text(&self, _request: TextTurnRequest) -> Result<TextReply, TransportError> {
        self.hold().await;
        Ok(TextReply {
            output: "pronto".to_string(),
        })
    }

    async fn send_image(&self, _request: ImageTurnRequest) -> Result<ImageReply, TransportError> {
        self.hold().await;
        Ok(ImageReply::default())
    }
}
