//! The chat widget: input gate, session bookkeeping and rendering.

use std::sync::Arc;

use chrono::Utc;
use parley_core::error::{ParleyError, TransportError};
use parley_core::gate::{AttachOutcome, GateState, SubmitOutcome, WindowState};
use parley_core::sink::{NotificationLevel, PresentationSink};
use parley_core::transport::{
    ChatTransport, ImageReply, ImageTurnRequest, TextReply, TextTurnRequest,
};
use parley_core::{ChatSession, ImageAttachment, Role, Turn, WidgetConfig, WidgetMessages};
use tokio::sync::Mutex;

use crate::http_transport::HttpChatTransport;

/// Mutable widget state, guarded as a whole so that the gate check and the
/// transition to `Sending` happen atomically.
struct WidgetState {
    session: ChatSession,
    gate: GateState,
    window: WindowState,
    pending: Option<ImageAttachment>,
}

/// A request prepared under the lock and issued after it is released.
enum Dispatch {
    Text(TextTurnRequest),
    Image(ImageTurnRequest),
}

/// The part of the widget a detached exchange needs to finish a turn.
struct WidgetCore {
    sink: Arc<dyn PresentationSink>,
    messages: WidgetMessages,
    state: Mutex<WidgetState>,
}

/// An embeddable chat session client.
///
/// `ChatWidget` owns:
/// - The conversation (`ChatSession`: id + bounded history)
/// - The input gate allowing one in-flight request at a time
/// - The pending image attachment, if any
///
/// Transport and presentation are injected by the hosting page. Every
/// failure is recovered here and rendered as a synthetic assistant turn;
/// nothing propagates to the host.
pub struct ChatWidget {
    transport: Arc<dyn ChatTransport>,
    default_image_prompt: String,
    core: Arc<WidgetCore>,
}

impl ChatWidget {
    /// Creates a widget with a new session.
    ///
    /// # Arguments
    ///
    /// * `config` - History bound, default image prompt and synthetic texts
    /// * `transport` - Issues turns against the assistant service
    /// * `sink` - The host's presentation surface
    pub fn new(
        config: &WidgetConfig,
        transport: Arc<dyn ChatTransport>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        let session = ChatSession::new(config.max_history);
        tracing::info!(target: "parley::widget", session_id = %session.id(), "Chat widget created");

        Self {
            transport,
            default_image_prompt: config.default_image_prompt.clone(),
            core: Arc::new(WidgetCore {
                sink,
                messages: config.messages.clone(),
                state: Mutex::new(WidgetState {
                    session,
                    gate: GateState::Idle,
                    window: WindowState::Closed,
                    pending: None,
                }),
            }),
        }
    }

    /// Creates a widget talking HTTP to the endpoints named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not a valid http(s) URL.
    pub fn with_http(
        config: &WidgetConfig,
        sink: Arc<dyn PresentationSink>,
    ) -> Result<Self, ParleyError> {
        let transport = HttpChatTransport::from_config(config)?;
        Ok(Self::new(config, Arc::new(transport), sink))
    }

    /// Submits the user's text together with the pending attachment, if any.
    ///
    /// The user turn is echoed and the input cleared before the request is
    /// issued. With an attachment, an image-analysis turn is sent (the text,
    /// or the default prompt, becomes its prompt); otherwise a text turn.
    ///
    /// Once dispatched, the exchange runs on its own task: dropping the
    /// returned future does not abandon the request, and the gate reopens
    /// when the reply or failure has been recorded.
    ///
    /// Returns [`SubmitOutcome::Busy`] without side effects while another
    /// request is in flight, and [`SubmitOutcome::Empty`] when there is
    /// nothing to send.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let message = text.trim();
        let core = &self.core;

        let dispatch = {
            let mut state = core.state.lock().await;

            if state.gate.is_sending() {
                tracing::debug!(target: "parley::widget", "Submission dropped: request in flight");
                return SubmitOutcome::Busy;
            }
            if message.is_empty() && state.pending.is_none() {
                return SubmitOutcome::Empty;
            }

            state.gate = GateState::Sending;

            if !message.is_empty() {
                state.session.append_turn(Role::User, message);
                if let Some(turn) = state.session.last_turn() {
                    core.render_turn(turn);
                }
            }
            core.sink.clear_input();
            core.sink.set_typing_indicator(true);
            core.sink.set_send_affordance_enabled(false);

            let session_id = state.session.id().to_string();
            let history = state.session.wire_history();

            match state.pending.take() {
                Some(attachment) => {
                    core.sink.set_attachment_preview_visible(false);
                    let prompt = if message.is_empty() {
                        self.default_image_prompt.clone()
                    } else {
                        message.to_string()
                    };
                    Dispatch::Image(ImageTurnRequest {
                        session_id,
                        attachment,
                        prompt,
                        history,
                    })
                }
                None => Dispatch::Text(TextTurnRequest {
                    message: message.to_string(),
                    session_id,
                    history,
                    timestamp: Utc::now(),
                }),
            }
        };

        let is_image = matches!(dispatch, Dispatch::Image(_));
        let exchange = tokio::spawn(Self::exchange(
            Arc::clone(&self.transport),
            Arc::clone(core),
            dispatch,
        ));

        match exchange.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(target: "parley::widget", "Turn task ended abnormally: {}", err);
                let failure = TransportError::request(err.to_string());
                if is_image {
                    core.finish_image(Err(failure)).await
                } else {
                    core.finish_text(Err(failure)).await
                }
            }
        }
    }

    async fn exchange(
        transport: Arc<dyn ChatTransport>,
        core: Arc<WidgetCore>,
        dispatch: Dispatch,
    ) -> SubmitOutcome {
        match dispatch {
            Dispatch::Text(request) => {
                tracing::info!(target: "parley::widget", "Dispatching text turn");
                let result = transport.send_text(request).await;
                core.finish_text(result).await
            }
            Dispatch::Image(request) => {
                tracing::info!(
                    target: "parley::widget",
                    media_type = %request.attachment.media_type(),
                    "Dispatching image turn"
                );
                let result = transport.send_image(request).await;
                core.finish_image(result).await
            }
        }
    }

    /// Stages an image to be sent with the next submission.
    ///
    /// Non-image files are rejected with an informational bubble and never
    /// become pending. An accepted image is echoed as the user's image turn
    /// and replaces any image staged before it.
    pub async fn attach(&self, attachment: ImageAttachment) -> AttachOutcome {
        if let Err(err) = attachment.validate() {
            tracing::warn!(target: "parley::widget", "Attachment rejected: {}", err);
            self.core.sink.render_text_turn(
                Role::Assistant,
                &self.core.messages.invalid_attachment,
                Utc::now(),
            );
            return AttachOutcome::Rejected;
        }

        let preview = attachment.to_data_url();
        let mut state = self.core.state.lock().await;
        let replaced = state.pending.replace(attachment).is_some();

        self.core.sink.set_attachment_preview_visible(true);
        self.core.sink.render_image_turn(Role::User, &preview, Utc::now());

        if replaced {
            AttachOutcome::Replaced
        } else {
            AttachOutcome::Staged
        }
    }

    /// Discards the pending attachment and hides its preview.
    ///
    /// Returns `true` if an attachment was pending. History is untouched.
    pub async fn detach_pending(&self) -> bool {
        let mut state = self.core.state.lock().await;
        let removed = state.pending.take().is_some();
        self.core.sink.set_attachment_preview_visible(false);
        removed
    }

    /// Forgets the conversation context. The session id is kept.
    pub async fn clear_memory(&self) {
        let mut state = self.core.state.lock().await;
        state.session.clear();
        tracing::info!(target: "parley::widget", session_id = %state.session.id(), "Chat memory cleared");
        self.core
            .sink
            .notify(NotificationLevel::Info, &self.core.messages.memory_cleared);
    }

    /// Opens the chat window and focuses the input. No-op when already open.
    pub async fn open(&self) {
        let mut state = self.core.state.lock().await;
        if !state.window.is_open() {
            self.core.set_window(&mut state, WindowState::Open);
        }
    }

    /// Closes the chat window. No-op when already closed.
    pub async fn close(&self) {
        let mut state = self.core.state.lock().await;
        if state.window.is_open() {
            self.core.set_window(&mut state, WindowState::Closed);
        }
    }

    /// Flips the chat window between open and closed.
    pub async fn toggle(&self) -> WindowState {
        let mut state = self.core.state.lock().await;
        let next = state.window.toggled();
        self.core.set_window(&mut state, next);
        next
    }

    pub async fn session_id(&self) -> String {
        self.core.state.lock().await.session.id().to_string()
    }

    pub async fn gate_state(&self) -> GateState {
        self.core.state.lock().await.gate
    }

    pub async fn window_state(&self) -> WindowState {
        self.core.state.lock().await.window
    }

    pub async fn has_pending_attachment(&self) -> bool {
        self.core.state.lock().await.pending.is_some()
    }

    /// Snapshot of the retained history, oldest first.
    pub async fn history(&self) -> Vec<Turn> {
        let state = self.core.state.lock().await;
        state.session.recent_history(state.session.max_history())
    }
}

impl WidgetCore {
    async fn finish_text(&self, result: Result<TextReply, TransportError>) -> SubmitOutcome {
        let mut state = self.state.lock().await;
        self.reopen_gate(&mut state);

        match result {
            Ok(reply) => {
                state.session.append_turn(Role::Assistant, reply.output);
                if let Some(turn) = state.session.last_turn() {
                    self.render_turn(turn);
                }
                SubmitOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(target: "parley::widget", "Text turn failed: {}", err);
                state
                    .session
                    .append_turn(Role::Assistant, self.messages.text_error_history.clone());
                self.sink
                    .render_text_turn(Role::Assistant, &self.messages.text_error, Utc::now());
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn finish_image(&self, result: Result<ImageReply, TransportError>) -> SubmitOutcome {
        let mut state = self.state.lock().await;
        self.reopen_gate(&mut state);

        match result {
            Ok(reply) => {
                if let Some(url) = reply.image_url() {
                    self.sink.render_image_turn(Role::Assistant, url, Utc::now());
                }
                let content = reply
                    .output()
                    .unwrap_or(self.messages.image_received.as_str())
                    .to_string();
                state.session.append_turn(Role::Assistant, content);
                if let Some(turn) = state.session.last_turn() {
                    self.render_turn(turn);
                }
                SubmitOutcome::Replied
            }
            Err(err) => {
                tracing::warn!(target: "parley::widget", "Image turn failed: {}", err);
                state
                    .session
                    .append_turn(Role::Assistant, self.messages.image_error_history.clone());
                self.sink
                    .render_text_turn(Role::Assistant, &self.messages.image_error, Utc::now());
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn reopen_gate(&self, state: &mut WidgetState) {
        state.gate = GateState::Idle;
        self.sink.set_typing_indicator(false);
        self.sink.set_send_affordance_enabled(true);
    }

    fn render_turn(&self, turn: &Turn) {
        self.sink
            .render_text_turn(turn.role, &turn.content, turn.timestamp);
    }

    fn set_window(&self, state: &mut WidgetState, window: WindowState) {
        state.window = window;
        self.sink.set_window_open(window.is_open());
        if window.is_open() {
            self.sink.focus_input();
        }
    }
}
