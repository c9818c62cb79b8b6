//! Chat widget behaviour on top of `parley-core`.
//!
//! - [`ChatWidget`]: input gate and session orchestration
//! - [`HttpChatTransport`]: JSON + multipart transport over reqwest
//! - [`HtmlMessageList`]: presentation sink rendering escaped HTML

pub mod html_sink;
pub mod http_transport;
pub mod widget;

pub use html_sink::{Bubble, BubbleBody, HtmlMessageList};
pub use http_transport::HttpChatTransport;
pub use widget::ChatWidget;
