//! Domain types for the Parley chat widget.
//!
//! # Module Structure
//!
//! - `message`: Conversation turns (`Role`, `Turn`, `WireTurn`)
//! - `session`: Session identity and bounded history (`ChatSession`)
//! - `attachment`: Staged image payloads (`ImageAttachment`)
//! - `gate`: Widget state enums and outcomes (`GateState`, `SubmitOutcome`)
//! - `sink`: UI contract (`PresentationSink`)
//! - `transport`: Service contract (`ChatTransport`) and wire bodies
//! - `config`: Endpoints and user-visible strings (`WidgetConfig`)

pub mod attachment;
pub mod config;
pub mod error;
pub mod gate;
pub mod html;
pub mod message;
pub mod session;
pub mod sink;
pub mod transport;

pub use attachment::ImageAttachment;
pub use config::{WidgetConfig, WidgetMessages};
pub use error::{ParleyError, Result, TransportError};
pub use gate::{AttachOutcome, GateState, SubmitOutcome, WindowState};
pub use message::{Role, Turn, WireTurn};
pub use session::ChatSession;
pub use sink::{NotificationLevel, PresentationSink};
pub use transport::{ChatTransport, ImageReply, ImageTurnRequest, TextReply, TextTurnRequest};
