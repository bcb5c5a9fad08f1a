//! Library core for rustycatcher.

// --- Modules ---
pub mod api;
pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod models;
pub mod preferences;
pub mod render;
pub mod transport;
pub mod utils;

pub mod prelude {
    // Config
    pub use crate::config::Settings;

    // Server interface
    pub use crate::api::client::{HttpMailboxClient, MailboxApi};
    pub use crate::api::endpoints::Endpoints;
    pub use crate::error::CatcherError;
    pub use crate::models::{Format, MessageDetail, MessageId, MessageSummary};

    // Client state
    pub use crate::mailbox::{Direction, Effect, Mailbox, Selection, TabStep};
    pub use crate::transport::{Inbound, TransportEvent, TransportMode, TransportState};

    // Common Libs
    pub use log::{debug, error, info, trace, warn};
    pub use std::sync::Arc;
}
