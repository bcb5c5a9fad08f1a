pub mod message;

pub use message::{Attachment, Format, MessageDetail, MessageId, MessageSummary};
