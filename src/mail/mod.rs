pub mod headers;
pub mod images;
pub mod mime;
pub mod outbound;

pub use headers::{MessageHeaders, Sender};
pub use images::InlinePart;
pub use mime::{ComposedMessage, EmailAttachment, MessageShape};
pub use outbound::OutboundEmailRequest;
