//! Service layer: agent lifecycle and conversation views.
//!
//! Services are generic over the repository traits defined in
//! [`crate::repository`]; the chat turn itself lives in [`crate::chat`].

pub mod agent;
pub mod conversation;
