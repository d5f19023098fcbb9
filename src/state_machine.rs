//! Conversation store
//!
//! Implements the Elm Architecture pattern with a pure reducer.

mod action;
mod reduce;
mod state;

#[cfg(test)]
mod proptests;

pub use action::Action;
pub use reduce::reduce;
pub use state::{ConversationState, LeadStage, Message, MessageId, MessageStamp, Sender};
