//! Runtime for driving a chat session
//!
//! [`ChatSession`] executes controller effects synchronously against any
//! [`Scheduler`]. [`ChatRuntime`] wraps a session in a tokio event loop fed
//! by [`Intent`]s and publishes [`ViewEvent`]s for the renderer.

mod executor;
mod scheduler;
mod session;

pub use executor::{ChatHandle, ChatRuntime, RuntimeError};
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use session::{ChatSession, SessionUpdate};

use crate::state_machine::ConversationState;

/// Visitor interactions coming from the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SetNameDraft(String),
    SetContactDraft(String),
    SubmitName(String),
    SubmitContact(String),
    SelectTopic(String),
    SendMessage(String),
    /// Text from whichever input the current lead stage shows
    SubmitInput(String),
    Reset,
}

/// Events sent to the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    StateChanged { state: ConversationState },
    ScrollToLatest,
}
