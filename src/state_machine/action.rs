//! Actions accepted by the conversation reducer

use super::state::MessageStamp;
use serde::{Deserialize, Serialize};

/// Actions that drive state transitions
///
/// Serialized with an internal `type` tag so a script host can post actions
/// as JSON. Tags that don't name a known action decode to [`Action::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // Lead capture form
    SetNameDraft {
        text: String,
    },
    CommitName {
        name: String,
    },
    SetContactDraft {
        text: String,
    },
    CommitContact {
        contact: String,
    },

    // Transcript
    AppendUserMessage {
        text: String,
        stamp: MessageStamp,
    },
    AppendBotMessage {
        text: String,
        stamp: MessageStamp,
    },
    SetTyping {
        typing: bool,
    },

    /// Discard the session and start over from the seed greeting
    Reset {
        stamp: MessageStamp,
    },

    /// Anything the decoder did not recognise
    #[serde(other)]
    Unknown,
}

impl Action {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetNameDraft { .. } => "set_name_draft",
            Action::CommitName { .. } => "commit_name",
            Action::SetContactDraft { .. } => "set_contact_draft",
            Action::CommitContact { .. } => "commit_contact",
            Action::AppendUserMessage { .. } => "append_user_message",
            Action::AppendBotMessage { .. } => "append_bot_message",
            Action::SetTyping { .. } => "set_typing",
            Action::Reset { .. } => "reset",
            Action::Unknown => "unknown",
        }
    }
}
