//! Pure state reduction
//!
//! Given the same state and action, `reduce` always produces the same next
//! state. It performs no I/O, reads no clock and never panics.

use super::{Action, ConversationState, LeadStage, Message, Sender};

/// Produce the next state. The input state is never modified.
#[must_use]
pub fn reduce(state: &ConversationState, action: Action) -> ConversationState {
    match action {
        // ============================================================
        // Lead capture
        // ============================================================
        Action::SetNameDraft { text } => ConversationState {
            name_draft: text,
            ..state.clone()
        },

        // Accepted in any stage; the controller only commits from AwaitingName.
        // A name captured earlier is kept.
        Action::CommitName { name } => ConversationState {
            captured_name: state.captured_name.clone().or(Some(name)),
            name_draft: String::new(),
            lead_stage: LeadStage::AwaitingContact,
            ..state.clone()
        },

        Action::SetContactDraft { text } => ConversationState {
            contact_draft: text,
            ..state.clone()
        },

        Action::CommitContact { contact } => ConversationState {
            captured_contact: state.captured_contact.clone().or(Some(contact)),
            contact_draft: String::new(),
            lead_stage: LeadStage::Active,
            ..state.clone()
        },

        // ============================================================
        // Transcript
        // ============================================================
        Action::AppendUserMessage { text, stamp } => {
            append(state, Message::new(Sender::User, text, stamp))
        }

        Action::AppendBotMessage { text, stamp } => {
            append(state, Message::new(Sender::Bot, text, stamp))
        }

        Action::SetTyping { typing } => ConversationState {
            is_typing: typing,
            ..state.clone()
        },

        Action::Reset { stamp } => ConversationState::seed(stamp),

        Action::Unknown => state.clone(),
    }
}

fn append(state: &ConversationState, message: Message) -> ConversationState {
    let mut messages = Vec::with_capacity(state.messages.len() + 1);
    messages.extend(state.messages.iter().cloned());
    messages.push(message);
    ConversationState {
        messages,
        ..state.clone()
    }
}
