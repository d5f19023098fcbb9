//! Conversation state types

use crate::script;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Messages
// ============================================================================

/// Unique message identifier within a session
///
/// Only uniqueness is guaranteed. Display order comes from the position in
/// [`ConversationState::messages`], never from the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Bot => write!(f, "Bot"),
        }
    }
}

/// Identity and time label assigned to a message when it is created.
///
/// Stamps are produced outside the reducer (from the injected clock) so that
/// reduction stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStamp {
    pub id: MessageId,
    pub sent_at: String,
}

impl MessageStamp {
    #[must_use]
    pub fn new(sent_at: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sent_at: sent_at.into(),
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Display time label, formatted once at creation
    pub sent_at: String,
}

impl Message {
    #[must_use]
    pub fn new(sender: Sender, text: impl Into<String>, stamp: MessageStamp) -> Self {
        Self {
            id: stamp.id,
            sender,
            text: text.into(),
            sent_at: stamp.sent_at,
        }
    }

    #[must_use]
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

// ============================================================================
// Conversation State
// ============================================================================

/// Which lead-capture form the widget shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    /// Name form is shown
    #[default]
    AwaitingName,
    /// Email-or-phone form is shown; invalid submissions stay here
    AwaitingContact,
    /// Lead captured, topic menu and free chat unlocked (terminal)
    Active,
}

impl LeadStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStage::AwaitingName => "awaiting_name",
            LeadStage::AwaitingContact => "awaiting_contact",
            LeadStage::Active => "active",
        }
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete state of one visitor's chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Display order is insertion order
    pub messages: Vec<Message>,
    pub lead_stage: LeadStage,
    pub name_draft: String,
    pub contact_draft: String,
    pub captured_name: Option<String>,
    pub captured_contact: Option<String>,
    /// Bot is "composing" a scheduled reply
    pub is_typing: bool,
}

impl ConversationState {
    /// Fresh session: a single bot greeting, waiting for the visitor's name.
    #[must_use]
    pub fn seed(stamp: MessageStamp) -> Self {
        Self {
            messages: vec![Message::new(Sender::Bot, script::SEED_GREETING, stamp)],
            lead_stage: LeadStage::AwaitingName,
            name_draft: String::new(),
            contact_draft: String::new(),
            captured_name: None,
            captured_contact: None,
            is_typing: false,
        }
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lead_stage == LeadStage::Active
    }
}
