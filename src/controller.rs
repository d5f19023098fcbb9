//! Conversation controller
//!
//! Turns visitor intents into validated, correctly sequenced actions for the
//! store. It never performs side effects itself: every operation returns the
//! [`Effect`]s (delayed replies, scroll signals) that the driving runtime
//! must carry out. Delayed replies come back through
//! [`ChatController::complete_reply`].

mod effect;

pub use effect::{Effect, PendingReply};

use crate::clock::Clock;
use crate::config::{ChatConfig, TimeFormat};
use crate::script;
use crate::state_machine::{reduce, Action, ConversationState, LeadStage, MessageStamp};
use crate::topics::TopicTable;
use crate::validation::validate_contact;
use std::sync::Arc;
use std::time::Duration;

pub struct ChatController<C: Clock> {
    state: ConversationState,
    topics: Arc<TopicTable>,
    clock: C,
    reply_delay: Duration,
    time_format: TimeFormat,
    /// Bumped on reset so replies scheduled before it are dropped
    epoch: u64,
}

impl<C: Clock> ChatController<C> {
    #[must_use]
    pub fn new(topics: Arc<TopicTable>, clock: C, config: &ChatConfig) -> Self {
        let time_format = config.time_format.clone();
        let stamp = MessageStamp::new(time_format.render(clock.now()));
        Self {
            state: ConversationState::seed(stamp),
            topics,
            clock,
            reply_delay: config.reply_delay,
            time_format,
            epoch: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    #[must_use]
    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // ========================================================================
    // Draft fields
    // ========================================================================

    pub fn set_name_draft(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetNameDraft { text: text.into() });
    }

    pub fn set_contact_draft(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SetContactDraft { text: text.into() });
    }

    // ========================================================================
    // Lead capture
    // ========================================================================

    /// Commit the visitor's name and schedule the greeting that asks for
    /// contact details. Blank names are ignored.
    pub fn submit_name(&mut self, draft: &str) -> Vec<Effect> {
        let name = draft.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring blank name submission");
            return vec![];
        }
        if self.state.lead_stage != LeadStage::AwaitingName {
            tracing::debug!(stage = %self.state.lead_stage, "Name already captured");
            return vec![];
        }

        self.dispatch(Action::CommitName {
            name: name.to_string(),
        });
        tracing::info!(stage = %self.state.lead_stage, "Visitor name captured");

        vec![self.begin_reply(script::name_greeting(name))]
    }

    /// Validate and commit the visitor's email or phone number.
    ///
    /// Invalid input is answered with a bot message and leaves the form open
    /// for another attempt. Blank input is ignored.
    pub fn submit_contact(&mut self, draft: &str) -> Vec<Effect> {
        let contact = draft.trim();
        if contact.is_empty() {
            tracing::debug!("Ignoring blank contact submission");
            return vec![];
        }
        if self.state.lead_stage != LeadStage::AwaitingContact {
            tracing::debug!(stage = %self.state.lead_stage, "Not waiting for contact details");
            return vec![];
        }

        match validate_contact(contact) {
            Ok(kind) => {
                self.dispatch(Action::CommitContact {
                    contact: contact.to_string(),
                });
                tracing::info!(kind = ?kind, stage = %self.state.lead_stage, "Lead captured");

                let ack = script::contact_acknowledgment(self.state.captured_name.as_deref());
                self.append_bot(ack);
            }
            Err(error) => {
                tracing::debug!(%error, "Rejected contact details");
                self.append_bot(script::invalid_contact(&error));
            }
        }

        vec![Effect::ScrollToLatest]
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Echo the topic's menu label as the visitor's message and schedule its
    /// canned response. Unknown ids answer with the fallback topic.
    pub fn select_topic(&mut self, topic_id: &str) -> Vec<Effect> {
        let topics = Arc::clone(&self.topics);
        let topic = topics.resolve(topic_id);
        if topic.id != topic_id {
            tracing::debug!(topic_id, "Unknown topic, answering with fallback");
        }

        self.append_user(topic.display_label.clone());
        vec![
            Effect::ScrollToLatest,
            self.begin_reply(topic.response.clone()),
        ]
    }

    /// Free text from the open chat box. Only available once the lead is
    /// captured; always answered with the same holding reply.
    pub fn send_freeform_message(&mut self, text: &str) -> Vec<Effect> {
        let text = text.trim();
        if text.is_empty() {
            return vec![];
        }
        if !self.state.is_active() {
            tracing::debug!(stage = %self.state.lead_stage, "Chat is locked until lead capture completes");
            return vec![];
        }

        self.append_user(text.to_string());
        vec![
            Effect::ScrollToLatest,
            self.begin_reply(script::FREEFORM_REPLY),
        ]
    }

    /// Deliver a reply whose typing delay has elapsed.
    pub fn complete_reply(&mut self, reply: PendingReply) -> Vec<Effect> {
        if reply.epoch != self.epoch {
            tracing::debug!(
                reply_epoch = reply.epoch,
                epoch = self.epoch,
                "Dropping reply scheduled before reset"
            );
            return vec![];
        }

        self.append_bot(reply.text);
        self.dispatch(Action::SetTyping { typing: false });
        vec![Effect::ScrollToLatest]
    }

    /// Start over from the seed greeting. Replies still pending are dropped
    /// when they arrive.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.epoch += 1;
        let stamp = self.stamp();
        self.dispatch(Action::Reset { stamp });
        tracing::info!(epoch = self.epoch, "Conversation reset");
        vec![Effect::ScrollToLatest]
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn dispatch(&mut self, action: Action) {
        tracing::trace!(action = action.name(), "Dispatching");
        self.state = reduce(&self.state, action);
    }

    fn stamp(&self) -> MessageStamp {
        MessageStamp::new(self.time_format.render(self.clock.now()))
    }

    fn append_user(&mut self, text: String) {
        let stamp = self.stamp();
        self.dispatch(Action::AppendUserMessage { text, stamp });
    }

    fn append_bot(&mut self, text: String) {
        let stamp = self.stamp();
        self.dispatch(Action::AppendBotMessage { text, stamp });
    }

    /// Show the typing indicator and schedule the reply behind it.
    fn begin_reply(&mut self, text: impl Into<String>) -> Effect {
        self.dispatch(Action::SetTyping { typing: true });
        Effect::schedule_reply(self.reply_delay, self.epoch, text)
    }
}
