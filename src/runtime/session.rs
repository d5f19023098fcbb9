//! Controller paired with a scheduler

use super::scheduler::{ManualScheduler, Scheduler};
use super::Intent;
use crate::clock::Clock;
use crate::controller::{ChatController, Effect, PendingReply};
use crate::state_machine::{ConversationState, LeadStage};
use std::time::Duration;

/// What the view should do after an intent or reply was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionUpdate {
    pub scroll_to_latest: bool,
}

impl SessionUpdate {
    fn merge(self, other: SessionUpdate) -> Self {
        Self {
            scroll_to_latest: self.scroll_to_latest || other.scroll_to_latest,
        }
    }
}

/// A chat session: the controller plus the scheduler that runs its reply
/// delays. Executes controller effects synchronously.
pub struct ChatSession<C: Clock, S: Scheduler> {
    controller: ChatController<C>,
    scheduler: S,
}

impl<C: Clock, S: Scheduler> ChatSession<C, S> {
    #[must_use]
    pub fn new(controller: ChatController<C>, scheduler: S) -> Self {
        Self {
            controller,
            scheduler,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ConversationState {
        self.controller.state()
    }

    #[must_use]
    pub fn controller(&self) -> &ChatController<C> {
        &self.controller
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn handle(&mut self, intent: Intent) -> SessionUpdate {
        let effects = match intent {
            Intent::SetNameDraft(text) => {
                self.controller.set_name_draft(text);
                vec![]
            }
            Intent::SetContactDraft(text) => {
                self.controller.set_contact_draft(text);
                vec![]
            }
            Intent::SubmitName(draft) => self.controller.submit_name(&draft),
            Intent::SubmitContact(draft) => self.controller.submit_contact(&draft),
            Intent::SelectTopic(id) => self.controller.select_topic(&id),
            Intent::SendMessage(text) => self.controller.send_freeform_message(&text),
            Intent::SubmitInput(text) => self.submit_input(&text),
            Intent::Reset => self.controller.reset(),
        };
        self.execute(effects)
    }

    /// Hand a reply whose delay has elapsed back to the controller.
    pub fn deliver(&mut self, reply: PendingReply) -> SessionUpdate {
        let effects = self.controller.complete_reply(reply);
        self.execute(effects)
    }

    /// Route text to whichever form the current lead stage shows.
    fn submit_input(&mut self, text: &str) -> Vec<Effect> {
        match self.controller.state().lead_stage {
            LeadStage::AwaitingName => self.controller.submit_name(text),
            LeadStage::AwaitingContact => self.controller.submit_contact(text),
            LeadStage::Active => self.controller.send_freeform_message(text),
        }
    }

    fn execute(&mut self, effects: Vec<Effect>) -> SessionUpdate {
        let mut update = SessionUpdate::default();
        for effect in effects {
            match effect {
                Effect::ScheduleReply { delay, reply } => {
                    tracing::debug!(delay_ms = delay.as_millis(), "Scheduling reply");
                    self.scheduler.schedule(delay, reply);
                }
                Effect::ScrollToLatest => update.scroll_to_latest = true,
            }
        }
        update
    }
}

impl<C: Clock> ChatSession<C, ManualScheduler> {
    /// Advance virtual time and deliver every reply that came due.
    pub fn advance(&mut self, by: Duration) -> SessionUpdate {
        self.scheduler
            .advance(by)
            .into_iter()
            .fold(SessionUpdate::default(), |update, reply| {
                update.merge(self.deliver(reply))
            })
    }
}
