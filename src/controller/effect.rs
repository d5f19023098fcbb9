//! Effects produced by controller operations

use std::time::Duration;

/// A bot reply waiting out its typing delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Session epoch the reply was scheduled in; bumped by every reset
    pub epoch: u64,
    pub text: String,
}

/// Side effects to be executed after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand `reply` back to the controller once `delay` has elapsed
    ScheduleReply { delay: Duration, reply: PendingReply },

    /// New messages were appended; the view should scroll to the newest one
    ScrollToLatest,
}

impl Effect {
    #[must_use]
    pub fn schedule_reply(delay: Duration, epoch: u64, text: impl Into<String>) -> Self {
        Effect::ScheduleReply {
            delay,
            reply: PendingReply {
                epoch,
                text: text.into(),
            },
        }
    }
}
