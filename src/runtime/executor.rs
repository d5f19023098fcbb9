//! Chat session event loop

use super::scheduler::TokioScheduler;
use super::session::{ChatSession, SessionUpdate};
use super::{Intent, ViewEvent};
use crate::clock::Clock;
use crate::controller::{ChatController, PendingReply};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

const INTENT_CAPACITY: usize = 32;
const REPLY_CAPACITY: usize = 32;
const VIEW_CAPACITY: usize = 128;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Chat session has shut down")]
    SessionClosed,
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct ChatHandle {
    intent_tx: mpsc::Sender<Intent>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl ChatHandle {
    /// # Errors
    ///
    /// Returns [`RuntimeError::SessionClosed`] once the runtime has stopped.
    pub async fn send(&self, intent: Intent) -> Result<(), RuntimeError> {
        self.intent_tx
            .send(intent)
            .await
            .map_err(|_| RuntimeError::SessionClosed)
    }

    /// Subscribe to view updates. Subscribe before spawning
    /// [`ChatRuntime::run`] to receive the initial state.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.view_tx.subscribe()
    }
}

/// Owns one session and processes its intents and due replies in order
pub struct ChatRuntime<C: Clock> {
    session: ChatSession<C, TokioScheduler>,
    intent_rx: mpsc::Receiver<Intent>,
    reply_rx: mpsc::Receiver<PendingReply>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl<C: Clock + 'static> ChatRuntime<C> {
    #[must_use]
    pub fn new(controller: ChatController<C>) -> (Self, ChatHandle) {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CAPACITY);
        let (view_tx, _) = broadcast::channel(VIEW_CAPACITY);
        let (scheduler, reply_rx) = TokioScheduler::channel(REPLY_CAPACITY);

        let runtime = Self {
            session: ChatSession::new(controller, scheduler),
            intent_rx,
            reply_rx,
            view_tx: view_tx.clone(),
        };
        (runtime, ChatHandle { intent_tx, view_tx })
    }

    /// Run until every [`ChatHandle`] is dropped. Replies still waiting on
    /// their delay are discarded.
    pub async fn run(mut self) {
        tracing::info!("Starting chat session");
        self.publish(SessionUpdate::default());

        loop {
            tokio::select! {
                intent = self.intent_rx.recv() => {
                    let Some(intent) = intent else { break };
                    tracing::debug!(intent = ?intent, "Handling intent");
                    let update = self.session.handle(intent);
                    self.publish(update);
                }
                Some(reply) = self.reply_rx.recv() => {
                    let update = self.session.deliver(reply);
                    self.publish(update);
                }
            }
        }

        tracing::info!(
            messages = self.session.state().messages.len(),
            stage = %self.session.state().lead_stage,
            "Chat session stopped"
        );
    }

    fn publish(&self, update: SessionUpdate) {
        // No subscribers is fine; the widget may not be rendered yet
        let _ = self.view_tx.send(ViewEvent::StateChanged {
            state: self.session.state().clone(),
        });
        if update.scroll_to_latest {
            let _ = self.view_tx.send(ViewEvent::ScrollToLatest);
        }
    }
}
