//! Delayed reply scheduling

use crate::controller::PendingReply;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs a reply's typing delay and hands the reply back when it elapses.
///
/// Every call is independent: scheduling a second reply never delays,
/// replaces or cancels the first.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, reply: PendingReply);
}

// ============================================================================
// Tokio
// ============================================================================

/// Sleeps on the tokio timer and sends due replies over a channel
#[derive(Clone)]
pub struct TokioScheduler {
    reply_tx: mpsc::Sender<PendingReply>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiver its due replies arrive on
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PendingReply>) {
        let (reply_tx, reply_rx) = mpsc::channel(capacity);
        (Self { reply_tx }, reply_rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, reply: PendingReply) {
        let reply_tx = self.reply_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The session may be gone by now
            if reply_tx.send(reply).await.is_err() {
                tracing::debug!("Session closed before reply was delivered");
            }
        });
    }
}

// ============================================================================
// Manual (virtual time)
// ============================================================================

/// Scheduler driven by explicit calls to [`ManualScheduler::advance`]
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    reply: PendingReply,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move virtual time forward and release every reply that has come due,
    /// earliest first. Replies due at the same instant keep scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<PendingReply> {
        self.now += by;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|s| s.due <= now);
        self.pending = waiting;

        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.reply).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, reply: PendingReply) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now + delay,
            seq,
            reply,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> PendingReply {
        PendingReply {
            epoch: 0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_manual_releases_only_due_replies() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(500), reply("short"));
        scheduler.schedule(Duration::from_millis(1500), reply("long"));

        assert!(scheduler.advance(Duration::from_millis(499)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![reply("short")]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), vec![reply("long")]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.now(), Duration::from_millis(1500));
    }

    #[test]
    fn test_manual_orders_by_due_then_schedule_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(900), reply("c"));
        scheduler.schedule(Duration::from_millis(100), reply("a"));
        scheduler.schedule(Duration::from_millis(100), reply("b"));

        let texts: Vec<_> = scheduler
            .advance(Duration::from_secs(1))
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_delivers_after_delay() {
        let (mut scheduler, mut reply_rx) = TokioScheduler::channel(4);
        let start = tokio::time::Instant::now();

        scheduler.schedule(Duration::from_millis(1200), reply("hello"));
        let delivered = reply_rx.recv().await.unwrap();

        assert_eq!(delivered, reply("hello"));
        assert!(start.elapsed() >= Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_tolerates_closed_session() {
        let (mut scheduler, reply_rx) = TokioScheduler::channel(4);
        drop(reply_rx);

        scheduler.schedule(Duration::from_millis(10), reply("late"));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
