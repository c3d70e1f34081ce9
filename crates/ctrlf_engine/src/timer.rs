use std::sync::Arc;
use std::time::Duration;

use ctrlf_logging::ctrlf_debug;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, SessionId};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owned handle to a repeating tick task. Dropping the handle cancels the task.
///
/// The first tick fires one full interval after [`PollTimer::spawn`]; a slow
/// consumer delays later ticks instead of bursting them.
pub struct PollTimer {
    session: SessionId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollTimer {
    /// Must be called from within a tokio runtime.
    pub fn spawn(session: SessionId, interval: Duration, sink: Arc<dyn EventSink>) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => sink.emit(EngineEvent::Tick { session }),
                }
            }
            ctrlf_debug!("Poll timer for session {} stopped", session);
        });

        Self {
            session,
            cancel,
            task,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the tick task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Holds at most one armed [`PollTimer`] per uploader.
#[derive(Default)]
pub struct TimerSlot {
    current: Option<PollTimer>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer for `session`, cancelling whatever timer was armed before.
    pub fn arm(&mut self, session: SessionId, interval: Duration, sink: Arc<dyn EventSink>) {
        if let Some(previous) = self.current.take() {
            ctrlf_debug!(
                "Replacing poll timer of session {} with session {}",
                previous.session(),
                session
            );
            previous.cancel();
        }
        self.current = Some(PollTimer::spawn(session, interval, sink));
    }

    /// Cancels the armed timer if it belongs to `session`. Returns whether one was cancelled.
    pub fn cancel(&mut self, session: SessionId) -> bool {
        match self.current.take() {
            Some(timer) if timer.session() == session => {
                timer.cancel();
                true
            }
            other => {
                self.current = other;
                false
            }
        }
    }

    pub fn clear(&mut self) {
        if let Some(timer) = self.current.take() {
            timer.cancel();
        }
    }

    pub fn armed_session(&self) -> Option<SessionId> {
        self.current.as_ref().map(PollTimer::session)
    }
}
