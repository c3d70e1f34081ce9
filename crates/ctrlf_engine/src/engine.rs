use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ctrlf_logging::{ctrlf_debug, ctrlf_error};

use crate::timer::{ChannelEventSink, EventSink, TimerSlot};
use crate::{
    BackendError, BackendSettings, EngineEvent, JobBackend, ReqwestBackend, SessionId,
    UploadPayload,
};

enum EngineCommand {
    Submit {
        session: SessionId,
        upload: UploadPayload,
    },
    FetchStatus {
        session: SessionId,
        job_id: String,
    },
    ArmTimer {
        session: SessionId,
        interval: Duration,
    },
    CancelTimer {
        session: SessionId,
    },
}

/// Runs backend calls and the poll timer on a background tokio runtime.
///
/// Results come back as [`EngineEvent`]s. Dropping the handle stops the
/// worker thread, which cancels any armed timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let backend = ReqwestBackend::new(settings)?;
        Ok(Self::with_backend(Arc::new(backend)))
    }

    pub fn with_backend(backend: Arc<dyn JobBackend>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    ctrlf_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };
            let _guard = runtime.enter();
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut timers = TimerSlot::new();

            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &backend, &sink, &mut timers, command);
            }
            timers.clear();
            ctrlf_debug!("Engine command loop finished");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, session: SessionId, upload: UploadPayload) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { session, upload });
    }

    pub fn fetch_status(&self, session: SessionId, job_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchStatus {
            session,
            job_id: job_id.into(),
        });
    }

    pub fn arm_timer(&self, session: SessionId, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::ArmTimer { session, interval });
    }

    pub fn cancel_timer(&self, session: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelTimer { session });
    }

    /// Blocks until the next event; `None` once the worker has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    backend: &Arc<dyn JobBackend>,
    sink: &Arc<dyn EventSink>,
    timers: &mut TimerSlot,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit { session, upload } => {
            let backend = backend.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = backend.submit_job(&upload).await;
                sink.emit(EngineEvent::Submitted { session, result });
            });
        }
        EngineCommand::FetchStatus { session, job_id } => {
            let backend = backend.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = backend.job_status(&job_id).await;
                sink.emit(EngineEvent::StatusFetched { session, result });
            });
        }
        EngineCommand::ArmTimer { session, interval } => {
            timers.arm(session, interval, sink.clone());
        }
        EngineCommand::CancelTimer { session } => {
            if !timers.cancel(session) {
                ctrlf_debug!("No armed timer for session {}", session);
            }
        }
    }
}
