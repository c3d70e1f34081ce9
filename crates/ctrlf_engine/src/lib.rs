//! Ctrl+F++ engine: backend IO, poll timers and effect execution.
mod backend;
mod engine;
mod timer;
mod types;

pub use backend::{BackendSettings, JobBackend, ReqwestBackend};
pub use engine::EngineHandle;
pub use timer::{ChannelEventSink, EventSink, PollTimer, TimerSlot};
pub use types::{
    BackendError, EngineEvent, FailureKind, SessionId, StatusReport, SubmitReceipt, UploadPayload,
};
