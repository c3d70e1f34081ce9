//! Ctrl+F++ core: pure upload/poll state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{SubmissionError, UploadError};
pub use msg::{FileUpload, Msg};
pub use state::{AppState, Job, PollSession, SessionId, SessionPhase, UploaderSettings};
pub use status::{JobId, JobState, JobStatus};
pub use update::update;
pub use view_model::{project, AppViewModel, Headline, ProgressView};
