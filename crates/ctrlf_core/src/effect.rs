use std::time::Duration;

use crate::{FileUpload, JobId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { session: SessionId, upload: FileUpload },
    ArmTimer { session: SessionId, interval: Duration },
    CancelTimer { session: SessionId },
    FetchStatus { session: SessionId, job_id: JobId },
    /// Fired once per session on reaching `done`, so document lists can refresh.
    NotifyUploadSucceeded { job_id: JobId, file_name: String },
}
