use std::time::Duration;

use ctrlf_logging::{ctrlf_debug, ctrlf_warn};

use crate::view_model::{project, AppViewModel};
use crate::{JobId, JobState, JobStatus, SubmissionError, UploadError};

pub type SessionId = u64;

const DONE_MESSAGE: &str = "Processing complete";
const JOB_FAILED_FALLBACK: &str = "Processing failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderSettings {
    pub poll_interval: Duration,
    /// Accepted file extension without the dot, compared case-insensitively.
    pub accepted_extension: String,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_000),
            accepted_extension: "pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub file_name: String,
    /// Human-readable message returned on submission.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Created,
    Polling,
    Done,
    Failed,
    Cancelled,
}

impl SessionPhase {
    /// A live session owns an armed timer.
    pub fn is_live(self) -> bool {
        matches!(self, SessionPhase::Created | SessionPhase::Polling)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollSession {
    id: SessionId,
    job: Job,
    phase: SessionPhase,
    last_status: Option<JobStatus>,
    fetch_in_flight: bool,
}

impl PollSession {
    fn new(id: SessionId, job: Job) -> Self {
        Self {
            id,
            job,
            phase: SessionPhase::Created,
            last_status: None,
            fetch_in_flight: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn last_status(&self) -> Option<&JobStatus> {
        self.last_status.as_ref()
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingSubmit {
    session: SessionId,
    file_name: String,
}

/// What happened to a fetch result handed to [`AppState::apply_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusOutcome {
    Discarded,
    Running,
    Done { job_id: JobId, file_name: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    settings: UploaderSettings,
    next_session: SessionId,
    pending: Option<PendingSubmit>,
    session: Option<PollSession>,
    message: Option<String>,
    last_error: Option<UploadError>,
    documents: Vec<String>,
    torn_down: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: UploaderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &UploaderSettings {
        &self.settings
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            uploading: self.is_uploading(),
            session_phase: self.session.as_ref().map(PollSession::phase),
            job_id: self.session.as_ref().map(|s| s.job.id.clone()),
            progress: project(self.current_status()),
            message: self.message.clone(),
            last_error: self.last_error.clone(),
            documents: self.documents.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_uploading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn session(&self) -> Option<&PollSession> {
        self.session.as_ref()
    }

    /// The single source for the displayed status: the current session's last snapshot.
    pub fn current_status(&self) -> Option<&JobStatus> {
        self.session.as_ref().and_then(PollSession::last_status)
    }

    pub fn live_session_id(&self) -> Option<SessionId> {
        self.session
            .as_ref()
            .filter(|s| s.phase.is_live())
            .map(PollSession::id)
    }

    /// No submit in flight and no live session.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.live_session_id().is_none()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub(crate) fn validate(
        &self,
        file_name: &str,
        extension: Option<&str>,
        len: usize,
    ) -> Result<(), SubmissionError> {
        if len == 0 {
            return Err(SubmissionError::EmptyFile);
        }
        let expected = &self.settings.accepted_extension;
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case(expected) => Ok(()),
            _ => Err(SubmissionError::UnsupportedType {
                file_name: file_name.to_string(),
                expected: expected.clone(),
            }),
        }
    }

    pub(crate) fn reject_submission(&mut self, error: SubmissionError) {
        ctrlf_warn!("Submission rejected: {:?}", error);
        self.set_error(UploadError::Submission(error));
    }

    /// Cancels the live session, if any, and returns its id so the timer can be cleared.
    pub(crate) fn cancel_live_session(&mut self) -> Option<SessionId> {
        let session = self.session.as_mut().filter(|s| s.phase.is_live())?;
        ctrlf_debug!("Session {} cancelled in phase {:?}", session.id, session.phase);
        session.phase = SessionPhase::Cancelled;
        session.fetch_in_flight = false;
        self.dirty = true;
        Some(session.id)
    }

    /// Clears previous upload state and reserves a session id for the new submission.
    pub(crate) fn begin_submit(&mut self, file_name: &str) -> SessionId {
        self.next_session += 1;
        let session = self.next_session;
        self.session = None;
        self.message = None;
        self.last_error = None;
        self.pending = Some(PendingSubmit {
            session,
            file_name: file_name.to_string(),
        });
        self.dirty = true;
        ctrlf_debug!("Session {} submitting {}", session, file_name);
        session
    }

    fn take_pending(&mut self, session: SessionId) -> Option<PendingSubmit> {
        if self.pending.as_ref().map(|p| p.session) == Some(session) {
            self.pending.take()
        } else {
            ctrlf_debug!("Ignoring submit result for stale session {}", session);
            None
        }
    }

    /// Creates the poll session for a successful submit. Returns false for stale results.
    pub(crate) fn start_session(
        &mut self,
        session: SessionId,
        job_id: JobId,
        message: String,
    ) -> bool {
        let Some(pending) = self.take_pending(session) else {
            return false;
        };
        let job = Job {
            id: job_id,
            file_name: pending.file_name,
            message: message.clone(),
        };
        ctrlf_debug!("Session {} created for job {}", session, job.id);
        self.session = Some(PollSession::new(session, job));
        self.message = Some(message);
        self.dirty = true;
        true
    }

    pub(crate) fn fail_submit(&mut self, session: SessionId, error: SubmissionError) -> bool {
        if self.take_pending(session).is_none() {
            return false;
        }
        self.reject_submission(error);
        self.dirty = true;
        true
    }

    /// Marks a fetch as started. Returns the job to fetch, or `None` when the tick must be dropped.
    pub(crate) fn begin_fetch(&mut self, session: SessionId) -> Option<JobId> {
        let current = self
            .session
            .as_mut()
            .filter(|s| s.id == session && s.phase.is_live())?;
        if current.fetch_in_flight {
            ctrlf_debug!("Session {} tick skipped; fetch still in flight", session);
            return None;
        }
        current.fetch_in_flight = true;
        current.phase = SessionPhase::Polling;
        Some(current.job.id.clone())
    }

    pub(crate) fn apply_status(
        &mut self,
        session: SessionId,
        result: Result<JobStatus, String>,
    ) -> StatusOutcome {
        let Some(current) = self
            .session
            .as_mut()
            .filter(|s| s.id == session && s.phase.is_live() && s.fetch_in_flight)
        else {
            ctrlf_debug!("Discarding status for inactive session {}", session);
            return StatusOutcome::Discarded;
        };
        current.fetch_in_flight = false;
        self.dirty = true;

        let status = match result {
            Ok(status) => status,
            Err(detail) => {
                ctrlf_warn!("Status polling failed for job {}: {}", current.job.id, detail);
                current.phase = SessionPhase::Failed;
                self.set_error(UploadError::PollTransport { detail });
                return StatusOutcome::Failed;
            }
        };

        let job_id = current.job.id.clone();
        let file_name = current.job.file_name.clone();
        let state = status.state.clone();
        let error_text = status.error.clone();
        current.last_status = Some(status);
        current.phase = match state {
            JobState::Done => SessionPhase::Done,
            JobState::Error => SessionPhase::Failed,
            _ => SessionPhase::Polling,
        };

        match state {
            JobState::Done => {
                ctrlf_debug!("Job {} done", job_id);
                self.documents.push(file_name.clone());
                self.message = Some(DONE_MESSAGE.to_string());
                // A rejected pick made while this job ran must not outlive its success.
                self.last_error = None;
                StatusOutcome::Done { job_id, file_name }
            }
            JobState::Error => {
                let message = error_text.unwrap_or_else(|| JOB_FAILED_FALLBACK.to_string());
                ctrlf_warn!("Job {} failed: {}", job_id, message);
                self.set_error(UploadError::Job(message));
                StatusOutcome::Failed
            }
            JobState::Unknown(raw) => {
                ctrlf_debug!("Job {} reported unknown state {:?}; polling on", job_id, raw);
                StatusOutcome::Running
            }
            _ => StatusOutcome::Running,
        }
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
        if self.pending.take().is_some() {
            self.dirty = true;
        }
    }

    fn set_error(&mut self, error: UploadError) {
        self.message = Some(error.to_string());
        self.last_error = Some(error);
        self.dirty = true;
    }
}
