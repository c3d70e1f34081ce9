use std::fmt;

use crate::{JobId, JobState, JobStatus, SessionPhase, UploadError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Headline {
    /// No job has reported a status yet.
    #[default]
    Idle,
    Complete,
    Failed,
    InProgress(JobState),
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Headline::Idle => write!(f, "idle"),
            Headline::Complete => write!(f, "complete"),
            Headline::Failed => write!(f, "error"),
            Headline::InProgress(state) => write!(f, "in progress: {state}"),
        }
    }
}

/// Display-ready progress derived from one status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub is_working: bool,
    /// When false, show an indeterminate indicator and ignore `display_percent`.
    pub is_determinate: bool,
    pub display_percent: Option<u8>,
    pub headline: Headline,
    pub phase: Option<String>,
}

/// Maps a status snapshot (or the lack of one) to its progress view.
pub fn project(status: Option<&JobStatus>) -> ProgressView {
    let Some(status) = status else {
        return ProgressView::default();
    };

    let is_determinate = status.state.is_determinate();
    let display_percent = is_determinate.then(|| percent(status.progress));
    let headline = match &status.state {
        JobState::Done => Headline::Complete,
        JobState::Error => Headline::Failed,
        other => Headline::InProgress(other.clone()),
    };

    ProgressView {
        is_working: !status.state.is_terminal(),
        is_determinate,
        display_percent,
        headline,
        phase: status.phase.clone(),
    }
}

fn percent(progress: f64) -> u8 {
    if progress.is_nan() {
        return 0;
    }
    (progress.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub uploading: bool,
    pub session_phase: Option<SessionPhase>,
    pub job_id: Option<JobId>,
    pub progress: ProgressView,
    /// Single user-visible status line.
    pub message: Option<String>,
    pub last_error: Option<UploadError>,
    /// File names of uploads that finished processing, oldest first.
    pub documents: Vec<String>,
    pub dirty: bool,
}
