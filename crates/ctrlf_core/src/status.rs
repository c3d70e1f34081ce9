use std::fmt;

/// Backend-assigned job identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline phase reported by the backend, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Parsing,
    Chunking,
    Embedding,
    Storing,
    Done,
    Error,
    /// A state name this client does not know. Treated as still running.
    Unknown(String),
}

impl JobState {
    /// Maps a wire name to a state; unrecognized names are kept verbatim.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "queued" => JobState::Queued,
            "parsing" => JobState::Parsing,
            "chunking" => JobState::Chunking,
            "embedding" => JobState::Embedding,
            "storing" => JobState::Storing,
            "done" => JobState::Done,
            "error" => JobState::Error,
            other => JobState::Unknown(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            JobState::Queued => "queued",
            JobState::Parsing => "parsing",
            JobState::Chunking => "chunking",
            JobState::Embedding => "embedding",
            JobState::Storing => "storing",
            JobState::Done => "done",
            JobState::Error => "error",
            JobState::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Error)
    }

    /// Phases in which `progress` carries meaning.
    pub fn is_determinate(&self) -> bool {
        matches!(
            self,
            JobState::Parsing | JobState::Chunking | JobState::Embedding
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One status snapshot as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    pub state: JobState,
    /// Fraction in `[0.0, 1.0]`; only meaningful in determinate phases.
    pub progress: f64,
    pub phase: Option<String>,
    /// Present only when `state` is [`JobState::Error`].
    pub error: Option<String>,
}

impl JobStatus {
    pub fn new(state: JobState, progress: f64) -> Self {
        Self {
            state,
            progress,
            phase: None,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: JobState::Error,
            progress: 1.0,
            phase: None,
            error: Some(message.into()),
        }
    }
}
