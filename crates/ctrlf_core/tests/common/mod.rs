#![allow(dead_code)]

use std::sync::Once;

use ctrlf_core::{
    update, AppState, Effect, FileUpload, JobId, JobState, JobStatus, Msg, SessionId,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ctrlf_logging::initialize_for_tests);
}

pub fn pdf(name: &str) -> FileUpload {
    FileUpload::new(name, b"%PDF-1.7 test".to_vec())
}

/// Selects a file and returns the session id reserved for its submit.
pub fn select(state: AppState, upload: FileUpload) -> (AppState, SessionId, Vec<Effect>) {
    let (state, effects) = update(state, Msg::FileSelected(upload));
    let session = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitJob { session, .. } => Some(*session),
            _ => None,
        })
        .expect("submit effect");
    (state, session, effects)
}

/// Selects a file and lets the backend accept it as `job_id`.
pub fn submitted(state: AppState, file_name: &str, job_id: &str) -> (AppState, SessionId) {
    let (state, session, _) = select(state, pdf(file_name));
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            session,
            job_id: JobId::new(job_id),
            message: "queued".to_string(),
        },
    );
    (state, session)
}

pub fn tick(state: AppState, session: SessionId) -> (AppState, Vec<Effect>) {
    update(state, Msg::PollTick { session })
}

pub fn fetched(state: AppState, session: SessionId, status: JobStatus) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StatusFetched {
            session,
            result: Ok(status),
        },
    )
}

pub fn status(state: &str, progress: f64) -> JobStatus {
    JobStatus::new(JobState::from_wire(state), progress)
}
