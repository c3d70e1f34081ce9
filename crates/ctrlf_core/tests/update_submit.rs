mod common;

use std::time::Duration;

use common::{init_logging, pdf, select};
use ctrlf_core::{
    update, AppState, Effect, FileUpload, JobId, Msg, SessionPhase, SubmissionError,
    UploadError, UploaderSettings,
};
use pretty_assertions::assert_eq;

#[test]
fn selecting_a_pdf_emits_submit_and_marks_uploading() {
    init_logging();
    let (mut state, session, effects) = select(AppState::new(), pdf("manual.pdf"));

    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            session,
            upload: pdf("manual.pdf"),
        }]
    );
    let view = state.view();
    assert!(view.uploading);
    assert_eq!(view.session_phase, None);
    assert!(state.consume_dirty());
}

#[test]
fn submit_success_creates_session_and_arms_timer() {
    init_logging();
    let settings = UploaderSettings {
        poll_interval: Duration::from_millis(250),
        ..UploaderSettings::default()
    };
    let (state, session, _) = select(AppState::with_settings(settings), pdf("manual.pdf"));

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            session,
            job_id: JobId::new("job-1"),
            message: "queued".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ArmTimer {
            session,
            interval: Duration::from_millis(250),
        }]
    );
    let view = state.view();
    assert!(!view.uploading);
    assert_eq!(view.session_phase, Some(SessionPhase::Created));
    assert_eq!(view.job_id, Some(JobId::new("job-1")));
    assert_eq!(view.message.as_deref(), Some("queued"));
    assert!(!view.progress.is_working);

    let job = state.session().unwrap().job();
    assert_eq!(job.file_name, "manual.pdf");
    assert_eq!(job.message, "queued");
}

#[test]
fn empty_file_is_rejected_without_effects() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FileSelected(FileUpload::new("empty.pdf", Vec::new())),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.uploading);
    assert_eq!(
        view.last_error,
        Some(UploadError::Submission(SubmissionError::EmptyFile))
    );
    assert_eq!(view.message.as_deref(), Some("Upload failed: file is empty"));
}

#[test]
fn wrong_extension_is_rejected() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FileSelected(FileUpload::new("notes.txt", b"hello".to_vec())),
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.view().message.as_deref(),
        Some("Upload failed: only .pdf files are accepted")
    );
}

#[test]
fn extension_check_ignores_case() {
    init_logging();
    let (state, _session, effects) = select(AppState::new(), pdf("SCAN.PDF"));
    assert_eq!(effects.len(), 1);
    assert!(state.is_uploading());
}

#[test]
fn invalid_file_leaves_running_session_alone() {
    init_logging();
    let (state, session) = common::submitted(AppState::new(), "a.pdf", "job-a");

    let (state, effects) = update(
        state,
        Msg::FileSelected(FileUpload::new("b.docx", b"x".to_vec())),
    );

    assert!(effects.is_empty());
    assert_eq!(state.live_session_id(), Some(session));
    assert!(state.view().last_error.is_some());

    let (state, _) = common::tick(state, session);
    let (state, effects) = common::fetched(state, session, common::status("done", 1.0));

    assert_eq!(effects.len(), 2);
    let view = state.view();
    assert_eq!(view.message.as_deref(), Some("Processing complete"));
    assert_eq!(view.last_error, None);
}

#[test]
fn submit_failure_surfaces_detail_and_creates_no_session() {
    init_logging();
    let (state, session, _) = select(AppState::new(), pdf("manual.pdf"));

    let (state, effects) = update(
        state,
        Msg::SubmitFailed {
            session,
            error: SubmissionError::Rejected {
                detail: "file too large".to_string(),
            },
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.uploading);
    assert_eq!(view.session_phase, None);
    assert_eq!(view.message.as_deref(), Some("Upload failed: file too large"));
    assert!(!view.last_error.unwrap().is_retryable());
    assert!(state.is_settled());
}

#[test]
fn transport_failure_uses_generic_message() {
    init_logging();
    let (state, session, _) = select(AppState::new(), pdf("manual.pdf"));

    let (state, _) = update(
        state,
        Msg::SubmitFailed {
            session,
            error: SubmissionError::Transport {
                detail: "connection refused".to_string(),
            },
        },
    );

    let view = state.view();
    assert_eq!(view.message.as_deref(), Some("Upload failed"));
    assert!(view.last_error.unwrap().is_retryable());
}

#[test]
fn selection_is_ignored_while_submit_in_flight() {
    init_logging();
    let (state, _session, _) = select(AppState::new(), pdf("first.pdf"));

    let (state, effects) = update(state, Msg::FileSelected(pdf("second.pdf")));

    assert!(effects.is_empty());
    assert!(state.is_uploading());
}

#[test]
fn submit_result_for_unknown_session_is_ignored() {
    init_logging();
    let (state, session, _) = select(AppState::new(), pdf("manual.pdf"));

    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            session: session + 10,
            job_id: JobId::new("ghost"),
            message: "queued".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.is_uploading());
    assert!(state.session().is_none());
}
