use ctrlf_logging::ctrlf_debug;

use crate::state::StatusOutcome;
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_torn_down() {
        ctrlf_debug!("Dropping {:?} after teardown", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::FileSelected(upload) => {
            // The upload control is disabled while a submit is in flight.
            if state.is_uploading() {
                return (state, Vec::new());
            }
            if let Err(error) =
                state.validate(&upload.file_name, upload.extension(), upload.bytes.len())
            {
                state.reject_submission(error);
                return (state, Vec::new());
            }

            let mut effects = Vec::with_capacity(2);
            // Old timer goes before the new submit so no stale tick can land on the new upload.
            if let Some(previous) = state.cancel_live_session() {
                effects.push(Effect::CancelTimer { session: previous });
            }
            let session = state.begin_submit(&upload.file_name);
            effects.push(Effect::SubmitJob { session, upload });
            effects
        }
        Msg::SubmitSucceeded {
            session,
            job_id,
            message,
        } => {
            if state.start_session(session, job_id, message) {
                vec![Effect::ArmTimer {
                    session,
                    interval: state.settings().poll_interval,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitFailed { session, error } => {
            state.fail_submit(session, error);
            Vec::new()
        }
        Msg::PollTick { session } => match state.begin_fetch(session) {
            Some(job_id) => vec![Effect::FetchStatus { session, job_id }],
            None => Vec::new(),
        },
        Msg::StatusFetched { session, result } => match state.apply_status(session, result) {
            StatusOutcome::Done { job_id, file_name } => vec![
                Effect::CancelTimer { session },
                Effect::NotifyUploadSucceeded { job_id, file_name },
            ],
            StatusOutcome::Failed => vec![Effect::CancelTimer { session }],
            StatusOutcome::Running | StatusOutcome::Discarded => Vec::new(),
        },
        Msg::Unmounted => {
            let cancelled = state.cancel_live_session();
            state.tear_down();
            cancelled
                .map(|session| vec![Effect::CancelTimer { session }])
                .unwrap_or_default()
        }
    };

    (state, effects)
}
