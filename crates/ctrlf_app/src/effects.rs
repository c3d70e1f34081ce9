use ctrlf_core::{Effect, FileUpload, JobId, JobState, JobStatus, Msg, SubmissionError};
use ctrlf_engine::{
    BackendError, EngineEvent, EngineHandle, FailureKind, StatusReport, UploadPayload,
};
use ctrlf_logging::{ctrlf_debug, ctrlf_info, ctrlf_warn};

/// Called once per upload that finished processing.
pub type SuccessHook = Box<dyn FnMut(&JobId, &str)>;

pub struct EffectRunner {
    engine: EngineHandle,
    on_success: SuccessHook,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, on_success: SuccessHook) -> Self {
        Self { engine, on_success }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { session, upload } => {
                    ctrlf_info!(
                        "SubmitJob session={} file={} bytes={}",
                        session,
                        upload.file_name,
                        upload.bytes.len()
                    );
                    self.engine.submit(session, to_payload(upload));
                }
                Effect::ArmTimer { session, interval } => {
                    ctrlf_debug!("ArmTimer session={} interval={:?}", session, interval);
                    self.engine.arm_timer(session, interval);
                }
                Effect::CancelTimer { session } => {
                    ctrlf_debug!("CancelTimer session={}", session);
                    self.engine.cancel_timer(session);
                }
                Effect::FetchStatus { session, job_id } => {
                    self.engine.fetch_status(session, job_id.as_str());
                }
                Effect::NotifyUploadSucceeded { job_id, file_name } => {
                    ctrlf_info!("Upload {} finished as job {}", file_name, job_id);
                    (self.on_success)(&job_id, &file_name);
                }
            }
        }
    }

    /// Waits for the next engine event and converts it to a message.
    pub fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { session, result } => match result {
            Ok(receipt) => Msg::SubmitSucceeded {
                session,
                job_id: JobId::new(receipt.job_id),
                message: receipt.message,
            },
            Err(err) => {
                ctrlf_warn!("Upload for session {} failed: {}", session, err);
                Msg::SubmitFailed {
                    session,
                    error: map_submit_error(err),
                }
            }
        },
        EngineEvent::Tick { session } => Msg::PollTick { session },
        EngineEvent::StatusFetched { session, result } => Msg::StatusFetched {
            session,
            result: result.map(map_status).map_err(|err| err.to_string()),
        },
    }
}

pub fn map_status(report: StatusReport) -> JobStatus {
    JobStatus {
        state: JobState::from_wire(&report.state),
        progress: report.progress.unwrap_or(0.0),
        phase: report.phase,
        error: report.error,
    }
}

pub fn map_submit_error(err: BackendError) -> SubmissionError {
    match err.kind {
        FailureKind::Rejected { detail, .. } => SubmissionError::Rejected { detail },
        _ => SubmissionError::Transport {
            detail: err.to_string(),
        },
    }
}

fn to_payload(upload: FileUpload) -> UploadPayload {
    let mime = mime_for(upload.extension()).to_string();
    UploadPayload {
        file_name: upload.file_name,
        mime,
        bytes: upload.bytes,
    }
}

fn mime_for(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_report_maps_to_core_status() {
        let status = map_status(StatusReport {
            state: "chunking".to_string(),
            progress: None,
            phase: Some("page 2".to_string()),
            error: None,
        });

        assert_eq!(status.state, JobState::Chunking);
        assert_eq!(status.progress, 0.0);
        assert_eq!(status.phase.as_deref(), Some("page 2"));
    }

    #[test]
    fn unknown_wire_state_is_preserved() {
        let status = map_status(StatusReport {
            state: "ocr".to_string(),
            progress: Some(0.1),
            phase: None,
            error: None,
        });
        assert_eq!(status.state, JobState::Unknown("ocr".to_string()));
    }

    #[test]
    fn rejection_detail_survives_mapping() {
        let err = BackendError::new(
            FailureKind::Rejected {
                status: 400,
                detail: "not a pdf".to_string(),
            },
            "not a pdf",
        );
        assert_eq!(
            map_submit_error(err),
            SubmissionError::Rejected {
                detail: "not a pdf".to_string()
            }
        );
    }

    #[test]
    fn other_failures_become_transport_errors() {
        let err = BackendError::new(FailureKind::HttpStatus(502), "Bad Gateway");
        assert_eq!(
            map_submit_error(err),
            SubmissionError::Transport {
                detail: "http status 502: Bad Gateway".to_string()
            }
        );
    }

    #[test]
    fn fetch_failure_becomes_error_text() {
        let msg = map_event(EngineEvent::StatusFetched {
            session: 4,
            result: Err(BackendError::new(FailureKind::Network, "refused")),
        });
        assert_eq!(
            msg,
            Msg::StatusFetched {
                session: 4,
                result: Err("network error: refused".to_string()),
            }
        );
    }

    #[test]
    fn tick_maps_to_poll_tick() {
        assert_eq!(
            map_event(EngineEvent::Tick { session: 9 }),
            Msg::PollTick { session: 9 }
        );
    }

    #[test]
    fn payload_mime_follows_extension() {
        let payload = to_payload(FileUpload::new("Report.PDF", vec![1]));
        assert_eq!(payload.mime, "application/pdf");
        assert_eq!(mime_for(None), "application/octet-stream");
    }
}
