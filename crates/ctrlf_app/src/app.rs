use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ctrlf_core::{update, AppState, FileUpload, JobId, Msg, UploaderSettings};
use ctrlf_engine::{BackendSettings, EngineHandle};
use ctrlf_logging::{ctrlf_info, ctrlf_warn};

use crate::effects::EffectRunner;
use crate::render::{render, render_documents};

/// Outcome of a whole run over all requested files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Uploads `files` one after another, rendering progress until each settles.
pub fn run(
    files: Vec<PathBuf>,
    settings: UploaderSettings,
    backend: BackendSettings,
) -> anyhow::Result<RunSummary> {
    let engine = EngineHandle::new(backend).context("could not create backend client")?;
    let runner = EffectRunner::new(
        engine,
        Box::new(|job_id: &JobId, file_name: &str| {
            ctrlf_info!("Document list refresh after job {} ({})", job_id, file_name);
        }),
    );
    let mut uploader = Uploader::new(AppState::with_settings(settings), runner);
    let mut summary = RunSummary::default();

    for path in files {
        let upload = read_upload(&path)?;
        let file_name = upload.file_name.clone();
        uploader.dispatch(Msg::FileSelected(upload));

        while !uploader.state.is_settled() {
            let Some(msg) = uploader.runner.next_msg() else {
                uploader.dispatch(Msg::Unmounted);
                bail!("engine stopped while {} was in progress", file_name);
            };
            uploader.dispatch(msg);
        }

        let view = uploader.state.view();
        if view.last_error.is_some() {
            summary.failed.push(file_name);
        } else {
            for line in render_documents(&view.documents) {
                println!("{line}");
            }
            summary.succeeded.push(file_name);
        }
    }

    uploader.dispatch(Msg::Unmounted);
    Ok(summary)
}

/// Owns the single `AppState` and applies messages on the calling thread.
struct Uploader {
    state: AppState,
    runner: EffectRunner,
    last_frame: Vec<String>,
}

impl Uploader {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            last_frame: Vec::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty {
            self.draw(render(&view));
        }
    }

    fn draw(&mut self, frame: Vec<String>) {
        if frame == self.last_frame {
            return;
        }
        for line in frame.iter().filter(|line| !self.last_frame.contains(line)) {
            println!("{line}");
        }
        self.last_frame = frame;
    }
}

/// Reads a file from disk into an upload payload.
pub fn read_upload(path: &Path) -> anyhow::Result<FileUpload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();
    let bytes = std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    if bytes.is_empty() {
        ctrlf_warn!("{} is empty", path.display());
    }
    Ok(FileUpload::new(file_name, bytes))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn read_upload_uses_file_name_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.7")
            .unwrap();

        let upload = read_upload(&path).unwrap();

        assert_eq!(upload.file_name, "manual.pdf");
        assert_eq!(upload.bytes, b"%PDF-1.7");
        assert_eq!(upload.extension(), Some("pdf"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_upload(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(err.to_string().contains("could not read"));
    }
}
