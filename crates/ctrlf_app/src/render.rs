use ctrlf_core::{AppViewModel, Headline};

const BAR_WIDTH: usize = 20;

/// Renders the view model as terminal lines, top to bottom.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.uploading {
        lines.push("Uploading...".to_string());
    }

    let progress = &view.progress;
    if progress.headline != Headline::Idle {
        let mut line = match progress.display_percent {
            Some(percent) if progress.is_working => {
                format!("[{}] {:>3}% {}", bar(percent), percent, progress.headline)
            }
            _ if progress.is_working => {
                format!("[{}] {}", "~".repeat(BAR_WIDTH), progress.headline)
            }
            _ => progress.headline.to_string(),
        };
        if let Some(phase) = &progress.phase {
            line.push_str(" - ");
            line.push_str(phase);
        }
        lines.push(line);
    }

    if let Some(message) = &view.message {
        lines.push(message.clone());
    }

    lines
}

/// Lists uploaded documents after a successful upload.
pub fn render_documents(documents: &[String]) -> Vec<String> {
    if documents.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(documents.len() + 1);
    lines.push("Uploaded documents:".to_string());
    lines.extend(documents.iter().map(|doc| format!("  - {doc}")));
    lines
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrlf_core::{project, JobState, JobStatus};

    fn view_for(status: Option<JobStatus>, message: Option<&str>) -> AppViewModel {
        AppViewModel {
            progress: project(status.as_ref()),
            message: message.map(str::to_string),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn idle_view_renders_only_message() {
        let lines = render(&view_for(None, Some("Upload failed")));
        assert_eq!(lines, vec!["Upload failed".to_string()]);
    }

    #[test]
    fn determinate_phase_shows_bar_and_percent() {
        let lines = render(&view_for(
            Some(JobStatus::new(JobState::Parsing, 0.2)),
            Some("queued"),
        ));
        assert_eq!(
            lines,
            vec![
                "[####................]  20% in progress: parsing".to_string(),
                "queued".to_string(),
            ]
        );
    }

    #[test]
    fn indeterminate_phase_shows_spinner_bar() {
        let mut status = JobStatus::new(JobState::Storing, 0.98);
        status.phase = Some("writing vectors".to_string());
        let lines = render(&view_for(Some(status), None));
        assert_eq!(
            lines,
            vec![format!(
                "[{}] in progress: storing - writing vectors",
                "~".repeat(BAR_WIDTH)
            )]
        );
    }

    #[test]
    fn terminal_state_hides_bar() {
        let lines = render(&view_for(
            Some(JobStatus::failed("corrupt file")),
            Some("corrupt file"),
        ));
        assert_eq!(lines, vec!["error".to_string(), "corrupt file".to_string()]);
    }

    #[test]
    fn uploading_is_announced() {
        let view = AppViewModel {
            uploading: true,
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), vec!["Uploading...".to_string()]);
    }

    #[test]
    fn documents_are_listed_in_order() {
        let docs = vec!["a.pdf".to_string(), "b.pdf".to_string()];
        assert_eq!(
            render_documents(&docs),
            vec![
                "Uploaded documents:".to_string(),
                "  - a.pdf".to_string(),
                "  - b.pdf".to_string(),
            ]
        );
        assert!(render_documents(&[]).is_empty());
    }
}
