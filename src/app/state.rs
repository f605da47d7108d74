use docs_uploader::upload::UploadResult;
use docs_uploader::{WorkflowEvent, WorkflowState};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(7);

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorBanner {
    pub message: String,
    pub shown_at: Instant,
}

/// Step shown in the two-step indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Select,
    Upload,
}

/// Presenter-side view of the workflow, rebuilt from workflow events.
pub struct UploadState {
    pub step: Step,
    pub error: Option<ErrorBanner>,
    pub show_success: bool,
    pub result_receiver: Option<Receiver<(u64, UploadResult)>>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            step: Step::Select,
            error: None,
            show_success: false,
            result_receiver: None,
        }
    }
}

impl UploadState {
    pub fn apply(&mut self, event: &WorkflowEvent, now: Instant) {
        match event {
            WorkflowEvent::SelectionChanged { .. } => {}
            WorkflowEvent::StateChanged(state) => {
                self.step = match state {
                    WorkflowState::Selecting | WorkflowState::Failed => Step::Select,
                    WorkflowState::Uploading | WorkflowState::Succeeded => Step::Upload,
                };
                if *state != WorkflowState::Succeeded {
                    self.show_success = false;
                }
            }
            WorkflowEvent::ErrorRaised(message) => self.show_error(message.clone(), now),
            WorkflowEvent::ErrorCleared => self.error = None,
            WorkflowEvent::UploadStarted { .. } => self.show_success = false,
            WorkflowEvent::Succeeded => self.show_success = true,
        }
    }

    pub fn show_error(&mut self, message: String, now: Instant) {
        self.error = Some(ErrorBanner {
            message,
            shown_at: now,
        });
    }

    /// Adds `message` below the banner already shown, or shows it on its own.
    pub fn append_error(&mut self, message: String, now: Instant) {
        let message = match self.error.take() {
            Some(banner) => format!("{}\n{}", banner.message, message),
            None => message,
        };
        self.show_error(message, now);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Hides the banner once it has been visible long enough. Returns the time left otherwise.
    pub fn expire_error(&mut self, now: Instant) -> Option<Duration> {
        let shown_for = now.duration_since(self.error.as_ref()?.shown_at);
        if shown_for >= ERROR_DISMISS_AFTER {
            self.error = None;
            None
        } else {
            Some(ERROR_DISMISS_AFTER - shown_for)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_banner_expires_after_timeout() {
        let start = Instant::now();
        let mut state = UploadState::default();
        state.apply(&WorkflowEvent::ErrorRaised("boom".into()), start);

        assert_eq!(
            state.expire_error(start + Duration::from_secs(2)),
            Some(Duration::from_secs(5))
        );
        assert!(state.error.is_some());
        assert_eq!(state.expire_error(start + ERROR_DISMISS_AFTER), None);
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_upload_returns_to_first_step() {
        let now = Instant::now();
        let mut state = UploadState::default();
        state.apply(&WorkflowEvent::StateChanged(WorkflowState::Uploading), now);
        assert_eq!(state.step, Step::Upload);

        state.apply(&WorkflowEvent::StateChanged(WorkflowState::Failed), now);
        state.apply(&WorkflowEvent::StateChanged(WorkflowState::Selecting), now);
        state.apply(&WorkflowEvent::ErrorRaised("Server error: 500".into()), now);
        assert_eq!(state.step, Step::Select);
        assert_eq!(
            state.error.as_ref().map(|e| e.message.as_str()),
            Some("Server error: 500")
        );
    }

    #[test]
    fn success_flag_follows_workflow() {
        let now = Instant::now();
        let mut state = UploadState::default();
        state.apply(&WorkflowEvent::StateChanged(WorkflowState::Succeeded), now);
        state.apply(&WorkflowEvent::Succeeded, now);
        assert!(state.show_success);

        state.apply(&WorkflowEvent::StateChanged(WorkflowState::Selecting), now);
        state.apply(&WorkflowEvent::SelectionChanged { count: 0 }, now);
        assert!(!state.show_success);
        assert_eq!(state.step, Step::Select);
    }

    #[test]
    fn scan_errors_stack_under_rejections() {
        let now = Instant::now();
        let mut state = UploadState::default();
        state.append_error("Some files could not be read:\ngone.pdf".into(), now);
        assert_eq!(
            state.error.as_ref().map(|e| e.message.as_str()),
            Some("Some files could not be read:\ngone.pdf")
        );

        state.dismiss_error();
        state.apply(
            &WorkflowEvent::ErrorRaised("Some files were not added:\n\"a.exe\" - unsupported format".into()),
            now,
        );
        state.append_error("Some files could not be read:\ngone.pdf".into(), now);
        let message = state.error.as_ref().map(|e| e.message.as_str()).unwrap();
        assert!(message.starts_with("Some files were not added:"));
        assert!(message.ends_with("\nSome files could not be read:\ngone.pdf"));
    }
}
