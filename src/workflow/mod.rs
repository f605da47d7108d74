mod events;

pub use events::{IgnoreReason, SubmitOutcome, WorkflowEvent, WorkflowState};

use crate::error::WorkflowError;
use crate::identity::IdentityProvider;
use crate::upload::{
    CandidateFile, FileValidator, SelectionStore, UploadResult, UploadSession, Uploader,
    ValidationOutcome,
};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Two-step upload workflow: pick files, then send them in one request.
///
/// The selection can only change while `Selecting`. At most one upload is in
/// flight; a failed upload rolls back to `Selecting` with the selection intact.
pub struct UploadWorkflow {
    validator: FileValidator,
    identity: Box<dyn IdentityProvider>,
    selection: SelectionStore,
    state: WorkflowState,
    session: Option<UploadSession>,
    next_session_id: u64,
    error: Option<String>,
    events: VecDeque<WorkflowEvent>,
}

impl UploadWorkflow {
    pub fn new(validator: FileValidator, identity: Box<dyn IdentityProvider>) -> Self {
        Self {
            validator,
            identity,
            selection: SelectionStore::new(),
            state: WorkflowState::Selecting,
            session: None,
            next_session_id: 1,
            error: None,
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn validator(&self) -> &FileValidator {
        &self.validator
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.session.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.state == WorkflowState::Selecting
            && !self.selection.is_empty()
            && self.identity.resolve_identity().is_some()
    }

    /// Why a non-empty selection cannot be submitted right now, if anything other
    /// than an empty selection or a running upload is in the way.
    pub fn submit_blocker(&self) -> Option<WorkflowError> {
        let blocked = self.state == WorkflowState::Selecting
            && !self.selection.is_empty()
            && self.identity.resolve_identity().is_none();
        blocked.then_some(WorkflowError::MissingIdentity)
    }

    pub fn submit_label(&self) -> String {
        match self.selection.size() {
            0 => "Upload files".to_string(),
            n => format!("Upload files ({})", n),
        }
    }

    /// Coarse progress for the upload step.
    pub fn progress(&self) -> f32 {
        match self.state {
            WorkflowState::Selecting | WorkflowState::Failed => 0.0,
            WorkflowState::Uploading => 0.3,
            WorkflowState::Succeeded => 1.0,
        }
    }

    pub fn drain_events(&mut self) -> Vec<WorkflowEvent> {
        self.events.drain(..).collect()
    }

    pub fn on_files_submitted(
        &mut self,
        batch: impl IntoIterator<Item = CandidateFile>,
    ) -> Result<ValidationOutcome, WorkflowError> {
        self.ensure_selecting()?;
        self.clear_error();

        let outcome = self.validator.validate(batch, self.selection.entries());
        if let Some(message) = outcome.error_message() {
            self.raise_error(message);
        }
        if !outcome.accepted.is_empty() {
            self.selection.add(outcome.accepted.iter().cloned());
            self.selection_changed();
        }
        Ok(outcome)
    }

    pub fn on_remove_requested(&mut self, index: usize) -> Result<CandidateFile, WorkflowError> {
        self.ensure_selecting()?;
        let removed = self.selection.remove_at(index)?;
        debug!("removed {} from selection", removed.name);
        self.selection_changed();
        Ok(removed)
    }

    pub fn on_submit_requested(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        if self.state != WorkflowState::Selecting {
            debug!("submit ignored while {:?}", self.state);
            return Ok(SubmitOutcome::Ignored(IgnoreReason::Busy(self.state)));
        }
        if self.selection.is_empty() {
            return Ok(SubmitOutcome::Ignored(IgnoreReason::EmptySelection));
        }
        let Some(identity) = self.identity.resolve_identity() else {
            warn!("submit refused: no identity available");
            self.raise_error(WorkflowError::MissingIdentity.to_string());
            return Err(WorkflowError::MissingIdentity);
        };

        self.clear_error();
        let session = UploadSession {
            id: self.next_session_id,
            identity,
            files: self.selection.snapshot(),
        };
        self.next_session_id += 1;
        info!(
            "starting upload session {} with {} file(s)",
            session.id,
            session.files.len()
        );

        self.session = Some(session.clone());
        self.set_state(WorkflowState::Uploading);
        self.events.push_back(WorkflowEvent::UploadStarted {
            files: session.files.len(),
        });
        Ok(SubmitOutcome::Started(session))
    }

    /// Settles the upload identified by `session_id`. Results for a session that
    /// is no longer active (for example after a reset) are dropped.
    pub fn on_upload_finished(&mut self, session_id: u64, result: UploadResult) {
        let active = self.state == WorkflowState::Uploading
            && self.session.as_ref().map(|s| s.id) == Some(session_id);
        if !active {
            debug!("dropping result for inactive session {}", session_id);
            return;
        }
        self.session = None;

        if result.is_created() {
            info!("upload session {} succeeded", session_id);
            self.set_state(WorkflowState::Succeeded);
            self.events.push_back(WorkflowEvent::Succeeded);
            return;
        }

        warn!("upload session {} failed: {:?}", session_id, result);
        self.set_state(WorkflowState::Failed);
        self.set_state(WorkflowState::Selecting);
        self.raise_error(result.user_message().unwrap_or_default());
    }

    pub fn on_reset(&mut self) {
        info!("resetting upload workflow");
        self.selection.clear();
        self.session = None;
        self.clear_error();
        self.set_state(WorkflowState::Selecting);
        self.selection_changed();
    }

    /// Submits and runs the upload to completion. Returns `None` when the submit was ignored.
    pub async fn run_upload(
        &mut self,
        uploader: &dyn Uploader,
    ) -> Result<Option<UploadResult>, WorkflowError> {
        let session = match self.on_submit_requested()? {
            SubmitOutcome::Started(session) => session,
            SubmitOutcome::Ignored(_) => return Ok(None),
        };
        let result = uploader.upload(&session).await;
        self.on_upload_finished(session.id, result.clone());
        Ok(Some(result))
    }

    fn ensure_selecting(&self) -> Result<(), WorkflowError> {
        if self.state == WorkflowState::Selecting {
            Ok(())
        } else {
            Err(WorkflowError::NotSelecting(self.state))
        }
    }

    fn set_state(&mut self, state: WorkflowState) {
        if self.state != state {
            self.state = state;
            self.events.push_back(WorkflowEvent::StateChanged(state));
        }
    }

    fn selection_changed(&mut self) {
        self.events.push_back(WorkflowEvent::SelectionChanged {
            count: self.selection.size(),
        });
    }

    fn raise_error(&mut self, message: String) {
        self.error = Some(message.clone());
        self.events.push_back(WorkflowEvent::ErrorRaised(message));
    }

    fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.events.push_back(WorkflowEvent::ErrorCleared);
        }
    }
}
