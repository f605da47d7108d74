mod state;
mod ui;

use docs_uploader::config::Settings;
use docs_uploader::identity::{ChainedIdentity, EnvIdentity, StaticIdentity};
use docs_uploader::upload::{candidates_from_paths, UploadClient, UploadResult};
use docs_uploader::workflow::SubmitOutcome;
use docs_uploader::UploadWorkflow;
use eframe::{egui, App};
use state::UploadState;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct DocsUploader {
    workflow: UploadWorkflow,
    client: UploadClient,
    state: UploadState,
}

impl DocsUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing document uploader");
        let identity = ChainedIdentity(vec![
            Box::new(StaticIdentity(settings.user_id.clone())),
            Box::new(EnvIdentity::new("UPLOADER_USER_ID")),
        ]);
        let client = UploadClient::new(settings.endpoint.clone());
        info!("Uploading to {}", client.endpoint());
        Self {
            workflow: UploadWorkflow::new(settings.validator(), Box::new(identity)),
            client,
            state: UploadState::default(),
        }
    }

    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let scan = candidates_from_paths(&paths);
        let read_errors = scan.error_message();
        let now = Instant::now();
        if let Err(e) = self.workflow.on_files_submitted(scan.candidates) {
            warn!("batch refused: {}", e);
            self.state.show_error(e.to_string(), now);
            return;
        }
        // Apply the rejection banner first so read failures are listed under it.
        for event in self.workflow.drain_events() {
            self.state.apply(&event, now);
        }
        if let Some(message) = read_errors {
            self.state.append_error(message, now);
        }
    }

    pub fn remove_file(&mut self, index: usize) {
        if let Err(e) = self.workflow.on_remove_requested(index) {
            warn!("remove refused: {}", e);
        }
    }

    pub fn start_upload(&mut self) {
        let session = match self.workflow.on_submit_requested() {
            Ok(SubmitOutcome::Started(session)) => session,
            Ok(SubmitOutcome::Ignored(reason)) => {
                info!("upload not started: {:?}", reason);
                return;
            }
            // Already surfaced as an error event.
            Err(_) => return,
        };

        let (sender, receiver) = std_mpsc::channel();
        self.state.result_receiver = Some(receiver);
        let client = self.client.clone();

        std::thread::spawn(move || {
            let result = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(client.send_session(&session)),
                Err(e) => {
                    error!("failed to start upload runtime: {}", e);
                    UploadResult::NetworkError(e.to_string())
                }
            };
            let _ = sender.send((session.id, result));
        });
    }

    pub fn reset(&mut self) {
        self.state.result_receiver = None;
        self.workflow.on_reset();
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        self.add_paths(dropped);

        let finished = self
            .state
            .result_receiver
            .as_ref()
            .and_then(|receiver| receiver.try_recv().ok());
        if let Some((session_id, result)) = finished {
            self.state.result_receiver = None;
            self.workflow.on_upload_finished(session_id, result);
        }

        let now = Instant::now();
        for event in self.workflow.drain_events() {
            self.state.apply(&event, now);
        }

        if let Some(remaining) = self.state.expire_error(now) {
            ctx.request_repaint_after(remaining);
        }
        if self.state.result_receiver.is_some() {
            ctx.request_repaint();
        }
    }
}

impl App for DocsUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
