use super::state::Step;
use super::DocsUploader;
use docs_uploader::utils::file_size::FileSizeUtils;
use docs_uploader::WorkflowState;
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 180, 0);

/// Clicks collected during a frame, applied once rendering is done.
#[derive(Default)]
struct Actions {
    picked: Vec<std::path::PathBuf>,
    remove: Option<usize>,
    upload: bool,
    reset: bool,
    dismiss_error: bool,
}

impl DocsUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let mut actions = Actions::default();

        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 60.0;
            let content_height = total_height - footer_height;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Document Uploader");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Add documents and send them in one upload")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_steps(ui);
                    ui.add_space(20.0);

                    match self.state.step {
                        Step::Select => self.render_selection(ui, ctx, &mut actions),
                        Step::Upload => self.render_progress(ui, &mut actions),
                    }
                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(15.0);
                self.render_footer(ui, &mut actions);
            });
        });

        if actions.dismiss_error {
            self.state.dismiss_error();
        }
        if let Some(index) = actions.remove {
            self.remove_file(index);
        }
        self.add_paths(std::mem::take(&mut actions.picked));
        if actions.upload {
            self.start_upload();
        }
        if actions.reset {
            self.reset();
        }
    }

    fn render_steps(&self, ui: &mut egui::Ui) {
        let second_active = self.state.step == Step::Upload;
        ui.horizontal(|ui| {
            ui.label(RichText::new("1. Select files").color(ACCENT).strong());
            ui.label("──");
            let second = RichText::new("2. Upload");
            if second_active {
                ui.label(second.color(ACCENT).strong());
            } else {
                ui.label(second.weak());
            }
        });
    }

    fn render_selection(&self, ui: &mut egui::Ui, ctx: &egui::Context, actions: &mut Actions) {
        let validator = self.workflow.validator();
        let extensions: Vec<&str> = validator.allowed_extensions().collect();
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                if hovering {
                    ui.label(RichText::new("Drop files to add them").color(ACCENT));
                } else {
                    ui.label("Drag files here or pick them below");
                }
                ui.label(
                    RichText::new(format!(
                        "Formats: {} | Up to {} per file",
                        extensions.join(", "),
                        FileSizeUtils::format_size(validator.max_size_bytes())
                    ))
                    .small()
                    .weak(),
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("📄 Choose Files").clicked() {
                        if let Some(paths) = FileDialog::new()
                            .add_filter("Documents", extensions.as_slice())
                            .pick_files()
                        {
                            actions.picked.extend(paths);
                        }
                    }
                    if ui.button("📁 Add Folder").clicked() {
                        if let Some(path) = FileDialog::new().pick_folder() {
                            actions.picked.push(path);
                        }
                    }
                });
            });
        });

        let entries = self.workflow.selection().entries();
        if !entries.is_empty() {
            ui.add_space(10.0);
            ui.label(
                RichText::new(format!(
                    "{} file(s) selected, {} total",
                    entries.len(),
                    FileSizeUtils::format_size(self.workflow.selection().total_bytes())
                ))
                .weak(),
            );
            egui::ScrollArea::vertical()
                .id_source("selected_files")
                .max_height(220.0)
                .show(ui, |ui| {
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .show(ui, |ui| {
                            ui.add_space(6.0);
                            for (index, entry) in entries.iter().enumerate() {
                                let file = entry.file();
                                ui.horizontal(|ui| {
                                    ui.label(file.name.as_str());
                                    ui.label(
                                        RichText::new(FileSizeUtils::format_gb(file.size_bytes))
                                            .weak(),
                                    );
                                    if ui.small_button("×").on_hover_text("Remove").clicked() {
                                        actions.remove = Some(index);
                                    }
                                });
                            }
                            ui.add_space(6.0);
                        });
                });
        }

        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(self.workflow.submit_label())
                .min_size(egui::vec2(200.0, 40.0));
            if ui.add_enabled(self.workflow.can_submit(), button).clicked() {
                actions.upload = true;
            }
            if let Some(reason) = self.workflow.submit_blocker() {
                ui.add_space(5.0);
                ui.label(RichText::new(reason.to_string()).color(ERROR_RED).small());
            }
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui, actions: &mut Actions) {
        ui.group(|ui| {
            let uploading = self.workflow.state() == WorkflowState::Uploading;
            if uploading {
                ui.label(format!(
                    "📤 Uploading {} file(s)...",
                    self.workflow.selection().size()
                ));
            }

            let progress_bar = egui::ProgressBar::new(self.workflow.progress())
                .show_percentage()
                .animate(uploading)
                .fill(ACCENT);
            ui.add(progress_bar);

            if self.state.show_success {
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    ui.colored_label(SUCCESS_GREEN, "✅ Files uploaded successfully!");
                    ui.add_space(5.0);
                    if ui.button("🔄 Upload More").clicked() {
                        actions.reset = true;
                    }
                });
            }
        });
    }

    fn render_footer(&self, ui: &mut egui::Ui, actions: &mut Actions) {
        if let Some(banner) = &self.state.error {
            ui.vertical_centered(|ui| {
                let label = egui::Label::new(RichText::new(&banner.message).color(ERROR_RED))
                    .sense(egui::Sense::click());
                if ui.add(label).on_hover_text("Click to dismiss").clicked() {
                    actions.dismiss_error = true;
                }
            });
        }
    }
}
