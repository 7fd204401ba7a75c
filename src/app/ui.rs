use super::FormUploaderApp;
use crate::upload::UploadPhase;
use crate::utils::file_size::{format_size, format_transfer};
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

impl FormUploaderApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("File Upload");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Fill in the form, pick a file and upload it")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_form(ui);
                ui.add_space(20.0);
                self.render_file_input(ui);
                ui.add_space(20.0);
                self.render_controls(ui);

                if self.controller.widgets().progress_visible {
                    ui.add_space(20.0);
                    self.render_progress(ui);
                }

                ui.add_space(20.0);
                self.render_alert(ui);
                self.render_completion(ui);
            });
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui) {
        let editable = self.controller.phase() == UploadPhase::Idle;
        ui.group(|ui| {
            ui.add_enabled_ui(editable, |ui| {
                egui::Grid::new("upload_form")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        for field in self.controller.form_mut().visible_fields_mut() {
                            ui.label(field.label.as_str());
                            ui.text_edit_singleline(&mut field.value);
                            ui.end_row();
                        }
                    });
            });
        });
    }

    fn render_file_input(&mut self, ui: &mut egui::Ui) {
        let input = self.controller.widgets().file_input.clone();
        ui.group(|ui| {
            ui.horizontal(|ui| {
                let browse = ui.add_enabled(input.enabled, egui::Button::new("📁 Browse"));
                if browse.clicked() {
                    if let Some(path) = FileDialog::new().pick_file() {
                        self.choose_file(&path);
                    }
                }
                ui.label(input.label.as_str());
                if let Some(file) = &input.selected {
                    ui.label(
                        RichText::new(format!("({})", format_size(file.size)))
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                }
            });
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let widgets = self.controller.widgets().clone();
        ui.vertical_centered(|ui| {
            if widgets.upload_button_visible {
                let button = egui::Button::new("📤 Upload").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.start_upload();
                }
            }
            ui.horizontal(|ui| {
                if widgets.loading_button_visible {
                    ui.add(egui::Spinner::new());
                    ui.label("Uploading...");
                }
                if widgets.cancel_button_visible && ui.button("Cancel").clicked() {
                    self.controller.cancel();
                }
            });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        let widgets = self.controller.widgets();
        ui.group(|ui| {
            let progress_bar =
                egui::ProgressBar::new(f32::from(widgets.progress_percent) / 100.0)
                    .animate(false)
                    .fill(Color32::from_rgb(161, 89, 225));
            ui.add(progress_bar);
            ui.horizontal(|ui| {
                ui.label(widgets.progress_status.as_str());
                if let Some((loaded, total)) = self.controller.transfer() {
                    ui.label(
                        RichText::new(format_transfer(loaded, total))
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                }
            });
        });
    }

    fn render_alert(&mut self, ui: &mut egui::Ui) {
        let Some(alert) = self.controller.widgets().alert.clone() else {
            return;
        };
        egui::Frame::none()
            .stroke(egui::Stroke::new(1.0, alert.kind.color()))
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(alert.kind.color(), alert.message.as_str());
                    if ui.small_button("×").clicked() {
                        self.controller.dismiss_alert();
                    }
                });
            });
    }

    fn render_completion(&self, ui: &mut egui::Ui) {
        let Some(result) = &self.completion else {
            return;
        };
        ui.add_space(10.0);
        ui.group(|ui| match result {
            Ok(report) => {
                ui.label(format!("Form submitted (status {})", report.status));
                egui::ScrollArea::vertical()
                    .id_source("completion_body")
                    .max_height(200.0)
                    .show(ui, |ui| {
                        ui.monospace(report.body.as_str());
                    });
            }
            Err(reason) => {
                ui.colored_label(Color32::from_rgb(220, 50, 50), reason.as_str());
            }
        });
    }
}
