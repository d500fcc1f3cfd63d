// egui front-end: one multiline editor, a send button, a cancel button, and
// a fading toast for notices.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::session::EditorSession;

const NOTICE_DURATION: f32 = 4.0; // seconds

pub struct QuillApp {
    session: EditorSession,
    notice: Option<(String, Instant)>,
}

impl QuillApp {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session,
            notice: None,
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    fn submit(&mut self) {
        if let Err(err) = self.session.submit() {
            self.notify(err.to_string());
        }
    }

    fn show_notice(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if let Some((message, since)) = &self.notice {
            let elapsed = since.elapsed().as_secs_f32();
            if elapsed < NOTICE_DURATION {
                let alpha = 1.0 - (elapsed / NOTICE_DURATION);
                let text = egui::RichText::new(message).color(
                    egui::Color32::from_rgba_unmultiplied(255, 200, 200, (alpha * 255.0) as u8),
                );
                ui.label(text);
                // Keep repainting so the fade-out animates.
                ctx.request_repaint();
            } else {
                self.notice = None;
            }
        }
    }
}

impl eframe::App for QuillApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for notice in self.session.poll() {
            self.notify(notice);
        }

        // Ctrl+Enter sends even while the editor has focus.
        let mut send_requested =
            ctx.input_mut(|i| i.consume_key(egui::Modifiers::CTRL, egui::Key::Enter));

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!self.session.is_pending(), egui::Button::new("Send"))
                    .clicked()
                {
                    send_requested = true;
                }
                if self.session.is_pending() {
                    ui.spinner();
                    if ui.button("Cancel").clicked() {
                        self.session.cancel();
                        self.notify("request cancelled");
                    }
                }
                ui.separator();
                self.show_notice(ui, ctx);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_sized(
                        [ui.available_width(), ui.available_height()],
                        egui::TextEdit::multiline(&mut self.session.buffer)
                            .hint_text("Enter text here...")
                            .lock_focus(true)
                            .desired_width(f32::INFINITY),
                    );
                });
        });

        if send_requested {
            self.submit();
        }

        // While a request is in flight the channel is polled by repainting.
        if self.session.is_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
