use std::time::Instant;

use eframe::egui;

use crate::connection::POLL_INTERVAL;
use crate::session::Session;

/// Modal feedback raised by the last user action. Errors block the rest of
/// the window until dismissed; warnings do not.
enum Dialog {
    Error(String),
    Warning(String),
}

pub struct RfidApp {
    session: Session,
    hex_input: String,
    dialog: Option<Dialog>,
    last_poll: Instant,
}

impl RfidApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: Session::new(),
            hex_input: String::new(),
            dialog: None,
            last_poll: Instant::now(),
        }
    }

    fn toggle_connection(&mut self) {
        if self.session.is_connected() {
            self.session.disconnect();
        } else if let Err(e) = self.session.connect() {
            self.dialog = Some(Dialog::Error(format!("{:#}", e)));
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let (title, message) = match &self.dialog {
            Some(Dialog::Error(m)) => ("Error", m.clone()),
            Some(Dialog::Warning(m)) => ("Input Error", m.clone()),
            None => return,
        };

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.dialog = None;
        }
    }
}

impl eframe::App for RfidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Fixed 100 ms poll cadence while connected, driven by the repaint
        // loop rather than a timer thread.
        if self.session.is_connected() {
            if self.last_poll.elapsed() >= POLL_INTERVAL {
                self.session.poll();
                self.last_poll = Instant::now();
            }
            ctx.request_repaint_after(POLL_INTERVAL);
        }

        let blocking_error = matches!(self.dialog, Some(Dialog::Error(_)));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocking_error, |ui| {
                let connected = self.session.is_connected();

                ui.horizontal(|ui| {
                    let label = if connected { "Disconnect" } else { "Connect" };
                    if ui.button(label).clicked() {
                        self.toggle_connection();
                    }
                    let status = if connected {
                        "Status: Connected"
                    } else {
                        "Status: Disconnected"
                    };
                    ui.label(status);
                });

                ui.add(
                    egui::TextEdit::singleline(&mut self.hex_input)
                        .hint_text("Enter 7 two-digit hex codes (e.g., 12 AB CD 34 EF 56 78)")
                        .desired_width(f32::INFINITY),
                );

                ui.add_enabled_ui(connected, |ui| {
                    if ui.button("Write").clicked() {
                        if let Err(e) = self.session.write(&self.hex_input) {
                            self.dialog = Some(Dialog::Warning(format!("{:#}", e)));
                        }
                    }
                    if ui.button("Read").clicked() {
                        self.session.read();
                    }
                    if ui.button("Zeroise").clicked() {
                        self.session.clear();
                    }
                });

                ui.label("Log:");
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in self.session.log().lines() {
                            ui.label(line.as_str());
                        }
                    });
            });
        });

        self.show_dialog(ctx);
    }
}
