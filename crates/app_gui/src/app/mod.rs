mod display;
mod legend;

use anyhow::{Context, Result, anyhow};
use display::{ChannelDisplay, DisplayCommand, Frame};
use eframe::{App, NativeOptions, egui};
use labeler_core::{
    ClassList, InputEvent, LabelMap, LabelStore, SessionOptions, SessionOutcome, WorkQueue,
    classify,
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Opens the window and runs one classification session over `queue`.
///
/// Returns once the session reached a terminal transition and the window is
/// closed.
pub fn run_window(
    queue: WorkQueue,
    classes: ClassList,
    prior: LabelMap,
    opts: SessionOptions,
    store: LabelStore,
) -> Result<SessionOutcome> {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (key_tx, key_rx) = mpsc::channel();
    let (worker_tx, worker_rx) = mpsc::channel();

    let title = format!("Labeler {}", env!("LABELER_VERSION"));
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    let legend = classes.clone();
    let total = queue.len();

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let handle = thread::Builder::new()
                .name("labeler-session".into())
                .spawn(move || {
                    let mut display = ChannelDisplay::new(cmd_tx, key_rx, ctx);
                    classify(&queue, &classes, &prior, opts, &mut display, &store)
                })?;
            let _ = worker_tx.send(handle);
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(
                cmd_rx, key_tx, legend, total,
            )))
        }),
    )
    .map_err(|e| anyhow!("window stopped with error: {e}"))?;

    let handle = worker_rx
        .try_recv()
        .context("classification session was never started")?;
    let outcome = handle
        .join()
        .map_err(|_| anyhow!("classification session panicked"))?
        .context("classification session failed")?;
    Ok(outcome)
}

struct UiApp {
    commands: Receiver<DisplayCommand>,
    keys: Sender<InputEvent>,
    classes: ClassList,
    total: usize,
    texture: Option<egui::TextureHandle>,
    current: Option<String>,
    failure: Option<String>,
    last_class: Option<String>,
    labeled: usize,
    status: String,
    closing: bool,
}

impl UiApp {
    fn new(
        commands: Receiver<DisplayCommand>,
        keys: Sender<InputEvent>,
        classes: ClassList,
        total: usize,
    ) -> Self {
        Self {
            commands,
            keys,
            classes,
            total,
            texture: None,
            current: None,
            failure: None,
            last_class: None,
            labeled: 0,
            status: String::new(),
            closing: false,
        }
    }

    fn drain_commands(&mut self, ctx: &egui::Context) {
        while let Ok(cmd) = self.commands.try_recv() {
            match cmd {
                DisplayCommand::Show(frame) => self.load_frame(ctx, frame),
                DisplayCommand::Failed { message } => {
                    self.texture = None;
                    self.failure = Some(message);
                }
                DisplayCommand::Assigned { file, class } => {
                    self.labeled += 1;
                    self.status = format!("{file} → {class}");
                    self.last_class = Some(class);
                }
                DisplayCommand::CloseAll => {
                    self.closing = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }

    fn load_frame(&mut self, ctx: &egui::Context, frame: Frame) {
        let color = egui::ColorImage::from_rgba_unmultiplied(frame.size, &frame.rgba);
        match &mut self.texture {
            Some(tex) => tex.set(color, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture(
                    "labeler:current",
                    color,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
        self.current = Some(frame.file);
        self.failure = None;
    }

    fn forward_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| decode_events(&i.events));
        for event in events {
            if self.keys.send(event).is_err() {
                self.closing = true;
                break;
            }
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_commands(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.closing {
            // eframe closes the window now; the worker finishes the save
            // while run_window joins it.
            self.closing = true;
            let _ = self.keys.send(InputEvent::Save);
        }
        if !self.closing {
            self.forward_input(ctx);
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.current {
                    Some(file) => ui.strong(file),
                    None => ui.label("Loading…"),
                };
                ui.separator();
                ui.label(format!("Labeled: {} / {}", self.labeled, self.total));
                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        egui::SidePanel::left("legend").show(ctx, |ui| {
            self.render_legend_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.failure {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
                ui.label("Press Backspace to go back, Escape to discard or S to save.");
            } else if let Some(tex) = &self.texture {
                let available = ui.available_size();
                ui.centered_and_justified(|ui| {
                    ui.add(
                        egui::Image::new(tex)
                            .max_size(available)
                            .maintain_aspect_ratio(true),
                    );
                });
            }
        });
    }
}

/// Turns raw egui input into loop events. Digits and `s` come from text
/// input so they follow the keyboard layout.
fn decode_events(events: &[egui::Event]) -> Vec<InputEvent> {
    let mut out = Vec::new();
    for event in events {
        match event {
            egui::Event::Text(text) => out.extend(
                text.chars()
                    .map(InputEvent::from_char)
                    .filter(|e| *e != InputEvent::Other),
            ),
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => out.extend(decode_key(*key)),
            _ => {}
        }
    }
    out
}

fn decode_key(key: egui::Key) -> Option<InputEvent> {
    match key {
        egui::Key::Backspace => Some(InputEvent::Back),
        egui::Key::Escape => Some(InputEvent::Abort),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn text_events_become_digits_and_save() {
        let events = vec![
            egui::Event::Text("1x".into()),
            egui::Event::Text("s".into()),
            egui::Event::Text("0".into()),
        ];
        assert_eq!(
            decode_events(&events),
            vec![InputEvent::Digit(1), InputEvent::Save]
        );
    }

    #[rstest]
    #[case(egui::Key::Backspace, Some(InputEvent::Back))]
    #[case(egui::Key::Escape, Some(InputEvent::Abort))]
    #[case(egui::Key::Num1, None)]
    #[case(egui::Key::Enter, None)]
    fn named_keys_map_to_navigation(#[case] key: egui::Key, #[case] expected: Option<InputEvent>) {
        assert_eq!(decode_key(key), expected);
    }
}
