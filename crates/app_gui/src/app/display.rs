//! [`ImageDisplay`] backed by the egui window.
//!
//! The classification loop runs on a worker thread and talks to the window
//! over two channels: decoded frames go to the UI, key events come back.

use eframe::egui;
use image::imageops::FilterType;
use labeler_core::{DisplayError, ImageDisplay, InputEvent};
use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Largest texture side uploaded to the GPU; bigger images are scaled down.
const MAX_TEXTURE_SIDE: u32 = 4096;

/// RGBA pixels ready to become a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Messages from the session worker to the window.
#[derive(Debug)]
pub enum DisplayCommand {
    Show(Frame),
    Failed { message: String },
    Assigned { file: String, class: String },
    CloseAll,
}

pub struct ChannelDisplay {
    commands: Sender<DisplayCommand>,
    keys: Receiver<InputEvent>,
    ctx: egui::Context,
}

impl ChannelDisplay {
    pub fn new(
        commands: Sender<DisplayCommand>,
        keys: Receiver<InputEvent>,
        ctx: egui::Context,
    ) -> Self {
        Self {
            commands,
            keys,
            ctx,
        }
    }

    fn send(&self, cmd: DisplayCommand) -> Result<(), DisplayError> {
        self.commands
            .send(cmd)
            .map_err(|_| DisplayError::Disconnected)?;
        self.ctx.request_repaint();
        Ok(())
    }
}

impl ImageDisplay for ChannelDisplay {
    fn show(&mut self, path: &Path, grayscale: bool) -> Result<(), DisplayError> {
        let frame = decode_frame(path, grayscale)?;
        self.send(DisplayCommand::Show(frame))
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<InputEvent> {
        match self.keys.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("window closed, saving current labels");
                Some(InputEvent::Save)
            }
        }
    }

    fn close_all(&mut self) {
        if self.send(DisplayCommand::CloseAll).is_err() {
            tracing::debug!("window already gone");
        }
    }

    fn notify(&mut self, file: &str, class: &str) {
        let _ = self.send(DisplayCommand::Assigned {
            file: file.to_string(),
            class: class.to_string(),
        });
    }

    fn report_failure(&mut self, error: &DisplayError) {
        let _ = self.send(DisplayCommand::Failed {
            message: error.to_string(),
        });
    }
}

/// Decodes `path` into RGBA, optionally as grayscale.
pub fn decode_frame(path: &Path, grayscale: bool) -> Result<Frame, DisplayError> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mut img = image::open(path).map_err(|e| DisplayError::Decode {
        file: file.clone(),
        message: e.to_string(),
    })?;
    if img.width() > MAX_TEXTURE_SIDE || img.height() > MAX_TEXTURE_SIDE {
        img = img.resize(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE, FilterType::Triangle);
    }
    if grayscale {
        img = img.grayscale();
    }
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(Frame {
        file,
        size: [w as usize, h as usize],
        rgba: rgba.into_raw(),
    })
}
