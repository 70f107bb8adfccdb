use crate::input::InputEvent;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::Duration;

/// Failure reported by an [`ImageDisplay`] backend.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("cannot decode {file}: {message}")]
    Decode { file: String, message: String },
    #[error("display surface is gone")]
    Disconnected,
}

/// Surface that renders one image at a time and reports key presses.
pub trait ImageDisplay {
    /// Renders the image at `path`, replacing whatever was shown.
    fn show(&mut self, path: &Path, grayscale: bool) -> Result<(), DisplayError>;

    /// Waits at most `timeout` for the next key press.
    fn poll_key(&mut self, timeout: Duration) -> Option<InputEvent>;

    /// Releases every window or device handle held by the display.
    fn close_all(&mut self);

    /// Called after `file` was labeled `class`.
    fn notify(&mut self, _file: &str, _class: &str) {}

    /// Called when the current image could not be shown.
    fn report_failure(&mut self, _error: &DisplayError) {}
}

/// Calls [`ImageDisplay::close_all`] when dropped.
pub(crate) struct SurfaceGuard<'a, D: ImageDisplay + ?Sized> {
    display: &'a mut D,
}

impl<'a, D: ImageDisplay + ?Sized> SurfaceGuard<'a, D> {
    pub(crate) fn new(display: &'a mut D) -> Self {
        Self { display }
    }
}

impl<D: ImageDisplay + ?Sized> Deref for SurfaceGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.display
    }
}

impl<D: ImageDisplay + ?Sized> DerefMut for SurfaceGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.display
    }
}

impl<D: ImageDisplay + ?Sized> Drop for SurfaceGuard<'_, D> {
    fn drop(&mut self) {
        self.display.close_all();
    }
}
