//! The classification loop.
//!
//! [`Session`] is the pure state machine over a cursor into the
//! [`WorkQueue`]; [`classify`] drives it against an [`ImageDisplay`] and a
//! [`LabelStore`].

use crate::display::{ImageDisplay, SurfaceGuard};
use crate::error::Result;
use crate::input::InputEvent;
use crate::labels::{ClassList, LabelMap};
use crate::scan::{ScanOptions, WorkQueue};
use crate::store::LabelStore;
use std::path::Path;
use std::time::Duration;

/// Per-session knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Render images as grayscale.
    pub grayscale: bool,
    /// Upper bound of a single wait for input.
    pub poll_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            grayscale: false,
            poll_interval: Duration::from_millis(20),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// Every queued file was labeled.
    Completed,
    /// The operator discarded the session.
    Aborted,
    /// The operator saved and quit early.
    Saved,
}

/// Result of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub labels: LabelMap,
    pub exit: SessionExit,
}

/// What the driver has to do after an input was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep waiting on the current image.
    Wait,
    /// Render the image at the given queue index.
    Show(usize),
    /// The file at `file` was labeled `class`; then render `next`.
    Assigned {
        file: String,
        class: String,
        next: Option<usize>,
    },
    /// The session is over.
    Finished(SessionExit),
}

/// Cursor and accumulated labels of one run over a [`WorkQueue`].
#[derive(Debug, Clone)]
pub struct Session<'a> {
    queue: &'a WorkQueue,
    classes: &'a ClassList,
    prior: &'a LabelMap,
    labels: LabelMap,
    cursor: usize,
    unviewable: bool,
}

impl<'a> Session<'a> {
    /// Starts at the first queued file with a fresh copy of `prior`.
    pub fn new(queue: &'a WorkQueue, classes: &'a ClassList, prior: &'a LabelMap) -> Self {
        Self {
            queue,
            classes,
            prior,
            labels: prior.clone(),
            cursor: 0,
            unviewable: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// True once the cursor ran past the last queued file.
    pub fn is_done(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    /// Flags the current image as not renderable; digits are ignored until
    /// the cursor moves.
    pub fn mark_unviewable(&mut self) {
        self.unviewable = true;
    }

    pub fn handle(&mut self, event: InputEvent) -> Step {
        if self.is_done() {
            return Step::Finished(SessionExit::Completed);
        }
        match event {
            InputEvent::Digit(d) => {
                if self.unviewable {
                    tracing::debug!("ignoring digit {d}: current image could not be shown");
                    return Step::Wait;
                }
                let Some(class) = self.classes.for_digit(d) else {
                    return Step::Wait;
                };
                let Some(file) = self.queue.get(self.cursor) else {
                    return Step::Finished(SessionExit::Completed);
                };
                let (file, class) = (file.to_string(), class.to_string());
                self.labels.insert(file.clone(), class.clone());
                self.move_to(self.cursor + 1);
                let next = (!self.is_done()).then_some(self.cursor);
                Step::Assigned { file, class, next }
            }
            InputEvent::Back if self.cursor > 0 => {
                self.move_to(self.cursor - 1);
                Step::Show(self.cursor)
            }
            InputEvent::Abort => {
                self.labels = self.prior.clone();
                Step::Finished(SessionExit::Aborted)
            }
            InputEvent::Save => Step::Finished(SessionExit::Saved),
            InputEvent::Back | InputEvent::Other => Step::Wait,
        }
    }

    fn move_to(&mut self, cursor: usize) {
        self.cursor = cursor;
        self.unviewable = false;
    }

    pub fn into_labels(self) -> LabelMap {
        self.labels
    }
}

/// Runs the classification loop over `queue` until a terminal transition.
///
/// The display is closed on every exit path. On [`SessionExit::Saved`] the
/// labels are merged into `store` before returning; on
/// [`SessionExit::Aborted`] the returned map equals `prior`.
pub fn classify<D: ImageDisplay + ?Sized>(
    queue: &WorkQueue,
    classes: &ClassList,
    prior: &LabelMap,
    opts: SessionOptions,
    display: &mut D,
    store: &LabelStore,
) -> Result<SessionOutcome> {
    let mut guard = SurfaceGuard::new(display);
    let display = &mut *guard;
    let mut session = Session::new(queue, classes, prior);

    if session.is_done() {
        return Ok(SessionOutcome {
            labels: session.into_labels(),
            exit: SessionExit::Completed,
        });
    }
    show_current(&mut session, display, queue, opts);

    let exit = loop {
        let Some(event) = display.poll_key(opts.poll_interval) else {
            continue;
        };
        match session.handle(event) {
            Step::Wait => {}
            Step::Show(_) => show_current(&mut session, display, queue, opts),
            Step::Assigned { file, class, next } => {
                tracing::info!("Classified as {class}");
                tracing::debug!(file = %file, class = %class, "label assigned");
                display.notify(&file, &class);
                if next.is_some() {
                    show_current(&mut session, display, queue, opts);
                }
            }
            Step::Finished(exit) => break exit,
        }
        if session.is_done() {
            break SessionExit::Completed;
        }
    };
    tracing::debug!(?exit, cursor = session.cursor(), "session finished");

    let labels = match exit {
        SessionExit::Saved => store.save(session.labels())?,
        SessionExit::Completed | SessionExit::Aborted => session.into_labels(),
    };
    Ok(SessionOutcome { labels, exit })
}

/// Lists `folder`, queues the unlabeled files and runs [`classify`].
pub fn classify_folder<D: ImageDisplay + ?Sized>(
    folder: impl AsRef<Path>,
    classes: &ClassList,
    prior: &LabelMap,
    scan: ScanOptions,
    opts: SessionOptions,
    display: &mut D,
    store: &LabelStore,
) -> Result<SessionOutcome> {
    let queue = WorkQueue::from_folder(folder, scan, prior, Some(store.path()))?;
    classify(&queue, classes, prior, opts, display, store)
}

fn show_current<D: ImageDisplay + ?Sized>(
    session: &mut Session<'_>,
    display: &mut D,
    queue: &WorkQueue,
    opts: SessionOptions,
) {
    let Some(path) = queue.path_of(session.cursor()) else {
        return;
    };
    if let Err(e) = display.show(&path, opts.grayscale) {
        tracing::error!("{e}; press Backspace, Escape or S to continue");
        display.report_failure(&e);
        session.mark_unviewable();
    }
}
