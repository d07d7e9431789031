//! Result presentation: editable, copyable text surfaces.
//!
//! Everything here is local state. Editing or copying a surface never
//! reaches the transport.

use std::time::Duration;

use nbt_core::mode::RewriteMode;
use nbt_core::status::JobResult;
use tokio::time::Instant;

use crate::controller::JobSnapshot;

/// Title of the raw transcription surface.
pub const RAW_TITLE: &str = "Transkripsjon";

/// How long a surface reports itself as copied.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Platform clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// One titled block of text the user can edit and copy.
///
/// The surface is seeded from job content. Later content only replaces the
/// text while the user is not editing; content that changes during an edit
/// is held back and applied when the edit is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableText {
    title: String,
    content: String,
    text: String,
    editing: bool,
    pending: Option<String>,
    copied_until: Option<Instant>,
}

impl EditableText {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            title: title.into(),
            text: content.clone(),
            content,
            editing: false,
            pending: None,
            copied_until: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The text as currently shown (including unsaved edits).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Feed the latest job content.
    pub fn sync(&mut self, content: &str) {
        if content == self.content {
            return;
        }
        self.content = content.to_string();

        if self.editing {
            self.pending = Some(self.content.clone());
        } else {
            self.text = self.content.clone();
        }
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    /// Replace the text while editing. Ignored otherwise.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.editing {
            self.text = text.into();
        }
    }

    /// Finish editing.
    pub fn save(&mut self) {
        self.editing = false;
        if let Some(content) = self.pending.take() {
            self.text = content;
        }
    }

    /// Put the current text on `clipboard`. A failure is logged and
    /// otherwise ignored.
    pub fn copy(&mut self, clipboard: &dyn Clipboard) -> bool {
        match clipboard.write_text(&self.text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + COPY_FEEDBACK);
                true
            }
            Err(e) => {
                tracing::warn!(title = %self.title, error = %e, "Copy to clipboard failed");
                false
            }
        }
    }

    /// Whether the "copied" feedback should still be shown.
    pub fn is_copied(&self) -> bool {
        self.copied_until
            .is_some_and(|until| Instant::now() < until)
    }
}

/// The surfaces shown for a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    mode: RewriteMode,
    raw: EditableText,
    clean: Option<EditableText>,
}

impl ResultView {
    pub fn new(result: &JobResult, mode: RewriteMode) -> Self {
        Self {
            mode,
            raw: EditableText::new(RAW_TITLE, result.raw.clone()),
            clean: result
                .clean
                .as_ref()
                .map(|clean| EditableText::new(mode.clean_title(), clean.clone())),
        }
    }

    /// The view for a snapshot's finished job, if there is one.
    pub fn from_snapshot(snapshot: &JobSnapshot) -> Option<Self> {
        let job = snapshot.job.as_ref()?;
        Some(Self::new(job.result()?, job.mode()))
    }

    pub fn raw(&self) -> &EditableText {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut EditableText {
        &mut self.raw
    }

    /// The rewritten surface, present only when the job produced clean text.
    pub fn clean(&self) -> Option<&EditableText> {
        self.clean.as_ref()
    }

    pub fn clean_mut(&mut self) -> Option<&mut EditableText> {
        self.clean.as_mut()
    }

    /// Feed a newer result for the same job.
    pub fn sync(&mut self, result: &JobResult) {
        self.raw.sync(&result.raw);

        match &result.clean {
            Some(clean) => match self.clean.as_mut() {
                Some(surface) => surface.sync(clean),
                None => {
                    self.clean = Some(EditableText::new(self.mode.clean_title(), clean.clone()));
                }
            },
            // A surface being edited outlives the content it came from.
            None if self.clean.as_ref().is_some_and(EditableText::is_editing) => {
                tracing::debug!("Clean text withdrawn during an edit; keeping the surface");
            }
            None => self.clean = None,
        }
    }
}
