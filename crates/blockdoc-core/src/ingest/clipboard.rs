//! Clipboard payload model
//!
//! A paste event arrives as a set of format-keyed entries plus an optional
//! file list. Format negotiation scans `ACCEPTED_FORMATS` in order and
//! takes the first format present.

use std::collections::HashMap;

/// A clipboard format the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardFormat {
    /// Editor-native HTML: trusted, already in the target shape
    EditorHtml,
    /// Code-editor clipboard metadata (language info as JSON)
    VsCodeEditorData,
    /// File payloads
    Files,
    /// Generic HTML
    Html,
    /// Generic plain text
    PlainText,
}

impl ClipboardFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ClipboardFormat::EditorHtml => "blockdoc/html",
            ClipboardFormat::VsCodeEditorData => "vscode-editor-data",
            ClipboardFormat::Files => "Files",
            ClipboardFormat::Html => "text/html",
            ClipboardFormat::PlainText => "text/plain",
        }
    }
}

/// Fixed negotiation priority: editor-native > tool metadata > files >
/// generic HTML > generic plain text
pub const ACCEPTED_FORMATS: [ClipboardFormat; 5] = [
    ClipboardFormat::EditorHtml,
    ClipboardFormat::VsCodeEditorData,
    ClipboardFormat::Files,
    ClipboardFormat::Html,
    ClipboardFormat::PlainText,
];

/// One pasted file, as handed over by the host
#[derive(Debug, Clone, PartialEq)]
pub struct PastedFile {
    pub name: String,
    pub mime_type: String,
    /// Host-resolved location of the payload (object URL, path, ...)
    pub url: String,
}

/// Everything the host captured from one paste event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardPayload {
    text: HashMap<ClipboardFormat, String>,
    files: Vec<PastedFile>,
    /// Mime types present on the clipboard that the pipeline does not
    /// recognize; they make the payload non-empty but never negotiate
    unrecognized: Vec<String>,
}

impl ClipboardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: attach a text-bearing format
    ///
    /// `Files` is not text-bearing; use `with_files`.
    pub fn with_text(mut self, format: ClipboardFormat, data: impl Into<String>) -> Self {
        if format != ClipboardFormat::Files {
            self.text.insert(format, data.into());
        }
        self
    }

    /// Builder: attach file payloads
    pub fn with_files(mut self, files: Vec<PastedFile>) -> Self {
        self.files = files;
        self
    }

    /// Builder: record a clipboard mime type the pipeline does not know
    pub fn with_unrecognized(mut self, mime_type: impl Into<String>) -> Self {
        self.unrecognized.push(mime_type.into());
        self
    }

    /// True when the paste event carried no data at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.files.is_empty() && self.unrecognized.is_empty()
    }

    pub fn text_for(&self, format: ClipboardFormat) -> Option<&str> {
        self.text.get(&format).map(String::as_str)
    }

    pub fn files(&self) -> &[PastedFile] {
        &self.files
    }

    pub fn has_format(&self, format: ClipboardFormat) -> bool {
        match format {
            ClipboardFormat::Files => !self.files.is_empty(),
            _ => self.text.contains_key(&format),
        }
    }

    /// First available format in priority order
    pub fn negotiate(&self) -> Option<ClipboardFormat> {
        ACCEPTED_FORMATS
            .iter()
            .copied()
            .find(|f| self.has_format(*f))
    }
}
