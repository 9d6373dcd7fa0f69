//! Text/binary classification of entry payloads.

/// Placeholder shown instead of a binary payload.
pub const BINARY_PLACEHOLDER: &str = "[Binary file - Preview not available]";

/// Placeholder shown when a directory is selected.
pub const DIRECTORY_PLACEHOLDER: &str = "[Folders cannot be edited]";

/// An entry payload as the editor sees it.
///
/// Payloads that decode as UTF-8 are editable text. Anything else is kept as
/// opaque bytes and must not be written back through the text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Valid UTF-8 text.
    Text(String),
    /// Undecodable payload; editing is unavailable.
    Binary(Vec<u8>),
}

impl EntryContent {
    /// Classifies raw entry bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary(e.into_bytes()),
        }
    }

    /// Returns `true` if the payload can be edited as text.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the text, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns what an editor should display.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Binary(_) => BINARY_PLACEHOLDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_text() {
        let content = EntryContent::from_bytes("héllo".as_bytes().to_vec());
        assert!(content.is_editable());
        assert_eq!(content.as_text(), Some("héllo"));
        assert_eq!(content.display_text(), "héllo");
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        let bytes = vec![0xff, 0xfe, 0x00, 0x41];
        let content = EntryContent::from_bytes(bytes.clone());
        assert_eq!(content, EntryContent::Binary(bytes));
        assert!(!content.is_editable());
        assert_eq!(content.display_text(), BINARY_PLACEHOLDER);
        assert_eq!(content.len(), 4);
    }

    #[test]
    fn test_empty_is_text() {
        let content = EntryContent::from_bytes(Vec::new());
        assert!(content.is_editable());
        assert!(content.is_empty());
    }
}
