use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use wyd_core::onboarding::Attachment;

use crate::types::Part;
use crate::Result;

/// Encode raw bytes as an attachment. The MIME type is taken as given.
pub fn encode(bytes: &[u8], mime_type: impl Into<String>, file_name: Option<String>) -> Attachment {
    Attachment {
        mime_type: mime_type.into(),
        data: STANDARD.encode(bytes),
        file_name,
    }
}

/// Read a file and encode it, guessing the MIME type from its extension.
///
/// Any file type is accepted; unknown extensions become
/// `application/octet-stream`.
pub fn read(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    tracing::debug!(path = %path.display(), mime = %mime, size = bytes.len(), "attachment read");
    Ok(encode(&bytes, mime.essence_str(), name))
}

/// Text sent with an attachment when the user typed nothing.
pub fn default_caption(attachment: &Attachment) -> String {
    let name = attachment.file_name.as_deref().unwrap_or("archivo");
    format!("He adjuntado un archivo: {name}")
}

pub fn to_part(attachment: &Attachment) -> Part {
    Part::inline(attachment.mime_type.clone(), attachment.data.clone())
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn encodes_base64() {
        let a = encode(b"hola", "text/plain", None);
        assert_eq!(a.data, "aG9sYQ==");
        assert_eq!(a.mime_type, "text/plain");
    }

    #[test]
    fn read_guesses_mime_and_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("horario.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let a = read(&path).unwrap();
        assert_eq!(a.mime_type, "image/png");
        assert!(a.is_image());
        assert_eq!(a.file_name.as_deref(), Some("horario.png"));
        assert_eq!(default_caption(&a), "He adjuntado un archivo: horario.png");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.zzqx");
        std::fs::write(&path, b"x").unwrap();
        assert_eq!(read(&path).unwrap().mime_type, "application/octet-stream");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(read(&dir.path().join("nope.pdf")).is_err());
    }

    #[test]
    fn part_carries_inline_data() {
        let a = encode(b"%PDF", "application/pdf", None);
        let part = to_part(&a);
        let inline = part.inline_data.unwrap();
        assert_eq!(inline.mime_type, "application/pdf");
        assert_eq!(inline.data, a.data);
        assert!(part.text.is_none());
    }
}
