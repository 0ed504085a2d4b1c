//! File upload handling for file fields
//!
//! Each file field gets an `UploadHandler` holding its drop-zone state. A
//! path arrives either typed into the field (picker) or pasted onto the
//! terminal (drop); both go through `select`, which validates type and size
//! and installs the file on the field. The preview is produced once the
//! asynchronous read completes.

use super::banner::Banner;
use super::forms::{AttachedFile, FormSession};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/svg+xml"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejected {
    #[error("Please upload a valid image file (JPG, PNG, SVG)")]
    UnsupportedType { mime: String },
    #[error("File size must be less than 5MB")]
    TooLarge { size: u64 },
    #[error("Could not read file: {0}")]
    Unreadable(String),
}

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Type is checked before size
pub fn check_candidate(path: &Path, size: u64) -> Result<AttachedFile, FileRejected> {
    let mime = mime_for_path(path);
    if !ALLOWED_TYPES.contains(&mime) {
        return Err(FileRejected::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    if size > MAX_FILE_SIZE {
        return Err(FileRejected::TooLarge { size });
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(AttachedFile {
        path: path.to_path_buf(),
        file_name,
        mime: mime.to_string(),
        size,
    })
}

/// Check a path on disk
pub fn inspect(path: &Path) -> Result<AttachedFile, FileRejected> {
    let mime = mime_for_path(path);
    if !ALLOWED_TYPES.contains(&mime) {
        return Err(FileRejected::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    let metadata = fs::metadata(path).map_err(|e| FileRejected::Unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(FileRejected::Unreadable(format!(
            "{} is not a file",
            path.display()
        )));
    }
    check_candidate(path, metadata.len())
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Normalize a pasted path: surrounding quotes, `file://` prefix and
/// backslash-escaped spaces are stripped
pub fn parse_dropped_path(text: &str) -> Option<PathBuf> {
    let line = text.lines().find(|l| !l.trim().is_empty())?.trim();
    let unquoted = line
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
        .or_else(|| line.strip_prefix('"').and_then(|l| l.strip_suffix('"')))
        .unwrap_or(line);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let path = without_scheme.replace("\\ ", " ");
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Visual state of the drop zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneStyle {
    #[default]
    Idle,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Preview {
    pub file: AttachedFile,
    pub data_url: String,
}

/// A read the caller must perform and report back through `complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRead {
    pub field: String,
    pub generation: u64,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct UploadHandler {
    field: String,
    error_ttl: Duration,
    pub hover: bool,
    pub zone: ZoneStyle,
    pub preview: Option<Preview>,
    pub error: Option<Banner>,
    generation: u64,
}

impl UploadHandler {
    pub fn new(field: impl Into<String>, error_ttl: Duration) -> Self {
        Self {
            field: field.into(),
            error_ttl,
            hover: false,
            zone: ZoneStyle::Idle,
            preview: None,
            error: None,
            generation: 0,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Validate a picked or dropped file and install it on the field.
    ///
    /// Any earlier pending read is superseded.
    pub fn select(
        &mut self,
        session: &mut FormSession,
        path: &Path,
        now: Instant,
    ) -> Option<PendingRead> {
        self.generation += 1;
        match inspect(path) {
            Ok(file) => {
                tracing::info!("Accepted {} ({} bytes)", file.file_name, file.size);
                self.error = None;
                self.preview = None;
                self.zone = ZoneStyle::Idle;
                session.attach_file(&self.field, file);
                Some(PendingRead {
                    field: self.field.clone(),
                    generation: self.generation,
                    path: path.to_path_buf(),
                })
            }
            Err(rejection) => {
                self.reject(session, rejection, now);
                None
            }
        }
    }

    /// Finish a read started by `select`. Stale generations are ignored.
    pub fn complete(
        &mut self,
        session: &mut FormSession,
        generation: u64,
        result: Result<Vec<u8>, String>,
        now: Instant,
    ) {
        if generation != self.generation {
            tracing::debug!("Dropping stale read for {}", self.field);
            return;
        }
        let Some(file) = session
            .field(&self.field)
            .and_then(|f| f.attached_file())
            .cloned()
        else {
            return;
        };
        match result {
            Ok(bytes) => {
                self.preview = Some(Preview {
                    data_url: data_url(&file.mime, &bytes),
                    file,
                });
                self.zone = ZoneStyle::Success;
            }
            Err(e) => self.reject(session, FileRejected::Unreadable(e), now),
        }
    }

    fn reject(&mut self, session: &mut FormSession, rejection: FileRejected, now: Instant) {
        tracing::warn!("Rejected file for {}: {rejection:?}", self.field);
        self.error = Some(Banner::error(rejection.to_string(), now, self.error_ttl));
        self.zone = ZoneStyle::Error;
        self.preview = None;
        session.clear_file(&self.field);
    }

    /// Clear the selected file and return to the prompt
    pub fn remove(&mut self, session: &mut FormSession) {
        self.generation += 1;
        self.preview = None;
        self.error = None;
        self.zone = ZoneStyle::Idle;
        session.clear_file(&self.field);
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn dismiss_error(&mut self) -> bool {
        if self.error.take().is_some() {
            if self.zone == ZoneStyle::Error {
                self.zone = ZoneStyle::Idle;
            }
            true
        } else {
            false
        }
    }

    /// Expire the error message and its styling
    pub fn tick(&mut self, now: Instant) {
        if self.error.as_ref().is_some_and(|e| e.is_expired(now)) {
            self.dismiss_error();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::test_support::fill_valid;
    use std::io::Write;

    const TTL: Duration = Duration::from_secs(5);
    const MIB: u64 = 1024 * 1024;

    fn branding_session() -> FormSession {
        let mut session = FormSession::default();
        fill_valid(&mut session);
        session.go_next();
        session.go_next();
        session
    }

    fn write_file(dir: &Path, name: &str, size: u64) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; size as usize]).unwrap();
        path
    }

    mod checks {
        use super::*;

        #[test]
        fn test_mime_from_extension() {
            assert_eq!(mime_for_path(Path::new("a.JPG")), "image/jpeg");
            assert_eq!(mime_for_path(Path::new("a.svg")), "image/svg+xml");
            assert_eq!(mime_for_path(Path::new("a")), "application/octet-stream");
        }

        #[test]
        fn test_six_mib_png_rejected_for_size() {
            let result = check_candidate(Path::new("logo.png"), 6 * MIB);
            assert_eq!(result, Err(FileRejected::TooLarge { size: 6 * MIB }));
        }

        #[test]
        fn test_exactly_five_mib_accepted() {
            assert!(check_candidate(Path::new("logo.png"), MAX_FILE_SIZE).is_ok());
        }

        #[test]
        fn test_type_checked_before_size() {
            let result = check_candidate(Path::new("logo.gif"), 6 * MIB);
            assert!(matches!(result, Err(FileRejected::UnsupportedType { .. })));
        }

        #[test]
        fn test_size_message() {
            assert_eq!(
                FileRejected::TooLarge { size: 1 }.to_string(),
                "File size must be less than 5MB"
            );
        }

        #[test]
        fn test_data_url_prefix() {
            assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
        }
    }

    mod dropped_paths {
        use super::*;

        #[test]
        fn test_quoted_path() {
            assert_eq!(
                parse_dropped_path("'/tmp/my logo.png'\n"),
                Some(PathBuf::from("/tmp/my logo.png"))
            );
        }

        #[test]
        fn test_file_uri_and_escaped_spaces() {
            assert_eq!(
                parse_dropped_path("file:///tmp/my\\ logo.png"),
                Some(PathBuf::from("/tmp/my logo.png"))
            );
        }

        #[test]
        fn test_blank_paste() {
            assert_eq!(parse_dropped_path("  \n "), None);
        }
    }

    mod handler {
        use super::*;

        #[test]
        fn test_large_png_rejected_and_input_empty() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(dir.path(), "big.png", 6 * MIB);
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);

            let pending = upload.select(&mut session, &path, Instant::now());

            assert!(pending.is_none());
            assert_eq!(upload.zone, ZoneStyle::Error);
            assert_eq!(
                upload.error.as_ref().map(|e| e.message.as_str()),
                Some("File size must be less than 5MB")
            );
            let field = session.field("company_logo").unwrap();
            assert!(field.attached_file().is_none());
            assert_eq!(field.as_text(), "");
        }

        #[test]
        fn test_jpeg_accepted_and_previewed() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(dir.path(), "logo.jpg", 2 * MIB);
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);

            let pending = upload.select(&mut session, &path, Instant::now()).unwrap();
            assert_eq!(
                session.field("company_logo").unwrap().attached_file().map(|f| f.size),
                Some(2 * MIB)
            );

            let bytes = fs::read(&pending.path).unwrap();
            upload.complete(&mut session, pending.generation, Ok(bytes), Instant::now());

            let preview = upload.preview.as_ref().unwrap();
            assert!(preview.data_url.starts_with("data:image/jpeg;base64,"));
            assert_eq!(preview.file.file_name, "logo.jpg");
            assert_eq!(upload.zone, ZoneStyle::Success);
        }

        #[test]
        fn test_stale_read_ignored() {
            let dir = tempfile::tempdir().unwrap();
            let first = write_file(dir.path(), "a.png", 10);
            let second = write_file(dir.path(), "b.png", 20);
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);

            let stale = upload.select(&mut session, &first, Instant::now()).unwrap();
            let current = upload.select(&mut session, &second, Instant::now()).unwrap();

            upload.complete(&mut session, stale.generation, Ok(vec![1]), Instant::now());
            assert!(upload.preview.is_none());

            upload.complete(&mut session, current.generation, Ok(vec![2]), Instant::now());
            assert_eq!(upload.preview.as_ref().unwrap().file.file_name, "b.png");
        }

        #[test]
        fn test_new_selection_drops_old_preview_and_error_style() {
            let dir = tempfile::tempdir().unwrap();
            let first = write_file(dir.path(), "a.png", 10);
            let second = write_file(dir.path(), "b.png", 20);
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);

            let pending = upload.select(&mut session, &first, Instant::now()).unwrap();
            upload.complete(&mut session, pending.generation, Ok(vec![1]), Instant::now());
            assert_eq!(upload.zone, ZoneStyle::Success);

            upload.select(&mut session, &second, Instant::now()).unwrap();
            assert!(upload.preview.is_none());
            assert_eq!(upload.zone, ZoneStyle::Idle);

            upload.select(&mut session, Path::new("resume.pdf"), Instant::now());
            assert_eq!(upload.zone, ZoneStyle::Error);
            upload.select(&mut session, &first, Instant::now()).unwrap();
            assert_eq!(upload.zone, ZoneStyle::Idle);
            assert!(upload.error.is_none());
        }

        #[test]
        fn test_remove_reverts_to_prompt() {
            let dir = tempfile::tempdir().unwrap();
            let path = write_file(dir.path(), "logo.png", 10);
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);
            let pending = upload.select(&mut session, &path, Instant::now()).unwrap();
            upload.complete(&mut session, pending.generation, Ok(vec![0]), Instant::now());

            upload.remove(&mut session);

            assert!(upload.preview.is_none());
            assert!(upload.error.is_none());
            assert_eq!(upload.zone, ZoneStyle::Idle);
            assert!(session.field("company_logo").unwrap().attached_file().is_none());
        }

        #[test]
        fn test_error_auto_dismisses() {
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);
            let now = Instant::now();
            upload.select(&mut session, Path::new("notes.txt"), now);
            assert!(upload.error.is_some());

            upload.tick(now + Duration::from_secs(4));
            assert!(upload.error.is_some());

            upload.tick(now + TTL);
            assert!(upload.error.is_none());
            assert_eq!(upload.zone, ZoneStyle::Idle);
        }

        #[test]
        fn test_missing_file_is_unreadable() {
            let mut session = branding_session();
            let mut upload = UploadHandler::new("company_logo", TTL);
            upload.select(&mut session, Path::new("/no/such/logo.png"), Instant::now());
            assert!(upload
                .error
                .as_ref()
                .is_some_and(|e| e.message.starts_with("Could not read file")));
        }

        #[test]
        fn test_hover_only_toggles_style() {
            let mut upload = UploadHandler::new("company_logo", TTL);
            upload.set_hover(true);
            assert!(upload.hover);
            assert_eq!(upload.zone, ZoneStyle::Idle);
            upload.set_hover(false);
            assert!(!upload.hover);
        }
    }
}
