//! Request validation: file existence and extension allow-list.
//!
//! Both checks are local and run before any remote call, so a rejected
//! request costs nothing — no upload, no connector, no workflow. There is
//! deliberately no size limit and no content sniffing: the partitioning
//! platform is the authority on what it can parse, and the allow-list only
//! filters out formats it documents as unsupported.

use crate::error::Doc2TextError;
use std::path::Path;

/// File extensions the partitioning platform accepts, lower-case, without
/// the leading dot. Covers the common office, image, email, markup, and
/// archive document formats.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "abw", "bmp", "csv", "cwk", "dbf", "dif", "doc", "docm", "docx", "dot",
    "dotm", "eml", "epub", "et", "eth", "fods", "gif", "heic", "htm", "html",
    "hwp", "jpeg", "jpg", "md", "mcw", "mw", "odt", "org", "p7s", "pages",
    "pbd", "pdf", "png", "pot", "potm", "ppt", "pptm", "pptx", "prn", "rst",
    "rtf", "sdp", "sgl", "svg", "sxg", "tiff", "txt", "tsv", "uof", "uos1",
    "uos2", "web", "webp", "wk2", "xls", "xlsb", "xlsm", "xlsx", "xlw", "xml",
    "zabw",
];

/// True if `extension` (without dot, any case) is in the allow-list.
pub fn is_supported_extension(extension: &str) -> bool {
    let lower = extension.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&lower.as_str())
}

/// Validate a request path: the file must exist and carry a supported
/// extension. Checks run in that order and stop at the first failure.
pub fn validate(path: &Path) -> Result<(), Doc2TextError> {
    if !path.is_file() {
        return Err(Doc2TextError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !is_supported_extension(extension) {
        return Err(Doc2TextError::UnsupportedExtension {
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{extension}")
            },
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"content").unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_rejected() {
        let err = validate(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, Doc2TextError::FileNotFound { .. }));
    }

    #[test]
    fn existence_checked_before_extension() {
        // A missing file with a bad extension reports FileNotFound, not
        // UnsupportedExtension.
        let err = validate(Path::new("/nonexistent/tool.exe")).unwrap_err();
        assert!(matches!(err, Doc2TextError::FileNotFound { .. }));
    }

    #[test]
    fn unsupported_extension_rejected() {
        let (_dir, path) = temp_file("tool.exe");
        let err = validate(&path).unwrap_err();
        match err {
            Doc2TextError::UnsupportedExtension { extension } => {
                assert_eq!(extension, ".exe")
            }
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn supported_extension_accepted() {
        let (_dir, path) = temp_file("report.pdf");
        assert!(validate(&path).is_ok());
    }

    #[test]
    fn extension_compare_is_case_insensitive() {
        let (_dir, path) = temp_file("REPORT.PDF");
        assert!(validate(&path).is_ok());
    }

    #[test]
    fn no_extension_rejected() {
        let (_dir, path) = temp_file("README");
        let err = validate(&path).unwrap_err();
        assert!(matches!(err, Doc2TextError::UnsupportedExtension { .. }));
    }

    #[test]
    fn allow_list_membership() {
        assert!(is_supported_extension("pdf"));
        assert!(is_supported_extension("DOCX"));
        assert!(is_supported_extension("eml"));
        assert!(!is_supported_extension("exe"));
        assert!(!is_supported_extension(""));
    }
}
