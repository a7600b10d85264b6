use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use genchat_types::FileArtifact;

/// Fallback project name when the caller supplies none
pub const DEFAULT_PROJECT_NAME: &str = "v0-project";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no files found to export")]
    NoFiles,
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build an in-memory ZIP archive from the extracted artifacts. An empty
/// artifact list is an error rather than an empty archive.
pub fn build_zip(files: &[FileArtifact]) -> Result<Vec<u8>, ExportError> {
    if files.is_empty() {
        return Err(ExportError::NoFiles);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Derive the download filename from a project name.
pub fn archive_filename(project_name: Option<&str>) -> String {
    let name = project_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME);
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{safe}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn artifact(name: &str, content: &str) -> FileArtifact {
        FileArtifact {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn archive_roundtrip() {
        let files = vec![
            artifact("app/page.tsx", "export default function Page() {}"),
            artifact("package.json", "{\"name\":\"demo\"}"),
        ];

        let bytes = build_zip(&files).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut entry = archive.by_name("app/page.tsx").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "export default function Page() {}");
    }

    #[test]
    fn empty_list_is_no_files() {
        assert!(matches!(build_zip(&[]), Err(ExportError::NoFiles)));
    }

    #[test]
    fn filename_derivation() {
        assert_eq!(archive_filename(None), "v0-project.zip");
        assert_eq!(archive_filename(Some("  ")), "v0-project.zip");
        assert_eq!(archive_filename(Some("my-app")), "my-app.zip");
        assert_eq!(archive_filename(Some("My App!")), "My-App-.zip");
    }
}
