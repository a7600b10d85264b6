//! Extraction of generated file artifacts from chat messages and ZIP
//! packaging for download.

pub mod archive;
pub mod extract;

pub use archive::{archive_filename, build_zip, ExportError, DEFAULT_PROJECT_NAME};
pub use extract::extract_files;
