use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub mod formatters;

pub use formatters::*;

/// Save a document as Markdown under `dir`, creating the directory on demand.
///
/// An existing file with the same name is overwritten.
pub async fn save_to_file(document: &ExportDocument, dir: &Path) -> Result<PathBuf> {
    fs_err::create_dir_all(dir).context("Failed to create export directory")?;

    let path = dir.join(&document.file_name);
    let content = format_as_markdown(document);

    fs_err::write(&path, content).context("Failed to write export document")?;
    tracing::info!("Export written to {}", path.display());

    Ok(path)
}

/// Print a document to the console
pub fn print_to_console(document: &ExportDocument) {
    print!("{}", format_for_console(document));
}
