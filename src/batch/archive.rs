//! ZIP archive assembly for a finished batch.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors raised while building a batch archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot walk staging directory: {0}")]
    Walk(#[source] io::Error),
    #[error("cannot create archive file: {0}")]
    Create(#[source] io::Error),
    #[error("cannot write archive: {0}")]
    Write(#[source] zip::result::ZipError),
    #[error("cannot stream staged file into archive: {0}")]
    Copy(#[source] io::Error),
}

/// Compress every regular file under `staging_dir` into `archive_path`.
///
/// Entries are named by their path relative to the staging root. On success
/// the staging directory is deleted recursively; on failure it is left in
/// place so the staged files can be recovered manually.
pub fn create_zip_archive(staging_dir: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let file = File::create(archive_path).map_err(ArchiveError::Create)?;
    let mut writer = ZipWriter::new(file);
    add_dir_entries(&mut writer, staging_dir, "")?;
    writer.finish().map_err(ArchiveError::Write)?;

    if let Err(err) = fs::remove_dir_all(staging_dir) {
        log::warn!(
            "failed to clean up staging directory {}: {}",
            staging_dir.display(),
            err
        );
    }
    Ok(())
}

fn add_dir_entries(
    writer: &mut ZipWriter<File>,
    dir: &Path,
    prefix: &str,
) -> Result<(), ArchiveError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in fs::read_dir(dir).map_err(ArchiveError::Walk)? {
        let entry = entry.map_err(ArchiveError::Walk)?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let entry_name = if prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", prefix, file_name)
        };

        if path.is_dir() {
            add_dir_entries(writer, &path, &entry_name)?;
        } else {
            writer
                .start_file(entry_name.as_str(), options)
                .map_err(ArchiveError::Write)?;
            let mut staged = File::open(&path).map_err(ArchiveError::Copy)?;
            io::copy(&mut staged, writer).map_err(ArchiveError::Copy)?;
        }
    }
    Ok(())
}
