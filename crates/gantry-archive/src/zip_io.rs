use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::path::safe_join;

/// Archive a directory tree into a zip at `archive_path`.
///
/// Entry names are computed relative to `source_root`'s parent, so the
/// archive contains the root directory itself as its first entry. Files are
/// deflate-compressed and streamed from disk; directories become explicit
/// entries with a trailing separator. Member order follows the filesystem
/// walk.
pub fn create_archive(source_root: &Path, archive_path: &Path) -> Result<(), ArchiveError> {
    let file = File::create(archive_path).map_err(|e| ArchiveError::Create {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let base = source_root.parent().unwrap_or(Path::new(""));

    for entry in WalkDir::new(source_root).follow_links(false) {
        let entry = entry.map_err(|e| ArchiveError::Walk {
            path: source_root.to_path_buf(),
            source: e,
        })?;

        let rel = entry
            .path()
            .strip_prefix(base)
            .expect("walkdir yields paths under the source root");
        let name = entry_name(rel);

        let mut options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let meta = entry.metadata().map_err(|e| ArchiveError::Walk {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            options = options.unix_permissions(meta.permissions().mode() & 0o777);
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            writer
                .add_directory(name.as_str(), options)
                .map_err(|e| ArchiveError::Zip { source: e })?;
        } else if file_type.is_file() {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| ArchiveError::Zip { source: e })?;
            let mut src = File::open(entry.path()).map_err(|e| ArchiveError::ReadEntry {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            std::io::copy(&mut src, &mut writer).map_err(|e| ArchiveError::ReadEntry {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        } else {
            return Err(ArchiveError::Unsupported(entry.path().to_path_buf()));
        }
    }

    let mut inner = writer
        .finish()
        .map_err(|e| ArchiveError::Zip { source: e })?;
    inner.flush().map_err(|e| ArchiveError::Create {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Extract an archive under `destination_root`.
///
/// Every entry name is joined onto the resolved destination root with
/// [`safe_join`]; an entry that would land outside the root aborts the whole
/// extraction with [`ArchiveError::PathTraversal`] before that entry or any
/// later one is written. Partially extracted earlier entries may remain on
/// disk, but the call never reports success after an error.
pub fn extract_archive(archive_path: &Path, destination_root: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::Zip { source: e })?;

    std::fs::create_dir_all(destination_root).map_err(|e| ArchiveError::WriteEntry {
        path: destination_root.to_path_buf(),
        source: e,
    })?;
    let root = std::path::absolute(destination_root).map_err(|e| ArchiveError::ResolveRoot {
        path: destination_root.to_path_buf(),
        source: e,
    })?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::Zip { source: e })?;
        let name = entry.name().to_owned();

        let Some(target) = safe_join(&root, &name) else {
            return Err(ArchiveError::PathTraversal { entry: name });
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ArchiveError::WriteEntry {
                path: target.clone(),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ArchiveError::WriteEntry {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut out = File::create(&target).map_err(|e| ArchiveError::WriteEntry {
            path: target.clone(),
            source: e,
        })?;
        std::io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::WriteEntry {
            path: target.clone(),
            source: e,
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| ArchiveError::WriteEntry {
                    path: target.clone(),
                    source: e,
                })?;
        }
    }

    Ok(())
}

/// Forward-slash entry name for a relative path.
fn entry_name(rel: &Path) -> String {
    rel.iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to create archive at {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open archive at {path}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to resolve destination root {path}")]
    ResolveRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read {path}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    WriteEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported file type in staging tree: {0}")]
    Unsupported(PathBuf),

    #[error("archive entry escapes the destination root: {entry}")]
    PathTraversal { entry: String },

    #[error("zip error")]
    Zip { source: zip::result::ZipError },
}
