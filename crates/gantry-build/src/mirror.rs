use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively mirror `src` into `dst`, preserving directory permission bits.
///
/// Regular files are copied byte for byte; re-running against a partially
/// populated destination overwrites rather than merges. Symbolic links and
/// special files are not supported and fail the copy outright.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<(), MirrorError> {
    let src_meta = std::fs::metadata(src).map_err(|e| MirrorError::ReadSource {
        path: src.to_path_buf(),
        source: e,
    })?;
    if !src_meta.is_dir() {
        return Err(MirrorError::NotADirectory(src.to_path_buf()));
    }

    create_dir_with_mode(dst, &src_meta)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| MirrorError::Walk {
            path: src.to_path_buf(),
            source: e,
        })?;

        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_symlink() || !(file_type.is_dir() || file_type.is_file()) {
            return Err(MirrorError::Unsupported(entry.path().to_path_buf()));
        }

        if file_type.is_dir() {
            let meta = entry.metadata().map_err(|e| MirrorError::Walk {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            create_dir_with_mode(&target, &meta)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| MirrorError::CopyFile {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
        }
    }

    Ok(())
}

fn create_dir_with_mode(dir: &Path, src_meta: &std::fs::Metadata) -> Result<(), MirrorError> {
    std::fs::create_dir_all(dir).map_err(|e| MirrorError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(src_meta.permissions().mode() & 0o777);
        std::fs::set_permissions(dir, perms).map_err(|e| MirrorError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    #[cfg(not(unix))]
    {
        let _ = src_meta;
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("failed to read source {path}")]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to walk {path}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported file type (symlink or special file): {0}")]
    Unsupported(PathBuf),
}
