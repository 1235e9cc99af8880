/*
File: genapp-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations used while assembling a bundle.
*/
use std::{
    collections::BTreeSet,
    fs,
    io,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use genapp_common::error::{GenappError, Result};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Checks if a path exists (resolving symlinks).
pub fn check_path_exists(path: &Path) -> bool {
    path.exists()
}

/// Checks if a path exists without following symlinks.
pub fn check_symlink_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Checks if a path points to a directory (resolving symlinks).
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Checks if a path points to a regular file (resolving symlinks).
pub fn is_file(path: &Path) -> bool {
    path.is_file()
}

fn ensure_absent(path: &Path) -> Result<()> {
    if check_symlink_exists(path) {
        error!("Refusing to overwrite existing path {}", path.display());
        return Err(GenappError::DestinationAlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        GenappError::from(e)
    })
}

/// Creates a directory (and missing parents), failing if `path` itself already exists.
pub fn create_dir_exclusive(path: &Path) -> Result<()> {
    ensure_absent(path)?;
    create_dir_all(path)
}

/// Removes a directory and all its contents recursively.
pub fn remove_directory_recursive(path: &Path) -> Result<()> {
    debug!("Removing directory recursively: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove dir_all {}: {}", path.display(), e);
        }
        GenappError::from(e)
    })
}

/// Removes whatever sits at `path`: a directory tree, a file or a dangling symlink.
pub fn remove_path(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Path {} not found for removal.", path.display());
            return Ok(());
        }
        Err(e) => return Err(GenappError::from(e)),
    };
    if meta.is_dir() {
        remove_directory_recursive(path)
    } else {
        debug!("Removing file: {}", path.display());
        fs::remove_file(path).map_err(|e| {
            error!("Failed remove file {}: {}", path.display(), e);
            GenappError::from(e)
        })
    }
}

/// Copies a single file, failing if the destination already exists.
pub fn copy_file_exclusive(source: &Path, destination: &Path) -> Result<u64> {
    ensure_absent(destination)?;
    debug!(
        "Copying file {} -> {}",
        source.display(),
        destination.display()
    );
    fs::copy(source, destination).map_err(|e| {
        error!(
            "Failed copy {} -> {}: {}",
            source.display(),
            destination.display(),
            e
        );
        GenappError::IoError(format!(
            "Failed to copy {} to {}: {}",
            source.display(),
            destination.display(),
            e
        ))
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> GenappError {
    let message = format!("Failed walking {}: {}", root.display(), err);
    error!("{}", message);
    match err.into_io_error() {
        Some(io_err) => GenappError::IoError(format!("{message} ({io_err})")),
        None => GenappError::IoError(message),
    }
}

/// Recursively copies the directory `source` to `destination`, preserving its structure.
/// The destination must not exist yet; symlinks inside the source are followed.
/// Returns the number of files copied.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    if !is_directory(source) {
        error!("Copy source {} is not a directory", source.display());
        return Err(GenappError::IoError(format!(
            "Cannot copy tree: {} is not a directory",
            source.display()
        )));
    }
    ensure_absent(destination)?;
    debug!(
        "Copying tree {} -> {}",
        source.display(),
        destination.display()
    );
    create_dir_all(destination)?;

    let mut files = 0usize;
    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let relative = entry.path().strip_prefix(source).map_err(|e| {
            GenappError::IoError(format!(
                "Entry {} escaped tree {}: {}",
                entry.path().display(),
                source.display(),
                e
            ))
        })?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            copy_file_exclusive(entry.path(), &target)?;
            files += 1;
        }
    }
    debug!("Copied {} files into {}", files, destination.display());
    Ok(files)
}

/// Lists every entry below `root` (files and directories) as root-relative paths.
pub fn list_tree_entries(root: &Path) -> Result<BTreeSet<PathBuf>> {
    let mut entries = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        match entry.path().strip_prefix(root) {
            Ok(relative) => {
                entries.insert(relative.to_path_buf());
            }
            Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
        }
    }
    Ok(entries)
}

/// Renames `from` to `to`. Both must live on the same filesystem.
pub fn rename_path(from: &Path, to: &Path) -> Result<()> {
    debug!("Renaming {} -> {}", from.display(), to.display());
    fs::rename(from, to).map_err(|e| {
        error!(
            "Failed rename {} -> {}: {}",
            from.display(),
            to.display(),
            e
        );
        GenappError::from(e)
    })
}

/// Sets file permissions (Unix only). Mode is standard Unix octal mode.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        GenappError::from(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _mode: u32) -> Result<()> {
    warn!(
        "Setting permissions not fully supported on this platform: {}",
        path.display()
    );
    // No-op on non-unix, return Ok
    Ok(())
}

/// True if owner, group and other may all execute the file at `path`.
#[cfg(unix)]
pub fn is_executable_by_all(path: &Path) -> Result<bool> {
    let meta = fs::metadata(path)?;
    Ok(meta.is_file() && (meta.permissions().mode() & 0o111) == 0o111)
}

#[cfg(not(unix))]
pub fn is_executable_by_all(path: &Path) -> Result<bool> {
    warn!(
        "Execute bits are not tracked on this platform, only checking {} is a file",
        path.display()
    );
    Ok(is_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    #[test]
    fn copy_tree_preserves_structure() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("res");
        write(&src.join("gfx/ships/frigate.png"), "png");
        write(&src.join("sfx/boom.ogg"), "ogg");
        write(&src.join("schema.json"), "{}");
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = tmp.path().join("out/res");
        let copied = copy_tree(&src, &dst).expect("copy tree");

        assert_eq!(copied, 3);
        assert_eq!(
            list_tree_entries(&src).unwrap(),
            list_tree_entries(&dst).unwrap()
        );
        assert_eq!(
            fs::read_to_string(dst.join("gfx/ships/frigate.png")).unwrap(),
            "png"
        );
    }

    #[test]
    fn copy_tree_refuses_existing_destination() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("res");
        write(&src.join("a.txt"), "a");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&dst).unwrap();

        let err = copy_tree(&src, &dst).unwrap_err();
        assert!(err.is_destination_conflict());
        assert!(list_tree_entries(&dst).unwrap().is_empty());
    }

    #[test]
    fn copy_tree_requires_directory_source() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("file.txt");
        write(&src, "x");
        let err = copy_tree(&src, &tmp.path().join("dst")).unwrap_err();
        assert!(matches!(err, GenappError::IoError(_)));
    }

    #[test]
    fn copy_file_exclusive_refuses_overwrite() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("PkgInfo");
        let dst = tmp.path().join("copy");
        write(&src, "APPL????");
        copy_file_exclusive(&src, &dst).expect("first copy");
        let err = copy_file_exclusive(&src, &dst).unwrap_err();
        assert!(err.is_destination_conflict());
    }

    #[test]
    fn create_dir_exclusive_creates_parents_once() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("x.app/Contents");
        create_dir_exclusive(&dir).expect("create");
        assert!(is_directory(&dir));
        assert!(create_dir_exclusive(&dir).unwrap_err().is_destination_conflict());
    }

    #[test]
    fn remove_path_handles_files_dirs_and_absence() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("old.app");
        write(&dir.join("Contents/MacOS/old"), "bin");
        let file = tmp.path().join("loose");
        write(&file, "x");

        remove_path(&dir).unwrap();
        remove_path(&file).unwrap();
        remove_path(&tmp.path().join("never-existed")).unwrap();
        assert!(!check_symlink_exists(&dir));
        assert!(!check_symlink_exists(&file));
    }

    #[cfg(unix)]
    #[test]
    fn permissions_roundtrip() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let exe = tmp.path().join("everVoid");
        write(&exe, "#!/bin/sh\n");
        set_permissions(&exe, 0o644).unwrap();
        assert!(!is_executable_by_all(&exe).unwrap());
        set_permissions(&exe, 0o777).unwrap();
        assert!(is_executable_by_all(&exe).unwrap());
    }
}
