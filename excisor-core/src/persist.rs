//! Backup-then-overwrite persistence.
//!
//! The backup copy is written and synced before the source is touched. The
//! new content goes to a sibling temporary file which is then renamed over
//! the source, so the source is never observed half-written. A symlinked
//! source is refused: the rename would replace the link, not its target.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{ExcisorError, ExcisorResult};

/// Default suffix appended to the source file name for backups.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

/// Sibling path of `path` with `suffix` appended to its file name.
///
/// `orders.js` with `.backup` becomes `orders.js.backup`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut file_name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    file_name.push(suffix);
    path.with_file_name(file_name)
}

fn write_synced(path: &Path, content: &str) -> ExcisorResult<()> {
    let mut file = File::create(path).map_err(|e| ExcisorError::write(path, e.to_string()))?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| ExcisorError::write(path, e.to_string()))
}

/// Refuses anything at `path` that is not a regular file or absent.
fn ensure_regular_target(path: &Path) -> ExcisorResult<()> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ExcisorError::write(path, format!("stat failed: {}", e))),
    };
    if metadata.file_type().is_symlink() {
        warn!(path = %path.display(), "refusing to overwrite symlink");
        return Err(ExcisorError::write(path, "refusing to overwrite a symlink"));
    }
    if !metadata.is_file() {
        return Err(ExcisorError::write(path, "not a regular file"));
    }
    Ok(())
}

/// Writes `content` to `path` atomically (temporary sibling plus rename).
///
/// The existing file's permissions carry over to the replacement.
pub fn write_atomic(path: &Path, content: &str) -> ExcisorResult<()> {
    ensure_regular_target(path)?;
    let tmp = sibling_path(path, ".excisor.tmp");
    if let Err(e) = write_synced(&tmp, content) {
        fs::remove_file(&tmp).ok();
        return Err(e);
    }
    if let Ok(metadata) = fs::metadata(path) {
        if let Err(e) = fs::set_permissions(&tmp, metadata.permissions()) {
            fs::remove_file(&tmp).ok();
            return Err(ExcisorError::write(&tmp, format!("set permissions failed: {}", e)));
        }
    }
    fs::rename(&tmp, path).map_err(|e| {
        fs::remove_file(&tmp).ok();
        ExcisorError::write(path, format!("rename from {} failed: {}", tmp.display(), e))
    })
}

/// Replaces the source at `path` with `new_content`.
///
/// When `backup` is given, `original` is durably written there first; if that
/// fails the source is not touched. A symlinked source is refused before
/// the backup is written.
pub fn commit_with_backup(
    path: &Path,
    original: &str,
    new_content: &str,
    backup: Option<&Path>,
) -> ExcisorResult<()> {
    ensure_regular_target(path)?;
    if let Some(backup) = backup {
        write_synced(backup, original)?;
        info!(backup = %backup.display(), "backup written");
    }
    write_atomic(path, new_content)?;
    info!(path = %path.display(), bytes = new_content.len(), "source rewritten");
    Ok(())
}
