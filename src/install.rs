use std::{
    fs,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use zip::ZipArchive;

use crate::{Error, Result};

/// What [`install`] put on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub destination: PathBuf,
    /// Archive-relative paths of the written files, in archive order.
    pub files: Vec<PathBuf>,
}

/// Unpacks the zip in `bytes` into `dest`, creating `dest` if needed.
///
/// Entries are written one by one in archive order and existing files with
/// the same name are overwritten. If the archive turns out to be damaged
/// part way, the entries already written stay on disk. Entries whose names
/// would land outside `dest` are skipped.
pub fn install(bytes: &[u8], dest: &Path) -> Result<InstallReport> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        // decompress fully before touching the target so a bad entry never
        // leaves a truncated file behind
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| Error::CorruptArchive(e.into()))?;
        make_writable(&target)?;
        fs::write(&target, &content).map_err(|e| Error::io(&target, e))?;

        // owner keeps write access so the next install can overwrite
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&target, fs::Permissions::from_mode((mode & 0o777) | 0o200))
                    .map_err(|e| Error::io(&target, e))?;
            }
        }

        debug!("extracted {}", relative.display());
        files.push(relative);
    }

    info!("extracted {} files to {}", files.len(), dest.display());
    Ok(InstallReport {
        destination: dest.to_path_buf(),
        files,
    })
}

/// Gives the owner write access to a file left read-only by an earlier run.
fn make_writable(path: &Path) -> Result<()> {
    let Ok(metadata) = fs::metadata(path) else {
        return Ok(());
    };
    let mut permissions = metadata.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if permissions.mode() & 0o200 != 0 {
            return Ok(());
        }
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        if !permissions.readonly() {
            return Ok(());
        }
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions).map_err(|e| Error::io(path, e))
}
