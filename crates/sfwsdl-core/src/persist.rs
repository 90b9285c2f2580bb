//! Replacing the cached WSDL on disk.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 of the file at `path`, or `None` if it cannot be read (e.g. first run).
pub fn existing_digest(path: &Path) -> Option<String> {
    fs::read(path).ok().map(|data| sha256_hex(&data))
}

/// Replace the content of `path` with `data`.
///
/// If `path` is a symlink, its target is what gets replaced. The bytes go to
/// a temp file next to the target, which takes over the existing file's
/// permissions and is then renamed over it. A reader sees either the old or
/// the new file, never a partial one. Fails if the parent directory does not
/// exist.
pub fn replace_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let target = resolve_target(path);
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".sfwsdl-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    if let Ok(meta) = fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// The file a write to `path` should land in: symlinks followed when the
/// destination exists, `path` itself otherwise.
fn resolve_target(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
