use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Identity claimed by a running instance of the tool.
pub const PROCESS_NAME: &str = "clusterpool";

/// Host-local single-instance lock.
///
/// Holds an exclusive advisory lock on `<lock_dir>/<name>.lock` for as long as the guard
/// lives. A second acquisition on the same host fails with `Error::Conflict` until the
/// first guard is dropped or its process exits.
#[derive(Debug)]
pub struct ProcessGuard {
    file: File,
    path: PathBuf,
    name: String,
}

impl ProcessGuard {
    pub fn acquire(lock_dir: &Path, name: &str) -> Result<ProcessGuard> {
        fs::create_dir_all(lock_dir)?;
        let path = lock_dir.join(format!("{}.lock", name));

        let mut file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&path)?;

        if !try_lock_exclusive(&file)? {
            let holder = read_holder(&mut file).unwrap_or_else(|| "unknown process".to_string());
            log::warn!("Lock {} is held by {}.", path.display(), holder);
            return Err(Error::Conflict { name: name.to_string(), holder });
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{} {}", name, std::process::id())?;
        file.flush()?;

        set_current_process_name(name);
        log::debug!("Acquired process lock {}.", path.display());

        Ok(ProcessGuard { file, path, name: name.to_string() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        // Truncate while still holding the lock so a stale pid is never reported.
        if let Err(e) = self.file.set_len(0) {
            log::debug!("Could not clear lock file {}: {}", self.path.display(), e);
        }
        unlock(&self.file);
    }
}

fn read_holder(file: &mut File) -> Option<String> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut content).ok()?;
    let holder = content.trim();
    if holder.is_empty() { None } else { Some(holder.to_string()) }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> Result<bool> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file` and stays open for the duration of the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(code) if code == libc::EWOULDBLOCK => Ok(false),
        _ => Err(Error::IoError(err)),
    }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;

    // SAFETY: see `try_lock_exclusive`.
    unsafe {
        libc::flock(file.as_raw_fd(), libc::LOCK_UN);
    }
}

// Without flock the lock is approximated by the first non-empty write of the lock file.
#[cfg(not(unix))]
fn try_lock_exclusive(file: &File) -> Result<bool> {
    Ok(file.metadata()?.len() == 0)
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}

#[cfg(target_os = "linux")]
fn set_current_process_name(name: &str) {
    // The kernel keeps at most 15 bytes plus the terminating nul.
    let truncated: Vec<u8> = name.bytes().filter(|b| *b != 0).take(15).collect();
    let Ok(c_name) = std::ffi::CString::new(truncated) else {
        return;
    };

    // SAFETY: PR_SET_NAME reads a nul-terminated string of at most 16 bytes.
    let rc = unsafe { libc::prctl(libc::PR_SET_NAME, c_name.as_ptr() as libc::c_ulong, 0, 0, 0) };
    if rc != 0 {
        log::debug!("Could not set process name to {}: {}", name, std::io::Error::last_os_error());
    }
}

#[cfg(not(target_os = "linux"))]
fn set_current_process_name(_name: &str) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_conflicts_until_release() {
        let dir = tempfile::tempdir().unwrap();

        let first = ProcessGuard::acquire(dir.path(), "pooltest").unwrap();
        assert!(first.path().ends_with("pooltest.lock"));

        match ProcessGuard::acquire(dir.path(), "pooltest") {
            Err(Error::Conflict { name, holder }) => {
                assert_eq!(name, "pooltest");
                assert_eq!(holder, format!("pooltest {}", std::process::id()));
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        drop(first);
        assert!(ProcessGuard::acquire(dir.path(), "pooltest").is_ok());
    }

    #[test]
    fn test_different_names_do_not_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let _a = ProcessGuard::acquire(dir.path(), "poola").unwrap();
        assert!(ProcessGuard::acquire(dir.path(), "poolb").is_ok());
    }
}
