// src/platform/os/priority.rs

use anyhow::{bail, Result};
use log::debug;
#[cfg(test)]
use nix::errno::Errno;
use std::io;

/// Sets the niceness of the calling process via `setpriority(2)`.
///
/// Lowering niceness below the current value usually needs privileges; the
/// resulting `EACCES`/`EPERM` is returned to the caller.
pub fn set_niceness(nice: i32) -> Result<()> {
    // SAFETY: setpriority only reads its scalar arguments. `who == 0` targets
    // the calling process.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, nice) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        bail!("setpriority(PRIO_PROCESS, 0, {}) failed: {}", nice, err);
    }
    debug!("Process niceness set to {}", nice);
    Ok(())
}

/// Current niceness of the calling process.
#[cfg(test)]
fn current_niceness() -> Result<i32> {
    // getpriority can legitimately return -1, so errno is cleared first and
    // checked afterwards.
    Errno::clear();
    // SAFETY: getpriority only reads its scalar arguments.
    let nice = unsafe { libc::getpriority(libc::PRIO_PROCESS, 0) };
    if nice == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error().is_some_and(|code| code != 0) {
            bail!("getpriority failed: {}", err);
        }
    }
    Ok(nice)
}
