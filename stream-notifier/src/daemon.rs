//! Detaching from the controlling terminal.

use std::fs::OpenOptions;
use std::io;
use std::os::fd::AsRawFd;

/// Fork, start a new session, fork again, then move to `/` with stdio on `/dev/null`.
///
/// Must run while the process is still single-threaded, i.e. before the
/// tokio runtime is built. The parent processes exit with status 0.
pub fn daemonize() -> io::Result<()> {
    // SAFETY: no other threads exist yet, so the child inherits a consistent state.
    match unsafe { libc::fork() } {
        -1 => return Err(io::Error::last_os_error()),
        0 => {}
        _ => std::process::exit(0),
    }

    // SAFETY: plain syscall wrapper, no memory is touched.
    if unsafe { libc::setsid() } == -1 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: as above; still single-threaded.
    match unsafe { libc::fork() } {
        -1 => return Err(io::Error::last_os_error()),
        0 => {}
        pid => {
            println!("Forked to child process {pid}");
            std::process::exit(0);
        }
    }

    // SAFETY: umask cannot fail.
    unsafe { libc::umask(0o022) };
    std::env::set_current_dir("/")?;
    redirect_std_streams()?;

    tracing::info!(pid = std::process::id(), "Detached from terminal");
    Ok(())
}

fn redirect_std_streams() -> io::Result<()> {
    let devnull = OpenOptions::new().read(true).write(true).open("/dev/null")?;
    let fd = devnull.as_raw_fd();
    for target in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
        // SAFETY: both descriptors are valid; dup2 closes `target` atomically.
        if unsafe { libc::dup2(fd, target) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
