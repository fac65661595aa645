use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

/// Stop the kernel from keeping zombies around for spawned commands. With
/// SIGCHLD ignored, children are reaped automatically.
pub fn ignore_child_exits() -> io::Result<()> {
    // SAFETY: installing SIG_IGN for SIGCHLD does not touch Rust-managed state.
    let previous = unsafe { libc::signal(libc::SIGCHLD, libc::SIG_IGN) };
    if previous == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Run `command` through `sh -c` in its own process group and forget about
/// it.
pub fn spawn(command: &str) -> io::Result<u32> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .process_group(0)
        .spawn()?;
    Ok(child.id())
}
