use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Starts a detached child. It is never waited for, `SIGCHLD` is ignored.
pub fn spawn(argv: &[String]) -> Result<()> {
    let Some((program, args)) = argv.split_first() else {
        bail!("Nothing to spawn");
    };
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .process_group(0)
        .spawn()
        .with_context(|| format!("Failed to spawn {}", program))?;
    Ok(())
}

/// Lowest pid whose `comm` is `name`.
pub fn find_pid(proc_root: &Path, name: &str) -> Option<i32> {
    std::fs::read_dir(proc_root)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let pid: i32 = entry.file_name().to_str()?.parse().ok()?;
            let comm = std::fs::read_to_string(entry.path().join("comm")).ok()?;
            (comm.trim_end() == name).then_some(pid)
        })
        .min()
}

/// Queues `SIGRTMIN` carrying `value` to the named process.
pub fn signal_process(name: &str, value: i32) -> Result<()> {
    let pid = find_pid(Path::new("/proc"), name)
        .with_context(|| format!("No {} process is running", name))?;
    let sigval = libc::sigval {
        sival_ptr: value as isize as *mut libc::c_void,
    };
    // SAFETY: plain syscall, no memory is shared with the receiver
    let ret = unsafe { libc::sigqueue(pid, libc::SIGRTMIN(), sigval) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("Failed to signal {} (pid {})", name, pid));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_proc(entries: &[(&str, &str)]) -> std::path::PathBuf {
        let root = std::env::temp_dir().join(format!(
            "fusuma-proc-{}-{}",
            std::process::id(),
            entries.len()
        ));
        let _ = std::fs::remove_dir_all(&root);
        for (pid, comm) in entries {
            let dir = root.join(pid);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("comm"), format!("{}\n", comm)).unwrap();
        }
        std::fs::create_dir_all(root.join("self")).unwrap();
        root
    }

    #[test]
    fn test_find_pid_picks_lowest_match() {
        let root = fake_proc(&[("812", "dwmblocks"), ("40", "st"), ("377", "dwmblocks")]);
        assert_eq!(find_pid(&root, "dwmblocks"), Some(377));
        assert_eq!(find_pid(&root, "st"), Some(40));
        assert_eq!(find_pid(&root, "slstatus"), None);
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_find_pid_without_proc() {
        assert_eq!(find_pid(Path::new("/nonexistent/proc"), "dwmblocks"), None);
    }

    #[test]
    fn test_spawn_empty_argv() {
        assert!(spawn(&[]).is_err());
        assert!(spawn(&["/nonexistent/binary".to_string()]).is_err());
    }
}
