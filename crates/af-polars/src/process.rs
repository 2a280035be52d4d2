//! External solver processes driven through stdin with a wall-clock limit.

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start: {0}")]
    Spawn(std::io::Error),

    #[error("writing keystrokes: {0}")]
    Stdin(std::io::Error),

    #[error("waiting for exit: {0}")]
    Wait(std::io::Error),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Run `program args..` in `dir`, feed it `keystrokes` on stdin and wait for
/// it to exit, killing it once `timeout` has elapsed.
///
/// Output streams are discarded; solvers report through files they write in
/// `dir`.
pub fn run_with_keystrokes(
    program: &str,
    args: &[&str],
    dir: &Path,
    keystrokes: &str,
    timeout: Duration,
) -> Result<ExitStatus, ProcessError> {
    debug!(program, dir = %dir.display(), ?timeout, "spawning solver");
    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(ProcessError::Spawn)?;

    if let Some(mut stdin) = child.stdin.take() {
        // A solver that exits early closes the pipe; its exit status says more.
        if let Err(e) = stdin.write_all(keystrokes.as_bytes())
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::Stdin(e));
        }
    }

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().map_err(ProcessError::Wait)? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProcessError::TimedOut(timeout));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("af-process-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn keystrokes_reach_the_process() {
        let dir = scratch("stdin");
        let status = run_with_keystrokes("sh", &["-c", "cat > echoed.txt"], &dir, "OPER\nQUIT\n", Duration::from_secs(10)).unwrap();
        assert!(status.success());
        assert_eq!(std::fs::read_to_string(dir.join("echoed.txt")).unwrap(), "OPER\nQUIT\n");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn hung_process_is_killed_at_deadline() {
        let dir = scratch("hang");
        let started = Instant::now();
        let err = run_with_keystrokes("sh", &["-c", "sleep 30"], &dir, "", Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let dir = scratch("missing");
        let err = run_with_keystrokes("definitely-not-a-solver", &[], &dir, "", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
