use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How a timed process invocation can fail.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("command timed out after {0:?}")]
    TimedOut(Duration),
    #[error("failed to run command: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
}

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Run a command to completion with a wall-clock timeout, capturing stdout.
/// Stdout is drained on a separate thread so a chatty child cannot fill the
/// pipe and deadlock against the wait loop. On expiry the child is killed
/// and `ExecError::TimedOut` is returned.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<ExecOutput, ExecError> {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null());

    let mut child = cmd.spawn()?;
    let mut stdout = child
        .stdout
        .take()
        .expect("stdout was requested as piped");

    let reader = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    kill_and_reap(&mut child);
                    // Unblock the reader by letting the pipe close.
                    let _ = reader.join();
                    return Err(ExecError::TimedOut(timeout));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let raw = reader.join().unwrap_or_default();
    Ok(ExecOutput {
        success: status.success(),
        stdout: String::from_utf8_lossy(&raw).into_owned(),
    })
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
