//! Exec handler execution via subprocess
//!
//! A handler receives one JSON object on stdin (`namespace`, `args` and
//! the `update`) and answers on stdout. Empty output means no reply.

use std::path::Path;
use std::process::Stdio;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::Update;
use super::router::ExecHandler;

/// How a handler file is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    /// Passed as the only argument to an interpreter on `PATH`
    Interpreter(&'static str),
    /// Executed directly (binary or script with a shebang)
    Direct,
}

impl Launcher {
    /// Pick a launcher from the handler's file extension
    ///
    /// # Errors
    ///
    /// Returns error for extensions with no known interpreter
    pub fn for_path(path: &Path) -> Result<Self, String> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Ok(Self::Direct),
            Some("sh") => Ok(Self::Interpreter("bash")),
            Some("py") => Ok(Self::Interpreter("python3")),
            Some("js") => Ok(Self::Interpreter("node")),
            Some("rb") => Ok(Self::Interpreter("ruby")),
            Some(other) => Err(format!("no interpreter for .{other} handlers")),
        }
    }

    fn command(self, path: &Path) -> Command {
        match self {
            Self::Interpreter(program) => {
                let mut command = Command::new(program);
                command.arg(path);
                command
            }
            Self::Direct => Command::new(path),
        }
    }
}

#[derive(Serialize)]
struct HandlerInput<'a> {
    namespace: &'a str,
    args: &'a str,
    update: &'a Update,
}

/// Run an exec handler for an update
///
/// The handler runs in its own directory. Writing stdin and waiting for
/// exit share one deadline, so a handler that never reads its input
/// still times out.
///
/// # Errors
///
/// Returns error if the handler cannot be started, times out or exits
/// with a non-zero status
pub async fn execute_handler(
    handler: &ExecHandler,
    namespace: &str,
    update: &Update,
    args: &str,
) -> Result<Option<String>, String> {
    let payload = serde_json::to_vec(&HandlerInput {
        namespace,
        args,
        update,
    })
    .map_err(|e| format!("failed to encode update: {e}"))?;

    let mut command = handler.launcher.command(&handler.path);
    if let Some(dir) = handler.path.parent() {
        command.current_dir(dir);
    }

    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("failed to start {}: {e}", handler.path.display()))?;

    let stdin = child.stdin.take();
    let run = async move {
        if let Some(mut stdin) = stdin {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| format!("failed to send update: {e}"))?;
        }
        child
            .wait_with_output()
            .await
            .map_err(|e| format!("handler execution failed: {e}"))
    };

    let output = timeout(handler.timeout, run)
        .await
        .map_err(|_| format!("handler timed out after {:?}", handler.timeout))??;

    if !output.stderr.is_empty() {
        tracing::debug!(
            handler = %handler.path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "handler stderr"
        );
    }

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        return Err(format!("handler exited with code {code}"));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let reply = stdout.trim();
    Ok((!reply.is_empty()).then(|| reply.to_string()))
}
