// src/saga/runner.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::errors::{BridgeError, Result};
use crate::log::{LogLevel, SharedLog};
use crate::saga::progress::{classify_line, LineSplitter, ProgressSink, RunEvent};
use crate::saga::script::{compose_script, ScriptShell};

/// First line of the console output entry in the shared log.
pub const CONSOLE_LOG_HEADER: &str = "SAGA execution console output";

/// First line of the command batch entry in the shared log.
pub const COMMANDS_LOG_HEADER: &str = "SAGA execution commands";

const READ_CHUNK: usize = 4096;

/// What a finished run left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Exit code of the script, `None` when it was killed by a signal.
    pub exit_code: Option<i32>,
    /// Console lines in the order they were reported, header excluded.
    pub console: Vec<String>,
    pub last_percentage: Option<u32>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Writes the batch script and runs it, one run at a time.
pub struct SagaRunner<'a> {
    settings: &'a Settings,
    log: &'a dyn SharedLog,
    shell: ScriptShell,
}

impl<'a> SagaRunner<'a> {
    pub fn new(settings: &'a Settings, log: &'a dyn SharedLog) -> Self {
        Self {
            settings,
            log,
            shell: ScriptShell::native(),
        }
    }

    pub fn with_shell(mut self, shell: ScriptShell) -> Self {
        self.shell = shell;
        self
    }

    pub fn shell(&self) -> ScriptShell {
        self.shell
    }

    /// Fixed location of the script: `saga_batch_job.{bat,sh}` in the user
    /// folder.
    pub fn batch_job_path(&self) -> PathBuf {
        self.settings
            .user_folder()
            .join(self.shell.script_file_name())
    }

    /// Write the script for `commands`, replacing any earlier one.
    pub fn create_batch_job<S: AsRef<str>>(&self, commands: &[S]) -> Result<PathBuf> {
        let path = self.batch_job_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let script = compose_script(commands, self.shell, self.settings.saga_folder());
        fs::write(&path, script)?;
        debug!(path = ?path, commands = commands.len(), "wrote batch job");
        Ok(path)
    }

    /// Log the commands when enabled, write the script, then execute it.
    pub async fn run<S: AsRef<str>>(
        &self,
        commands: &[S],
        sink: &mut dyn ProgressSink,
    ) -> Result<RunReport> {
        if self.settings.log_commands() {
            let mut lines = vec![COMMANDS_LOG_HEADER.to_string()];
            lines.extend(commands.iter().map(|c| c.as_ref().to_string()));
            self.log.add_to_log(LogLevel::Info, &lines)?;
        }
        self.create_batch_job(commands)?;
        self.execute(sink).await
    }

    /// Run the current batch script to completion, streaming its output to
    /// `sink`.
    ///
    /// A non-zero exit status is not an error: it lands in the report and
    /// in a warning. Errors come only from preparing, spawning or waiting
    /// on the process, and from the shared log.
    pub async fn execute(&self, sink: &mut dyn ProgressSink) -> Result<RunReport> {
        let script = self.batch_job_path();
        if self.shell == ScriptShell::Posix {
            make_executable(&script)
                .with_context(|| format!("setting permissions on {}", script.display()))?;
        }

        let mut cmd = self
            .shell
            .launch_command(&script, self.settings.saga_folder());
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        info!(script = ?script, shell = ?self.shell, "starting batch job");
        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning batch job {}", script.display()))?;

        // The tool never reads input; closing stdin keeps it from blocking.
        drop(child.stdin.take());
        // stderr arrives here too, merged by the launch command.
        let output = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Process("output was not captured".to_string()))?;

        let (tx, mut rx) = mpsc::channel::<RunEvent>(64);
        let reader = spawn_reader(output, tx);

        let mut report = RunReport::default();
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::Progress(percent) => {
                    let percent = percent.min(100);
                    sink.set_percentage(percent);
                    report.last_percentage = Some(percent);
                }
                RunEvent::Console(line) => {
                    sink.set_console_info(&line);
                    report.console.push(line);
                }
            }
        }
        if let Err(err) = reader.await {
            warn!(error = %err, "output reader task failed");
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for batch job {}", script.display()))?;
        report.exit_code = status.code();

        if report.success() {
            info!(lines = report.console.len(), "batch job finished");
        } else {
            warn!(exit_code = ?report.exit_code, "batch job exited with failure status");
        }

        if self.settings.log_console() {
            let mut lines = Vec::with_capacity(report.console.len() + 1);
            lines.push(CONSOLE_LOG_HEADER.to_string());
            lines.extend(report.console.iter().cloned());
            self.log.add_to_log(LogLevel::Info, &lines)?;
        }

        Ok(report)
    }
}

/// Drain the tool output, classify its lines and send the events on.
fn spawn_reader<R>(mut reader: R, tx: mpsc::Sender<RunEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut splitter = LineSplitter::new();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    warn!(error = %err, "reading tool output failed");
                    break;
                }
            };
            for line in splitter.push(&buf[..n]) {
                if !forward(&line, &tx).await {
                    return;
                }
            }
        }
        if let Some(line) = splitter.finish() {
            forward(&line, &tx).await;
        }
    })
}

/// Returns false once the receiving side is gone.
async fn forward(line: &str, tx: &mpsc::Sender<RunEvent>) -> bool {
    debug!(line, "tool output");
    match classify_line(line) {
        Some(event) => tx.send(event).await.is_ok(),
        None => true,
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
