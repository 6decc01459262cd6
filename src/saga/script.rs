// src/saga/script.rs

//! Batch script text and the shell that runs it.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;

/// Base name of the generated script, without extension.
pub const BATCH_JOB_STEM: &str = "saga_batch_job";

/// Prefix put in front of every command line.
pub const SAGA_CMD: &str = "saga_cmd";

/// Platform family that decides the script dialect and how it is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptShell {
    /// Windows `cmd.exe` batch file.
    Cmd,
    /// POSIX `sh` script.
    Posix,
}

impl ScriptShell {
    /// Shell family of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            ScriptShell::Cmd
        } else {
            ScriptShell::Posix
        }
    }

    pub fn script_file_name(self) -> String {
        match self {
            ScriptShell::Cmd => format!("{BATCH_JOB_STEM}.bat"),
            ScriptShell::Posix => format!("{BATCH_JOB_STEM}.sh"),
        }
    }

    pub fn line_ending(self) -> &'static str {
        match self {
            ScriptShell::Cmd => "\r\n",
            ScriptShell::Posix => "\n",
        }
    }

    /// Environment lines written before the commands.
    ///
    /// `cmd.exe` needs the tool folder and its module library folder on the
    /// `PATH`. POSIX scripts get none.
    pub fn header(self, saga_folder: &str) -> Vec<String> {
        match self {
            ScriptShell::Cmd => vec![
                format!("set SAGA={saga_folder}"),
                format!("set SAGA_MLB={saga_folder}\\modules"),
                "PATH=%PATH%;%SAGA%;%SAGA_MLB%".to_string(),
            ],
            ScriptShell::Posix => Vec::new(),
        }
    }

    /// Process that runs `script` with its stderr redirected into stdout,
    /// so the caller reads one stream in the order it was written.
    ///
    /// On POSIX a non-empty `saga_folder` is put in front of the child's
    /// `PATH`, the counterpart of the `cmd.exe` header.
    pub fn launch_command(self, script: &Path, saga_folder: &str) -> Command {
        match self {
            ScriptShell::Cmd => {
                let mut cmd = Command::new("cmd.exe");
                // cmd strips the outer pair, leaving the script path quoted.
                let line = format!("\"\"{}\" 2>&1\"", script.display());
                #[cfg(windows)]
                cmd.arg("/C").raw_arg(line);
                #[cfg(not(windows))]
                cmd.arg("/C").arg(line);
                cmd
            }
            ScriptShell::Posix => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c")
                    .arg(format!("{} 2>&1", sh_quote(&script.to_string_lossy())));
                if let Some(path) = prepend_to_path(saga_folder) {
                    cmd.env("PATH", path);
                }
                cmd
            }
        }
    }
}

fn prepend_to_path(folder: &str) -> Option<OsString> {
    if folder.is_empty() {
        return None;
    }
    let mut dirs = vec![PathBuf::from(folder)];
    if let Some(current) = env::var_os("PATH") {
        dirs.extend(env::split_paths(&current));
    }
    env::join_paths(dirs).ok()
}

/// Single-quote `word` for `sh`.
fn sh_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Full text of a batch script running `commands` in order.
///
/// The last line is `exit`, without a line ending after it.
pub fn compose_script<S: AsRef<str>>(
    commands: &[S],
    shell: ScriptShell,
    saga_folder: &str,
) -> String {
    let eol = shell.line_ending();
    let mut script = String::new();

    for line in shell.header(saga_folder) {
        script.push_str(&line);
        script.push_str(eol);
    }
    for command in commands {
        script.push_str(SAGA_CMD);
        script.push(' ');
        script.push_str(command.as_ref());
        script.push_str(eol);
    }
    script.push_str("exit");
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_script_has_no_header() {
        let script = compose_script(
            &["module1 -i in.tif -o out.tif", "module2 -x 5"],
            ScriptShell::Posix,
            "/opt/saga",
        );
        assert_eq!(
            script,
            "saga_cmd module1 -i in.tif -o out.tif\nsaga_cmd module2 -x 5\nexit"
        );
    }

    #[test]
    fn cmd_script_sets_up_path() {
        let script = compose_script(&["ta_morphometry 0"], ScriptShell::Cmd, r"C:\saga");
        let lines: Vec<&str> = script.split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                r"set SAGA=C:\saga",
                r"set SAGA_MLB=C:\saga\modules",
                "PATH=%PATH%;%SAGA%;%SAGA_MLB%",
                "saga_cmd ta_morphometry 0",
                "exit",
            ]
        );
    }

    #[test]
    fn empty_batch_still_exits() {
        let script = compose_script::<&str>(&[], ScriptShell::Posix, "");
        assert_eq!(script, "exit");
    }

    #[test]
    fn script_names_follow_shell() {
        assert_eq!(ScriptShell::Cmd.script_file_name(), "saga_batch_job.bat");
        assert_eq!(ScriptShell::Posix.script_file_name(), "saga_batch_job.sh");
    }

    #[test]
    fn saga_folder_leads_the_path() {
        let path = prepend_to_path("/opt/saga/bin").unwrap();
        let first = env::split_paths(&path).next().unwrap();
        assert_eq!(first, PathBuf::from("/opt/saga/bin"));
        assert_eq!(prepend_to_path(""), None);
    }

    #[test]
    fn quoting_survives_single_quotes() {
        assert_eq!(sh_quote("/tmp/it's here"), r"'/tmp/it'\''s here'");
    }

    #[test]
    fn launch_merges_stderr_into_stdout() {
        let cmd = ScriptShell::Posix.launch_command(Path::new("/tmp/it's here/job.sh"), "");
        let args: Vec<_> = cmd.as_std().get_args().collect();
        assert_eq!(cmd.as_std().get_program(), "sh");
        assert_eq!(args, vec!["-c", r"'/tmp/it'\''s here/job.sh' 2>&1"]);
    }
}
