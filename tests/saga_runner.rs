#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::{tempdir, TempDir};

use saga_bridge::config::{SettingKey, Settings};
use saga_bridge::log::{LogLevel, MemoryLog, ProcessingLog};
use saga_bridge::saga::{
    RecordingSink, SagaRunner, ScriptShell, COMMANDS_LOG_HEADER, CONSOLE_LOG_HEADER,
};

type TestResult = Result<(), Box<dyn Error>>;

/// Temp workspace with a stand-in `saga_cmd` whose body is `script`.
fn workspace(script: &str) -> Result<(TempDir, Settings), Box<dyn Error>> {
    let dir = tempdir()?;
    let bin = dir.path().join("bin");
    fs::create_dir_all(&bin)?;

    let tool = bin.join("saga_cmd");
    fs::write(&tool, format!("#!/bin/sh\n{script}\n"))?;
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755))?;

    let mut settings = Settings::default();
    settings.set(SettingKey::UserFolder, &dir.path().join("user").to_string_lossy())?;
    settings.set(SettingKey::SagaFolder, &bin.to_string_lossy())?;
    Ok((dir, settings))
}

fn runner<'a>(settings: &'a Settings, log: &'a MemoryLog) -> SagaRunner<'a> {
    SagaRunner::new(settings, log).with_shell(ScriptShell::Posix)
}

#[tokio::test]
async fn progress_and_console_lines_are_separated() -> TestResult {
    let (_dir, settings) = workspace(r"printf '10%%\ncompleted step\n\\\n55%%\n'")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    let report = runner(&settings, &log).run(&["module1 -x 5"], &mut sink).await?;

    assert_eq!(sink.percentages, vec![10, 55]);
    assert_eq!(sink.console, vec!["completed step"]);
    assert_eq!(report.last_percentage, Some(55));
    assert!(report.success());
    Ok(())
}

#[tokio::test]
async fn arguments_reach_the_tool() -> TestResult {
    let (_dir, settings) = workspace(r#"echo "args: $*""#)?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    runner(&settings, &log)
        .run(&["ta_morphometry 0 -ELEVATION dem.sgrd", "io_gdal 1"], &mut sink)
        .await?;

    assert_eq!(
        sink.console,
        vec!["args: ta_morphometry 0 -ELEVATION dem.sgrd", "args: io_gdal 1"]
    );
    Ok(())
}

#[tokio::test]
async fn carriage_returns_split_progress_updates() -> TestResult {
    let (_dir, settings) = workspace(r"printf '1%%\r2%%\r\n  |  \r\n3%%'")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    runner(&settings, &log).run(&["x"], &mut sink).await?;

    assert_eq!(sink.percentages, vec![1, 2, 3]);
    assert!(sink.console.is_empty());
    Ok(())
}

#[tokio::test]
async fn unparsable_percent_lines_are_ignored() -> TestResult {
    let (_dir, settings) = workspace(r"echo 'abc%'; echo done")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    let report = runner(&settings, &log).run(&["x"], &mut sink).await?;

    assert!(sink.percentages.is_empty());
    assert_eq!(sink.console, vec!["done"]);
    assert_eq!(report.last_percentage, None);
    Ok(())
}

#[tokio::test]
async fn stderr_is_part_of_the_console() -> TestResult {
    let (_dir, settings) = workspace("echo 'Error: grid not found' >&2")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    runner(&settings, &log).run(&["x"], &mut sink).await?;

    assert_eq!(sink.console, vec!["Error: grid not found"]);
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_keep_their_written_order() -> TestResult {
    let (_dir, settings) = workspace(
        "i=0; while [ $i -lt 200 ]; do echo out$i; echo err$i >&2; i=$((i+1)); done",
    )?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    let report = runner(&settings, &log).run(&["x"], &mut sink).await?;

    let expected: Vec<String> = (0..200)
        .flat_map(|i| [format!("out{i}"), format!("err{i}")])
        .collect();
    assert_eq!(report.console, expected);
    assert_eq!(sink.console, expected);
    Ok(())
}

#[tokio::test]
async fn failing_tool_is_reported_not_raised() -> TestResult {
    let (_dir, settings) = workspace("echo failed; exit 3")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    let report = runner(&settings, &log).run(&["x"], &mut sink).await?;

    assert_eq!(report.exit_code, Some(3));
    assert!(!report.success());
    assert_eq!(report.console, vec!["failed"]);
    Ok(())
}

#[tokio::test]
async fn commands_and_console_are_logged() -> TestResult {
    let (_dir, settings) = workspace("echo hello")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    runner(&settings, &log).run(&["io_gdal 0"], &mut sink).await?;

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, LogLevel::Info);
    assert_eq!(entries[0].1, vec![COMMANDS_LOG_HEADER, "io_gdal 0"]);
    assert_eq!(entries[1].0, LogLevel::Info);
    assert_eq!(entries[1].1, vec![CONSOLE_LOG_HEADER, "hello"]);
    Ok(())
}

#[tokio::test]
async fn logging_follows_settings() -> TestResult {
    let (_dir, mut settings) = workspace("echo hello")?;
    settings.apply_override("SAGA_LOG_CONSOLE=false")?;
    settings.apply_override("SAGA_LOG_COMMANDS=false")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    runner(&settings, &log).run(&["io_gdal 0"], &mut sink).await?;

    assert!(log.entries().is_empty());
    assert_eq!(sink.console, vec!["hello"]);
    Ok(())
}

#[tokio::test]
async fn batch_job_is_owner_executable() -> TestResult {
    let (_dir, settings) = workspace("true")?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();
    let runner = runner(&settings, &log);

    runner.run(&["x"], &mut sink).await?;

    let script = runner.batch_job_path();
    assert_eq!(script.file_name().and_then(|n| n.to_str()), Some("saga_batch_job.sh"));
    let mode = fs::metadata(&script)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
    assert_eq!(fs::read_to_string(&script)?, "saga_cmd x\nexit");
    Ok(())
}

#[tokio::test]
async fn file_log_records_console_output() -> TestResult {
    let (dir, settings) = workspace("echo written")?;
    let log = ProcessingLog::in_folder(&dir.path().join("user"));
    let mut sink = RecordingSink::default();

    SagaRunner::new(&settings, &log)
        .with_shell(ScriptShell::Posix)
        .run(&["x"], &mut sink)
        .await?;

    let text = fs::read_to_string(log.path())?;
    let last = text.lines().last().unwrap_or_default();
    assert!(last.starts_with("INFO|"));
    assert!(last.ends_with(&format!("|{CONSOLE_LOG_HEADER}|written")));
    Ok(())
}

#[tokio::test]
async fn missing_tool_does_not_fail_the_run() -> TestResult {
    let dir = tempdir()?;
    let mut settings = Settings::default();
    settings.set(SettingKey::UserFolder, &dir.path().to_string_lossy())?;
    settings.set(SettingKey::SagaFolder, &empty_bin(dir.path())?)?;
    let log = MemoryLog::new();
    let mut sink = RecordingSink::default();

    let report = SagaRunner::new(&settings, &log)
        .with_shell(ScriptShell::Posix)
        .run(&["saga_cmd_that_is_not_there"], &mut sink)
        .await;

    let report = report?;
    assert_ne!(report.exit_code, Some(0));
    Ok(())
}

fn empty_bin(root: &Path) -> Result<String, Box<dyn Error>> {
    let bin = root.join("empty-bin");
    fs::create_dir_all(&bin)?;
    Ok(bin.to_string_lossy().into_owned())
}
