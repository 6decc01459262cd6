use std::error::Error;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use saga_bridge::config::{load_and_validate, load_or_default, SettingKey};
use saga_bridge::errors::BridgeError;
use saga_bridge::formats::TextEncoding;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn full_file_is_loaded_into_settings() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(
        &path,
        r#"
[processing]
use_selected = false
user_folder = "/srv/processing/user"
temp_folder = "/srv/processing/tmp"

[ui]
encoding = "ISO-8859-1"

[saga]
folder = "/opt/saga"
log_console = false
log_commands = true
"#,
    )?;

    let settings = load_and_validate(&path)?;

    assert!(!settings.use_selected());
    assert_eq!(settings.encoding(), TextEncoding::windows_1252());
    assert_eq!(settings.saga_folder(), "/opt/saga");
    assert!(!settings.log_console());
    assert!(settings.log_commands());
    assert_eq!(settings.user_folder(), PathBuf::from("/srv/processing/user"));
    assert_eq!(settings.temp_folder(), PathBuf::from("/srv/processing/tmp"));
    Ok(())
}

#[test]
fn missing_sections_fall_back_to_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[saga]\nfolder = \"/usr/bin\"\n")?;

    let settings = load_and_validate(&path)?;

    assert!(settings.use_selected());
    assert_eq!(settings.encoding(), TextEncoding::System);
    assert!(settings.log_console());
    assert_eq!(settings.saga_folder(), "/usr/bin");
    Ok(())
}

#[test]
fn unknown_encoding_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[ui]\nencoding = \"EBCDIC\"\n")?;

    let err = load_and_validate(&path).err().ok_or("expected an error")?;
    assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("encoding")));
    Ok(())
}

#[test]
fn empty_folder_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[processing]\ntemp_folder = \"\"\n")?;

    assert!(matches!(
        load_and_validate(&path),
        Err(BridgeError::Config(_))
    ));
    Ok(())
}

#[test]
fn malformed_toml_is_a_parse_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[saga\nfolder = ")?;

    assert!(matches!(load_and_validate(&path), Err(BridgeError::Toml(_))));
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_or_default(Some(&missing)),
        Err(BridgeError::Io(_))
    ));
}

#[test]
fn overrides_apply_on_top_of_the_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[processing]\nuse_selected = true\n")?;

    let mut settings = load_and_validate(&path)?;
    settings.apply_override("USE_SELECTED=false")?;
    settings.set(SettingKey::Encoding, "UTF-8")?;

    assert!(!settings.use_selected());
    assert_eq!(settings.encoding(), TextEncoding::utf8());
    Ok(())
}

#[test]
fn host_code_pages_are_accepted() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Processing.toml");
    fs::write(&path, "[ui]\nencoding = \"windows-1251\"\n")?;

    let mut settings = load_and_validate(&path)?;
    assert_eq!(settings.encoding().code_page_name(), "windows-1251");

    for label in ["CP1252", "KOI8-R", "Shift_JIS"] {
        settings.set(SettingKey::Encoding, label)?;
    }
    assert_eq!(settings.encoding().code_page_name(), "Shift_JIS");
    assert!(settings.set(SettingKey::Encoding, "EBCDIC").is_err());
    Ok(())
}
