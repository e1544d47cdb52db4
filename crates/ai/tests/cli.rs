use {
    std::{
        fs,
        path::Path,
        process::{Command, Output},
    },
    zappy_ai::args::USAGE,
};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_zappy_ai"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run zappy_ai")
}

fn assert_usage_only(output: &Output) {
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), USAGE);
    assert!(output.stderr.is_empty());
}

#[test]
fn no_arguments_prints_usage() {
    assert_usage_only(&run(&[]));
}

#[test]
fn help_word_prints_usage() {
    assert_usage_only(&run(&["help"]));
}

#[test]
fn help_flag_prints_usage() {
    assert_usage_only(&run(&["--help"]));
}

#[test]
fn valid_arguments_succeed_silently() {
    let output = run(&["-p", "4343", "-n", "Beta", "-h", "10.0.0.5"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn name_alone_succeeds() {
    let output = run(&["-n", "Alpha"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_port_exits_with_84() {
    let output = run(&["-p", "xyz", "-n", "Gamma"]);
    assert_eq!(output.status.code(), Some(84));
    assert_eq!(String::from_utf8_lossy(&output.stdout), USAGE);
    assert!(String::from_utf8_lossy(&output.stderr).contains("xyz"));
}

#[test]
fn missing_name_exits_with_84() {
    let output = run(&["-p", "4242"]);
    assert_eq!(output.status.code(), Some(84));
    assert_eq!(String::from_utf8_lossy(&output.stdout), USAGE);
    assert!(!output.stderr.is_empty());
}

#[test]
fn unknown_flag_exits_with_84() {
    let output = run(&["-n", "Alpha", "--verbose"]);
    assert_eq!(output.status.code(), Some(84));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--verbose"));
}

/// Returns the contents of the single file in `<dir>/log`.
fn read_only_log_file(dir: &Path) -> String {
    let files: Vec<_> = fs::read_dir(dir.join("log"))
        .expect("log directory")
        .collect::<Result<_, _>>()
        .expect("log directory entries");
    assert_eq!(files.len(), 1);

    let path = files[0].path();
    let file_name = path.file_name().and_then(|x| x.to_str()).unwrap_or_default();
    assert!(file_name.starts_with("app_") && file_name.ends_with(".log"));

    fs::read_to_string(&path).expect("log file")
}

#[test]
fn file_log_mode_writes_a_log_file() {
    let dir = tempfile::tempdir().expect("temporary directory");

    let output = Command::new(env!("CARGO_BIN_EXE_zappy_ai"))
        .args(["-n", "Delta", "--log-mode", "file"])
        .env_remove("RUST_LOG")
        .current_dir(dir.path())
        .output()
        .expect("failed to run zappy_ai");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());

    assert!(read_only_log_file(dir.path()).contains("Delta"));
}

#[test]
fn both_log_mode_writes_to_stderr_and_file() {
    let dir = tempfile::tempdir().expect("temporary directory");

    let output = Command::new(env!("CARGO_BIN_EXE_zappy_ai"))
        .args(["-n", "Echo", "--log-mode", "both"])
        .env_remove("RUST_LOG")
        .current_dir(dir.path())
        .output()
        .expect("failed to run zappy_ai");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Starting Zappy AI for team `Echo`"));
    assert!(read_only_log_file(dir.path()).contains("Starting Zappy AI for team `Echo`"));
}

#[test]
fn rust_log_raises_console_verbosity() {
    let output = Command::new(env!("CARGO_BIN_EXE_zappy_ai"))
        .args(["-n", "Foxtrot"])
        .env("RUST_LOG", "debug")
        .output()
        .expect("failed to run zappy_ai");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Starting Zappy AI for team `Foxtrot`"));
    assert!(stderr.contains("Configuration: Configuration"));
}

#[test]
fn flag_without_value_exits_with_84() {
    let output = run(&["-n", "-team"]);
    assert_eq!(output.status.code(), Some(84));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "error: missing value for argument: `-n`\n"
    );
}

#[test]
fn silent_log_mode_writes_nothing() {
    let dir = tempfile::tempdir().expect("temporary directory");

    let output = Command::new(env!("CARGO_BIN_EXE_zappy_ai"))
        .args(["-n", "Delta", "--log-mode", "none"])
        .env("RUST_LOG", "trace")
        .current_dir(dir.path())
        .output()
        .expect("failed to run zappy_ai");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
    assert!(!dir.path().join("log").exists());
}
