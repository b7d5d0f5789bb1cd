use std::process::Command;

#[test]
fn missing_api_key_exits_before_serving() {
    // Empty cwd so no .env is picked up
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chinook-relay"))
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .env("PORT", "0")
        .arg("server")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {stderr}");
}

#[test]
fn blank_api_key_is_also_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_chinook-relay"))
        .current_dir(dir.path())
        .env("OPENAI_API_KEY", "   ")
        .env("PORT", "0")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
