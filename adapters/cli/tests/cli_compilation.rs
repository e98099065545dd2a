use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "neon-defence"])
        .status()
        .expect("failed to invoke cargo check for neon-defence CLI binary");

    assert!(status.success(), "cargo check --bin neon-defence should succeed");
}

#[test]
fn scripted_run_prints_the_final_board() {
    let output = Command::new(env!("CARGO_BIN_EXE_neon-defence"))
        .args([
            "--preset",
            "isometric",
            "--place",
            "2,3",
            "--frames",
            "120",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run neon-defence");

    assert!(output.status.success(), "scripted run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    // A shot fired in the last frames is still drawn over its tower.
    let tower = stdout.lines().nth(3).and_then(|row| row.chars().nth(2));
    assert!(
        matches!(tower, Some('>' | 'v' | '<' | '^' | '*')),
        "placed tower missing from board:\n{stdout}"
    );
    assert!(stdout.contains("wave 1 (in progress)"), "{stdout}");
    assert!(stdout.contains("finished after 120 frames"), "{stdout}");
}

#[test]
fn idle_run_leaves_the_first_wave_unstarted() {
    let output = Command::new(env!("CARGO_BIN_EXE_neon-defence"))
        .args(["--preset", "isometric", "--idle", "--frames", "120"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run neon-defence");

    assert!(output.status.success(), "idle run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("money 100 | lives 20 | wave 1\n"), "{stdout}");
    assert!(!stdout.contains('E'), "no enemy should spawn:\n{stdout}");
}

#[test]
fn missing_config_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_neon-defence"))
        .args(["--config", "no/such/rules.toml", "--frames", "1"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run neon-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no/such/rules.toml"), "{stderr}");
}
