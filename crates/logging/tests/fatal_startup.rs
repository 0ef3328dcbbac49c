//! crates/logging/tests/fatal_startup.rs
//! A fatal record raised before process-wide logging exists must still
//! terminate: stderr gets the message and the process exits with 2.

use logging::{log_fatal, Component};

// The test re-runs its own binary filtered down to itself; the child
// sees the marker variable and takes the fatal path.
#[test]
fn fatal_before_init_terminates_with_code_2() {
    if std::env::var_os("FATAL_STARTUP_CHILD").is_some() {
        log_fatal!(Component::Main, "no route for {}", "records");
        unreachable!("a fatal record must not return");
    }

    let exe = std::env::current_exe().unwrap();
    let output = std::process::Command::new(exe)
        .args([
            "fatal_before_init_terminates_with_code_2",
            "--exact",
            "--nocapture",
        ])
        .env("FATAL_STARTUP_CHILD", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no route for records"));
}
