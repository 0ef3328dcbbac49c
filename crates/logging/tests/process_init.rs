//! crates/logging/tests/process_init.rs
//! Process-wide startup. One test only: the global router can be
//! installed once per process, so every step lives in a single body.

use logging::{init, log_event, set_thread_name, Component, InitError, LogLevel};

#[test]
fn init_routes_macros_to_the_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("served.log");

    let router = init("served-test", Some(&path), Some(LogLevel::Info)).unwrap();
    assert_eq!(router.default_facility().as_deref(), Some("FILE"));
    assert!(router.would_log(Component::Main, LogLevel::Info));
    assert!(!router.would_log(Component::Main, LogLevel::Debug));

    set_thread_name("boot");
    log_event!(Component::Main, "listening on port {}", 2049);
    log_event!(Component::Main, "workers: {}", 8);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let ident = router.ident();
    for line in &lines {
        assert!(line.contains(&format!(": epoch {:08x} ", ident.epoch)));
        assert!(line.contains(&format!(": {} ", ident.hostname)));
        assert!(line.contains(&format!(": {}-{}", ident.program, ident.pid)));
        assert!(line.contains("[boot] "));
        assert!(line.contains(":MAIN :EVENT :"));
    }
    assert!(lines[0].ends_with(":listening on port 2049"));
    assert!(lines[1].ends_with(":workers: 8"));

    // Below the startup broadcast: gated out before formatting.
    log_event!(Component::Main, "third");
    logging::log_debug!(Component::Main, "never lands");
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);

    // The verbosity signals move the broadcast level one step each.
    // raise() runs the handler synchronously, so the next query sees it.
    #[cfg(unix)]
    {
        assert_eq!(unsafe { libc::raise(libc::SIGUSR1) }, 0);
        assert!(router.would_log(Component::Main, LogLevel::Debug));
        assert_eq!(unsafe { libc::raise(libc::SIGUSR2) }, 0);
        assert!(!router.would_log(Component::Main, LogLevel::Debug));
    }

    assert!(matches!(
        init("served-test", None, None),
        Err(InitError::AlreadyInitialized)
    ));
}
