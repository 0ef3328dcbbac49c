//! crates/logging/tests/runtime_control.rs
//! Runtime verbosity control: environment pins, configuration
//! commits, broadcast bumps, and default-facility protection.

use logging::{
    Component, HeaderLevel, LogLevel, LogRouter, LoggerConfig, RegistryError,
};

#[test]
fn environment_pin_outlives_a_config_commit() {
    let router = LogRouter::new("served");
    let capture = router.attach_test_capture().unwrap();

    std::env::set_var("COMPONENT_CLIENT", "F_DBG");
    router.load_environment_levels();
    std::env::remove_var("COMPONENT_CLIENT");
    assert_eq!(
        router.component_level(Component::Client),
        LogLevel::FullDebug
    );

    let config = LoggerConfig {
        default_level: Some(LogLevel::Warn),
        ..LoggerConfig::default()
    };
    config.apply(&router).unwrap();

    assert_eq!(
        router.component_level(Component::Client),
        LogLevel::FullDebug
    );
    assert_eq!(router.component_level(Component::Net), LogLevel::Warn);
    // The refusal was reported through the engine itself.
    assert!(capture
        .lines()
        .iter()
        .any(|line| line.contains("COMPONENT_CLIENT") && line.contains("pinned")));
}

#[test]
fn invalid_environment_value_is_reported_and_skipped() {
    let router = LogRouter::new("served");
    let capture = router.attach_test_capture().unwrap();

    std::env::set_var("COMPONENT_STATE", "DEAFENING");
    router.load_environment_levels();
    std::env::remove_var("COMPONENT_STATE");

    assert_eq!(router.component_level(Component::State), LogLevel::Event);
    assert!(capture
        .lines()
        .iter()
        .any(|line| line.contains("DEAFENING") && line.contains("COMPONENT_STATE")));

    // Not pinned: a later change still lands.
    router.set_component_level(Component::State, LogLevel::Debug);
    assert_eq!(router.component_level(Component::State), LogLevel::Debug);
}

#[test]
fn broadcast_bump_widens_the_gate() {
    let router = LogRouter::new("served");
    router.set_component_level(Component::All, LogLevel::Event);
    assert!(!router.would_log(Component::Net, LogLevel::Debug));

    router.bump_verbosity(2);
    assert!(router.would_log(Component::Net, LogLevel::Debug));
    assert_eq!(router.component_level(Component::All), LogLevel::Debug);

    router.bump_verbosity(-2);
    assert!(!router.would_log(Component::Net, LogLevel::Debug));
}

#[test]
fn fatal_broadcast_silences_gated_dispatch() {
    let router = LogRouter::new("served");
    let capture = router.attach_test_capture().unwrap();
    router.set_component_level(Component::All, LogLevel::Fatal);

    let site = logging::CallSite {
        file: file!(),
        line: line!(),
        function: "runtime_control",
    };
    // The gate-then-dispatch sequence of the logging macros.
    for level in [LogLevel::Warn, LogLevel::Event, LogLevel::Debug] {
        if router.would_log(Component::Net, level) {
            router.dispatch(Component::Net, level, site, format_args!("suppressed"));
        }
    }

    assert!(capture.is_empty());
    // Only severities at the ceiling or above still pass.
    assert!(router.would_log(Component::Net, LogLevel::Fatal));
}

#[test]
fn the_default_facility_cannot_be_silenced() {
    let router = LogRouter::new("served");
    let _capture = router.attach_test_capture().unwrap();
    router.set_default_facility("TEST").unwrap();

    assert!(matches!(
        router.deactivate_facility("TEST"),
        Err(RegistryError::DefaultProtected(_))
    ));
    assert!(matches!(
        router.release_facility("TEST"),
        Err(RegistryError::DefaultProtected(_))
    ));
    assert!(router.is_active("TEST"));
}

#[test]
fn promoting_a_new_default_demotes_the_old_one() {
    let router = LogRouter::new("served");
    let first = router.attach_test_capture().unwrap();
    router.set_default_facility("TEST").unwrap();

    let second = logging::CaptureSink::new();
    router
        .register_sink(
            "SECOND",
            std::sync::Arc::new(second.clone()),
            LogLevel::FullDebug,
            HeaderLevel::None,
        )
        .unwrap();
    router.set_default_facility("SECOND").unwrap();

    assert_eq!(router.default_facility().as_deref(), Some("SECOND"));
    assert!(!router.is_active("TEST"));

    router.dispatch(
        Component::Main,
        LogLevel::Event,
        logging::CallSite {
            file: file!(),
            line: line!(),
            function: "runtime_control",
        },
        format_args!("after handover"),
    );
    assert!(first.is_empty());
    assert_eq!(second.lines(), vec!["after handover"]);
}

#[test]
fn placeholder_promotion_starts_delivery() {
    let router = LogRouter::new("served");
    router.create_placeholder("AUDIT");
    router.activate_facility("AUDIT").unwrap();
    router.set_facility_ceiling("AUDIT", LogLevel::Warn).unwrap();

    let site = logging::CallSite {
        file: file!(),
        line: line!(),
        function: "runtime_control",
    };
    // Placeholder: active but sinkless, nothing delivered.
    router.dispatch(Component::Control, LogLevel::Warn, site, format_args!("early"));

    let capture = logging::CaptureSink::new();
    router
        .promote_custom(
            "audit",
            std::sync::Arc::new(capture.clone()),
            HeaderLevel::None,
        )
        .unwrap();
    router.dispatch(Component::Control, LogLevel::Warn, site, format_args!("late"));
    router.dispatch(Component::Control, LogLevel::Info, site, format_args!("filtered"));

    // The pre-registration ceiling survived the promotion.
    assert_eq!(capture.lines(), vec!["late"]);
}
