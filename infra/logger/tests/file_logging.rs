use regkit_logger::{LevelFilter, Logger};
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn writes_log_records_to_a_rolling_file() {
    let dir = tempfile::tempdir().unwrap();

    let logger = Logger::builder("regkit-test")
        .console(false)
        .level(LevelFilter::DEBUG)
        .path(dir.path())
        .init()
        .unwrap();

    tracing::info!("customer form initialized");
    tracing::debug!(path = "emailGroup.email", "value changed");

    logger.flush();
    drop(logger);

    let mut contents = String::new();
    for entry in fs::read_dir(dir.path()).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("regkit-test"), "unexpected file: {name}");
        assert!(name.ends_with(".log"), "unexpected file: {name}");
        contents.push_str(&fs::read_to_string(entry.path()).unwrap());
    }

    assert!(contents.contains("customer form initialized"));
    assert!(contents.contains("value changed"));
    assert!(contents.contains("emailGroup.email"));
}
