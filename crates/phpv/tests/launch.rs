use std::time::Duration;

use phpv::{App, AppSettings, AutoConfirm, FilterBucket, Notifier};
use phpv_platform::AppPaths;

#[test]
fn launch_reads_saved_settings_and_trims_the_log() {
    let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
    let paths = AppPaths::rooted(temp_dir.path());
    paths.ensure_dirs().expect("app directories should be created");

    let settings = AppSettings {
        poll_interval_ms: 250,
        default_filter: FilterBucket::X86,
        debug_logging: false,
        max_log_size_bytes: 64,
        ..AppSettings::default()
    };
    settings
        .save_to(&paths.settings_file())
        .expect("settings should be written");

    let old_lines: String = (0..20).map(|i| format!("old line {i}\n")).collect();
    std::fs::write(paths.log_file(), &old_lines).expect("log should be written");

    let (notifier, _rx) = Notifier::channel();
    let app = App::launch_in(&paths, Box::new(AutoConfirm), notifier)
        .expect("launch should build the app");

    assert_eq!(app.job_settings().poll_interval, Duration::from_millis(250));
    assert_eq!(app.filter_bucket(), FilterBucket::X86);
    assert_eq!(log::max_level(), log::LevelFilter::Off);

    let trimmed = std::fs::read_to_string(paths.log_file()).expect("log should be readable");
    assert!(trimmed.len() < old_lines.len());
    assert!(trimmed.ends_with("old line 19\n"));
}

#[test]
fn launch_rejects_an_unusable_backend_url() {
    let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
    let paths = AppPaths::rooted(temp_dir.path());
    let settings = AppSettings {
        api_base_url: "not a url".to_string(),
        ..AppSettings::default()
    };
    settings
        .save_to(&paths.settings_file())
        .expect("settings should be written");

    let (notifier, _rx) = Notifier::channel();
    let result = App::launch_in(&paths, Box::new(AutoConfirm), notifier);

    assert!(result.is_err());
}
