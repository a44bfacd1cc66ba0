//! Property tests for settings persistence

use proptest::prelude::*;
use tabstrip_core::{ConfigError, ConfigManager, LastTabClosePolicy, TabStripSettings};

// ========== Strategies ==========

fn arb_policy() -> impl Strategy<Value = LastTabClosePolicy> {
    prop_oneof![
        Just(LastTabClosePolicy::CloseWindow),
        Just(LastTabClosePolicy::KeepWindowOpen),
    ]
}

prop_compose! {
    fn arb_settings()(
        tab_groups_enabled in any::<bool>(),
        splits_enabled in any::<bool>(),
        last_tab_close in arb_policy(),
        validate_after_mutation in any::<bool>(),
        select_opener_on_close in any::<bool>(),
        default_split_ratio in 0.0_f64..=1.0,
    ) -> TabStripSettings {
        TabStripSettings {
            tab_groups_enabled,
            splits_enabled,
            last_tab_close,
            validate_after_mutation,
            select_opener_on_close,
            default_split_ratio,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Settings survive a TOML round trip unchanged.
    #[test]
    fn settings_round_trip_through_toml(settings in arb_settings()) {
        let text = settings.to_toml().unwrap();
        let parsed = TabStripSettings::from_toml(&text).unwrap();
        prop_assert_eq!(parsed, settings);
    }

    /// Ratios outside the unit interval are rejected on load.
    #[test]
    fn out_of_range_ratio_is_rejected(ratio in prop_oneof![-10.0_f64..-0.001, 1.001_f64..10.0]) {
        let text = format!("default_split_ratio = {ratio:?}\n");
        let result = TabStripSettings::from_toml(&text);
        prop_assert!(matches!(result, Err(ConfigError::Invalid(_))), "{:?}", result);
    }

    /// Saved settings load back from the same directory.
    #[test]
    fn manager_round_trips_through_disk(settings in arb_settings()) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_config_dir(dir.path().join("nested"));
        manager.save_settings(&settings).unwrap();
        prop_assert!(manager.settings_path().exists());
        prop_assert_eq!(manager.load_settings().unwrap(), settings);
    }
}

#[test]
fn empty_file_gives_defaults() {
    assert_eq!(
        TabStripSettings::from_toml("").unwrap(),
        TabStripSettings::default()
    );
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "splits_enabled = [").unwrap();
    assert!(matches!(
        ConfigManager::load_from(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn missing_explicit_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        ConfigManager::load_from(&path),
        Err(ConfigError::Io { .. })
    ));
}
