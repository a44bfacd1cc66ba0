//! Property tests for the tracing configuration

use proptest::prelude::*;
use tabstrip_core::tracing::{TracingConfig, TracingLevel, TracingOutput, span_names};

// ========== Strategies ==========

fn arb_tracing_level() -> impl Strategy<Value = TracingLevel> {
    prop_oneof![
        Just(TracingLevel::Error),
        Just(TracingLevel::Warn),
        Just(TracingLevel::Info),
        Just(TracingLevel::Debug),
        Just(TracingLevel::Trace),
    ]
}

fn arb_tracing_output() -> impl Strategy<Value = TracingOutput> {
    prop_oneof![
        Just(TracingOutput::Stdout),
        Just(TracingOutput::Stderr),
        "[a-z]{1,8}".prop_map(|name| TracingOutput::File {
            path: std::env::temp_dir().join(format!("{name}.log")),
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// More `-v` flags never lower the level; quiet always wins.
    #[test]
    fn verbosity_is_monotonic(verbose in 0_u8..8) {
        let more = verbose.saturating_add(1);
        prop_assert!(TracingLevel::from_verbosity(more, false) >= TracingLevel::from_verbosity(verbose, false));
        prop_assert_eq!(TracingLevel::from_verbosity(verbose, true), TracingLevel::Error);
    }

    /// Levels parse back from their display form, in any case.
    #[test]
    fn level_display_round_trips(level in arb_tracing_level(), upper in any::<bool>()) {
        let text = if upper { level.to_string().to_uppercase() } else { level.to_string() };
        prop_assert_eq!(text.parse::<TracingLevel>(), Ok(level));
    }

    /// Builder calls land in the matching fields.
    #[test]
    fn builder_sets_fields(
        level in arb_tracing_level(),
        output in arb_tracing_output(),
        timing in any::<bool>(),
        filter in prop::option::of("tabstrip_core=(debug|info|warn)"),
    ) {
        let mut config = TracingConfig::new()
            .with_level(level)
            .with_output(output.clone())
            .with_timing(timing);
        if let Some(filter) = &filter {
            config = config.with_filter(filter.clone());
        }
        prop_assert_eq!(config.level, level);
        prop_assert_eq!(config.output, output);
        prop_assert_eq!(config.include_timing, timing);
        prop_assert_eq!(config.filter, filter);
    }
}

#[test]
fn unknown_level_is_rejected() {
    assert!("loud".parse::<TracingLevel>().is_err());
}

#[test]
fn span_names_share_a_prefix() {
    for name in [
        span_names::INSERT,
        span_names::CLOSE,
        span_names::MOVE,
        span_names::GROUP,
        span_names::SPLIT,
        span_names::SELECT,
        span_names::PIN,
        span_names::UPDATE,
    ] {
        assert!(name.starts_with("tabstrip."), "{name}");
    }
}

#[test]
fn presets_differ_in_level() {
    assert_eq!(TracingConfig::for_cli(1, false).level, TracingLevel::Info);
    assert_eq!(TracingConfig::diagnostics().level, TracingLevel::Trace);
    assert_eq!(TracingConfig::default().output, TracingOutput::Stderr);
}
