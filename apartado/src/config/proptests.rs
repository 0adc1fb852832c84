//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, OutputFormat, PolicyConfig, RulesConfig, SubmissionConfig};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn policy_strategy() -> impl Strategy<Value = PolicyConfig> {
    (
        prop::option::of(-10i64..500),
        prop::option::of(-10i64..500),
    )
        .prop_map(|(min, max)| PolicyConfig {
            min_duration_minutes: min,
            max_duration_minutes: max,
        })
}

fn rules_strategy() -> impl Strategy<Value = RulesConfig> {
    (
        prop::option::of(0usize..20),
        prop::option::of(0usize..20),
        prop::option::of(0usize..20),
    )
        .prop_map(|(title, password, space)| RulesConfig {
            title_min_length: title,
            password_min_length: password,
            space_name_min_length: space,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(policy_strategy()),
        prop::option::of(rules_strategy()),
        prop::option::of(prop::option::of(0u64..120_000)),
        prop::option::of(prop_oneof![Just(OutputFormat::Human), Just(OutputFormat::Json)]),
    )
        .prop_map(|(policy, rules, delay, output_format)| Config {
            policy,
            rules,
            submission: delay.map(|redirect_delay_ms| SubmissionConfig { redirect_delay_ms }),
            output_format,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Empty config is identity element for merge
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Set values from the higher source always win
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        if high.output_format.is_some() {
            prop_assert_eq!(merged.output_format, high.output_format);
        } else {
            prop_assert_eq!(merged.output_format, low.output_format);
        }

        if let Some(min) = high.policy.as_ref().and_then(|p| p.min_duration_minutes) {
            prop_assert_eq!(
                merged.policy.as_ref().and_then(|p| p.min_duration_minutes),
                Some(min)
            );
        }

        if let Some(len) = high.rules.as_ref().and_then(|r| r.title_min_length) {
            prop_assert_eq!(merged.rules.as_ref().and_then(|r| r.title_min_length), Some(len));
        }
    }

    // A configuration passing validation always yields a usable policy
    #[test]
    fn validated_config_builds_policy(config in config_strategy()) {
        if ConfigValidator::validate(&config).is_ok() {
            let policy = config.duration_policy();
            prop_assert!(policy.is_ok());
            let policy = policy.unwrap();
            prop_assert!(policy.min_minutes() > 0);
            prop_assert!(policy.max_minutes() >= policy.min_minutes());

            let rules = config.field_rules();
            prop_assert!(rules.title_min_length > 0);
            prop_assert!(rules.password_min_length > 0);
            prop_assert!(rules.space_name_min_length > 0);
        }
    }
}
