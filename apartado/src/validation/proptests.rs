//! Property-based tests for the admission rules.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use super::{DurationPolicy, Field, FieldContext, FieldErrorKind, FieldRules, PolicyViolation};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Anything under the minimum is too short
    #[test]
    fn short_intervals_rejected(offset in 0i64..10_000, minutes in 1i64..30) {
        let start = base() + Duration::minutes(offset);
        let end = start + Duration::minutes(minutes);
        let result = DurationPolicy::default().validate(Some(start), Some(end));
        let is_too_short = matches!(result, Some(PolicyViolation::TooShort { .. }));
        prop_assert!(is_too_short);
    }

    // Anything over the maximum is too long
    #[test]
    fn long_intervals_rejected(offset in 0i64..10_000, minutes in 241i64..5_000) {
        let start = base() + Duration::minutes(offset);
        let end = start + Duration::minutes(minutes);
        let result = DurationPolicy::default().validate(Some(start), Some(end));
        let is_too_long = matches!(result, Some(PolicyViolation::TooLong { .. }));
        prop_assert!(is_too_long);
    }

    // Inside the window is always accepted
    #[test]
    fn window_accepted(offset in 0i64..10_000, minutes in 30i64..=240) {
        let start = base() + Duration::minutes(offset);
        let end = start + Duration::minutes(minutes);
        prop_assert_eq!(DurationPolicy::default().validate(Some(start), Some(end)), None);
    }

    // An end at or before the start is an order violation, whatever the gap
    #[test]
    fn reversed_intervals_rejected(offset in 0i64..10_000, back in 0i64..10_000) {
        let start = base() + Duration::minutes(offset);
        let end = start - Duration::minutes(back);
        prop_assert_eq!(
            DurationPolicy::default().validate(Some(start), Some(end)),
            Some(PolicyViolation::OrderViolation)
        );
    }

    // Validation is a pure function of its input
    #[test]
    fn field_validation_is_idempotent(value in ".{0,40}") {
        let rules = FieldRules::default();
        let ctx = FieldContext::new();
        for field in Field::ALL {
            prop_assert_eq!(
                rules.validate(field, &value, &ctx),
                rules.validate(field, &value, &ctx)
            );
        }
    }

    // Whitespace-only titles never count as present
    #[test]
    fn blank_titles_required(value in "[ \t]{0,10}") {
        let err = FieldRules::default()
            .validate(Field::Title, &value, &FieldContext::new())
            .unwrap_err();
        prop_assert_eq!(err.kind(), FieldErrorKind::RequiredField);
    }
}
