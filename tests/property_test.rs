//! Property tests for conversion and validation invariants.
//!
//! 1. Conversion output contains the input, namespace and base type
//! 2. `is_valid` agrees with the error list
//! 3. Validation and conversion are repeatable
//! 4. Extraction never panics and only yields named, typed descriptors

use pl_transpile::{convert, extract_parameters, validate};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Text biased towards the tokens the rules look for.
fn arb_strategy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("namespace PowerLanguage.Strategy".to_string()),
            Just("public class S : SignalObject".to_string()),
            Just("protected override void CalcBar()".to_string()),
            Just("[Input] public int Length { get; set; }".to_string()),
            Just("Length = 3;".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            "[ -~\n]{0,20}",
        ],
        0..12,
    )
    .prop_map(|parts| parts.join("\n"))
}

// ── 1. Containment ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn conversion_contains_input(source in "\\PC+") {
        let result = convert(&source);
        prop_assert!(result.generated_code.contains(&source));
        prop_assert!(result.generated_code.contains("PowerLanguage.Strategy"));
        prop_assert!(result.generated_code.contains("SignalObject"));
    }

    #[test]
    fn structured_conversion_contains_input(source in arb_strategy_text()) {
        prop_assume!(!source.is_empty());
        let result = convert(&source);
        prop_assert!(result.generated_code.contains(&source));
        prop_assert!(result.generated_code.contains("PowerLanguage.Strategy"));
        prop_assert!(result.generated_code.contains("SignalObject"));
    }
}

// ── 2. Verdict consistency ───────────────────────────────────────────

proptest! {
    #[test]
    fn verdict_matches_errors(source in arb_strategy_text()) {
        let result = validate(&source);
        prop_assert_eq!(result.is_valid(), result.errors().is_empty());
        prop_assert!(result.errors().len() <= 3);
        if source.trim().is_empty() {
            prop_assert_eq!(result.errors().len(), 1);
        }
    }
}

// ── 3. Repeatability ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn repeated_calls_agree(source in arb_strategy_text()) {
        prop_assert_eq!(validate(&source), validate(&source));
        prop_assert_eq!(convert(&source), convert(&source));
        prop_assert_eq!(extract_parameters(&source), extract_parameters(&source));
    }
}

// ── 4. Extraction ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn extraction_is_total(source in "\\PC*") {
        for param in extract_parameters(&source) {
            prop_assert!(!param.name.is_empty());
            prop_assert!(!param.declared_type.is_empty());
        }
    }
}
