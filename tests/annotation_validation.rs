//! Validation behavior observed through the public API.

use retread::{names, AnnotationSet, ConfigError, Outcome, RetryRunner, Scope};
use std::sync::atomic::{AtomicU32, Ordering};

fn runner() -> RetryRunner {
    RetryRunner::builder().instant_sleeper().build()
}

#[test]
fn malformed_annotations_error_with_documented_messages() {
    let cases = [
        ("", "The @retryAttempts annotation requires an integer as an argument"),
        ("banana", "The @retryAttempts annotation must be an integer but got \"banana\""),
        ("1.2", "The @retryAttempts annotation must be an integer but got \"1.2\""),
        ("-1", "The @retryAttempts annotation must be 0 or greater but got \"-1\"."),
    ];

    for (raw, expected) in cases {
        let annotations = AnnotationSet::new().with(Scope::Method, names::RETRY_ATTEMPTS, raw);
        let err = runner().run(&annotations, || Outcome::Passed).unwrap_err();
        assert_eq!(err.to_string(), expected, "raw value {raw:?}");
    }
}

#[test]
fn integral_float_attempts_are_accepted() {
    let annotations = AnnotationSet::new().with(Scope::Method, names::RETRY_ATTEMPTS, "2.0");
    let calls = AtomicU32::new(0);
    let outcome = runner()
        .run(&annotations, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Outcome::Failed(retread::Failure::assertion("always"))
        })
        .unwrap();
    assert!(outcome.is_failed());
    assert_eq!(calls.load(Ordering::SeqCst), 3, "parsed as 2 retries");
}

#[test]
fn method_annotation_overrides_class_annotation() {
    let annotations = AnnotationSet::new()
        .with(Scope::Class, names::RETRY_ATTEMPTS, "5")
        .with(Scope::Method, names::RETRY_ATTEMPTS, "1");

    let calls = AtomicU32::new(0);
    runner()
        .run(&annotations, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Outcome::Failed(retread::Failure::assertion("always"))
        })
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2, "method-level budget of 1 wins");
}

#[test]
fn unknown_delegate_and_kind_names_are_rejected() {
    let annotations =
        AnnotationSet::new().with(Scope::Method, names::RETRY_DELAY_METHOD, "doesNotExist 3");
    let err = runner().run(&annotations, || Outcome::Passed).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownDelegate { annotation: "retryDelayMethod", name: "doesNotExist".into() }
    );

    let annotations =
        AnnotationSet::new().with(Scope::Method, names::RETRY_IF_EXCEPTION, "NoSuchError");
    let err = runner().run(&annotations, || Outcome::Passed).unwrap_err();
    assert_eq!(err, ConfigError::UnknownFailureKind { name: "NoSuchError".into() });
}

#[test]
fn validation_is_lazy_until_the_test_runs() {
    // A malformed annotation set is inert until handed to run().
    let annotations = AnnotationSet::new().with(Scope::Method, names::RETRY_ATTEMPTS, "nope");
    let r = runner();

    // Other tests on the same runner are unaffected.
    let ok = r.run(&AnnotationSet::new(), || Outcome::Passed).unwrap();
    assert!(ok.is_passed());

    // Only running the annotated test surfaces the error, before any attempt.
    let calls = AtomicU32::new(0);
    let err = r
        .run(&annotations, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Outcome::Passed
        })
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotNumeric { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
