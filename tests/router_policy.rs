// tests/router_policy.rs

mod common;
use crate::common::init_tracing;

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use gaze::behaviour::{BehaviourRouter, SinkStatus};
use gaze::types::WhenPolicy;
use gaze_test_utils::builders::{SinkSetBuilder, report_with_exit};
use gaze_test_utils::recording::{RecordingObserver, RecordingSinkBackend};

fn policy_sinks() -> gaze::config::SinkSet {
    SinkSetBuilder::new()
        .with_command("always", WhenPolicy::Always, "true")
        .with_command("on-failure", WhenPolicy::Failures, "true")
        .with_command("on-success", WhenPolicy::Successes, "true")
        .build()
}

#[tokio::test]
async fn success_skips_failure_only_sinks() {
    init_tracing();
    let router = BehaviourRouter::new(RecordingSinkBackend::new());

    let outcomes = router.dispatch(&report_with_exit(0), &policy_sinks()).await;

    let backend = router.backend();
    assert!(backend.was_invoked("always"));
    assert!(backend.was_invoked("on-success"));
    assert!(!backend.was_invoked("on-failure"));

    let skipped: Vec<_> = outcomes
        .iter()
        .filter(|o| o.status == SinkStatus::Skipped)
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(skipped, vec!["on-failure"]);
}

#[tokio::test]
async fn failure_skips_success_only_sinks() {
    let router = BehaviourRouter::new(RecordingSinkBackend::new());

    router.dispatch(&report_with_exit(2), &policy_sinks()).await;

    let invoked: BTreeSet<String> = router.backend().invoked().into_iter().collect();
    let expected: BTreeSet<String> = ["always", "on-failure"].iter().map(|s| s.to_string()).collect();
    assert_eq!(invoked, expected);
}

#[tokio::test]
async fn failing_sink_does_not_stop_the_others() {
    let observer = RecordingObserver::new();
    let backend = RecordingSinkBackend::new().failing_on("b-broken");
    let router = BehaviourRouter::with_observer(backend, Arc::new(observer.clone()));

    let sinks = SinkSetBuilder::new()
        .with_command("a-first", WhenPolicy::Always, "true")
        .with_command("b-broken", WhenPolicy::Always, "true")
        .with_command("c-last", WhenPolicy::Always, "true")
        .build();

    let outcomes = router.dispatch(&report_with_exit(1), &sinks).await;

    assert_eq!(outcomes.len(), 3);
    for name in ["a-first", "b-broken", "c-last"] {
        assert!(router.backend().was_invoked(name), "{name} was not invoked");
    }

    let broken = outcomes.iter().find(|o| o.name == "b-broken").unwrap();
    match &broken.status {
        SinkStatus::Failed(msg) => assert!(msg.contains("told to fail")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(
        outcomes
            .iter()
            .filter(|o| o.name != "b-broken")
            .all(|o| o.status == SinkStatus::Succeeded)
    );

    let errors = observer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("b-broken"));
}

#[tokio::test]
async fn empty_sink_set_is_a_no_op() {
    let router = BehaviourRouter::new(RecordingSinkBackend::new());
    let outcomes = router.dispatch(&report_with_exit(0), &SinkSetBuilder::new().build()).await;
    assert!(outcomes.is_empty());
    assert!(router.backend().invoked().is_empty());
}

fn when_strategy() -> impl Strategy<Value = WhenPolicy> {
    prop_oneof![
        Just(WhenPolicy::Always),
        Just(WhenPolicy::Failures),
        Just(WhenPolicy::Successes),
    ]
}

proptest! {
    #[test]
    fn sink_runs_iff_policy_matches(
        exit_code in prop_oneof![Just(0i32), -1i32..=255],
        policies in proptest::collection::vec(when_strategy(), 1..8),
        failing in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let mut builder = SinkSetBuilder::new();
        let mut backend = RecordingSinkBackend::new();
        for (i, when) in policies.iter().enumerate() {
            let name = format!("sink_{i}");
            if failing[i] {
                backend = backend.failing_on(&name);
            }
            builder = builder.with_command(&name, *when, "true");
        }
        let sinks = builder.build();
        let router = BehaviourRouter::new(backend);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let outcomes = rt.block_on(router.dispatch(&report_with_exit(exit_code), &sinks));

        prop_assert_eq!(outcomes.len(), policies.len());
        for (i, when) in policies.iter().enumerate() {
            let name = format!("sink_{i}");
            let expected = match when {
                WhenPolicy::Always => true,
                WhenPolicy::Failures => exit_code != 0,
                WhenPolicy::Successes => exit_code == 0,
            };
            prop_assert_eq!(router.backend().was_invoked(&name), expected);
        }
    }
}
