use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use canopy_core::builder::{
    async_delayer, fail, function_action, inverter, repeat_until, sequence, succeed, until_success,
};
use canopy_core::{Node, NodeResult, RepeatEvent, Status, TickEvent};
use canopy_runtime::{BehaviorTree, TreeConfig, TreeError};
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn build_reports_every_configuration_problem() {
    let err = BehaviorTree::builder(())
        .config(TreeConfig {
            event_buffer_size: 0,
            ..TreeConfig::default()
        })
        .build()
        .err()
        .expect("invalid configuration must be rejected");

    assert_eq!(err.problems().len(), 2);
    let message = err.to_string();
    assert!(message.contains("root is not set"));
    assert!(message.contains("event buffer size must be positive"));
}

#[test]
fn default_config_matches_the_documented_queue_size() {
    let config = TreeConfig::default();
    assert_eq!(config.event_buffer_size, 100);
    assert!(!config.trace_steps);
}

#[test]
fn synchronous_tree_steps_without_a_runtime() {
    init_tracing();
    let mut tree = BehaviorTree::builder(0u32)
        .root(function_action("Bump", |bb: &mut u32| {
            *bb += 1;
            NodeResult::Success
        }))
        .config(TreeConfig {
            trace_steps: true,
            ..TreeConfig::default()
        })
        .build()
        .expect("valid tree");

    assert_eq!(tree.status(), None);
    assert_eq!(tree.update(&TickEvent).unwrap(), Status::Success);
    assert_eq!(tree.update(&TickEvent).unwrap(), Status::Success);
    assert_eq!(*tree.blackboard(), 2);
    assert_eq!(tree.ticks(), 2);
}

#[test]
fn continuation_without_a_runtime_is_an_error() {
    let mut tree = BehaviorTree::builder(())
        .root(async_delayer("Wait", Duration::from_millis(10), succeed()))
        .build()
        .expect("valid tree");

    assert!(matches!(
        tree.update(&TickEvent),
        Err(TreeError::NoAsyncRuntime)
    ));
}

#[test]
fn repeat_until_steps_without_a_runtime() {
    init_tracing();
    let mut calls = 0;
    let mut tree = BehaviorTree::builder(())
        .root(
            sequence(vec![
                repeat_until(
                    "UntilTwo",
                    move |_: &NodeResult<()>| {
                        calls += 1;
                        calls == 2
                    },
                    fail(),
                ),
                succeed(),
            ])
            .unwrap(),
        )
        .build()
        .expect("valid tree");

    let steps: Vec<Status> = (0..3).map(|_| tree.update(&TickEvent).unwrap()).collect();

    assert_eq!(steps, vec![Status::Running, Status::Failure, Status::Running]);
    assert_eq!(tree.pending_events(), 2);
}

#[tokio::test]
async fn manual_steps_keep_the_queue_bounded() {
    let mut tree = BehaviorTree::builder(())
        .root(until_success(fail()))
        .config(TreeConfig {
            event_buffer_size: 4,
            ..TreeConfig::default()
        })
        .build()
        .expect("valid tree");

    for _ in 0..10 {
        assert_eq!(tree.update(&TickEvent).unwrap(), Status::Running);
    }
    assert_eq!(tree.pending_events(), 4);

    let wake = tree.recv_event().await.expect("queued wake-up");
    assert!(wake.is::<RepeatEvent>());
    assert!(wake.is_addressed_to(tree.root().id()));

    // Nothing was spawned, so shutdown has no tasks to wait for.
    tokio::time::timeout(Duration::from_secs(1), tree.shutdown())
        .await
        .expect("no continuation tasks outstanding");
}

#[test]
fn node_error_is_reported_with_its_tick() {
    let mut tree = BehaviorTree::builder(())
        .root(function_action("Broken", |_| {
            NodeResult::error("Broken", "sensor offline")
        }))
        .build()
        .expect("valid tree");

    match tree.update(&TickEvent) {
        Err(TreeError::Node { tick, source }) => {
            assert_eq!(tick, 1);
            assert_eq!(source.node(), "Broken");
            assert_eq!(source.message(), "sensor offline");
        }
        other => panic!("expected a node error, got {other:?}"),
    }
    assert_eq!(tree.status(), Some(Status::Error));
}

#[test]
fn visitor_sees_the_root_after_every_step() {
    let visits = Arc::new(AtomicUsize::new(0));
    let seen = visits.clone();
    let mut tree = BehaviorTree::builder(())
        .root(inverter(succeed()))
        .visitor(move |root| {
            assert_eq!(root.status(), Some(Status::Failure));
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .expect("valid tree");

    tree.update(&TickEvent).unwrap();
    tree.update(&TickEvent).unwrap();
    assert_eq!(visits.load(Ordering::SeqCst), 2);
}

#[test]
fn display_renders_the_tree() {
    let mut tree = BehaviorTree::builder(())
        .root(sequence(vec![succeed(), succeed()]).unwrap())
        .build()
        .expect("valid tree");
    tree.update(&TickEvent).unwrap();

    assert_eq!(
        tree.to_string(),
        "Sequence [composite] Success\n  Succeed [leaf] Success\n  Succeed [leaf] Success\n"
    );
}

#[test]
fn tree_runs_on_a_child_of_the_supplied_token() {
    let parent = CancellationToken::new();
    let tree = BehaviorTree::builder(())
        .root(succeed())
        .cancellation(parent.clone())
        .build()
        .expect("valid tree");

    tree.cancel();
    assert!(tree.cancellation_token().is_cancelled());
    assert!(!parent.is_cancelled());

    let other = BehaviorTree::builder(())
        .root(succeed())
        .cancellation(parent.clone())
        .build()
        .expect("valid tree");
    parent.cancel();
    assert!(other.cancellation_token().is_cancelled());
}
