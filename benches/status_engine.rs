//! Benchmarks for status evaluation
//!
//! Target: evaluation well below a millisecond per workload, so a console
//! can re-evaluate every workload on each watch event.

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dr_status_engine::crd::{
    Application, ApplicationSpec, DRPlacementControlSpec, DRPlacementControlStatus, DRPolicySpec,
    LabelSelectorSpec, ObjectReference, PlacementDecisionRef, PlacementReference,
    SubscriptionPlacement, SubscriptionSpec,
};
use dr_status_engine::dr::progress_details;
use dr_status_engine::{
    DRCondition, DRPlacementControl, DRPolicy, DefaultTimeFormatter, DiscoveredResources,
    DrStatusEngine, EngineConfig, FixedClock, ReplicationHealthClassifier, ReplicationMode,
    Subscription, SubscriptionResources, Watched,
};
use std::collections::BTreeMap;
use std::sync::Arc;

const NS: &str = "busybox";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn policy() -> DRPolicy {
    DRPolicy::new(
        "dr-policy-5m",
        DRPolicySpec {
            scheduling_interval: "5m".into(),
            dr_clusters: vec!["east".into(), "west".into()],
        },
    )
}

fn drpc(name: &str, placement: &str, synced_minutes_ago: i64) -> DRPlacementControl {
    let mut drpc = DRPlacementControl::new(
        name,
        DRPlacementControlSpec {
            placement_ref: ObjectReference {
                kind: Some("PlacementRule".into()),
                name: placement.into(),
                ..Default::default()
            },
            dr_policy_ref: ObjectReference {
                name: "dr-policy-5m".into(),
                ..Default::default()
            },
            preferred_cluster: Some("east".into()),
            failover_cluster: Some("west".into()),
            ..Default::default()
        },
    );
    drpc.metadata.namespace = Some(NS.into());
    drpc.status = Some(DRPlacementControlStatus {
        phase: Some("Deployed".into()),
        preferred_decision: Some(PlacementDecisionRef {
            cluster_name: "east".into(),
        }),
        last_group_sync_time: Some((now() - Duration::minutes(synced_minutes_ago)).to_rfc3339()),
        conditions: (0..8)
            .map(|i| {
                DRCondition::new(&format!("Condition{}", i), "False", "Progressing")
                    .with_transition_time(&(now() - Duration::minutes(i)).to_rfc3339())
            })
            .collect(),
        ..Default::default()
    });
    drpc
}

fn engine() -> DrStatusEngine {
    DrStatusEngine::with_collaborators(
        EngineConfig::default(),
        Arc::new(FixedClock(now())),
        Arc::new(DefaultTimeFormatter),
    )
    .unwrap()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");
    group.throughput(Throughput::Elements(1));

    let classifier = ReplicationHealthClassifier::new();
    let last_sync = Some(now() - Duration::minutes(7));

    group.bench_function("classify_async", |b| {
        b.iter(|| {
            classifier.classify(
                black_box(last_sync),
                black_box("5m"),
                ReplicationMode::Async,
                now(),
            )
        });
    });

    group.finish();
}

fn bench_progress_details(c: &mut Criterion) {
    let mut group = c.benchmark_group("conditions");

    let drpc = drpc("busybox-drpc", "busybox-rule", 3);
    let conditions = drpc.conditions().to_vec();
    let formatter = DefaultTimeFormatter;

    group.throughput(Throughput::Elements(conditions.len() as u64 * 2));
    group.bench_function("progress_details", |b| {
        b.iter(|| progress_details(black_box(&conditions), black_box(&conditions), &formatter));
    });

    group.finish();
}

fn bench_evaluate_discovered(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(1));

    let engine = engine();
    let resources = DiscoveredResources {
        drpc: Watched::loaded(drpc("busybox-drpc", "busybox-rule", 7)),
        policies: Watched::loaded(vec![policy()]),
    };

    group.bench_function("evaluate_discovered", |b| {
        b.iter(|| engine.evaluate_discovered(black_box(&resources)));
    });

    group.finish();
}

fn bench_evaluate_subscription(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    let labels = BTreeMap::from([("app".to_string(), "busybox".to_string())]);
    let mut application = Application::new(
        "busybox-app",
        ApplicationSpec {
            selector: LabelSelectorSpec {
                match_labels: labels.clone(),
            },
        },
    );
    application.metadata.namespace = Some(NS.into());

    let groups = 50;
    let subscriptions = (0..groups * 4)
        .map(|i| {
            let mut sub = Subscription::new(
                &format!("sub-{}", i),
                SubscriptionSpec {
                    channel: "ch/git".into(),
                    placement: Some(SubscriptionPlacement {
                        placement_ref: Some(PlacementReference {
                            kind: Some("PlacementRule".into()),
                            name: format!("rule-{}", i % groups),
                        }),
                        local: None,
                    }),
                },
            );
            sub.metadata.namespace = Some(NS.into());
            sub.metadata.labels = Some(labels.clone());
            sub
        })
        .collect();
    let drpcs = (0..groups)
        .map(|i| drpc(&format!("drpc-{}", i), &format!("rule-{}", i), i as i64 % 12))
        .collect();

    let engine = engine();
    let resources = SubscriptionResources {
        application: Watched::loaded(application),
        subscriptions: Watched::loaded(subscriptions),
        drpcs: Watched::loaded(drpcs),
        policies: Watched::loaded(vec![policy()]),
    };

    group.throughput(Throughput::Elements(groups as u64));
    group.bench_function("evaluate_subscription_50_groups", |b| {
        b.iter(|| engine.evaluate_subscription(black_box(&resources)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_progress_details,
    bench_evaluate_discovered,
    bench_evaluate_subscription,
);
criterion_main!(benches);
