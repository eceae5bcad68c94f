use std::sync::Arc;

use rust_decimal_macros::dec;

use opx::adapter::{
    InMemoryAuditLog, InMemoryLimitStore, InMemoryOpportunityStore, InMemorySignalStore,
};
use opx::domain::{
    Direction, GuardrailBreach, OpportunityId, OpportunityStatus, ScoringConfig, Severity,
};
use opx::error::Error;
use opx::port::{OpportunityFilter, OpportunityStore, Page};
use opx::service::{OpxService, SortDirection, SortKey};
use opx::testkit::domain::{
    anchor, directional_signal, minutes_ago, opportunity, severity_signal,
};

struct Fixture {
    signals: Arc<InMemorySignalStore>,
    limits: Arc<InMemoryLimitStore>,
    opportunities: Arc<InMemoryOpportunityStore>,
    audit: Arc<InMemoryAuditLog>,
    service: OpxService,
}

fn fixture() -> Fixture {
    let signals = Arc::new(InMemorySignalStore::new());
    let limits = Arc::new(InMemoryLimitStore::new());
    let opportunities = Arc::new(InMemoryOpportunityStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let service = OpxService::new(
        signals.clone(),
        limits.clone(),
        opportunities.clone(),
        audit.clone(),
        ScoringConfig::default(),
    );
    Fixture {
        signals,
        limits,
        opportunities,
        audit,
        service,
    }
}

fn seed_healthy_metrics(limits: &InMemoryLimitStore) {
    limits.record_metric("hf.current", minutes_ago(30), dec!(2.0));
    limits.record_metric("slippage.current", minutes_ago(30), dec!(0.1));
    limits.record_metric("realyield.current", minutes_ago(30), dec!(1.0));
    limits.record_metric("nav.usd", minutes_ago(30), dec!(1000000));
}

#[tokio::test]
async fn recalculate_persists_score_and_audits_the_change() {
    let fx = fixture();
    seed_healthy_metrics(&fx.limits);

    fx.signals
        .insert(severity_signal("sig-origin", Severity::High, minutes_ago(120)));
    fx.signals.insert(directional_signal(
        "sig-a",
        "etf-flows",
        Direction::Pro,
        minutes_ago(60),
    ));
    fx.signals.insert(directional_signal(
        "sig-b",
        "onchain-tvl",
        Direction::Bull,
        minutes_ago(50),
    ));
    fx.signals.insert(directional_signal(
        "sig-c",
        "narratives",
        Direction::Positive,
        minutes_ago(40),
    ));

    fx.opportunities.insert(
        opportunity("opx-1")
            .signal_id("sig-origin")
            .var_usd(dec!(20000))
            .build()
            .unwrap(),
    );

    let id = OpportunityId::from("opx-1");
    let result = fx
        .service
        .recalculate(&id, "desk-ops", anchor())
        .await
        .unwrap();

    // High-severity prior, unanimous three-source consensus, no breaches,
    // 2% VaR: 70 + 20.
    assert_eq!(result.score, 90);
    assert_eq!(result.consensus, 1.0);
    assert!(result.blocking.is_empty());

    let stored = fx.opportunities.get(&id).await.unwrap().unwrap();
    assert_eq!(stored.last_score().unwrap().score, 90);

    let entries = fx.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "desk-ops");
    assert_eq!(entries[0].previous, None);
    assert_eq!(entries[0].current.score, 90);
    assert_eq!(entries[0].at, anchor());
}

#[tokio::test]
async fn recalculate_twice_records_previous_snapshot() {
    let fx = fixture();
    seed_healthy_metrics(&fx.limits);
    fx.opportunities
        .insert(opportunity("opx-1").build().unwrap());

    let id = OpportunityId::from("opx-1");
    let first = fx
        .service
        .recalculate(&id, "desk-ops", anchor())
        .await
        .unwrap();
    assert_eq!(first.score, 50);

    // Health factor deteriorates; the newer metric record wins.
    fx.limits
        .record_metric("hf.current", minutes_ago(5), dec!(1.2));

    let second = fx
        .service
        .recalculate(&id, "scheduler", anchor())
        .await
        .unwrap();
    assert_eq!(second.blocking, vec![GuardrailBreach::Hf]);
    assert_eq!(second.score, 30);

    let entries = fx.audit.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].previous.as_ref().unwrap().score, 50);
    assert_eq!(entries[1].current.score, 30);

    // Identical inputs: recalculation is idempotent.
    let third = fx
        .service
        .recalculate(&id, "scheduler", anchor())
        .await
        .unwrap();
    assert_eq!(third, second);
}

#[tokio::test]
async fn recalculate_unknown_id_errors() {
    let fx = fixture();
    let err = fx
        .service
        .recalculate(&OpportunityId::from("missing"), "desk-ops", anchor())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OpportunityNotFound(_)));
}

#[tokio::test]
async fn dangling_signal_reference_scores_as_unlinked() {
    let fx = fixture();
    seed_healthy_metrics(&fx.limits);
    fx.opportunities.insert(
        opportunity("opx-1")
            .signal_id("sig-gone")
            .build()
            .unwrap(),
    );

    let result = fx
        .service
        .recalculate(&OpportunityId::from("opx-1"), "desk-ops", anchor())
        .await
        .unwrap();
    assert_eq!(result.breakdown.base, 50);
}

#[tokio::test]
async fn missing_runtime_metrics_read_as_zero() {
    let fx = fixture();
    // No metrics at all: hf = 0 and real_yield = 0 breach, NAV = 0 takes
    // no VaR penalty.
    fx.opportunities.insert(
        opportunity("opx-1")
            .var_usd(dec!(60000))
            .build()
            .unwrap(),
    );

    let result = fx
        .service
        .recalculate(&OpportunityId::from("opx-1"), "desk-ops", anchor())
        .await
        .unwrap();
    assert_eq!(
        result.blocking,
        vec![GuardrailBreach::Hf, GuardrailBreach::RealYield]
    );
    assert_eq!(result.breakdown.var_penalty, 0);
    assert_eq!(result.score, 10);
}

#[tokio::test]
async fn list_scores_filters_and_ranks_without_persisting() {
    let fx = fixture();
    seed_healthy_metrics(&fx.limits);

    fx.signals
        .insert(severity_signal("sig-origin", Severity::High, minutes_ago(120)));

    fx.opportunities
        .insert(opportunity("opx-a").build().unwrap());
    fx.opportunities.insert(
        opportunity("opx-b")
            .signal_id("sig-origin")
            .build()
            .unwrap(),
    );
    fx.opportunities.insert(
        opportunity("opx-c")
            .var_usd(dec!(40000))
            .status(OpportunityStatus::Rejected)
            .build()
            .unwrap(),
    );

    let listed = fx
        .service
        .list(
            &OpportunityFilter::default(),
            Page::default(),
            SortKey::Score,
            SortDirection::Desc,
            anchor(),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = listed
        .iter()
        .map(|s| s.opportunity.id().as_str())
        .collect();
    // 70 (high prior), 50 (unlinked), 40 (unlinked minus VaR warn).
    assert_eq!(ids, vec!["opx-b", "opx-a", "opx-c"]);
    let scores: Vec<u8> = listed.iter().map(|s| s.result.score).collect();
    assert_eq!(scores, vec![70, 50, 40]);

    // Listing never persists scores.
    let stored = fx
        .opportunities
        .get(&OpportunityId::from("opx-b"))
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_score().is_none());

    let proposed_only = fx
        .service
        .list(
            &OpportunityFilter {
                status: Some(OpportunityStatus::Proposed),
                ..OpportunityFilter::default()
            },
            Page::default(),
            SortKey::Score,
            SortDirection::Desc,
            anchor(),
        )
        .await
        .unwrap();
    assert_eq!(proposed_only.len(), 2);
}

#[tokio::test]
async fn list_pagination_is_independent_of_ranking() {
    let fx = fixture();
    seed_healthy_metrics(&fx.limits);

    for n in 0..5 {
        fx.opportunities
            .insert(opportunity(&format!("opx-{n}")).build().unwrap());
    }

    let page = fx
        .service
        .list(
            &OpportunityFilter::default(),
            Page { number: 2, size: 2 },
            SortKey::CreatedAt,
            SortDirection::Asc,
            anchor(),
        )
        .await
        .unwrap();

    let ids: Vec<&str> = page.iter().map(|s| s.opportunity.id().as_str()).collect();
    assert_eq!(ids, vec!["opx-2", "opx-3"]);
}
