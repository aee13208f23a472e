use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, InvoiceCandidate, InvoiceStore, Money, MonthKey, Resumption, Submission,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_pending_ttl(ttl: Duration) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .pending_ttl(ttl)
        .build()
        .await
        .unwrap()
}

fn units(value: i64) -> Money {
    Money::new(value * 100)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn candidate(vendor_id: &str, number: &str, amount: Money, on: NaiveDate) -> InvoiceCandidate {
    InvoiceCandidate::new(vendor_id, number, amount, on).payment_method("bank transfer")
}

async fn commit(engine: &Engine, candidate: InvoiceCandidate) -> engine::CommitReport {
    match engine.submit_invoice(candidate).await.unwrap() {
        Submission::Committed(report) => report,
        other => panic!("expected a commit, got {other:?}"),
    }
}

#[tokio::test]
async fn commit_refreshes_vendor_and_month_totals() {
    let (engine, _db) = engine_with_db().await;
    let vendor_id = engine.register_vendor("ACME", None).await.unwrap();

    commit(&engine, candidate(&vendor_id, "A-1", Money::new(10_10), date(2024, 3, 1))).await;
    let report = commit(
        &engine,
        candidate(&vendor_id, "A-2", Money::new(20_20), date(2024, 3, 31)),
    )
    .await;

    assert!(!report.totals_stale());
    assert_eq!(report.vendor_total.unwrap().total, Money::new(30_30));
    let month = report.month_total.unwrap();
    assert_eq!(month.total, Money::new(30_30));
    assert_eq!((month.key().year(), month.key().month_index()), (2024, 2));
    assert_eq!(month.key().to_string(), "2024-03");

    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), Money::new(30_30));
    assert_eq!(
        engine
            .month_total(MonthKey::new(2024, 2).unwrap())
            .await
            .unwrap(),
        Money::new(30_30)
    );
}

#[tokio::test]
async fn recompute_vendor_total_is_exact_and_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let amounts = [1, 10, 33, 99_99, 1_234_56, 7];
    for (i, minor) in amounts.iter().enumerate() {
        commit(
            &engine,
            candidate("v-1", &format!("N-{i}"), Money::new(*minor), date(2024, 5, 2)),
        )
        .await;
    }
    // Other vendors never leak into the total.
    commit(&engine, candidate("v-2", "X", units(500), date(2024, 5, 2))).await;

    let expected = Money::new(amounts.iter().sum());
    let first = engine.recompute_vendor_total("v-1").await.unwrap();
    let second = engine.recompute_vendor_total("v-1").await.unwrap();
    assert_eq!(first.total, expected);
    assert_eq!(first, second);
    assert_eq!(engine.vendor_total("v-1").await.unwrap(), expected);
}

#[tokio::test]
async fn month_total_includes_last_day_and_excludes_next_month() {
    let (engine, _db) = engine_with_db().await;
    commit(&engine, candidate("v", "last-jan", units(100), date(2024, 1, 31))).await;
    commit(&engine, candidate("v", "first-feb", units(40), date(2024, 2, 1))).await;
    commit(&engine, candidate("v", "last-dec", units(7), date(2023, 12, 31))).await;

    let january = engine.recompute_month_total(date(2024, 1, 15)).await.unwrap();
    assert_eq!(january.total, units(100));
    let february = engine.recompute_month_total(date(2024, 2, 29)).await.unwrap();
    assert_eq!(february.total, units(40));
    let december = engine.recompute_month_total(date(2023, 12, 1)).await.unwrap();
    assert_eq!(december.total, units(7));

    let again = engine.recompute_month_total(date(2024, 1, 1)).await.unwrap();
    assert_eq!(again, january);
}

#[tokio::test]
async fn scenario_vendor_warning_then_block() {
    let (engine, _db) = engine_with_db().await;
    let vendor_id = engine
        .register_vendor("Paper Co", Some(units(1000)))
        .await
        .unwrap();

    let submission = engine
        .submit_invoice(candidate(&vendor_id, "P-1", units(950), date(2024, 6, 3)))
        .await
        .unwrap();
    let Submission::WarnPending { messages, token } = submission else {
        panic!("expected a warning, got {submission:?}");
    };
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Paper Co"));
    // Nothing is written while the warning is pending.
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), Money::ZERO);

    let Resumption::Committed(report) = engine.resume(token, true).await.unwrap() else {
        panic!("expected a commit");
    };
    assert_eq!(report.vendor_total.unwrap().total, units(950));
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), units(950));

    let submission = engine
        .submit_invoice(candidate(&vendor_id, "P-2", units(1001), date(2024, 6, 4)))
        .await
        .unwrap();
    let Submission::Blocked(reasons) = submission else {
        panic!("expected a block, got {submission:?}");
    };
    assert!(reasons[0].contains("Paper Co"));
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), units(950));
    assert!(engine.store().invoices_for_vendor(&vendor_id).await.unwrap().len() == 1);
}

#[tokio::test]
async fn scenario_month_limit_applies_to_every_year() {
    let (engine, _db) = engine_with_db().await;
    for (i, year) in [2024, 2025].into_iter().enumerate() {
        commit(&engine, candidate("v", &format!("S-{i}a"), units(5000), date(year, 1, 5))).await;
        commit(&engine, candidate("w", &format!("S-{i}b"), units(4000), date(year, 1, 28))).await;
    }
    engine.set_month_limit(0, Some(units(10_000))).await.unwrap();

    let blocked_2024 = engine
        .submit_invoice(candidate("v", "B-1", units(1200), date(2024, 1, 20)))
        .await
        .unwrap();
    let Submission::Blocked(reasons) = blocked_2024 else {
        panic!("expected a block, got {blocked_2024:?}");
    };
    assert_eq!(
        reasons,
        vec!["January 2024 would exceed its monthly limit: 10200.00 > 10000.00".to_string()]
    );

    let blocked_2025 = engine
        .submit_invoice(candidate("v", "B-2", units(1200), date(2025, 1, 9)))
        .await
        .unwrap();
    assert!(matches!(blocked_2025, Submission::Blocked(_)));

    // A January with no prior spend is still under the shared cap.
    let fresh_year = engine
        .submit_invoice(candidate("v", "B-3", units(1200), date(2026, 1, 9)))
        .await
        .unwrap();
    assert!(matches!(fresh_year, Submission::Committed(_)));

    // Other months are unaffected by the January cap.
    let february = engine
        .submit_invoice(candidate("v", "B-4", units(50_000), date(2024, 2, 9)))
        .await
        .unwrap();
    assert!(matches!(february, Submission::Committed(_)));
}

#[tokio::test]
async fn scenario_repair_after_external_delete() {
    let (engine, _db) = engine_with_db().await;
    let vendor_id = engine.register_vendor("Ink Ltd", None).await.unwrap();
    commit(&engine, candidate(&vendor_id, "I-1", units(900), date(2024, 4, 2))).await;
    let report = commit(&engine, candidate(&vendor_id, "I-2", units(300), date(2024, 4, 9))).await;
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), units(1200));

    engine.delete_invoice(report.invoice.id).await.unwrap();
    // Deleting does not touch the cached totals.
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), units(1200));

    let repaired = engine.repair_vendor_total(&vendor_id).await.unwrap();
    assert_eq!(repaired.total, units(900));
    let month = engine.repair_month_total(date(2024, 4, 30)).await.unwrap();
    assert_eq!(month.total, units(900));

    assert_eq!(
        engine.delete_invoice(report.invoice.id).await,
        Err(EngineError::KeyNotFound(format!(
            "invoice {}",
            report.invoice.id
        )))
    );
}

#[tokio::test]
async fn declined_warning_leaves_no_trace_and_token_is_single_use() {
    let (engine, _db) = engine_with_db().await;
    engine.set_month_limit(6, Some(units(100))).await.unwrap();

    let submission = engine
        .submit_invoice(candidate("v", "J-1", units(97), date(2024, 7, 14)))
        .await
        .unwrap();
    let Submission::WarnPending { messages, token } = submission else {
        panic!("expected a warning, got {submission:?}");
    };
    assert!(messages[0].starts_with("July 2024"));
    assert_eq!(engine.pending_count().await, 1);

    assert_eq!(
        engine.resume(token, false).await.unwrap(),
        Resumption::Declined(messages)
    );
    assert_eq!(engine.pending_count().await, 0);
    assert!(engine.store().invoices_for_vendor("v").await.unwrap().is_empty());

    assert_eq!(
        engine.resume(token, true).await,
        Err(EngineError::KeyNotFound(format!("resume token {token}")))
    );
}

#[tokio::test]
async fn invalid_candidate_is_rejected_before_any_write() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .submit_invoice(InvoiceCandidate::new("v", "Z-1", units(10), date(2024, 1, 1)))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("payment method must not be empty".to_string())
    );

    let err = engine
        .submit_invoice(candidate("v", "Z-2", Money::new(-5), date(2024, 1, 1)))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("amount must be > 0".to_string()));

    assert!(engine.store().invoices_for_vendor("v").await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_limit_means_unlimited() {
    let (engine, _db) = engine_with_db().await;
    let vendor_id = engine
        .register_vendor("Free", Some(Money::ZERO))
        .await
        .unwrap();
    engine.set_month_limit(8, Some(Money::ZERO)).await.unwrap();

    let submission = engine
        .submit_invoice(candidate(&vendor_id, "F-1", units(1_000_000), date(2024, 9, 1)))
        .await
        .unwrap();
    assert!(matches!(submission, Submission::Committed(_)));
}

#[tokio::test]
async fn stale_totals_heal_on_next_commit() {
    let (engine, _db) = engine_with_db().await;
    let vendor_id = engine
        .register_vendor("Drift", Some(units(1000)))
        .await
        .unwrap();

    // Written behind the engine's back: the cached total does not know it.
    let outside = candidate(&vendor_id, "O-1", units(600), date(2024, 10, 1))
        .into_invoice(chrono::Utc::now())
        .unwrap();
    engine.store().create_invoice(&outside).await.unwrap();
    assert_eq!(engine.vendor_total(&vendor_id).await.unwrap(), Money::ZERO);

    // The guard reads the stale cache, lets this one through...
    let report = commit(&engine, candidate(&vendor_id, "O-2", units(500), date(2024, 10, 2))).await;
    // ...and the rescan converges on the true sum, above the limit.
    assert_eq!(report.vendor_total.unwrap().total, units(1100));

    let next = engine
        .submit_invoice(candidate(&vendor_id, "O-3", units(1), date(2024, 10, 3)))
        .await
        .unwrap();
    assert!(matches!(next, Submission::Blocked(_)));
}

#[tokio::test]
async fn unknown_vendor_has_no_ceiling() {
    let (engine, _db) = engine_with_db().await;
    let report = commit(&engine, candidate("walk-in", "W-1", units(10), date(2024, 11, 3))).await;
    assert_eq!(report.vendor_total.unwrap().vendor_id, "walk-in");
    assert_eq!(
        engine.vendor("walk-in").await.unwrap_err(),
        EngineError::KeyNotFound("vendor walk-in".to_string())
    );
}

#[tokio::test]
async fn limits_are_validated() {
    let (engine, _db) = engine_with_db().await;
    assert!(matches!(
        engine.set_month_limit(12, Some(units(1))).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.register_vendor("Neg", Some(Money::new(-1))).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let vendor_id = engine.register_vendor("Later", None).await.unwrap();
    let vendor = engine
        .set_vendor_limit(&vendor_id, Some(units(250)))
        .await
        .unwrap();
    assert_eq!(vendor.limit, Some(units(250)));
    assert_eq!(engine.vendor(&vendor_id).await.unwrap().limit, Some(units(250)));

    engine.set_month_limit(3, Some(units(40))).await.unwrap();
    engine.set_month_limit(3, None).await.unwrap();
    assert_eq!(engine.month_limit(3).await.unwrap(), None);

    assert!(matches!(
        engine.set_vendor_limit("missing", None).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn expired_resume_token_is_rejected_and_swept() {
    let engine = engine_with_pending_ttl(Duration::from_millis(50)).await;
    engine.set_month_limit(6, Some(units(100))).await.unwrap();

    let mut tokens = Vec::new();
    for number in ["J-1", "J-2", "J-3"] {
        let submission = engine
            .submit_invoice(candidate("v", number, units(96), date(2024, 7, 14)))
            .await
            .unwrap();
        let Submission::WarnPending { token, .. } = submission else {
            panic!("expected a warning, got {submission:?}");
        };
        tokens.push(token);
    }
    assert_eq!(engine.pending_count().await, 3);

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        engine.resume(tokens[0], true).await,
        Err(EngineError::KeyNotFound(format!("resume token {}", tokens[0])))
    );
    assert!(engine.store().invoices_for_vendor("v").await.unwrap().is_empty());

    // A new warning sweeps the two remaining expired entries.
    let submission = engine
        .submit_invoice(candidate("v", "J-4", units(96), date(2024, 7, 15)))
        .await
        .unwrap();
    assert!(matches!(submission, Submission::WarnPending { .. }));
    assert_eq!(engine.pending_count().await, 1);
    assert!(matches!(
        engine.resume(tokens[1], true).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
