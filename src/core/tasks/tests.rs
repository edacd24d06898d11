//! Agreement tests between the in-memory rules and their store-side forms
//!
//! The policy and the classifier each exist twice: as Rust evaluators and as
//! sea-query expressions embedded in bulk statements. These tests fuzz both
//! sides with randomized status pairs and due-time offsets against an
//! in-memory SQLite store and require them to agree on every input.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::config::{DatabaseConfig, RulesConfig};
use crate::core::tasks::policy::TransitionPolicy;
use crate::core::tasks::priority::PriorityClassifier;
use crate::core::tasks::types::{TaskPriority, TaskStatus};
use crate::storage::database::entities::{task, TaskEntity};
use crate::storage::database::TaskDatabase;

const STATUSES: [TaskStatus; 3] = [
    TaskStatus::Pending,
    TaskStatus::InProgress,
    TaskStatus::Completed,
];

/// Deterministic pseudo-random sequence so failures are reproducible
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Offset in minutes within roughly +/- 8 days
    fn offset_minutes(&mut self) -> i64 {
        (self.next() % (2 * 8 * 24 * 60)) as i64 - 8 * 24 * 60
    }
}

async fn test_db() -> TaskDatabase {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
    };
    let db = TaskDatabase::new(&config).await.expect("connect");
    db.migrate().await.expect("migrate");
    db
}

async fn seed_row(
    db: &TaskDatabase,
    status: TaskStatus,
    due_time_utc: DateTime<Utc>,
) -> i32 {
    let model = task::ActiveModel {
        title: Set("agreement-fixture".to_string()),
        description: Set(None),
        due_time_utc: Set(due_time_utc),
        tz_offset_minutes: Set(0),
        status: Set(status.as_i16()),
        priority: Set(TaskPriority::Low.as_i16()),
        created_at: Set(due_time_utc),
        version: Set(0),
        ..Default::default()
    }
    .insert(db.connection())
    .await
    .expect("insert fixture");
    model.id
}

/// Whether a single seeded row matches the policy's store filter
async fn row_matches_filter(
    db: &TaskDatabase,
    id: i32,
    policy: &TransitionPolicy,
    to: TaskStatus,
    now: DateTime<Utc>,
) -> bool {
    let matched = TaskEntity::find()
        .filter(
            Condition::all()
                .add(task::Column::Id.eq(id))
                .add(policy.store_filter(to, now)),
        )
        .count(db.connection())
        .await
        .expect("filter query");
    matched == 1
}

#[tokio::test]
async fn policy_and_store_filter_agree_on_edge_offsets() {
    let db = test_db().await;
    let policy = TransitionPolicy::new(&RulesConfig::default());
    let now = Utc::now();

    // Offsets straddling the early-completion boundary.
    let offsets = [
        Duration::days(-5),
        Duration::hours(-1),
        Duration::hours(1),
        Duration::days(2),
        Duration::days(3) - Duration::seconds(1),
        Duration::days(3) + Duration::seconds(1),
        Duration::days(5),
    ];

    for from in STATUSES {
        for to in STATUSES {
            for offset in offsets {
                let due = now + offset;
                let id = seed_row(&db, from, due).await;

                let in_memory = policy.validate(from, to, due, now).is_ok();
                let store_side = row_matches_filter(&db, id, &policy, to, now).await;

                assert_eq!(
                    in_memory, store_side,
                    "disagreement for {:?} -> {:?} at offset {:?}",
                    from, to, offset
                );
            }
        }
    }
}

#[tokio::test]
async fn policy_and_store_filter_agree_on_fuzzed_inputs() {
    let db = test_db().await;
    let policy = TransitionPolicy::new(&RulesConfig::default());
    let now = Utc::now();
    let mut rng = XorShift(0x2545_f491_4f6c_dd1d);

    for _ in 0..60 {
        let from = STATUSES[(rng.next() % 3) as usize];
        let to = STATUSES[(rng.next() % 3) as usize];
        let due = now + Duration::minutes(rng.offset_minutes());
        let id = seed_row(&db, from, due).await;

        let in_memory = policy.validate(from, to, due, now).is_ok();
        let store_side = row_matches_filter(&db, id, &policy, to, now).await;

        assert_eq!(
            in_memory, store_side,
            "disagreement for {:?} -> {:?} due {}",
            from, to, due
        );
    }
}

#[tokio::test]
async fn classifier_and_store_expression_agree() {
    let db = test_db().await;
    let classifier = PriorityClassifier::new(&RulesConfig::default());
    let now = Utc::now();
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);

    let mut expected = Vec::new();
    for _ in 0..40 {
        let due = now + Duration::minutes(rng.offset_minutes());
        let id = seed_row(&db, TaskStatus::Pending, due).await;
        expected.push((id, classifier.classify(due, now)));
    }
    // Boundary rows: exactly at the urgent and normal limits.
    for offset in [Duration::days(1), Duration::days(3)] {
        let due = now + offset;
        let id = seed_row(&db, TaskStatus::Pending, due).await;
        expected.push((id, classifier.classify(due, now)));
    }

    // Recompute every priority store-side, exactly as the bulk write does.
    TaskEntity::update_many()
        .col_expr(task::Column::Priority, classifier.store_expr(now))
        .exec(db.connection())
        .await
        .expect("store-side priority update");

    for (id, in_memory) in expected {
        let model = TaskEntity::find_by_id(id)
            .one(db.connection())
            .await
            .expect("fetch row")
            .expect("row exists");
        assert_eq!(
            model.priority,
            in_memory.as_i16(),
            "tier disagreement for task {} due {}",
            id,
            model.due_time_utc
        );
    }
}

#[tokio::test]
async fn store_filter_composes_with_other_conditions() {
    // The filter must be usable inside a larger UPDATE condition, as the
    // engine composes it with the version-token match.
    let db = test_db().await;
    let policy = TransitionPolicy::new(&RulesConfig::default());
    let now = Utc::now();

    let eligible = seed_row(&db, TaskStatus::InProgress, now + Duration::hours(2)).await;
    let ineligible = seed_row(&db, TaskStatus::Completed, now + Duration::hours(2)).await;
    let id_set = [eligible, ineligible];

    let result = TaskEntity::update_many()
        .col_expr(
            task::Column::Status,
            Expr::value(TaskStatus::Completed.as_i16()),
        )
        .filter(task::Column::Id.is_in(id_set))
        .filter(policy.store_filter(TaskStatus::Completed, now))
        .exec(db.connection())
        .await
        .expect("conditional update");

    // Only the eligible row matched the combined condition.
    assert_eq!(result.rows_affected, 1);

    let updated = TaskEntity::find_by_id(eligible)
        .one(db.connection())
        .await
        .expect("fetch")
        .expect("row exists");
    assert_eq!(updated.status, TaskStatus::Completed.as_i16());
}
