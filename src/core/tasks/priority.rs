//! Priority classification
//!
//! Maps a due time to a priority tier, both in memory and as a store-side
//! CASE expression for bulk updates and priority-ordered listing queries.
//! Both forms take the evaluation instant explicitly so they always agree.

use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::{Expr, ExprTrait, SimpleExpr};

use crate::config::RulesConfig;
use crate::core::tasks::types::TaskPriority;
use crate::storage::database::entities::task;

/// Classifies tasks into priority tiers by remaining time until due
#[derive(Debug, Clone)]
pub struct PriorityClassifier {
    urgent_days_limit: i64,
    normal_days_limit: i64,
}

impl PriorityClassifier {
    /// Create a classifier from the configured rule thresholds
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            urgent_days_limit: rules.urgent_days_limit,
            normal_days_limit: rules.normal_days_limit,
        }
    }

    /// Classify a due time relative to `now`
    pub fn classify(&self, due_time_utc: DateTime<Utc>, now: DateTime<Utc>) -> TaskPriority {
        let remaining = due_time_utc - now;
        if remaining <= Duration::days(self.urgent_days_limit) {
            TaskPriority::Urgent
        } else if remaining <= Duration::days(self.normal_days_limit) {
            TaskPriority::Normal
        } else {
            TaskPriority::Low
        }
    }

    /// The identical tier computation as a store-side expression
    ///
    /// Used as the SET value for the priority column inside conditional bulk
    /// updates and as the ORDER BY key of the listing query. Must agree with
    /// [`classify`] on every input; the agreement test fuzzes both sides.
    ///
    /// [`classify`]: PriorityClassifier::classify
    pub fn store_expr(&self, now: DateTime<Utc>) -> SimpleExpr {
        let urgent_edge = now + Duration::days(self.urgent_days_limit);
        let normal_edge = now + Duration::days(self.normal_days_limit);

        Expr::case(
            Expr::col(task::Column::DueTimeUtc).lte(urgent_edge),
            TaskPriority::Urgent.as_i16(),
        )
        .case(
            Expr::col(task::Column::DueTimeUtc).lte(normal_edge),
            TaskPriority::Normal.as_i16(),
        )
        .finally(TaskPriority::Low.as_i16())
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PriorityClassifier {
        PriorityClassifier::new(&RulesConfig::default())
    }

    #[test]
    fn overdue_tasks_are_urgent() {
        let now = Utc::now();
        assert_eq!(
            classifier().classify(now - Duration::days(2), now),
            TaskPriority::Urgent
        );
    }

    #[test]
    fn tiers_follow_the_configured_thresholds() {
        let now = Utc::now();
        assert_eq!(
            classifier().classify(now + Duration::hours(12), now),
            TaskPriority::Urgent
        );
        assert_eq!(
            classifier().classify(now + Duration::days(2), now),
            TaskPriority::Normal
        );
        assert_eq!(
            classifier().classify(now + Duration::days(10), now),
            TaskPriority::Low
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        let now = Utc::now();
        assert_eq!(
            classifier().classify(now + Duration::days(1), now),
            TaskPriority::Urgent
        );
        assert_eq!(
            classifier().classify(now + Duration::days(3), now),
            TaskPriority::Normal
        );
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let rules = RulesConfig {
            urgent_days_limit: 2,
            normal_days_limit: 7,
            ..RulesConfig::default()
        };
        let classifier = PriorityClassifier::new(&rules);
        let now = Utc::now();
        assert_eq!(
            classifier.classify(now + Duration::days(2), now),
            TaskPriority::Urgent
        );
        assert_eq!(
            classifier.classify(now + Duration::days(5), now),
            TaskPriority::Normal
        );
        assert_eq!(
            classifier.classify(now + Duration::days(8), now),
            TaskPriority::Low
        );
    }
}
