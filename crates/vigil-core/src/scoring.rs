//! Aggregation of component results into a [`SystemHealth`].

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{HealthStatus, OverallStatus, Status, SystemHealth, rules};

/// Number of components per status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub degraded: usize,
    pub unhealthy: usize,
    pub unknown: usize,
}

impl StatusCounts {
    /// Counts the statuses of the given components.
    pub fn from_components(components: &[HealthStatus]) -> Self {
        components.iter().fold(Self::default(), |mut counts, c| {
            match c.status {
                Status::Healthy => counts.healthy += 1,
                Status::Degraded => counts.degraded += 1,
                Status::Unhealthy => counts.unhealthy += 1,
                Status::Unknown => counts.unknown += 1,
            }
            counts
        })
    }

    /// Total number of components.
    pub fn total(&self) -> usize {
        self.healthy + self.degraded + self.unhealthy + self.unknown
    }

    /// `round((healthy * 100 + degraded * 50) / total)`, rounding half up.
    ///
    /// An empty run scores 0.
    pub fn health_score(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }

        let points = self.healthy * 100 + self.degraded * 50;
        let score = (2 * points + total) / (2 * total);
        u8::try_from(score).unwrap_or(100)
    }

    /// Worst-case verdict; an empty run is unhealthy.
    pub fn overall_status(&self) -> OverallStatus {
        if self.unhealthy > 0 || self.total() == 0 {
            OverallStatus::Unhealthy
        } else if self.degraded > 0 {
            OverallStatus::Degraded
        } else {
            OverallStatus::Healthy
        }
    }
}

/// Folds component results into a system-level document.
///
/// Pure apart from the completion timestamp: the same components always give
/// the same score, verdict, features and recommendations.
pub fn score(components: Vec<HealthStatus>) -> SystemHealth {
    let counts = StatusCounts::from_components(&components);
    let missing_features = rules::missing_features(&components);
    let recommendations = rules::recommend(&components)
        .into_iter()
        .map(|r| r.message)
        .collect();

    SystemHealth {
        overall_status: counts.overall_status(),
        health_score: counts.health_score(),
        components,
        missing_features,
        recommendations,
        timestamp: Timestamp::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(statuses: &[Status]) -> Vec<HealthStatus> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| HealthStatus::new(format!("c{i}"), *status))
            .collect()
    }

    #[test]
    fn all_healthy() {
        let health = score(vec![
            HealthStatus::healthy("api"),
            HealthStatus::healthy("store"),
            HealthStatus::healthy("transport"),
        ]);

        assert_eq!(health.health_score, 100);
        assert_eq!(health.overall_status, OverallStatus::Healthy);
        assert!(health.recommendations.is_empty());
        assert_eq!(health.components.len(), 3);
    }

    #[test]
    fn one_degraded() {
        let health = score(vec![HealthStatus::degraded("api"), HealthStatus::healthy("store")]);

        assert_eq!(health.health_score, 75);
        assert_eq!(health.overall_status, OverallStatus::Degraded);
        assert_eq!(health.recommendations, ["Warning: Optimize api performance"]);
    }

    #[test]
    fn one_unhealthy() {
        let health = score(vec![
            HealthStatus::healthy("api"),
            HealthStatus::unhealthy("store", "connection refused"),
        ]);

        assert_eq!(health.health_score, 50);
        assert_eq!(health.overall_status, OverallStatus::Unhealthy);
        assert!(
            health
                .recommendations
                .contains(&"Critical: Fix store - connection refused".to_owned())
        );
    }

    #[test]
    fn empty_run_is_unhealthy() {
        let health = score(Vec::new());
        assert_eq!(health.health_score, 0);
        assert_eq!(health.overall_status, OverallStatus::Unhealthy);
    }

    #[test]
    fn unknown_scores_zero_but_is_not_unhealthy() {
        let health = score(statuses(&[Status::Healthy, Status::Unknown]));
        assert_eq!(health.health_score, 50);
        assert_eq!(health.overall_status, OverallStatus::Healthy);

        let health = score(statuses(&[Status::Degraded, Status::Unknown]));
        assert_eq!(health.overall_status, OverallStatus::Degraded);
    }

    #[test]
    fn rounds_half_up() {
        // 150 / 4 = 37.5
        let counts = StatusCounts {
            healthy: 1,
            degraded: 1,
            unhealthy: 2,
            unknown: 0,
        };
        assert_eq!(counts.health_score(), 38);

        // 250 / 3 = 83.33
        let counts = StatusCounts::from_components(&statuses(&[
            Status::Healthy,
            Status::Healthy,
            Status::Degraded,
        ]));
        assert_eq!(counts.health_score(), 83);

        // 50 / 3 = 16.67
        let counts = StatusCounts::from_components(&statuses(&[
            Status::Degraded,
            Status::Unhealthy,
            Status::Unhealthy,
        ]));
        assert_eq!(counts.health_score(), 17);
    }

    #[test]
    fn score_matches_formula_for_every_mix() {
        for n in 1..=8usize {
            for h in 0..=n {
                for d in 0..=(n - h) {
                    let u = n - h - d;
                    let counts = StatusCounts {
                        healthy: h,
                        degraded: d,
                        unhealthy: u,
                        unknown: 0,
                    };
                    let expected = ((h * 100 + d * 50) as f64 / n as f64).round() as u8;
                    assert_eq!(counts.health_score(), expected, "h={h} d={d} u={u}");

                    let overall = counts.overall_status();
                    match (u, d) {
                        (u, _) if u > 0 => assert_eq!(overall, OverallStatus::Unhealthy),
                        (_, d) if d > 0 => assert_eq!(overall, OverallStatus::Degraded),
                        _ => assert_eq!(overall, OverallStatus::Healthy),
                    }
                }
            }
        }
    }
}
