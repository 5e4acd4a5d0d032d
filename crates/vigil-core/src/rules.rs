//! Missing-feature and recommendation tables.
//!
//! Both tables are declarative: each rule names a component and a condition
//! on that component's result. Rules only fire for components that took part
//! in the run, so a registry without a `docker` probe never asks for Docker
//! containers to be started.

use std::fmt;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

use crate::{HealthStatus, Status};

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A remediation action with its urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Recommendation {
    pub priority: Priority,
    pub message: String,
}

impl Recommendation {
    fn new(priority: Priority, message: impl Into<String>) -> Self {
        Self {
            priority,
            message: message.into(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Condition evaluated against one component result.
#[derive(Debug, Clone, Copy)]
enum Condition {
    /// Status is anything but `Healthy`.
    NotHealthy,
    /// Boolean detail is present and `false`.
    DetailFalse(&'static str),
}

impl Condition {
    fn matches(self, status: &HealthStatus) -> bool {
        match self {
            Self::NotHealthy => !status.status.is_healthy(),
            Self::DetailFalse(key) => status.detail_bool(key) == Some(false),
        }
    }
}

struct FeatureRule {
    component: &'static str,
    condition: Condition,
    feature: &'static str,
}

struct SuggestionRule {
    component: &'static str,
    condition: Condition,
    priority: Priority,
    message: &'static str,
}

const FEATURE_RULES: &[FeatureRule] = &[
    FeatureRule {
        component: "websocket",
        condition: Condition::NotHealthy,
        feature: "Real-time WebSocket communication",
    },
    FeatureRule {
        component: "audio",
        condition: Condition::NotHealthy,
        feature: "Multi-language audio system",
    },
    FeatureRule {
        component: "bots",
        condition: Condition::DetailFalse("aiIntegration"),
        feature: "Advanced AI bot conversations",
    },
    FeatureRule {
        component: "integrations",
        condition: Condition::DetailFalse("cleanClaims"),
        feature: "Clean Claims API integration",
    },
    FeatureRule {
        component: "integrations",
        condition: Condition::DetailFalse("backgroundChecks"),
        feature: "Background check service integration",
    },
];

const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        component: "websocket",
        condition: Condition::NotHealthy,
        priority: Priority::High,
        message: "Deploy WebSocket server for real-time features",
    },
    SuggestionRule {
        component: "docker",
        condition: Condition::NotHealthy,
        priority: Priority::Medium,
        message: "Start Docker containers for full system operation",
    },
    SuggestionRule {
        component: "integrations",
        condition: Condition::DetailFalse("elevenLabs"),
        priority: Priority::Low,
        message: "Configure ElevenLabs API key in the environment",
    },
];

fn find<'a>(components: &'a [HealthStatus], name: &str) -> Option<&'a HealthStatus> {
    components.iter().find(|c| c.component == name)
}

/// Lists capabilities that are unavailable given the component results.
pub fn missing_features(components: &[HealthStatus]) -> Vec<String> {
    FEATURE_RULES
        .iter()
        .filter(|rule| find(components, rule.component).is_some_and(|c| rule.condition.matches(c)))
        .map(|rule| rule.feature.to_owned())
        .collect()
}

/// Derives remediation actions from the component results.
///
/// Output is tiered: one critical action per unhealthy component, then one
/// warning per degraded component, then the fixed suggestions. Registry order
/// is kept within each tier.
pub fn recommend(components: &[HealthStatus]) -> Vec<Recommendation> {
    let critical = components
        .iter()
        .filter(|c| c.status == Status::Unhealthy)
        .map(|c| {
            let errors = c.error_list();
            let message = if errors.is_empty() {
                format!("Critical: Fix {}", c.component)
            } else {
                format!("Critical: Fix {} - {}", c.component, errors.join(", "))
            };
            Recommendation::new(Priority::High, message)
        });

    let warnings = components
        .iter()
        .filter(|c| c.status == Status::Degraded)
        .map(|c| {
            Recommendation::new(
                Priority::Medium,
                format!("Warning: Optimize {} performance", c.component),
            )
        });

    let suggestions = SUGGESTION_RULES
        .iter()
        .filter(|rule| find(components, rule.component).is_some_and(|c| rule.condition.matches(c)))
        .map(|rule| Recommendation::new(rule.priority, rule.message));

    critical.chain(warnings).chain(suggestions).collect()
}

/// Sorts recommendations by priority, keeping the relative order of equals.
pub fn by_priority(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(recommendations: &[Recommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn healthy_run_has_nothing_to_say() {
        let components = vec![
            HealthStatus::healthy("api"),
            HealthStatus::healthy("store"),
            HealthStatus::healthy("transport"),
        ];

        assert!(missing_features(&components).is_empty());
        assert!(recommend(&components).is_empty());
    }

    #[test]
    fn tiers_follow_severity() {
        let components = vec![
            HealthStatus::degraded("api"),
            HealthStatus::unhealthy("websocket", "Connection timeout"),
            HealthStatus::new("docker", Status::Unknown),
            HealthStatus::unhealthy("store", "connection refused").with_error("pool closed"),
        ];

        let recommendations = recommend(&components);
        assert_eq!(
            messages(&recommendations),
            [
                "Critical: Fix websocket - Connection timeout",
                "Critical: Fix store - connection refused, pool closed",
                "Warning: Optimize api performance",
                "Deploy WebSocket server for real-time features",
                "Start Docker containers for full system operation",
            ]
        );
        assert_eq!(recommendations[4].priority, Priority::Medium);
    }

    #[test]
    fn unhealthy_without_errors() {
        let components = vec![HealthStatus::new("audio", Status::Unhealthy)];
        assert_eq!(messages(&recommend(&components)), ["Critical: Fix audio"]);
    }

    #[test]
    fn detail_flags_drive_features() {
        let components = vec![
            HealthStatus::degraded("bots").with_detail("aiIntegration", false),
            HealthStatus::degraded("integrations")
                .with_detail("cleanClaims", false)
                .with_detail("backgroundChecks", true)
                .with_detail("elevenLabs", false),
            HealthStatus::unhealthy("audio", "unreachable"),
        ];

        assert_eq!(
            missing_features(&components),
            [
                "Multi-language audio system",
                "Advanced AI bot conversations",
                "Clean Claims API integration",
            ]
        );

        let recommendations = recommend(&components);
        let last = recommendations.last().unwrap();
        assert_eq!(last.priority, Priority::Low);
        assert_eq!(last.to_string(), "Configure ElevenLabs API key in the environment");
    }

    #[test]
    fn every_feature_rule_fires_on_its_condition() {
        for rule in FEATURE_RULES {
            let (firing, silent) = match rule.condition {
                Condition::NotHealthy => (
                    vec![HealthStatus::degraded(rule.component)],
                    vec![HealthStatus::healthy(rule.component)],
                ),
                Condition::DetailFalse(key) => (
                    vec![HealthStatus::degraded(rule.component).with_detail(key, false)],
                    vec![
                        HealthStatus::degraded(rule.component).with_detail(key, true),
                        HealthStatus::degraded(rule.component),
                    ],
                ),
            };

            for component in firing {
                assert_eq!(
                    missing_features(std::slice::from_ref(&component)),
                    [rule.feature],
                    "{} should report '{}'",
                    component.component,
                    rule.feature
                );
            }
            for component in silent {
                assert!(
                    missing_features(std::slice::from_ref(&component)).is_empty(),
                    "{} should not report '{}'",
                    component.component,
                    rule.feature
                );
            }
        }
    }

    #[test]
    fn unhealthy_websocket_and_missing_background_checks() {
        let components = vec![
            HealthStatus::unhealthy("websocket", "Connection timeout"),
            HealthStatus::degraded("integrations")
                .with_detail("cleanClaims", true)
                .with_detail("backgroundChecks", false),
        ];

        assert_eq!(
            missing_features(&components),
            [
                "Real-time WebSocket communication",
                "Background check service integration",
            ]
        );
    }

    #[test]
    fn absent_flags_do_not_fire() {
        let components = vec![HealthStatus::degraded("bots")];
        assert!(missing_features(&components).is_empty());
    }

    #[test]
    fn sorts_by_priority_stably() {
        let sorted = by_priority(vec![
            Recommendation::new(Priority::Low, "c"),
            Recommendation::new(Priority::High, "a"),
            Recommendation::new(Priority::Medium, "b"),
            Recommendation::new(Priority::High, "a2"),
        ]);
        assert_eq!(messages(&sorted), ["a", "a2", "b", "c"]);
    }
}
