//! Component and overall status enums.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Status reported for a single component.
///
/// For aggregation, `Unhealthy` dominates `Degraded`, which dominates both
/// `Healthy` and `Unknown`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Component is operating normally.
    Healthy,
    /// Component is reachable but partially working.
    Degraded,
    /// Component is not operational.
    Unhealthy,
    /// Component state could not be determined.
    #[default]
    Unknown,
}

impl Status {
    /// Returns `true` if the status is [`Status::Healthy`].
    #[inline]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Rank used when folding statuses, higher is worse.
    ///
    /// `Healthy` and `Unknown` share the lowest rank.
    pub const fn severity(self) -> u8 {
        match self {
            Self::Healthy | Self::Unknown => 0,
            Self::Degraded => 1,
            Self::Unhealthy => 2,
        }
    }
}

/// Overall verdict of a run, never `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OverallStatus {
    /// Every component is healthy or unknown.
    Healthy,
    /// At least one component is degraded and none is unhealthy.
    Degraded,
    /// At least one component is unhealthy, or nothing was checked.
    Unhealthy,
}

impl From<OverallStatus> for Status {
    fn from(value: OverallStatus) -> Self {
        match value {
            OverallStatus::Healthy => Self::Healthy,
            OverallStatus::Degraded => Self::Degraded,
            OverallStatus::Unhealthy => Self::Unhealthy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Status::Unhealthy).unwrap();
        assert_eq!(json, "\"unhealthy\"");

        let parsed: OverallStatus = serde_json::from_str("\"degraded\"").unwrap();
        assert_eq!(parsed, OverallStatus::Degraded);
        assert_eq!(Status::Unknown.to_string(), "unknown");
    }

    #[test]
    fn unknown_ranks_with_healthy() {
        assert_eq!(Status::Unknown.severity(), Status::Healthy.severity());
        assert!(Status::Unhealthy.severity() > Status::Degraded.severity());
        assert!(Status::Degraded.severity() > Status::Unknown.severity());
    }
}
