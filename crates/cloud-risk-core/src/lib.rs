#![warn(missing_docs)]
//! # cloud-risk-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `cloud-risk` workspace.
//!
//! ## Responsibilities
//! - Represent backend-classified CloudTrail log entries and custom rules.
//! - Own the fixed AWS region catalogue used by every credential form.
//! - Validate transient AWS connection parameters before they leave a form.
//!
//! ## Data flow
//! The backend emits [`LogEntry`] and [`CustomRule`] JSON. Forms build an
//! [`AwsConnection`] from raw input, the API crate serializes it, and the
//! analysis crate consumes the returned entries.
//!
//! ## Ownership and lifetimes
//! All values own their strings so view state can outlive the network buffers
//! they were decoded from.
//!
//! ## Error model
//! Validation failures (blank fields, unknown region codes, unknown risk
//! labels) return [`CoreError`].
//!
//! ## Security and privacy notes
//! [`AwsCredentials`] never prints its secret key through `Debug`. Connection
//! parameters are transient and are not persisted by any crate.
//!
//! ## Example
//! ```rust
//! use cloud_risk_core::{AwsRegion, RiskLevel};
//!
//! assert_eq!(AwsRegion::default().as_str(), "us-east-1");
//! assert_eq!("High".parse::<RiskLevel>().unwrap(), RiskLevel::High);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Region codes offered by every credential form, in display order.
pub const AWS_REGIONS: [&str; 23] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "eu-south-1",
    "me-south-1",
    "sa-east-1",
];

/// Region preselected in forms.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Risk label attached to log entries and custom rules.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RiskLevel {
    /// Low risk.
    #[default]
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl RiskLevel {
    /// Every level in ascending order.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(CoreError::UnknownRiskLevel(other.to_string())),
        }
    }
}

/// One classified CloudTrail record returned by the backend.
///
/// Fields are lenient on decode: the backend owns classification and the
/// client only displays and counts what it receives. A `null` field decodes
/// the same as a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogEntry {
    /// CloudTrail event name.
    #[serde(rename = "eventName", default, deserialize_with = "null_as_default")]
    pub event_name: String,
    /// Raw risk label as sent by the backend.
    #[serde(default, alias = "riskLevel", deserialize_with = "null_as_default")]
    pub risk: String,
    /// Human-readable classification reason.
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    /// Event timestamp, when the backend includes it.
    #[serde(rename = "eventTime", default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    /// Source IP address, when the backend includes it.
    #[serde(rename = "sourceIP", default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
}

impl LogEntry {
    /// Creates an entry with the three mandatory display fields.
    pub fn new(
        event_name: impl Into<String>,
        risk: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            risk: risk.into(),
            reason: reason.into(),
            event_time: None,
            source_ip: None,
        }
    }

    /// Returns the risk level used for aggregation.
    ///
    /// A missing label counts as [`RiskLevel::Low`]; a label outside the known
    /// set yields `None` and is left out of every count.
    pub fn risk_level(&self) -> Option<RiskLevel> {
        if self.risk.is_empty() {
            return Some(RiskLevel::Low);
        }
        self.risk.parse().ok()
    }

    /// Event name for table display.
    pub fn display_event_name(&self) -> &str {
        if self.event_name.is_empty() {
            "N/A"
        } else {
            &self.event_name
        }
    }
}

/// User-defined override mapping an event name to a risk label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRule {
    /// Event name; unique within one rule set.
    pub event_name: String,
    /// Risk assigned to matching events; missing or `null` reads as Low.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_risk: RiskLevel,
    /// Justification shown alongside the rule.
    pub reason: String,
}

impl CustomRule {
    /// Creates a rule from its parts.
    pub fn new(
        event_name: impl Into<String>,
        custom_risk: RiskLevel,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            custom_risk,
            reason: reason.into(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated AWS region code from [`AWS_REGIONS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AwsRegion(&'static str);

impl AwsRegion {
    /// Looks up a region code in the fixed catalogue.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownRegion`] for codes outside [`AWS_REGIONS`].
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        let code = code.trim();
        AWS_REGIONS
            .iter()
            .copied()
            .find(|known| *known == code)
            .map(Self)
            .ok_or_else(|| CoreError::UnknownRegion(code.to_string()))
    }

    /// Returns the region code.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(DEFAULT_REGION)
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Access key pair entered by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    /// AWS access key id.
    pub access_key: String,
    /// AWS secret access key.
    pub secret_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Complete parameter set for one log fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConnection {
    /// Key pair used by the backend to reach S3.
    pub credentials: AwsCredentials,
    /// Region of the bucket.
    pub region: AwsRegion,
    /// Bucket name, log path, or S3 URI depending on the backend endpoint.
    pub location: String,
}

impl AwsConnection {
    /// Builds connection parameters from raw form input.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingField`] naming the first blank field.
    pub fn new(
        access_key: &str,
        secret_key: &str,
        region: AwsRegion,
        location: &str,
    ) -> Result<Self, CoreError> {
        for (name, value) in [
            ("access key", access_key),
            ("secret key", secret_key),
            ("log location", location),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(name));
            }
        }

        Ok(Self {
            credentials: AwsCredentials {
                access_key: access_key.trim().to_string(),
                secret_key: secret_key.to_string(),
            },
            region,
            location: location.trim().to_string(),
        })
    }
}

/// Data model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Region code is not in [`AWS_REGIONS`].
    #[error("unknown AWS region: {0}")]
    UnknownRegion(String),
    /// Risk label is not one of Low, Medium, High.
    #[error("unknown risk level: {0}")]
    UnknownRiskLevel(String),
    /// Required input was blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    //! Unit tests for model validation.

    use super::*;

    #[test]
    fn region_catalogue_has_no_duplicates() {
        let mut codes = AWS_REGIONS.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), AWS_REGIONS.len());
    }

    #[test]
    fn missing_risk_counts_as_low_and_unknown_is_ignored() {
        assert_eq!(LogEntry::new("E", "", "r").risk_level(), Some(RiskLevel::Low));
        assert_eq!(LogEntry::new("E", "Critical", "r").risk_level(), None);
        assert_eq!(LogEntry::new("E", "medium", "r").risk_level(), None);
    }

    #[test]
    fn rule_without_risk_reads_as_low() {
        let rule: CustomRule =
            serde_json::from_str(r#"{"eventName":"StopLogging","reason":"audit"}"#)
                .expect("rule should decode");
        assert_eq!(rule.custom_risk, RiskLevel::Low);

        let rule: CustomRule =
            serde_json::from_str(r#"{"eventName":"StopLogging","customRisk":null,"reason":"a"}"#)
                .expect("null risk should decode");
        assert_eq!(rule.custom_risk, RiskLevel::Low);
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let credentials = AwsCredentials {
            access_key: "AKIA".to_string(),
            secret_key: "wJalr".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("wJalr"));
    }
}
