//! Custom rules editor.
//!
//! The displayed rule set only ever changes to a set the backend confirmed.
//! Every mutation builds a [`PendingRules`] copy, sends the whole copy, and
//! resolves it into a [`RulesOutcome`].

use cloud_risk_api::{ApiError, BackendClient, MessageResponse};
use cloud_risk_core::{CustomRule, RiskLevel};
use tracing::{info, warn};

use crate::Notice;

/// Shown when the rule set is empty.
pub const EMPTY_RULES_TEXT: &str = "No custom rules added yet.";

/// Rule being typed into the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDraft {
    /// Event name to match.
    pub event_name: String,
    /// Level assigned on match.
    pub custom_risk: RiskLevel,
    /// Explanation attached to matches.
    pub reason: String,
}

impl RuleDraft {
    /// Creates a draft.
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

/// Result of one editor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesOutcome {
    /// Backend accepted the set; it is now the displayed set.
    Confirmed(Vec<CustomRule>),
    /// Backend call failed; the previous set stays displayed.
    Failed {
        /// Set still displayed.
        previous: Vec<CustomRule>,
        /// User-facing failure text.
        message: String,
    },
    /// Local validation rejected the action; nothing was sent.
    Rejected(String),
}

/// A proposed rule set awaiting backend confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRules {
    previous: Vec<CustomRule>,
    proposed: Vec<CustomRule>,
}

impl PendingRules {
    /// Pairs the currently confirmed set with its proposed replacement.
    pub fn new(previous: Vec<CustomRule>, proposed: Vec<CustomRule>) -> Self {
        Self { previous, proposed }
    }

    /// Set to send.
    pub fn proposed(&self) -> &[CustomRule] {
        &self.proposed
    }

    /// Resolves against the backend reply; `fallback` is used when the
    /// failure carries no backend message.
    pub fn resolve(self, reply: Result<MessageResponse, ApiError>, fallback: &str) -> RulesOutcome {
        match reply {
            Ok(_) => RulesOutcome::Confirmed(self.proposed),
            Err(error) => RulesOutcome::Failed {
                previous: self.previous,
                message: error.user_message(fallback),
            },
        }
    }
}

/// Whole-set editor over the backend rule store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesEditor {
    rules: Vec<CustomRule>,
    /// Add form fields.
    pub draft: RuleDraft,
    notice: Option<Notice>,
}

impl RulesEditor {
    /// Creates an empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last backend-confirmed rule set.
    pub fn rules(&self) -> &[CustomRule] {
        &self.rules
    }

    /// Text from the last action.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Loads the full rule set once.
    pub fn mount(&mut self, client: &BackendClient, bearer: Option<&str>) {
        match client.get_rules(bearer) {
            Ok(rules) => {
                info!(rules = rules.len(), "custom rules loaded");
                self.rules = rules;
                self.notice = None;
            }
            Err(error) => {
                warn!(class = ?error.class(), "custom rules load failed");
                self.notice = Some(Notice::error(
                    error.user_message("Failed to fetch rules"),
                ));
            }
        }
    }

    /// Adds the current draft as a rule.
    ///
    /// Blank fields (after trimming) and duplicate event names are rejected
    /// without a request. The draft is reset on success.
    pub fn add(&mut self, client: &BackendClient, bearer: Option<&str>) -> RulesOutcome {
        let event_name = self.draft.event_name.trim();
        let reason = self.draft.reason.trim();

        let outcome = if event_name.is_empty() || reason.is_empty() {
            RulesOutcome::Rejected("All fields are required.".to_string())
        } else if self.rules.iter().any(|rule| rule.event_name == event_name) {
            RulesOutcome::Rejected("Rule with this event name already exists.".to_string())
        } else {
            let mut proposed = self.rules.clone();
            proposed.push(CustomRule::new(event_name, self.draft.custom_risk, reason));
            self.sync(
                PendingRules::new(self.rules.clone(), proposed),
                client,
                bearer,
                "Failed to add rule.",
            )
        };

        let confirmed = matches!(outcome, RulesOutcome::Confirmed(_));
        self.apply(&outcome, "Rule added successfully.");
        if confirmed {
            self.draft = RuleDraft::default();
        }
        outcome
    }

    /// Removes the rule keyed by `event_name`.
    pub fn delete(
        &mut self,
        event_name: &str,
        client: &BackendClient,
        bearer: Option<&str>,
    ) -> RulesOutcome {
        let proposed = self
            .rules
            .iter()
            .filter(|rule| rule.event_name != event_name)
            .cloned()
            .collect();
        let outcome = self.sync(
            PendingRules::new(self.rules.clone(), proposed),
            client,
            bearer,
            "Failed to delete rule.",
        );
        self.apply(&outcome, "Rule deleted successfully.");
        outcome
    }

    fn sync(
        &self,
        pending: PendingRules,
        client: &BackendClient,
        bearer: Option<&str>,
        fallback: &str,
    ) -> RulesOutcome {
        let reply = client.set_rules(pending.proposed(), bearer);
        let outcome = pending.resolve(reply, fallback);
        match &outcome {
            RulesOutcome::Confirmed(rules) => info!(rules = rules.len(), "custom rules synced"),
            _ => warn!("custom rules sync failed"),
        }
        outcome
    }

    fn apply(&mut self, outcome: &RulesOutcome, success: &str) {
        self.notice = Some(match outcome {
            RulesOutcome::Confirmed(rules) => {
                self.rules = rules.clone();
                Notice::success(success)
            }
            RulesOutcome::Failed { message, .. } | RulesOutcome::Rejected(message) => {
                Notice::error(message.clone())
            }
        });
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for pending set resolution.

    use super::*;

    #[test]
    fn failed_resolution_keeps_previous_set() {
        let previous = vec![CustomRule::new("A", RiskLevel::High, "r")];
        let pending = PendingRules::new(previous.clone(), Vec::new());
        let outcome = pending.resolve(Err(ApiError::Timeout), "Failed to delete rule.");
        assert_eq!(
            outcome,
            RulesOutcome::Failed {
                previous,
                message: "Failed to delete rule.".to_string(),
            }
        );
    }
}
