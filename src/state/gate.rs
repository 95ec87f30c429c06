//! Voting-power gate for the submit action

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::forms::FormKind;

/// Minimum voting power needed to submit, per proposal type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionThresholds {
    pub governance: f64,
    pub poll: f64,
}

impl Default for SubmissionThresholds {
    fn default() -> Self {
        Self {
            governance: 1000.0,
            poll: 1.0,
        }
    }
}

impl SubmissionThresholds {
    pub fn for_kind(&self, kind: FormKind) -> f64 {
        match kind {
            FormKind::Governance => self.governance,
            FormKind::Poll => self.poll,
        }
    }
}

/// Resolution state of the acting identity's voting power
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VotingPower {
    Pending,
    Resolved(f64),
    Failed,
}

/// How the submit button should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub disabled: bool,
    pub loading: bool,
}

/// Compares resolved voting power against a fixed threshold.
///
/// Pending blocks submission; a failed lookup counts as below threshold.
#[derive(Debug, Clone)]
pub struct VotingPowerGate {
    kind: FormKind,
    threshold: f64,
    power: VotingPower,
}

impl VotingPowerGate {
    pub fn new(kind: FormKind, threshold: f64) -> Self {
        Self {
            kind,
            threshold,
            power: VotingPower::Pending,
        }
    }

    pub fn for_form(kind: FormKind, thresholds: &SubmissionThresholds) -> Self {
        Self::new(kind, thresholds.for_kind(kind))
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn power(&self) -> VotingPower {
        self.power
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.power, VotingPower::Pending)
    }

    /// Mark a new lookup as outstanding
    pub fn reload(&mut self) {
        self.power = VotingPower::Pending;
    }

    /// Record the outcome of a voting-power lookup
    pub fn resolve(&mut self, result: anyhow::Result<f64>) {
        self.power = match result {
            Ok(power) if power.is_finite() => {
                debug!(kind = self.kind.as_str(), power, threshold = self.threshold, "Voting power resolved");
                VotingPower::Resolved(power)
            }
            Ok(power) => {
                warn!(kind = self.kind.as_str(), power, "Voting power is not a finite number");
                VotingPower::Failed
            }
            Err(err) => {
                warn!(kind = self.kind.as_str(), "Voting power lookup failed: {err:#}");
                VotingPower::Failed
            }
        };
    }

    pub fn threshold_not_met(&self) -> bool {
        match self.power {
            VotingPower::Pending => false,
            VotingPower::Resolved(power) => power < self.threshold,
            VotingPower::Failed => true,
        }
    }

    /// Whether a submission may be sent right now
    pub fn allows_submit(&self) -> bool {
        !self.is_loading() && !self.threshold_not_met()
    }

    /// Text inputs are locked while the threshold is not met
    pub fn fields_disabled(&self) -> bool {
        self.threshold_not_met()
    }

    pub fn submit_control(&self, validated: bool) -> SubmitControl {
        SubmitControl {
            disabled: validated || !self.allows_submit(),
            loading: validated || self.is_loading(),
        }
    }

    /// Message key to show under the form when blocked
    pub fn message_key(&self) -> Option<String> {
        self.threshold_not_met()
            .then(|| self.kind.submission_vp_not_met_key())
    }
}

/// `0x` (either case) followed by 40 hex digits
pub fn is_ethereum_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Address whose balance is checked: a well-formed override wins over the
/// connected account
pub fn balance_address<'a>(account: &'a str, requested: Option<&'a str>) -> &'a str {
    match requested {
        Some(address) if is_ethereum_address(address) => address,
        _ => account,
    }
}
