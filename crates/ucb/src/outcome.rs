//! Result types produced by a finished (or interrupted) run.

use std::fmt;

/// Resolution state of one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmStatus {
    /// Still competing for a place in the top set.
    Active,
    /// Confidently inside the top set.
    Accepted,
    /// Confidently outside the top set.
    Rejected,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The top set is separated from the rest with confidence `1 − δ`.
    Confirmed,
    /// The pull budget ran out first. The ranking is best-effort.
    BudgetExhausted,
    /// A [`CancelToken`](crate::CancelToken) stopped the run between rounds.
    Cancelled,
    /// No pullable arm straddles the cut.
    Unresolved,
}

impl RunStatus {
    /// `true` only for [`RunStatus::Confirmed`].
    pub fn is_confirmed(self) -> bool {
        self == RunStatus::Confirmed
    }

    /// Name used in logs and report files.
    pub fn name(self) -> &'static str {
        match self {
            RunStatus::Confirmed => "Confirmed",
            RunStatus::BudgetExhausted => "BudgetExhausted",
            RunStatus::Cancelled => "Cancelled",
            RunStatus::Unresolved => "Unresolved",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final state of one arm.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmSummary {
    /// Candidate index.
    pub id: usize,
    /// Pulls spent on this arm.
    pub pulls: u64,
    /// Mean estimate.
    pub estimate: f64,
    /// Lower confidence bound.
    pub lcb: f64,
    /// Upper confidence bound.
    pub ucb: f64,
    /// Resolution state at the end of the run.
    pub status: ArmStatus,
}

/// Everything the engine reports about a run.
///
/// `arms` is in final ranked order: accepted arms first, then the still
/// active ones, then rejected ones, each group by ascending estimate with
/// ties broken by id.
#[derive(Debug, Clone, PartialEq)]
pub struct UcbOutcome {
    arms: Vec<ArmSummary>,
    global_pulls: u64,
    rounds: u64,
    sigma: f64,
    status: RunStatus,
}

impl UcbOutcome {
    pub(crate) fn new(
        arms: Vec<ArmSummary>,
        global_pulls: u64,
        rounds: u64,
        sigma: f64,
        status: RunStatus,
    ) -> Self {
        Self {
            arms,
            global_pulls,
            rounds,
            sigma,
            status,
        }
    }

    /// Arm summaries in ranked order.
    pub fn arms(&self) -> &[ArmSummary] {
        &self.arms
    }

    /// Arm ids in ranked order.
    pub fn ranking(&self) -> Vec<usize> {
        self.arms.iter().map(|a| a.id).collect()
    }

    /// The first `n` ranked arms (fewer if there are not enough arms).
    pub fn top(&self, n: usize) -> &[ArmSummary] {
        &self.arms[..n.min(self.arms.len())]
    }

    /// Ids of the first `n` ranked arms.
    pub fn top_ids(&self, n: usize) -> Vec<usize> {
        self.top(n).iter().map(|a| a.id).collect()
    }

    /// Total pulls across all arms.
    pub fn global_pulls(&self) -> u64 {
        self.global_pulls
    }

    /// Average pulls per arm.
    pub fn average_pulls(&self) -> f64 {
        if self.arms.is_empty() {
            return 0.0;
        }
        self.global_pulls as f64 / self.arms.len() as f64
    }

    /// Number of adaptive rounds run.
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Pooled per-pull standard deviation at the end of the run.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// How the run ended.
    pub fn status(&self) -> RunStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: usize, pulls: u64) -> ArmSummary {
        ArmSummary {
            id,
            pulls,
            estimate: id as f64,
            lcb: id as f64,
            ucb: id as f64,
            status: ArmStatus::Active,
        }
    }

    #[test]
    fn test_top_and_ranking() {
        let outcome = UcbOutcome::new(
            vec![summary(3, 4), summary(1, 2), summary(0, 6)],
            12,
            5,
            0.5,
            RunStatus::Confirmed,
        );
        assert_eq!(outcome.ranking(), vec![3, 1, 0]);
        assert_eq!(outcome.top_ids(2), vec![3, 1]);
        assert_eq!(outcome.top(10).len(), 3);
        assert!((outcome.average_pulls() - 4.0).abs() < 1e-12);
        assert!(outcome.status().is_confirmed());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::Confirmed.to_string(), "Confirmed");
        assert_eq!(RunStatus::BudgetExhausted.to_string(), "BudgetExhausted");
        assert_eq!(RunStatus::Cancelled.to_string(), "Cancelled");
        assert_eq!(RunStatus::Unresolved.to_string(), "Unresolved");
        assert!(!RunStatus::Cancelled.is_confirmed());
    }
}
