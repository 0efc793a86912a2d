//! Workflow status for transfer requests.

use serde::{Deserialize, Serialize};

/// Workflow state of a transfer request.
///
/// A request moves forward one stage at a time:
/// `Created` -> `PendingApproval` -> `Approved` -> `Prepared` ->
/// `Delivered` -> `Confirmed`. There are no backward transitions and no
/// stage skipping; `Confirmed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Draft being assembled; the only editable state.
    #[default]
    Created,
    /// Submitted, waiting in the approval queue.
    PendingApproval,
    /// Approved, waiting to be picked in the warehouse.
    Approved,
    /// Picked and packed, waiting for delivery.
    Prepared,
    /// Handed over, waiting for the receiver's confirmation.
    Delivered,
    /// Receipt confirmed. Terminal.
    Confirmed,
}

impl RequestStatus {
    /// Spanish UI label, as shown in status badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Creada",
            Self::PendingApproval => "Por Aprobar",
            Self::Approved => "Aprobada",
            Self::Prepared => "Alistada",
            Self::Delivered => "Entregada",
            Self::Confirmed => "Confirmada",
        }
    }

    /// The next stage in the workflow, or `None` once terminal.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Created => Some(Self::PendingApproval),
            Self::PendingApproval => Some(Self::Approved),
            Self::Approved => Some(Self::Prepared),
            Self::Prepared => Some(Self::Delivered),
            Self::Delivered => Some(Self::Confirmed),
            Self::Confirmed => None,
        }
    }

    /// Whether `target` is the legal next stage from this one.
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::PendingApproval => write!(f, "pending_approval"),
            Self::Approved => write!(f, "approved"),
            Self::Prepared => write!(f, "prepared"),
            Self::Delivered => write!(f, "delivered"),
            Self::Confirmed => write!(f, "confirmed"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            "prepared" => Ok(Self::Prepared),
            "delivered" => Ok(Self::Delivered),
            "confirmed" => Ok(Self::Confirmed),
            _ => Err(format!("invalid request status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn workflow_advances_one_stage_at_a_time() {
        let mut status = RequestStatus::Created;
        let expected = [
            RequestStatus::PendingApproval,
            RequestStatus::Approved,
            RequestStatus::Prepared,
            RequestStatus::Delivered,
            RequestStatus::Confirmed,
        ];
        for stage in expected {
            assert!(status.can_advance_to(stage));
            status = status.next().unwrap();
            assert_eq!(status, stage);
        }
        assert!(status.is_terminal());
        assert_eq!(status.next(), None);
    }

    #[test]
    fn cannot_skip_stages() {
        assert!(!RequestStatus::Created.can_advance_to(RequestStatus::Approved));
        assert!(!RequestStatus::PendingApproval.can_advance_to(RequestStatus::Delivered));
        // No backward transitions either
        assert!(!RequestStatus::Approved.can_advance_to(RequestStatus::PendingApproval));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for status in [
            RequestStatus::Created,
            RequestStatus::PendingApproval,
            RequestStatus::Approved,
            RequestStatus::Prepared,
            RequestStatus::Delivered,
            RequestStatus::Confirmed,
        ] {
            let parsed: RequestStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
