//! Transfer-request header and workflow transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::RequestCart;
use crate::types::{CompanyCode, RequestCode, RequestStatus, WarehouseCode};

/// Errors for illegal workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// A request cannot be submitted without at least one line item.
    #[error("cannot submit a request with no line items")]
    EmptyCart,

    /// Submission is only possible from the draft state.
    #[error("request was already submitted (status: {0})")]
    AlreadySubmitted(RequestStatus),

    /// The workflow has no stage after `Confirmed`.
    #[error("request is already confirmed; no further transitions")]
    Terminal,
}

/// One material-transfer request: header data, the item cart, and the
/// workflow state.
///
/// Header fields mirror the request form: warehouses and project are
/// chosen while drafting, creator and creation time are fixed, and the
/// status only moves through [`submit`](Self::submit) and
/// [`advance`](Self::advance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Four-digit request code, unique per store.
    pub code: RequestCode,
    /// Request type, e.g. "Solicitud de materiales".
    pub request_type: String,
    /// Owning company.
    pub company: CompanyCode,
    /// Warehouse the material is drawn from.
    pub origin_warehouse: Option<WarehouseCode>,
    /// Warehouse the material is delivered to.
    pub destination_warehouse: Option<WarehouseCode>,
    /// Project number, free-form.
    pub project: Option<String>,
    /// Associated work order.
    pub work_order: Option<String>,
    /// Free-form remarks.
    pub observations: String,
    /// Username of the creator.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Current workflow state.
    pub status: RequestStatus,
    /// Selected line items.
    pub cart: RequestCart,
}

impl TransferRequest {
    /// Create a fresh draft.
    #[must_use]
    pub fn draft(
        code: RequestCode,
        company: CompanyCode,
        created_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            request_type: "Solicitud de materiales".to_string(),
            company,
            origin_warehouse: None,
            destination_warehouse: None,
            project: None,
            work_order: None,
            observations: String::new(),
            created_by: created_by.into(),
            created_at,
            status: RequestStatus::Created,
            cart: RequestCart::new(),
        }
    }

    /// Whether the request is still an editable draft.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == RequestStatus::Created
    }

    /// Submit the draft into the approval queue.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptyCart`] when no items were selected and
    /// [`WorkflowError::AlreadySubmitted`] when the request already left
    /// the draft state.
    pub fn submit(&mut self) -> Result<(), WorkflowError> {
        if self.status != RequestStatus::Created {
            return Err(WorkflowError::AlreadySubmitted(self.status));
        }
        if self.cart.is_empty() {
            return Err(WorkflowError::EmptyCart);
        }
        self.status = RequestStatus::PendingApproval;
        Ok(())
    }

    /// Move the request one stage forward.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Terminal`] once the request is confirmed.
    pub fn advance(&mut self) -> Result<RequestStatus, WorkflowError> {
        let next = self.status.next().ok_or(WorkflowError::Terminal)?;
        self.status = next;
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::types::Quantity;

    fn draft_with_item() -> TransferRequest {
        let mut request = TransferRequest::draft(
            RequestCode::new(2351),
            CompanyCode::new("CPL"),
            "RCHAVARRIA",
            Utc::now(),
        );
        request.cart.add_item(LineItem::simple(
            "3",
            "2-2140",
            "2-2140",
            "POSTES DE MADERA 25 PIES,...",
            Some(125),
            Quantity::clamp(2),
        ));
        request
    }

    #[test]
    fn empty_draft_cannot_be_submitted() {
        let mut request = TransferRequest::draft(
            RequestCode::new(1000),
            CompanyCode::new("CPL"),
            "RCHAVARRIA",
            Utc::now(),
        );
        assert_eq!(request.submit(), Err(WorkflowError::EmptyCart));
        assert_eq!(request.status, RequestStatus::Created);
    }

    #[test]
    fn submit_moves_to_pending_approval_once() {
        let mut request = draft_with_item();
        request.submit().unwrap();
        assert_eq!(request.status, RequestStatus::PendingApproval);
        assert!(!request.is_editable());

        assert_eq!(
            request.submit(),
            Err(WorkflowError::AlreadySubmitted(
                RequestStatus::PendingApproval
            ))
        );
    }

    #[test]
    fn advance_walks_the_whole_workflow_then_stops() {
        let mut request = draft_with_item();
        request.submit().unwrap();

        assert_eq!(request.advance().unwrap(), RequestStatus::Approved);
        assert_eq!(request.advance().unwrap(), RequestStatus::Prepared);
        assert_eq!(request.advance().unwrap(), RequestStatus::Delivered);
        assert_eq!(request.advance().unwrap(), RequestStatus::Confirmed);
        assert_eq!(request.advance(), Err(WorkflowError::Terminal));
    }
}
