//! In-memory request store.
//!
//! Owns every draft and submitted request for the lifetime of the process.
//! The store wraps the pure cart/workflow logic from `almacen-core` with
//! locking and the autosave notification: each successful mutation fires
//! the hook exactly once, after the lock is released.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;

use almacen_core::{
    CompanyCode, ItemId, LineItem, RequestCode, RequestStatus, TransferRequest, WarehouseCode,
    WorkflowError,
};

use crate::catalog::Catalog;
use crate::services::AutosaveHook;

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No request with that code exists.
    #[error("unknown request: {0}")]
    UnknownRequest(RequestCode),

    /// The request left the draft state and can no longer be edited.
    #[error("request {0} is no longer editable")]
    NotEditable(RequestCode),

    /// The request is not in the stage a queue action expected.
    #[error("request {code} is not in the {expected} stage")]
    StageMismatch {
        code: RequestCode,
        expected: RequestStatus,
    },

    /// A workflow transition was rejected.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Fields a draft's header form can change.
#[derive(Debug, Clone)]
pub struct HeaderUpdate {
    pub company: CompanyCode,
    pub origin_warehouse: Option<WarehouseCode>,
    pub destination_warehouse: Option<WarehouseCode>,
    pub project: Option<String>,
    pub work_order: Option<String>,
    pub observations: String,
}

/// Shared, in-memory collection of transfer requests.
pub struct RequestStore {
    requests: RwLock<HashMap<RequestCode, TransferRequest>>,
    autosave: Arc<dyn AutosaveHook>,
}

impl RequestStore {
    /// Create an empty store with the given autosave collaborator.
    #[must_use]
    pub fn new(autosave: Arc<dyn AutosaveHook>) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            autosave,
        }
    }

    /// Create a new draft and return its code.
    ///
    /// Codes are random four-digit numbers, re-rolled on collision.
    pub async fn create_draft(
        &self,
        company: CompanyCode,
        created_by: impl Into<String>,
    ) -> RequestCode {
        let mut requests = self.requests.write().await;
        let code = loop {
            let candidate = RequestCode::new(rand::rng().random_range(1000..=9999));
            if !requests.contains_key(&candidate) {
                break candidate;
            }
        };
        let draft = TransferRequest::draft(code, company, created_by, Utc::now());
        requests.insert(code, draft);
        drop(requests);

        tracing::info!(request = %code, "draft created");
        code
    }

    /// Fetch a snapshot of one request.
    pub async fn get(&self, code: RequestCode) -> Option<TransferRequest> {
        self.requests.read().await.get(&code).cloned()
    }

    /// All requests currently in the given stage, oldest first.
    pub async fn list_by_status(&self, status: RequestStatus) -> Vec<TransferRequest> {
        let requests = self.requests.read().await;
        let mut matching: Vec<TransferRequest> = requests
            .values()
            .filter(|request| request.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|request| (request.created_at, request.code));
        matching
    }

    /// Number of requests in the given stage.
    pub async fn count_by_status(&self, status: RequestStatus) -> usize {
        self.requests
            .read()
            .await
            .values()
            .filter(|request| request.status == status)
            .count()
    }

    /// Add a candidate line item to a draft's cart.
    pub async fn add_item(&self, code: RequestCode, item: LineItem) -> Result<(), StoreError> {
        self.with_editable(code, |request| request.cart.add_item(item))
            .await
    }

    /// Update a quantity in a draft's cart.
    pub async fn update_quantity(
        &self,
        code: RequestCode,
        item: &ItemId,
        raw: i64,
        sub_index: Option<usize>,
    ) -> Result<(), StoreError> {
        self.with_editable(code, |request| {
            request.cart.update_quantity(item, raw, sub_index);
        })
        .await
    }

    /// Remove a line item from a draft's cart.
    pub async fn remove_item(&self, code: RequestCode, item: &ItemId) -> Result<(), StoreError> {
        self.with_editable(code, |request| request.cart.remove_item(item))
            .await
    }

    /// Apply header-form changes to a draft.
    pub async fn update_header(
        &self,
        code: RequestCode,
        update: HeaderUpdate,
    ) -> Result<(), StoreError> {
        self.with_editable(code, |request| {
            request.company = update.company;
            request.origin_warehouse = update.origin_warehouse;
            request.destination_warehouse = update.destination_warehouse;
            request.project = update.project;
            request.work_order = update.work_order;
            request.observations = update.observations;
        })
        .await
    }

    /// Submit a draft into the approval queue.
    pub async fn submit(&self, code: RequestCode) -> Result<(), StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&code)
            .ok_or(StoreError::UnknownRequest(code))?;
        request.submit()?;
        drop(requests);

        tracing::info!(request = %code, "request submitted for approval");
        self.autosave.request_changed(code);
        Ok(())
    }

    /// Advance a request one workflow stage, checking it currently sits in
    /// the stage the queue page expected.
    pub async fn advance(
        &self,
        code: RequestCode,
        expected: RequestStatus,
    ) -> Result<RequestStatus, StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&code)
            .ok_or(StoreError::UnknownRequest(code))?;
        if request.status != expected {
            return Err(StoreError::StageMismatch { code, expected });
        }
        let next = request.advance()?;
        drop(requests);

        tracing::info!(request = %code, status = %next, "request advanced");
        self.autosave.request_changed(code);
        Ok(next)
    }

    /// Discard a request entirely. Idempotent.
    pub async fn delete(&self, code: RequestCode) {
        if self.requests.write().await.remove(&code).is_some() {
            tracing::info!(request = %code, "request discarded");
        }
    }

    /// Run a mutation against an editable draft, then fire autosave.
    async fn with_editable(
        &self,
        code: RequestCode,
        mutate: impl FnOnce(&mut TransferRequest),
    ) -> Result<(), StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&code)
            .ok_or(StoreError::UnknownRequest(code))?;
        if !request.is_editable() {
            return Err(StoreError::NotEditable(code));
        }
        mutate(request);
        drop(requests);

        self.autosave.request_changed(code);
        Ok(())
    }

    /// Seed a handful of submitted requests so the workflow queues are not
    /// empty on a fresh start.
    pub async fn seed_demo(&self, catalog: &Catalog) {
        let seeds = [
            (1245, "CABRENES", "ALM001", "ALM004", "54354", "1", 2, RequestStatus::PendingApproval),
            (1832, "MRODRIGUEZ", "ALM002", "ALM005", "54360", "3", 4, RequestStatus::PendingApproval),
            (2087, "CABRENES", "ALM001", "ALM003", "54371", "2", 1, RequestStatus::Approved),
            (2456, "LVARGAS", "ALM003", "ALM004", "54377", "5", 1, RequestStatus::Prepared),
            (2761, "MRODRIGUEZ", "ALM002", "ALM001", "54389", "7", 3, RequestStatus::Delivered),
        ];

        let mut requests = self.requests.write().await;
        for (code, creator, origin, destination, project, item_id, quantity, status) in seeds {
            let code = RequestCode::new(code);
            let mut request =
                TransferRequest::draft(code, CompanyCode::new("CPL"), creator, Utc::now());
            request.origin_warehouse = Some(WarehouseCode::new(origin));
            request.destination_warehouse = Some(WarehouseCode::new(destination));
            request.project = Some(project.to_string());
            if let Some(entry) = catalog.get(&ItemId::new(item_id)) {
                request
                    .cart
                    .add_item(entry.to_line_item(almacen_core::Quantity::clamp(quantity)));
            }
            request.status = status;
            requests.insert(code, request);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHook(AtomicUsize);

    impl AutosaveHook for CountingHook {
        fn request_changed(&self, _code: RequestCode) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn store_with_counter() -> (RequestStore, Arc<CountingHook>) {
        let hook = Arc::new(CountingHook(AtomicUsize::new(0)));
        (RequestStore::new(hook.clone()), hook)
    }

    fn simple_item(id: &str, quantity: i64) -> LineItem {
        LineItem::simple(
            id,
            "2-1065",
            "2-1065",
            "GANCHO S PARA HERRAJE DE...",
            Some(96),
            almacen_core::Quantity::clamp(quantity),
        )
    }

    #[tokio::test]
    async fn autosave_fires_once_per_mutation() {
        let (store, hook) = store_with_counter();
        let code = store.create_draft(CompanyCode::new("CPL"), "RCHAVARRIA").await;

        store.add_item(code, simple_item("1", 2)).await.unwrap();
        store
            .update_quantity(code, &ItemId::new("1"), 5, None)
            .await
            .unwrap();
        store.remove_item(code, &ItemId::new("1")).await.unwrap();

        assert_eq!(hook.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cart_edits_are_rejected_after_submission() {
        let (store, _) = store_with_counter();
        let code = store.create_draft(CompanyCode::new("CPL"), "RCHAVARRIA").await;
        store.add_item(code, simple_item("1", 2)).await.unwrap();
        store.submit(code).await.unwrap();

        let result = store.add_item(code, simple_item("1", 1)).await;
        assert_eq!(result, Err(StoreError::NotEditable(code)));
    }

    #[tokio::test]
    async fn submitting_an_empty_draft_fails() {
        let (store, hook) = store_with_counter();
        let code = store.create_draft(CompanyCode::new("CPL"), "RCHAVARRIA").await;

        let result = store.submit(code).await;
        assert_eq!(
            result,
            Err(StoreError::Workflow(WorkflowError::EmptyCart))
        );
        assert_eq!(hook.0.load(Ordering::SeqCst), 0, "failed submit must not autosave");
    }

    #[tokio::test]
    async fn advance_requires_the_expected_stage() {
        let (store, _) = store_with_counter();
        let code = store.create_draft(CompanyCode::new("CPL"), "RCHAVARRIA").await;
        store.add_item(code, simple_item("1", 2)).await.unwrap();
        store.submit(code).await.unwrap();

        // The delivery queue cannot touch a request still pending approval.
        let result = store.advance(code, RequestStatus::Prepared).await;
        assert_eq!(
            result,
            Err(StoreError::StageMismatch {
                code,
                expected: RequestStatus::Prepared
            })
        );

        let next = store
            .advance(code, RequestStatus::PendingApproval)
            .await
            .unwrap();
        assert_eq!(next, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _) = store_with_counter();
        let code = store.create_draft(CompanyCode::new("CPL"), "RCHAVARRIA").await;

        store.delete(code).await;
        store.delete(code).await;
        assert!(store.get(code).await.is_none());
    }

    #[tokio::test]
    async fn seed_demo_populates_the_queues() {
        let (store, _) = store_with_counter();
        store.seed_demo(&Catalog::seed()).await;

        assert_eq!(
            store.count_by_status(RequestStatus::PendingApproval).await,
            2
        );
        assert_eq!(store.count_by_status(RequestStatus::Approved).await, 1);
        assert_eq!(store.count_by_status(RequestStatus::Prepared).await, 1);
        assert_eq!(store.count_by_status(RequestStatus::Delivered).await, 1);
    }
}
