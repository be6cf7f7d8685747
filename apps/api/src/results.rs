//! In-memory result store keyed by request id.
//!
//! Every submission gets its own slot, so concurrent callers never read each
//! other's results. Capacity is bounded; the oldest entries are evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::result::StoredResult;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, StoredResult>,
    order: VecDeque<Uuid>,
}

#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<RwLock<Inner>>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, result: StoredResult) {
        let mut inner = self.inner.write().await;

        while inner.order.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.by_id.remove(&oldest);
            }
        }

        inner.order.push_back(result.request_id);
        inner.by_id.insert(result.request_id, result);
    }

    pub async fn get(&self, request_id: Uuid) -> Option<StoredResult> {
        self.inner.read().await.by_id.get(&request_id).cloned()
    }

    /// Most recently inserted result still held.
    pub async fn latest(&self) -> Option<StoredResult> {
        let inner = self.inner.read().await;
        inner
            .order
            .back()
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }
}
