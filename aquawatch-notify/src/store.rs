//! Bounded in-process notification store.
//!
//! Durable persistence is an external collaborator; this is the in-memory
//! view the boundary layer reads. Oldest entries are evicted at capacity.

use aquawatch_engine::RiskLevel;
use parking_lot::RwLock;

use crate::error::{NotifyError, NotifyResult};
use crate::trigger::NotificationDraft;

/// A stored, user-facing notification.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub risk_level: RiskLevel,
    pub previous_risk_level: RiskLevel,
    pub read: bool,
    /// Unix timestamp (millis)
    pub created_at: i64,
}

struct StoreState {
    items: Vec<Notification>,
    next_id: u64,
}

/// Capacity-bounded notification store.
pub struct NotificationStore {
    state: RwLock<StoreState>,
    capacity: usize,
}

impl NotificationStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(StoreState { items: Vec::new(), next_id: 1 }),
            capacity,
        }
    }

    /// Persist a draft, assigning an id and creation time.
    pub fn add(&self, draft: NotificationDraft, now_ms: i64) -> Notification {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        let notification = Notification {
            id,
            title: draft.title,
            message: draft.message,
            risk_level: draft.risk_level,
            previous_risk_level: draft.previous_risk_level,
            read: false,
            created_at: now_ms,
        };
        if state.items.len() >= self.capacity {
            state.items.remove(0);
        }
        state.items.push(notification.clone());
        notification
    }

    /// Up to `limit` notifications, newest first.
    pub fn all(&self, limit: usize) -> Vec<Notification> {
        let state = self.state.read();
        state.items.iter().rev().take(limit).cloned().collect()
    }

    /// Unread notifications, newest first.
    pub fn unread(&self) -> Vec<Notification> {
        let state = self.state.read();
        state.items.iter().rev().filter(|n| !n.read).cloned().collect()
    }

    pub fn unread_count(&self) -> usize {
        self.state.read().items.iter().filter(|n| !n.read).count()
    }

    pub fn get(&self, id: u64) -> NotifyResult<Notification> {
        self.state
            .read()
            .items
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(NotifyError::NotFound(id))
    }

    /// Mark one notification read, returning the updated entry.
    pub fn mark_read(&self, id: u64) -> NotifyResult<Notification> {
        let mut state = self.state.write();
        match state.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                Ok(n.clone())
            }
            None => Err(NotifyError::NotFound(id)),
        }
    }

    /// Mark everything read, returning how many changed.
    pub fn mark_all_read(&self) -> usize {
        let mut state = self.state.write();
        let mut changed = 0;
        for n in state.items.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    /// Delete by id; `false` when absent.
    pub fn delete(&self, id: u64) -> bool {
        let mut state = self.state.write();
        let before = state.items.len();
        state.items.retain(|n| n.id != id);
        state.items.len() != before
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }
}
