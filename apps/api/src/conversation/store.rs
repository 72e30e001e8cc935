use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::conversation::state::ConversationState;

pub type ConversationHandle = Arc<Mutex<ConversationState>>;

/// In-memory conversations keyed by id.
///
/// Each conversation sits behind its own mutex: a turn holds it for the whole
/// interpret-and-update step, so turns of one conversation run one at a time
/// while different conversations proceed independently.
#[derive(Clone)]
pub struct ConversationStore {
    inner: Arc<RwLock<HashMap<Uuid, Entry>>>,
    capacity: usize,
}

struct Entry {
    handle: ConversationHandle,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl ConversationStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Stores a conversation. When full, evicts the least recently updated
    /// conversation that has no turn in flight.
    pub async fn insert(&self, state: ConversationState) -> ConversationHandle {
        let id = state.id();
        let created_at = state.created_at();
        let handle = Arc::new(Mutex::new(state));

        let mut map = self.inner.write().await;
        if map.len() >= self.capacity {
            if let Some(victim) = eviction_candidate(&map) {
                map.remove(&victim);
                info!("Conversation store full; evicted conversation {victim}");
            }
        }
        map.insert(
            id,
            Entry {
                handle: handle.clone(),
                created_at,
            },
        );
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<ConversationHandle> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|entry| entry.handle.clone())
    }

    /// Discards a conversation. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Idle conversations are locked briefly to read their last update. If every
/// conversation is mid-turn, the earliest created one goes.
fn eviction_candidate(map: &HashMap<Uuid, Entry>) -> Option<Uuid> {
    map.iter()
        .filter_map(|(id, entry)| {
            entry
                .handle
                .try_lock()
                .ok()
                .map(|state| (*id, state.updated_at()))
        })
        .min_by_key(|(_, updated_at)| *updated_at)
        .map(|(id, _)| id)
        .or_else(|| {
            map.iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(id, _)| *id)
        })
}
