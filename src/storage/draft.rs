//! Draft storage: best-effort persistence of dialogue progress.
//!
//! The draft lives in a single slot of a [`SessionStore`]. Every operation
//! here swallows storage failures: a draft that cannot be written, read or
//! removed is logged at debug level and otherwise treated as absent, so the
//! chat never shows them. Drafts that fail to
//! parse or are older than the freshness window are removed on sight so the
//! next session does not trip over them again.

use jiff::Timestamp;
use tracing::{debug, info};

use crate::model::{DialogueState, DraftRecord};

use super::{SessionStore, StorageError};

/// Slot the draft is stored under.
pub const DRAFT_KEY: &str = "casebot-case-draft-v2";

/// Drafts older than this are discarded: 24 hours.
pub const FRESHNESS_MS: i64 = 24 * 60 * 60 * 1000;

/// Draft persistence over an optional session store.
///
/// With no store (the capability is unavailable) every operation is a no-op.
pub struct DraftStore<S> {
    store: Option<S>,
}

impl<S: SessionStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    /// A draft store with no backing storage.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Snapshots `state` for `page`, stamped now.
    pub fn save(&self, state: &DialogueState, page: &str) {
        self.save_at(state, page, Timestamp::now());
    }

    pub fn save_at(&self, state: &DialogueState, page: &str, at: Timestamp) {
        let Some(store) = &self.store else {
            return;
        };
        let record = DraftRecord::capture(state, page, at);
        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|json| store.set(DRAFT_KEY, &json));
        match result {
            Ok(()) => debug!(step = state.step_index, ready = state.ready_to_submit, "draft saved"),
            Err(e) => debug!(error = %e, "failed to save draft"),
        }
    }

    /// The stored draft, if one exists and is still fresh.
    pub fn load(&self) -> Option<DraftRecord> {
        self.load_at(Timestamp::now())
    }

    pub fn load_at(&self, now: Timestamp) -> Option<DraftRecord> {
        let store = self.store.as_ref()?;

        let raw = match store.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "failed to read draft");
                self.clear();
                return None;
            }
        };

        let record: DraftRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                info!(error = %e, "discarding malformed draft");
                self.clear();
                return None;
            }
        };

        let age_ms = record.age_ms(now);
        if age_ms > FRESHNESS_MS {
            info!(age_ms, "discarding expired draft");
            self.clear();
            return None;
        }

        Some(record)
    }

    /// Removes the stored draft.
    pub fn clear(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.delete(DRAFT_KEY) {
            debug!(error = %e, "failed to clear draft");
        }
    }
}
