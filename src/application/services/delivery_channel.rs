use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{JobResult, SessionKey};

pub type ListenerSender = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

struct Slot {
    id: ListenerId,
    sender: ListenerSender,
}

/// Realtime push of finished translations.
///
/// Each session key owns a single slot: registering a listener displaces
/// whichever listener held that key, pushes to an empty slot are dropped,
/// and nothing is buffered for late joiners. Sessions never see each
/// other's messages.
#[derive(Default)]
pub struct DeliveryChannel {
    slots: Mutex<HashMap<SessionKey, Slot>>,
}

impl DeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<SessionKey, Slot>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self, session: SessionKey, sender: ListenerSender) -> ListenerId {
        let id = ListenerId::new();
        let previous = self.slots().insert(session.clone(), Slot { id, sender });
        if previous.is_some() {
            tracing::debug!(session = %session, "Listener displaced by a newer registration");
        } else {
            tracing::debug!(session = %session, "Listener registered");
        }
        id
    }

    /// Clears the slot only when `id` is still the registered listener, so a
    /// late disconnect cannot evict its replacement.
    pub fn unregister(&self, session: &SessionKey, id: ListenerId) -> bool {
        let mut slots = self.slots();
        match slots.get(session) {
            Some(slot) if slot.id == id => {
                slots.remove(session);
                tracing::debug!(session = %session, "Listener unregistered");
                true
            }
            _ => false,
        }
    }

    /// Returns whether a listener accepted the message.
    pub fn push(&self, session: &SessionKey, message: String) -> bool {
        let mut slots = self.slots();
        let Some(slot) = slots.get(session) else {
            tracing::debug!(session = %session, "No listener registered, push dropped");
            return false;
        };
        if slot.sender.send(message).is_err() {
            slots.remove(session);
            tracing::debug!(session = %session, "Listener gone, slot cleared");
            return false;
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.slots().len()
    }
}

/// Wire shape of a pushed translation.
#[derive(Debug, Serialize)]
pub struct DeliveryMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub job_id: String,
    pub transcript: &'a str,
    pub translation: &'a str,
    pub target_language: &'a str,
    pub degraded: bool,
}

impl<'a> From<&'a JobResult> for DeliveryMessage<'a> {
    fn from(result: &'a JobResult) -> Self {
        Self {
            kind: "translation",
            job_id: result.job_id.to_string(),
            transcript: &result.transcript,
            translation: &result.translation,
            target_language: &result.target_language,
            degraded: result.degraded,
        }
    }
}
