use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Tracks chats with a generation request outstanding so overlapping
/// submissions for the same chat are rejected instead of racing against the
/// service independently.
#[derive(Default)]
pub struct InflightChats {
    inner: Mutex<HashSet<String>>,
}

impl InflightChats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark a chat as busy. Returns None when a request for this chat is
    /// already in flight.
    pub fn try_begin(chats: &Arc<Self>, chat_id: &str) -> Option<InflightGuard> {
        let mut inner = chats.inner.lock().expect("inflight set poisoned");
        if !inner.insert(chat_id.to_string()) {
            return None;
        }
        Some(InflightGuard {
            chats: Arc::clone(chats),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn is_busy(&self, chat_id: &str) -> bool {
        self.inner
            .lock()
            .expect("inflight set poisoned")
            .contains(chat_id)
    }
}

/// Releases the chat id when dropped, on every exit path of the handler.
pub struct InflightGuard {
    chats: Arc<InflightChats>,
    chat_id: String,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.chats
            .inner
            .lock()
            .expect("inflight set poisoned")
            .remove(&self.chat_id);
    }
}
