use std::collections::VecDeque;
use std::sync::RwLock;

/// Bounded feed of device status lines shown on the dashboard. Oldest
/// entries fall off the front once the capacity is reached.
pub struct MessageService {
    capacity: usize,
    messages: RwLock<VecDeque<String>>,
}

impl MessageService {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");

        let mut messages = self.messages.write().expect("message feed lock poisoned");
        if messages.len() == self.capacity {
            messages.pop_front();
        }
        messages.push_back(message);
    }

    /// Messages in chronological order.
    pub fn recent(&self) -> Vec<String> {
        self.messages
            .read()
            .expect("message feed lock poisoned")
            .iter()
            .cloned()
            .collect()
    }
}
