//! Conversation Memory
//!
//! Bounded, per-user conversation history used to build the context window
//! for the next upstream call. Each user's history is truncated to the most
//! recent `window` entries on every append (FIFO eviction), and the number
//! of tracked users is itself capped: creating a conversation beyond the
//! cap evicts the least-recently-active user.
//!
//! The store is shared across all inbound messages; a single interior lock
//! serializes appends, so same-user appends are last-write-consistent and
//! different users never interfere. Content is never persisted and is lost
//! on restart.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;

use crate::llm::Message;

/// Default number of messages kept per user
pub const DEFAULT_WINDOW: usize = 8;

/// Default number of users tracked before least-recently-active eviction
pub const DEFAULT_MAX_CONVERSATIONS: usize = 1024;

#[derive(Debug)]
struct Conversation {
    messages: VecDeque<Message>,
    last_active: Instant,
}

/// Bounded per-user conversation store
#[derive(Debug)]
pub struct ConversationMemory {
    inner: Mutex<HashMap<i64, Conversation>>,
    window: usize,
    max_conversations: usize,
}

impl ConversationMemory {
    /// Create a store with the default limits
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_WINDOW, DEFAULT_MAX_CONVERSATIONS)
    }

    /// Create a store with specific limits
    ///
    /// Both limits must be at least 1; they are clamped rather than
    /// rejected since config validation already reports zero values.
    pub fn with_limits(window: usize, max_conversations: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            window: window.max(1),
            max_conversations: max_conversations.max(1),
        }
    }

    /// Number of messages kept per user
    pub fn window_size(&self) -> usize {
        self.window
    }

    /// Append a message to a user's conversation, creating it if absent.
    ///
    /// After the append the conversation holds at most `window` messages,
    /// oldest dropped first.
    pub fn append(&self, user_id: i64, message: Message) {
        let mut conversations = self.inner.lock().expect("conversation memory lock poisoned");

        if !conversations.contains_key(&user_id) && conversations.len() >= self.max_conversations {
            Self::evict_least_active(&mut conversations);
        }

        let conversation = conversations.entry(user_id).or_insert_with(|| Conversation {
            messages: VecDeque::new(),
            last_active: Instant::now(),
        });

        conversation.messages.push_back(message);
        while conversation.messages.len() > self.window {
            conversation.messages.pop_front();
        }
        conversation.last_active = Instant::now();
    }

    /// Current ordered window for a user (empty if the user is unknown)
    pub fn window(&self, user_id: i64) -> Vec<Message> {
        let conversations = self.inner.lock().expect("conversation memory lock poisoned");
        conversations
            .get(&user_id)
            .map(|c| c.messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn evict_least_active(conversations: &mut HashMap<i64, Conversation>) {
        let oldest = conversations
            .iter()
            .min_by_key(|(_, c)| c.last_active)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            conversations.remove(&id);
        }
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_is_empty() {
        let memory = ConversationMemory::new();
        assert_eq!(memory.window_size(), DEFAULT_WINDOW);
        assert!(memory.window(1).is_empty());
    }

    #[test]
    fn test_append_creates_conversation_lazily() {
        let memory = ConversationMemory::new();
        assert!(memory.window(42).is_empty());

        memory.append(42, Message::user("hello"));
        let window = memory.window(42);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].content, "hello");
    }

    #[test]
    fn test_window_never_exceeds_bound() {
        let memory = ConversationMemory::with_limits(3, 16);

        for i in 0..10 {
            memory.append(1, Message::user(format!("msg {}", i)));
            assert!(memory.window(1).len() <= 3);
        }
    }

    #[test]
    fn test_fifo_eviction_keeps_most_recent() {
        let memory = ConversationMemory::with_limits(3, 16);

        for i in 0..5 {
            memory.append(1, Message::user(format!("msg {}", i)));
        }

        let window = memory.window(1);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "msg 2");
        assert_eq!(window[1].content, "msg 3");
        assert_eq!(window[2].content, "msg 4");
    }

    #[test]
    fn test_users_are_isolated() {
        let memory = ConversationMemory::with_limits(2, 16);

        memory.append(1, Message::user("from one"));
        memory.append(2, Message::user("from two"));
        memory.append(1, Message::assistant("to one"));

        let one = memory.window(1);
        let two = memory.window(2);
        assert_eq!(one.len(), 2);
        assert_eq!(two.len(), 1);
        assert_eq!(two[0].content, "from two");
    }

    #[test]
    fn test_least_active_conversation_evicted_at_cap() {
        let memory = ConversationMemory::with_limits(4, 2);

        memory.append(1, Message::user("first"));
        memory.append(2, Message::user("second"));
        // Touch user 1 so user 2 becomes the least recently active
        memory.append(1, Message::user("again"));

        memory.append(3, Message::user("third"));

        assert!(memory.window(2).is_empty());
        assert_eq!(memory.window(1).len(), 2);
        assert_eq!(memory.window(3).len(), 1);
    }

    #[test]
    fn test_zero_window_clamped() {
        let memory = ConversationMemory::with_limits(0, 0);
        memory.append(1, Message::user("hello"));
        assert_eq!(memory.window(1).len(), 1);
    }
}
