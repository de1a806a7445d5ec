//! Rolling chat log kept on the consumer side.

use std::collections::VecDeque;

use rallypoint_protocol::ChatMessage;

/// Number of lines kept by [`ChatHistory::default`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A bounded, oldest-first log of the chat lines a consumer has drained.
///
/// Feed it the output of each [`drain`](crate::ChatClient::drain); once full,
/// every new line evicts the oldest one.
///
/// ```rust
/// use rallypoint::ChatHistory;
/// use rallypoint::prelude::ChatMessage;
///
/// let mut history = ChatHistory::new(2);
/// history.extend([
///     ChatMessage::new("bob", "one"),
///     ChatMessage::new("alice", "two"),
///     ChatMessage::new("bob", "three"),
/// ]);
/// assert_eq!(history.render("alice"), ["You: two", "bob: three"]);
/// ```
#[derive(Debug, Clone)]
pub struct ChatHistory {
    entries: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatHistory {
    /// Creates a log holding at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one line, evicting the oldest if full.
    pub fn push(&mut self, message: ChatMessage) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    /// Lines currently held, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no lines are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of lines kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every line, keeping the capacity.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Formats the log for display, oldest first.
    ///
    /// Lines sent by `me` are attributed to `You`; lines with no sender (raw
    /// text dialect) are shown bare.
    pub fn render(&self, me: &str) -> Vec<String> {
        self.entries
            .iter()
            .map(|msg| match msg.sender_name() {
                "" => msg.message().to_string(),
                name if name == me => format!("You: {}", msg.message()),
                name => format!("{name}: {}", msg.message()),
            })
            .collect()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl Extend<ChatMessage> for ChatHistory {
    fn extend<I: IntoIterator<Item = ChatMessage>>(&mut self, iter: I) {
        for message in iter {
            self.push(message);
        }
    }
}
