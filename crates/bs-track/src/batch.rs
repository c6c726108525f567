//! Length-bounded batch accounting.
//!
//! The external command line has a platform-imposed maximum length, so the
//! dispatcher serializes work items into batches whose flattened form never
//! exceeds [`MAX_COMMAND_CHARS`]. The accounting prices every token as it
//! would appear on the flattened line: quoted, prefixed, and separated by a
//! space, on top of the fixed command prefix the batch was created with.

/// Hard upper bound on the serialized command line, prefix included.
pub const MAX_COMMAND_CHARS: usize = 32767;

/// A pending group of work items plus its running serialized length.
///
/// Scoped to one dispatch cycle: [`take`](Self::take) hands the items out
/// and resets the length back to the fixed prefix.
#[derive(Debug)]
pub struct Batch {
    items: Vec<String>,
    serialized_len: usize,
    prefix_len: usize,
}

impl Batch {
    /// Creates an empty batch whose accounting starts at the fixed command
    /// prefix length.
    #[must_use]
    pub const fn new(prefix_len: usize) -> Self {
        Self {
            items: Vec::new(),
            serialized_len: prefix_len,
            prefix_len,
        }
    }

    /// Serialized cost of one item: pattern prefix, two quotes, and the
    /// separating space.
    #[must_use]
    pub fn item_cost(item: &str, prefix: &str) -> usize {
        prefix.len() + item.len() + 3
    }

    /// Whether an item of the given cost still fits under the hard limit.
    #[must_use]
    pub const fn fits(&self, cost: usize) -> bool {
        self.serialized_len + cost <= MAX_COMMAND_CHARS
    }

    /// Appends an item whose cost was computed with [`item_cost`](Self::item_cost).
    pub fn push(&mut self, item: String, cost: usize) {
        self.serialized_len += cost;
        self.items.push(item);
    }

    /// Whether the batch holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Current serialized length, fixed prefix included.
    #[must_use]
    pub const fn serialized_len(&self) -> usize {
        self.serialized_len
    }

    /// Drains the pending items and resets the accounting for the next
    /// cycle.
    #[must_use]
    pub fn take(&mut self) -> Vec<String> {
        self.serialized_len = self.prefix_len;
        std::mem::take(&mut self.items)
    }
}
