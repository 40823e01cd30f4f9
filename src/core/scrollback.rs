//! # Output Scrollback
//!
//! Bounded, append-only store of output lines plus the viewport's scroll
//! offset. Both live behind a single mutex so the render pass always reads
//! a consistent (buffer, offset) snapshot, even if a background producer
//! is appending lines at the same time.
//!
//! The offset counts how many lines the viewport is shifted back from the
//! most recent line: 0 means "stick to the newest output".

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default line cap. Oldest lines are evicted first once exceeded.
pub const DEFAULT_CAPACITY: usize = 1000;

struct Inner {
    lines: VecDeque<String>,
    offset: usize,
}

pub struct Scrollback {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Scrollback {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                lines: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                offset: 0,
            }),
        }
    }

    /// A poisoned lock only means a panic mid-append; the buffer itself is
    /// never left in a torn state, so keep going with the data we have.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one line, evicting the oldest lines beyond the cap.
    pub fn push(&self, line: impl Into<String>) {
        let mut inner = self.lock();
        inner.lines.push_back(line.into());
        while inner.lines.len() > self.capacity {
            inner.lines.pop_front();
        }
    }

    /// Empty the buffer and reset the scroll offset.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.lines.clear();
        inner.offset = 0;
    }

    pub fn len(&self) -> usize {
        self.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.lock().offset
    }

    /// The lines currently in view, oldest first, at most `viewport_height`
    /// of them. First visible index is `len − viewport − offset`, last is
    /// `len − offset`, both floored at zero.
    pub fn visible_slice(&self, viewport_height: usize) -> Vec<String> {
        let inner = self.lock();
        let len = inner.lines.len();
        let last = len.saturating_sub(inner.offset);
        let first = last.saturating_sub(viewport_height);
        inner.lines.range(first..last).cloned().collect()
    }

    /// Shift the viewport further into history, clamped so the slice never
    /// runs past the oldest line.
    pub fn scroll_back(&self, amount: usize, viewport_height: usize) {
        let mut inner = self.lock();
        let max_offset = inner.lines.len().saturating_sub(viewport_height);
        inner.offset = (inner.offset + amount).min(max_offset);
    }

    /// Shift the viewport toward the newest line, floored at zero.
    pub fn scroll_forward(&self, amount: usize) {
        let mut inner = self.lock();
        inner.offset = inner.offset.saturating_sub(amount);
    }

    /// Snap the viewport back to the newest line.
    pub fn reset_scroll(&self) {
        self.lock().offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> Scrollback {
        let sb = Scrollback::default();
        for i in 0..n {
            sb.push(format!("l{i}"));
        }
        sb
    }

    #[test]
    fn test_push_bounded_by_capacity() {
        let sb = filled(1250);
        assert_eq!(sb.len(), 1000);
        // After N appends, the oldest survivor is the (N - cap)-th line.
        assert_eq!(sb.visible_slice(1000).first().map(String::as_str), Some("l250"));
    }

    #[test]
    fn test_small_capacity_evicts_fifo() {
        let sb = Scrollback::new(3);
        for line in ["a", "b", "c", "d"] {
            sb.push(line);
        }
        assert_eq!(sb.visible_slice(10), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_visible_slice_unscrolled() {
        let sb = filled(10);
        assert_eq!(sb.visible_slice(4), vec!["l6", "l7", "l8", "l9"]);
    }

    #[test]
    fn test_visible_slice_scrolled() {
        let sb = filled(10);
        sb.scroll_back(3, 4);
        assert_eq!(sb.visible_slice(4), vec!["l3", "l4", "l5", "l6"]);
    }

    #[test]
    fn test_visible_slice_shorter_than_viewport() {
        let sb = filled(2);
        assert_eq!(sb.visible_slice(4), vec!["l0", "l1"]);
    }

    #[test]
    fn test_scroll_back_clamps_to_buffer() {
        let sb = filled(10);
        sb.scroll_back(100, 4);
        assert_eq!(sb.offset(), 6);
        // Still a valid, full slice at the clamped offset.
        assert_eq!(sb.visible_slice(4), vec!["l0", "l1", "l2", "l3"]);
    }

    #[test]
    fn test_scroll_back_noop_when_buffer_fits() {
        let sb = filled(3);
        sb.scroll_back(5, 4);
        assert_eq!(sb.offset(), 0);
    }

    #[test]
    fn test_scroll_forward_floors_at_zero() {
        let sb = filled(10);
        sb.scroll_back(4, 4);
        sb.scroll_forward(100);
        assert_eq!(sb.offset(), 0);
        sb.scroll_forward(1);
        assert_eq!(sb.offset(), 0);
    }

    #[test]
    fn test_clear_resets_offset() {
        let sb = filled(10);
        sb.scroll_back(3, 4);
        sb.clear();
        assert!(sb.is_empty());
        assert_eq!(sb.offset(), 0);
        assert!(sb.visible_slice(4).is_empty());
    }
}
