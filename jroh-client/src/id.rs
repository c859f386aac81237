//! Request identifier allocation
//!
//! Every request a client builds gets its id from the client's
//! `IdAllocator`. By default ids count up from 0, one per request. With
//! auto-increment turned off the allocator keeps handing out the same id
//! until it is changed by hand, which suits servers that expect a fixed id.
//!
//! The counter and the auto-increment flag sit behind one lock, so a read
//! and the advance that follows it are a single step. Concurrent callers
//! never receive the same id while auto-increment is on.

use parking_lot::Mutex;

#[derive(Debug)]
struct IdState {
    next: u64,
    auto_increment: bool,
}

/// Hands out request ids for one client
///
/// # Examples
///
/// ```rust
/// use jroh_client::IdAllocator;
///
/// let ids = IdAllocator::new(0);
/// assert_eq!(ids.next_id(), 0);
/// assert_eq!(ids.next_id(), 1);
///
/// ids.set_auto_increment(false);
/// ids.set_next_id(10);
/// assert_eq!(ids.next_id(), 10);
/// assert_eq!(ids.next_id(), 10);
/// ```
#[derive(Debug)]
pub struct IdAllocator {
    state: Mutex<IdState>,
}

impl IdAllocator {
    /// Create an allocator whose first id is `start`, auto-increment on
    pub fn new(start: u64) -> Self {
        Self {
            state: Mutex::new(IdState {
                next: start,
                auto_increment: true,
            }),
        }
    }

    /// Return the current id, advancing the counter if auto-increment is on
    ///
    /// After `u64::MAX` the counter wraps to 0.
    pub fn next_id(&self) -> u64 {
        let mut state = self.state.lock();
        let id = state.next;
        if state.auto_increment {
            state.next = state.next.wrapping_add(1);
        }
        id
    }

    /// Overwrite the counter; the next allocation returns `id`
    pub fn set_next_id(&self, id: u64) {
        self.state.lock().next = id;
    }

    /// Turn advancing on or off for all future allocations
    pub fn set_auto_increment(&self, enabled: bool) {
        self.state.lock().auto_increment = enabled;
    }

    /// Whether allocations currently advance the counter
    pub fn auto_increment(&self) -> bool {
        self.state.lock().auto_increment
    }

    /// The id the next allocation will return, without allocating it
    pub fn peek(&self) -> u64 {
        self.state.lock().next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids() {
        let ids = IdAllocator::default();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_fixed_id_when_auto_increment_disabled() {
        let ids = IdAllocator::default();
        ids.set_auto_increment(false);
        ids.set_next_id(10);

        assert!(!ids.auto_increment());
        assert_eq!(ids.next_id(), 10);
        assert_eq!(ids.next_id(), 10);

        ids.set_auto_increment(true);
        assert_eq!(ids.next_id(), 10);
        assert_eq!(ids.next_id(), 11);
    }

    #[test]
    fn test_set_next_id_resets_counter() {
        let ids = IdAllocator::new(5);
        assert_eq!(ids.next_id(), 5);

        ids.set_next_id(0);
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_wraps_at_max() {
        let ids = IdAllocator::new(u64::MAX);
        assert_eq!(ids.next_id(), u64::MAX);
        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let ids = Arc::new(IdAllocator::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..1000).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "id {} allocated twice", id);
            }
        }

        assert_eq!(seen.len(), 8000);
        assert_eq!(ids.peek(), 8000);
    }
}
