// SPDX-License-Identifier: MPL-2.0
//! Windowed cache over a [`Sequence`].
//!
//! The cache mirrors one contiguous range `[left_edge, right_edge]` of the
//! sequence. It grows one item at a time from queued tasks and shrinks from
//! the trailing edge once it holds more than `capacity` items.
//!
//! # Invariant
//!
//! While non-empty, `len() == right_edge - left_edge + 1 <= capacity` after
//! every completed operation. A push may exceed the capacity by exactly one
//! item until the matching [`WindowedCache::remove_outdated`] call.

use crate::direction::Direction;
use crate::sequence::Sequence;
use crate::store::ItemStore;
use crate::task_queue::{QueueError, Side, TaskQueue};
use log::{debug, warn};

/// Distance to a window edge below which the cache prefetches.
///
/// Half the capacity rounded down for odd capacities, `(capacity - 1) / 2`
/// for even ones, never less than one.
#[must_use]
pub fn threshold_for(capacity: usize) -> usize {
    let threshold = if capacity % 2 == 0 {
        capacity.saturating_sub(1) / 2
    } else {
        capacity / 2
    };
    threshold.max(1)
}

pub struct WindowedCache<S: ItemStore> {
    store: S,
    capacity: usize,
    threshold: usize,
    /// `(left_edge, right_edge)`; `None` while empty.
    edges: Option<(usize, usize)>,
}

impl<S: ItemStore> WindowedCache<S> {
    /// Creates an empty cache. A zero capacity is raised to one.
    #[must_use]
    pub fn new(store: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            store,
            capacity,
            threshold: threshold_for(capacity),
            edges: None,
        }
    }

    /// Applies every pending task.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the loop stops as soon as the queue is empty.
    /// Errors from [`Self::process_one`] are propagated.
    pub fn process_all(
        &mut self,
        queue: &mut TaskQueue,
        sequence: &Sequence<S::Id>,
    ) -> Result<(), QueueError> {
        while !queue.is_empty() {
            self.process_one(queue, sequence)?;
        }
        Ok(())
    }

    /// Pops exactly one task and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if nothing was queued.
    pub fn process_one(
        &mut self,
        queue: &mut TaskQueue,
        sequence: &Sequence<S::Id>,
    ) -> Result<(), QueueError> {
        let task = queue.pop()?;
        let Some(id) = sequence.get(task.position) else {
            debug_assert!(false, "task for position {} outside the sequence", task.position);
            warn!("dropping task for position {} outside the sequence", task.position);
            return Ok(());
        };

        let position = task.position;
        match task.side {
            Side::Set => {
                self.store.clear();
                self.store.load_back(id);
                self.edges = Some((position, position));
            }
            Side::Append => {
                debug_assert!(self.edges.is_none_or(|(_, right)| right + 1 == position));
                self.store.load_back(id);
                self.edges = Some(match self.edges {
                    Some((left, _)) => (left, position),
                    None => (position, position),
                });
            }
            Side::Prepend => {
                debug_assert!(self.edges.is_none_or(|(left, _)| position + 1 == left));
                self.store.load_front(id);
                self.edges = Some(match self.edges {
                    Some((_, right)) => (position, right),
                    None => (position, position),
                });
            }
        }

        debug!(
            "cached position {position} ({:?}); window {:?}, {} item(s)",
            task.side,
            self.edges,
            self.store.len()
        );
        Ok(())
    }

    /// Returns the prefetch shift when `cursor` is too close to the edge
    /// ahead of it: `-threshold` moving backward, `+threshold` moving
    /// forward. Only the edge matching `direction` is checked.
    #[must_use]
    pub fn check_threshold(&self, cursor: usize, direction: Direction) -> Option<isize> {
        let (left, right) = self.edges?;
        let threshold = self.threshold as isize;
        let distance = match direction {
            Direction::Backward => cursor as isize - left as isize,
            Direction::Forward => right as isize - cursor as isize,
        };
        (distance < threshold).then_some(threshold * direction.step())
    }

    /// Evicts one item from the trailing edge if the window is over capacity.
    ///
    /// Moving forward trims the left edge; moving backward trims the right.
    /// Returns whether an item was evicted.
    pub fn remove_outdated(&mut self, direction: Direction) -> bool {
        if self.store.len() <= self.capacity {
            return false;
        }
        let Some((left, right)) = self.edges else {
            return false;
        };
        match direction {
            Direction::Forward => {
                self.store.evict_front();
                self.edges = Some((left + 1, right));
            }
            Direction::Backward => {
                self.store.evict_back();
                self.edges = Some((left, right - 1));
            }
        }
        debug!("evicted {direction} trailing item; window {:?}", self.edges);
        true
    }

    /// Shows the item at sequence `position`, which must be resident.
    pub fn display(&mut self, position: usize) {
        match self.edges {
            Some((left, right)) if (left..=right).contains(&position) => {
                self.store.display(position - left);
            }
            _ => {
                warn!("position {position} is not cached (window {:?})", self.edges);
                self.store.hide();
            }
        }
    }

    pub fn hide(&mut self) {
        self.store.hide();
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.edges = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_none()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.store.len() == self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn left_edge(&self) -> Option<usize> {
        self.edges.map(|(left, _)| left)
    }

    #[must_use]
    pub fn right_edge(&self) -> Option<usize> {
        self.edges.map(|(_, right)| right)
    }

    /// `(left_edge, right_edge)` while non-empty.
    #[must_use]
    pub fn edges(&self) -> Option<(usize, usize)> {
        self.edges
    }

    /// The edge the window grows from when moving in `direction`.
    #[must_use]
    pub fn leading_edge(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => self.right_edge(),
            Direction::Backward => self.left_edge(),
        }
    }

    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        self.edges
            .is_some_and(|(left, right)| (left..=right).contains(&position))
    }

    #[must_use]
    pub fn is_displaying(&self) -> bool {
        self.store.is_displaying()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: ItemStore> std::fmt::Debug for WindowedCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedCache")
            .field("capacity", &self.capacity)
            .field("threshold", &self.threshold)
            .field("edges", &self.edges)
            .field("len", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct VecStore {
        items: VecDeque<usize>,
        shown: Option<usize>,
    }

    impl ItemStore for VecStore {
        type Id = usize;

        fn load_back(&mut self, id: &usize) {
            self.items.push_back(*id);
        }
        fn load_front(&mut self, id: &usize) {
            self.items.push_front(*id);
        }
        fn evict_front(&mut self) {
            self.items.pop_front();
        }
        fn evict_back(&mut self) {
            self.items.pop_back();
        }
        fn clear(&mut self) {
            self.items.clear();
            self.shown = None;
        }
        fn len(&self) -> usize {
            self.items.len()
        }
        fn display(&mut self, offset: usize) {
            self.shown = self.items.get(offset).copied();
        }
        fn hide(&mut self) {
            self.shown = None;
        }
        fn is_displaying(&self) -> bool {
            self.shown.is_some()
        }
    }

    struct Fixture {
        sequence: Sequence<usize>,
        queue: TaskQueue,
        cache: WindowedCache<VecStore>,
    }

    impl Fixture {
        fn seeded(len: usize, cursor: usize, capacity: usize, fanout: usize) -> Self {
            let mut sequence = Sequence::from_items((0..len).collect());
            sequence.set_index(cursor);
            let mut queue = TaskQueue::new(fanout);
            sequence.seed_tasks(&mut queue, fanout);
            let mut cache = WindowedCache::new(VecStore::default(), capacity);
            cache
                .process_all(&mut queue, &sequence)
                .expect("seeding drains the queue");
            Self {
                sequence,
                queue,
                cache,
            }
        }

        /// One incremental move with prefetch, without the display logic.
        fn change(&mut self, direction: Direction) {
            self.sequence.move_cursor(direction);
            let cursor = self.sequence.position().expect("cursor stays on an item");
            if self.cache.check_threshold(cursor, direction).is_some() {
                let edge = self.cache.leading_edge(direction).expect("cache is seeded");
                if let Some(target) =
                    direction.advance(edge).filter(|&t| t < self.sequence.len())
                {
                    let side = if direction.is_forward() {
                        Side::Append
                    } else {
                        Side::Prepend
                    };
                    self.queue.push(target, side);
                    self.cache
                        .process_one(&mut self.queue, &self.sequence)
                        .expect("task was pushed");
                    self.cache.remove_outdated(direction);
                }
            }
        }

        fn contents(&self) -> Vec<usize> {
            self.cache.store().items.iter().copied().collect()
        }
    }

    #[test]
    fn threshold_matches_capacity_parity() {
        assert_eq!(threshold_for(1), 1);
        assert_eq!(threshold_for(2), 1);
        assert_eq!(threshold_for(3), 1);
        assert_eq!(threshold_for(5), 2);
        assert_eq!(threshold_for(6), 2);
        assert_eq!(threshold_for(7), 3);
        assert_eq!(threshold_for(10), 4);
    }

    #[test]
    fn seeding_builds_centred_window() {
        let fixture = Fixture::seeded(10, 5, 6, 5);
        assert_eq!(fixture.contents(), vec![3, 4, 5, 6, 7]);
        assert_eq!(fixture.cache.edges(), Some((3, 7)));
    }

    #[test]
    fn seeding_at_various_positions() {
        let cases = [
            (10, 5, vec![3, 4, 5, 6, 7]),
            (3, 1, vec![0, 1, 2]),
            (2, 0, vec![0, 1]),
            (1, 0, vec![0]),
            (10, 0, vec![0, 1, 2, 3, 4]),
        ];
        for (len, cursor, expected) in cases {
            let fixture = Fixture::seeded(len, cursor, 10, 5);
            assert_eq!(fixture.contents(), expected, "len {len}, cursor {cursor}");
        }
    }

    #[test]
    fn forward_steps_extend_right_and_evict_left() {
        let mut fixture = Fixture::seeded(10, 5, 6, 5);

        fixture.change(Direction::Forward);
        assert_eq!(fixture.contents(), vec![3, 4, 5, 6, 7, 8]);
        assert_eq!(fixture.cache.edges(), Some((3, 8)));

        fixture.change(Direction::Forward);
        assert_eq!(fixture.contents(), vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(fixture.cache.edges(), Some((4, 9)));

        fixture.change(Direction::Forward);
        assert_eq!(fixture.contents(), vec![4, 5, 6, 7, 8, 9]);
        assert_eq!(fixture.cache.edges(), Some((4, 9)));
        assert_eq!(fixture.sequence.position(), Some(8));
    }

    #[test]
    fn backward_steps_extend_left_and_evict_right() {
        let mut fixture = Fixture::seeded(10, 4, 6, 5);
        assert_eq!(fixture.contents(), vec![2, 3, 4, 5, 6]);

        fixture.change(Direction::Backward);
        assert_eq!(fixture.contents(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(fixture.cache.edges(), Some((1, 6)));

        fixture.change(Direction::Backward);
        assert_eq!(fixture.contents(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(fixture.cache.edges(), Some((0, 5)));

        fixture.change(Direction::Backward);
        assert_eq!(fixture.contents(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(fixture.sequence.position(), Some(1));
    }

    #[test]
    fn check_threshold_only_inspects_leading_edge() {
        let fixture = Fixture::seeded(10, 5, 6, 5);
        // window [3, 7], threshold 2
        assert_eq!(fixture.cache.check_threshold(5, Direction::Forward), None);
        assert_eq!(fixture.cache.check_threshold(6, Direction::Forward), Some(2));
        assert_eq!(fixture.cache.check_threshold(6, Direction::Backward), None);
        assert_eq!(fixture.cache.check_threshold(4, Direction::Backward), Some(-2));
        assert_eq!(fixture.cache.check_threshold(4, Direction::Forward), None);
    }

    #[test]
    fn remove_outdated_is_noop_within_capacity() {
        let mut fixture = Fixture::seeded(10, 5, 6, 5);
        assert!(!fixture.cache.remove_outdated(Direction::Forward));
        assert_eq!(fixture.cache.edges(), Some((3, 7)));
    }

    #[test]
    fn set_task_resets_window() {
        let mut fixture = Fixture::seeded(10, 5, 6, 5);
        fixture.queue.push(9, Side::Set);
        fixture
            .cache
            .process_one(&mut fixture.queue, &fixture.sequence)
            .expect("task was pushed");
        assert_eq!(fixture.contents(), vec![9]);
        assert_eq!(fixture.cache.edges(), Some((9, 9)));
    }

    #[test]
    fn process_one_on_empty_queue_errors() {
        let mut fixture = Fixture::seeded(3, 1, 3, 3);
        assert_eq!(
            fixture.cache.process_one(&mut fixture.queue, &fixture.sequence),
            Err(QueueError::Empty)
        );
    }

    #[test]
    fn display_outside_window_hides() {
        let mut fixture = Fixture::seeded(10, 5, 6, 5);
        fixture.cache.display(5);
        assert_eq!(fixture.cache.store().shown, Some(5));
        fixture.cache.display(9);
        assert!(!fixture.cache.is_displaying());
    }

    #[test]
    fn clear_empties_edges() {
        let mut fixture = Fixture::seeded(10, 5, 6, 5);
        assert!(!fixture.cache.is_full());
        fixture.cache.clear();
        assert!(fixture.cache.is_empty());
        assert_eq!(fixture.cache.left_edge(), None);
        assert_eq!(fixture.cache.len(), 0);
    }
}
