// SPDX-License-Identifier: MPL-2.0
//! Cursor state machine driving the windowed cache.
//!
//! The [`Navigator`] owns the item [`Sequence`], the [`TaskQueue`] and the
//! [`WindowedCache`]. Every navigation call moves the cursor by at most one
//! step, issues at most one load, and reports what happened as an
//! [`Outcome`]. Both directions share a single implementation.

use crate::cache::WindowedCache;
use crate::direction::Direction;
use crate::sequence::{Cursor, Sequence};
use crate::store::ItemStore;
use crate::task_queue::{QueueError, Side, TaskQueue};
use log::{debug, error, info};
use std::path::PathBuf;

/// Result of a navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The sequence is empty; nothing changed.
    NoOp,
    /// Nothing left to show in this direction; the display was hidden.
    HideEdge(Direction),
    /// An already cached item was shown again without moving past it.
    RedisplayCached(Direction),
    /// The cursor moved one step. `prefetched` is set when a load was issued.
    Moved {
        direction: Direction,
        prefetched: bool,
    },
    /// The cache was rebuilt around a new cursor position.
    Jumped,
}

impl Outcome {
    /// Numeric code used in logs and in the recorded navigation vectors.
    ///
    /// Hide is `1000`/`2000`, redisplay `100`/`200`, move `1`/`2` (plus
    /// `10` when prefetched), jump `0` and no-op `-1`. The first value of
    /// each pair is forward.
    #[must_use]
    pub fn code(self) -> i32 {
        let per_direction = |direction: Direction, base: i32| match direction {
            Direction::Forward => base,
            Direction::Backward => base * 2,
        };
        match self {
            Outcome::NoOp => -1,
            Outcome::HideEdge(direction) => per_direction(direction, 1000),
            Outcome::RedisplayCached(direction) => per_direction(direction, 100),
            Outcome::Moved {
                direction,
                prefetched,
            } => per_direction(direction, 1) + if prefetched { 10 } else { 0 },
            Outcome::Jumped => 0,
        }
    }

    #[must_use]
    pub fn is_prefetched(self) -> bool {
        matches!(
            self,
            Outcome::Moved {
                prefetched: true,
                ..
            }
        )
    }
}

/// Result of a folder navigation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    Changed(PathBuf),
    NoNextFolder,
    NoPreviousFolder,
}

pub struct Navigator<S: ItemStore> {
    /// Identifiers of every item, plus the cursor.
    sequence: Sequence<S::Id>,
    /// Pending loads; empty between calls.
    queue: TaskQueue,
    cache: WindowedCache<S>,
    /// Sibling folders; the cursor starts on the first one.
    folders: Sequence<PathBuf>,
}

impl<S: ItemStore> Navigator<S> {
    /// Creates a navigator with an empty sequence.
    ///
    /// `capacity` is raised to one if zero, and `initial_fanout` is clamped
    /// to `1..=capacity`.
    #[must_use]
    pub fn new(store: S, capacity: usize, initial_fanout: usize) -> Self {
        let cache = WindowedCache::new(store, capacity);
        let fanout = initial_fanout.clamp(1, cache.capacity());
        Self {
            sequence: Sequence::new(),
            queue: TaskQueue::new(fanout),
            cache,
            folders: Sequence::new(),
        }
    }

    /// Replaces the item list. The cursor goes before the first item and the
    /// cache is emptied.
    pub fn set_list(&mut self, ids: Vec<S::Id>) {
        info!("new list of {} item(s)", ids.len());
        self.hide_if_displaying();
        self.sequence.set_list(ids);
        self.cache.clear();
    }

    /// Appends one identifier. The cache is left alone; the new position is
    /// loaded by normal prefetching once the cursor gets near it. A cursor
    /// past the end moves back onto the previous last item.
    pub fn append_item(&mut self, id: S::Id) {
        self.sequence.append(id);
        debug!("appended item; sequence now holds {}", self.sequence.len());
    }

    pub fn advance(&mut self) -> Outcome {
        self.step(Direction::Forward)
    }

    pub fn retreat(&mut self) -> Outcome {
        self.step(Direction::Backward)
    }

    /// Performs one navigation step in `direction`.
    pub fn step(&mut self, direction: Direction) -> Outcome {
        if self.sequence.is_empty() {
            debug!("{direction} step on an empty sequence");
            return Outcome::NoOp;
        }

        let outcome = if self.sequence.needs_hide(direction) {
            self.hide_edge(direction)
        } else if self.sequence.needs_redisplay(direction)
            && !self.cache.is_displaying()
            && !self.cache.is_empty()
        {
            self.redisplay(direction)
        } else {
            self.move_and_prefetch(direction)
        };

        debug!(
            "{direction} step: {outcome:?} (code {}), cursor {:?}, window {:?}",
            outcome.code(),
            self.sequence.cursor(),
            self.cache.edges()
        );
        outcome
    }

    /// Jumps to the 1-based item `n`, clamped to `[1, len]`.
    pub fn jump_to(&mut self, n: usize) -> Outcome {
        let len = self.sequence.len();
        if len == 0 {
            return Outcome::NoOp;
        }
        self.jump(n.clamp(1, len) - 1)
    }

    pub fn jump_to_start(&mut self) -> Outcome {
        if self.sequence.is_empty() {
            return Outcome::NoOp;
        }
        self.jump(0)
    }

    pub fn jump_to_end(&mut self) -> Outcome {
        match self.sequence.len() {
            0 => Outcome::NoOp,
            len => self.jump(len - 1),
        }
    }

    /// Displays the item under the cursor if it is cached. Used after a jump,
    /// which leaves the display hidden.
    pub fn show_current(&mut self) -> bool {
        match self.sequence.position() {
            Some(position) if self.cache.contains(position) => {
                self.cache.display(position);
                true
            }
            _ => false,
        }
    }

    /// Replaces the folder list; the cursor starts on the first folder.
    pub fn set_folders(&mut self, folders: Vec<PathBuf>) {
        info!("new folder list of {} folder(s)", folders.len());
        self.folders.set_list(folders);
        if !self.folders.is_empty() {
            self.folders.set_index(0);
        }
    }

    pub fn next_folder(&mut self) -> FolderOutcome {
        self.step_folder(Direction::Forward)
    }

    pub fn previous_folder(&mut self) -> FolderOutcome {
        self.step_folder(Direction::Backward)
    }

    #[must_use]
    pub fn current_folder(&self) -> Option<&PathBuf> {
        self.folders.current()
    }

    #[must_use]
    pub fn folders(&self) -> &Sequence<PathBuf> {
        &self.folders
    }

    #[must_use]
    pub fn current_position_label(&self) -> String {
        self.sequence.position_label()
    }

    #[must_use]
    pub fn sequence(&self) -> &Sequence<S::Id> {
        &self.sequence
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.sequence.cursor()
    }

    #[must_use]
    pub fn current_id(&self) -> Option<&S::Id> {
        self.sequence.current()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[must_use]
    pub fn cache(&self) -> &WindowedCache<S> {
        &self.cache
    }

    #[must_use]
    pub fn initial_fanout(&self) -> usize {
        self.queue.initial_fanout()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.cache.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.cache.store_mut()
    }

    fn hide_edge(&mut self, direction: Direction) -> Outcome {
        if self.sequence.is_at_edge(direction) {
            self.sequence.move_cursor(direction);
        }
        self.cache.hide();
        Outcome::HideEdge(direction)
    }

    fn redisplay(&mut self, direction: Direction) -> Outcome {
        if self.sequence.cursor().is_sentinel() {
            self.sequence.move_cursor(direction);
        }
        if let Some(position) = self.sequence.position() {
            if !self.cache.contains(position) {
                self.reseed();
            }
            self.cache.display(position);
        }
        Outcome::RedisplayCached(direction)
    }

    fn move_and_prefetch(&mut self, direction: Direction) -> Outcome {
        self.sequence.move_cursor(direction);
        let Some(position) = self.sequence.position() else {
            // Only reachable if a sentinel escaped the hide rule.
            debug_assert!(false, "step landed on a sentinel");
            self.cache.hide();
            return Outcome::HideEdge(direction);
        };

        let prefetched = if self.cache.is_empty() || !self.cache.contains(position) {
            self.reseed();
            true
        } else {
            self.prefetch(position, direction)
        };

        self.cache.display(position);
        Outcome::Moved {
            direction,
            prefetched,
        }
    }

    /// Loads the item next to the leading edge when the cursor came within
    /// the threshold of it, then trims the trailing edge.
    fn prefetch(&mut self, position: usize, direction: Direction) -> bool {
        if self.cache.check_threshold(position, direction).is_none() {
            return false;
        }
        let Some(target) = self
            .cache
            .leading_edge(direction)
            .and_then(|edge| direction.advance(edge))
            .filter(|&target| target < self.sequence.len())
        else {
            return false;
        };

        let side = match direction {
            Direction::Forward => Side::Append,
            Direction::Backward => Side::Prepend,
        };
        self.queue.push(target, side);
        if let Err(err) = self.cache.process_one(&mut self.queue, &self.sequence) {
            report_queue_error(&err);
            return false;
        }
        self.cache.remove_outdated(direction);
        true
    }

    fn jump(&mut self, position: usize) -> Outcome {
        self.hide_if_displaying();
        self.sequence.set_index(position);
        self.reseed();
        info!("jumped to {}", self.sequence.position_label());
        Outcome::Jumped
    }

    fn hide_if_displaying(&mut self) {
        if self.cache.is_displaying() {
            self.cache.hide();
        }
    }

    /// Rebuilds the window around the cursor.
    fn reseed(&mut self) {
        self.cache.clear();
        let fanout = self.queue.initial_fanout();
        self.sequence.seed_tasks(&mut self.queue, fanout);
        if let Err(err) = self.cache.process_all(&mut self.queue, &self.sequence) {
            report_queue_error(&err);
        }
    }

    fn step_folder(&mut self, direction: Direction) -> FolderOutcome {
        let exhausted = match direction {
            Direction::Forward => FolderOutcome::NoNextFolder,
            Direction::Backward => FolderOutcome::NoPreviousFolder,
        };
        if self.folders.is_empty() || self.folders.is_at_edge(direction) {
            return exhausted;
        }
        self.folders.move_cursor(direction);
        match self.folders.current() {
            Some(folder) => {
                info!("switched to folder {}", folder.display());
                FolderOutcome::Changed(folder.clone())
            }
            None => exhausted,
        }
    }
}

fn report_queue_error(err: &QueueError) {
    debug_assert!(false, "cache task queue: {err}");
    error!("cache task queue: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Store recording which positions it holds and what it displayed.
    #[derive(Default)]
    struct TraceStore {
        items: VecDeque<usize>,
        shown: Option<usize>,
        displayed: Vec<usize>,
        loads: usize,
        hides: usize,
    }

    impl ItemStore for TraceStore {
        type Id = usize;

        fn load_back(&mut self, id: &usize) {
            self.loads += 1;
            self.items.push_back(*id);
        }
        fn load_front(&mut self, id: &usize) {
            self.loads += 1;
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
            let id = self.items[offset];
            self.shown = Some(id);
            self.displayed.push(id);
        }
        fn hide(&mut self) {
            self.hides += 1;
            self.shown = None;
        }
        fn is_displaying(&self) -> bool {
            self.shown.is_some()
        }
    }

    fn navigator(len: usize, capacity: usize, fanout: usize) -> Navigator<TraceStore> {
        let mut nav = Navigator::new(TraceStore::default(), capacity, fanout);
        nav.set_list((0..len).collect());
        nav
    }

    fn assert_window_invariant(nav: &Navigator<TraceStore>) {
        let cache = nav.cache();
        if let Some((left, right)) = cache.edges() {
            assert_eq!(cache.len(), right - left + 1);
            assert!(cache.len() <= cache.capacity());
            let held: Vec<usize> = cache.store().items.iter().copied().collect();
            assert_eq!(held, (left..=right).collect::<Vec<_>>());
        } else {
            assert_eq!(cache.len(), 0);
        }
    }

    #[test]
    fn empty_sequence_is_noop() {
        let mut nav = navigator(0, 5, 5);
        assert_eq!(nav.advance(), Outcome::NoOp);
        assert_eq!(nav.retreat(), Outcome::NoOp);
        assert_eq!(nav.jump_to(3), Outcome::NoOp);
        assert_eq!(nav.jump_to_end(), Outcome::NoOp);
        assert_eq!(Outcome::NoOp.code(), -1);
    }

    #[test]
    fn single_item_advance_moves_and_displays() {
        let mut nav = navigator(1, 5, 5);
        let outcome = nav.advance();
        assert_eq!(
            outcome,
            Outcome::Moved {
                direction: Direction::Forward,
                prefetched: true
            }
        );
        assert!(outcome.is_prefetched());
        assert_eq!(nav.store().displayed, vec![0]);
        assert_eq!(nav.cursor(), Cursor::At(0));
    }

    #[test]
    fn hide_is_idempotent_on_sentinel() {
        let mut nav = navigator(3, 5, 5);
        nav.jump_to_end();
        assert_eq!(nav.advance(), Outcome::HideEdge(Direction::Forward));
        assert_eq!(nav.cursor(), Cursor::AfterLast);
        assert_eq!(nav.advance(), Outcome::HideEdge(Direction::Forward));
        assert_eq!(nav.cursor(), Cursor::AfterLast);
        assert!(!nav.cache().is_displaying());
    }

    #[test]
    fn redisplay_from_sentinel_steps_back_once() {
        let mut nav = navigator(3, 5, 5);
        nav.jump_to_start();
        nav.retreat();
        assert_eq!(nav.cursor(), Cursor::BeforeFirst);
        assert_eq!(nav.advance(), Outcome::RedisplayCached(Direction::Forward));
        assert_eq!(nav.cursor(), Cursor::At(0));
        assert_eq!(nav.store().displayed, vec![0]);
    }

    #[test]
    fn directions_are_mirrored() {
        let len = 12;
        let mut forward = navigator(len, 6, 5);
        let mut backward = navigator(len, 6, 5);
        forward.jump_to_start();
        backward.jump_to_end();

        let mirror = |outcome: Outcome| match outcome {
            Outcome::HideEdge(d) => Outcome::HideEdge(d.opposite()),
            Outcome::RedisplayCached(d) => Outcome::RedisplayCached(d.opposite()),
            Outcome::Moved {
                direction,
                prefetched,
            } => Outcome::Moved {
                direction: direction.opposite(),
                prefetched,
            },
            other => other,
        };

        for _ in 0..(len + 3) {
            let f = forward.advance();
            let b = backward.retreat();
            assert_eq!(mirror(f), b);
        }
        let mirrored: Vec<usize> = backward
            .store()
            .displayed
            .iter()
            .map(|p| len - 1 - p)
            .collect();
        assert_eq!(forward.store().displayed, mirrored);
    }

    #[test]
    fn window_invariant_holds_over_a_walk() {
        let mut nav = navigator(40, 7, 7);
        nav.jump_to(20);
        // deterministic zig-zag covering both edges
        let pattern = [9usize, 3, 30, 2, 45, 12, 50];
        for (i, count) in pattern.iter().enumerate() {
            for _ in 0..*count {
                let outcome = if i % 2 == 0 { nav.advance() } else { nav.retreat() };
                assert_window_invariant(&nav);
                if let Outcome::Moved { .. } = outcome {
                    let position = nav.cursor().position().expect("moved onto an item");
                    assert!(nav.cache().contains(position));
                }
            }
        }
    }

    #[test]
    fn a_step_loads_at_most_one_item() {
        let mut nav = navigator(30, 6, 6);
        nav.jump_to_start();
        let mut loads = nav.store().loads;
        for _ in 0..25 {
            nav.advance();
            let now = nav.store().loads;
            assert!(now - loads <= 1);
            loads = now;
        }
    }

    #[test]
    fn jump_to_clamps_and_hides() {
        let mut nav = navigator(5, 4, 4);
        assert_eq!(nav.jump_to(99), Outcome::Jumped);
        assert_eq!(nav.cursor(), Cursor::At(4));
        assert_eq!(nav.jump_to(0), Outcome::Jumped);
        assert_eq!(nav.cursor(), Cursor::At(0));
        assert!(!nav.cache().is_displaying());
        assert_eq!(nav.cache().edges(), Some((0, 3)));
    }

    #[test]
    fn set_list_resets_cursor_and_cache() {
        let mut nav = navigator(5, 4, 4);
        nav.jump_to(3);
        nav.advance();
        nav.set_list(vec![10, 11]);
        assert_eq!(nav.cursor(), Cursor::BeforeFirst);
        assert!(nav.cache().is_empty());
        assert!(!nav.cache().is_displaying());
    }

    #[test]
    fn appended_items_are_reached_by_prefetch() {
        let mut nav = navigator(3, 4, 4);
        nav.jump_to_start();
        nav.append_item(3);
        nav.append_item(4);
        assert_eq!(nav.cursor(), Cursor::At(0));

        let codes: Vec<i32> = (0..6).map(|_| nav.advance().code()).collect();
        assert_eq!(codes, vec![100, 1, 11, 11, 1, 1000]);
        assert_eq!(nav.store().displayed, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn item_appended_past_the_end_is_reached_going_forward() {
        let mut nav = navigator(3, 10, 10);
        nav.jump_to_start();
        let codes: Vec<i32> = (0..4).map(|_| nav.advance().code()).collect();
        assert_eq!(codes, vec![100, 1, 1, 1000]);
        assert_eq!(nav.cursor(), Cursor::AfterLast);

        nav.append_item(3);
        assert_eq!(nav.cursor(), Cursor::At(2));

        let mut codes: Vec<i32> = (0..3).map(|_| nav.advance().code()).collect();
        codes.push(nav.retreat().code());
        assert_eq!(codes, vec![100, 11, 1000, 200]);
        assert_eq!(nav.store().displayed, vec![0, 1, 2, 2, 3, 3]);
        assert_eq!(nav.cursor(), Cursor::At(3));
    }

    #[test]
    fn list_changes_and_jumps_hide_only_what_is_shown() {
        let mut nav = navigator(5, 4, 4);
        nav.jump_to_start();
        assert_eq!(nav.store().hides, 0);

        nav.advance();
        assert!(nav.cache().is_displaying());
        nav.jump_to(3);
        assert_eq!(nav.store().hides, 1);
        nav.jump_to(4);
        assert_eq!(nav.store().hides, 1);

        nav.show_current();
        nav.set_list(vec![7, 8]);
        assert_eq!(nav.store().hides, 2);
        assert!(!nav.cache().is_displaying());
    }

    #[test]
    fn fanout_is_clamped_to_capacity() {
        let nav = Navigator::new(TraceStore::default(), 3, 10);
        assert_eq!(nav.initial_fanout(), 3);
        let nav = Navigator::new(TraceStore::default(), 3, 0);
        assert_eq!(nav.initial_fanout(), 1);
    }

    #[test]
    fn folder_navigation_stops_at_both_ends() {
        let mut nav = navigator(0, 3, 3);
        assert_eq!(nav.next_folder(), FolderOutcome::NoNextFolder);
        assert_eq!(nav.previous_folder(), FolderOutcome::NoPreviousFolder);

        nav.set_folders(vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(nav.previous_folder(), FolderOutcome::NoPreviousFolder);
        assert_eq!(
            nav.next_folder(),
            FolderOutcome::Changed(PathBuf::from("b"))
        );
        assert_eq!(nav.next_folder(), FolderOutcome::NoNextFolder);
        assert_eq!(
            nav.previous_folder(),
            FolderOutcome::Changed(PathBuf::from("a"))
        );
    }

    #[test]
    fn position_label_tracks_cursor() {
        let mut nav = navigator(4, 4, 4);
        assert_eq!(nav.current_position_label(), "beginning of list");
        nav.jump_to(2);
        assert_eq!(nav.current_position_label(), "2 / 4");
    }
}
