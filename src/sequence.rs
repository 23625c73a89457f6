// SPDX-License-Identifier: MPL-2.0
//! Ordered, appendable list of item identifiers with a movable cursor.
//!
//! The cursor can rest on every element and on two sentinels just outside
//! the list: [`Cursor::BeforeFirst`] and [`Cursor::AfterLast`]. A sentinel
//! means "nothing shown yet at this end".

use crate::direction::Direction;
use crate::task_queue::{Side, TaskQueue};

/// Cursor position in the extended range `[-1, len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    BeforeFirst,
    At(usize),
    AfterLast,
}

impl Cursor {
    /// The sentinel lying beyond the list in `direction`.
    #[must_use]
    pub fn sentinel(direction: Direction) -> Self {
        match direction {
            Direction::Forward => Cursor::AfterLast,
            Direction::Backward => Cursor::BeforeFirst,
        }
    }

    #[must_use]
    pub fn position(self) -> Option<usize> {
        match self {
            Cursor::At(position) => Some(position),
            Cursor::BeforeFirst | Cursor::AfterLast => None,
        }
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self.position().is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<T> {
    items: Vec<T>,
    cursor: Cursor,
}

impl<T> Sequence<T> {
    /// Creates an empty sequence with the cursor before the first element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: Cursor::BeforeFirst,
        }
    }

    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: Cursor::BeforeFirst,
        }
    }

    /// Replaces the whole list and parks the cursor before the first element.
    pub fn set_list(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = Cursor::BeforeFirst;
    }

    /// Appends an identifier.
    ///
    /// A cursor resting on [`Cursor::AfterLast`] moves back onto the old last
    /// element, so the next forward step can reach the new one.
    pub fn append(&mut self, item: T) {
        if self.cursor == Cursor::AfterLast && !self.items.is_empty() {
            self.cursor = Cursor::At(self.items.len() - 1);
        }
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = Cursor::BeforeFirst;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// The identifier under the cursor, if it is not on a sentinel.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.cursor.position().and_then(|p| self.items.get(p))
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.cursor.position()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Places the cursor anywhere in the extended range.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is `At(p)` with `p >= len`: positions are always
    /// range-checked by callers, so this is a logic error.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        if let Cursor::At(position) = cursor {
            assert!(
                position < self.items.len(),
                "cursor position {position} out of range for a sequence of {}",
                self.items.len()
            );
        }
        self.cursor = cursor;
    }

    /// Places the cursor on the element at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len`.
    pub fn set_index(&mut self, position: usize) {
        self.set_cursor(Cursor::At(position));
    }

    /// Index of the last valid element in `direction`.
    #[must_use]
    pub fn edge(&self, direction: Direction) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        match direction {
            Direction::Forward => Some(self.items.len() - 1),
            Direction::Backward => Some(0),
        }
    }

    /// True when the cursor is on the last valid element in `direction`.
    #[must_use]
    pub fn is_at_edge(&self, direction: Direction) -> bool {
        self.edge(direction)
            .is_some_and(|edge| self.cursor == Cursor::At(edge))
    }

    /// Moves the cursor one step, unless that would leave `[-1, len]`.
    pub fn move_cursor(&mut self, direction: Direction) {
        let len = self.items.len() as isize;
        let next = self.signed_cursor() + direction.step();
        if (-1..=len).contains(&next) {
            self.cursor = self.cursor_from_signed(next);
        }
    }

    /// True when there is nothing further to show in `direction`: the cursor
    /// is on that direction's edge element or already beyond it.
    #[must_use]
    pub fn needs_hide(&self, direction: Direction) -> bool {
        self.cursor == Cursor::sentinel(direction) || self.is_at_edge(direction)
    }

    /// True when the cursor can resume showing an already cached element:
    /// strictly inside the list, or on the edge element or sentinel opposite
    /// to `direction`.
    #[must_use]
    pub fn needs_redisplay(&self, direction: Direction) -> bool {
        let behind = direction.opposite();
        match self.cursor {
            Cursor::At(position) => {
                let strictly_inside = position > 0 && position + 1 < self.items.len();
                strictly_inside || self.is_at_edge(behind)
            }
            sentinel => !self.items.is_empty() && sentinel == Cursor::sentinel(behind),
        }
    }

    /// Queues the tasks that build a window centred on the cursor.
    ///
    /// Pushes a [`Side::Set`] task for the cursor, then alternates
    /// [`Side::Append`] and [`Side::Prepend`] tasks moving outward (right
    /// first) until `fanout` tasks were issued or both ends are reached.
    /// Does nothing when the cursor is on a sentinel.
    pub fn seed_tasks(&self, queue: &mut TaskQueue, fanout: usize) {
        let Some(position) = self.cursor.position() else {
            return;
        };
        queue.push(position, Side::Set);

        let len = self.items.len();
        let mut right = position + 1;
        let mut left = position.checked_sub(1);
        let mut remaining = fanout.saturating_sub(1);

        while remaining > 0 && (right < len || left.is_some()) {
            if right < len {
                remaining -= 1;
                queue.push(right, Side::Append);
                right += 1;
            }
            if remaining > 0 {
                if let Some(l) = left {
                    remaining -= 1;
                    queue.push(l, Side::Prepend);
                    left = l.checked_sub(1);
                }
            }
        }
    }

    /// Human-readable cursor position: `"3 / 10"`, or the sentinel names.
    #[must_use]
    pub fn position_label(&self) -> String {
        match self.cursor {
            Cursor::BeforeFirst => "beginning of list".to_string(),
            Cursor::AfterLast => "end of list".to_string(),
            Cursor::At(position) => format!("{} / {}", position + 1, self.items.len()),
        }
    }

    fn signed_cursor(&self) -> isize {
        match self.cursor {
            Cursor::BeforeFirst => -1,
            Cursor::At(position) => position as isize,
            Cursor::AfterLast => self.items.len() as isize,
        }
    }

    fn cursor_from_signed(&self, value: isize) -> Cursor {
        match usize::try_from(value) {
            Err(_) => Cursor::BeforeFirst,
            Ok(position) if position >= self.items.len() => Cursor::AfterLast,
            Ok(position) => Cursor::At(position),
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}
