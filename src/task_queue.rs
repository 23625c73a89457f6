// SPDX-License-Identifier: MPL-2.0
//! FIFO of pending cache-load instructions.
//!
//! Tasks are drained strictly in insertion order. During seeding that order
//! decides which edge of the window is extended first, and so the final edge
//! values.

use std::collections::VecDeque;
use std::fmt;

/// Where a loaded item goes in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Reset the window to this single item.
    Set,
    /// Extend the window on the right.
    Append,
    /// Extend the window on the left.
    Prepend,
}

/// A single load instruction: which sequence position, and on which side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub position: usize,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// `pop` was called with no pending task.
    Empty,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Empty => write!(f, "task queue is empty"),
        }
    }
}

impl std::error::Error for QueueError {}

#[derive(Debug, Clone)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
    initial_fanout: usize,
}

impl TaskQueue {
    /// Creates an empty queue. `initial_fanout` is the number of tasks a
    /// seeding pass may issue.
    #[must_use]
    pub fn new(initial_fanout: usize) -> Self {
        Self {
            tasks: VecDeque::with_capacity(initial_fanout),
            initial_fanout,
        }
    }

    pub fn push(&mut self, position: usize, side: Side) {
        self.tasks.push_back(Task { position, side });
    }

    /// Removes and returns the oldest task.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] when nothing was pushed.
    pub fn pop(&mut self) -> Result<Task, QueueError> {
        self.tasks.pop_front().ok_or(QueueError::Empty)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn initial_fanout(&self) -> usize {
        self.initial_fanout
    }

    /// Pending tasks, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}
