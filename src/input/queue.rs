// src/input/queue.rs

//! Fixed-capacity event ring shared by the host event pump (producer) and
//! the engine's poll calls (consumer).
//!
//! Both cursors increase monotonically and are reduced modulo the capacity
//! only when indexing, so `write - read` is always the number of unread
//! events. The backing storage is allocated once at construction; `push`
//! and `try_pop` never allocate.

use anyhow::{ensure, Result};
use log::trace;
use serde::{Deserialize, Serialize};

/// What `push` does when every slot holds an unread event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Overwrite the oldest unread event. The reader then sees the newest
    /// `capacity` events, in push order.
    #[default]
    DropOldest,
    /// Discard the incoming event and keep the queued history intact.
    DropNewest,
}

/// Policy used when the configuration does not name one.
pub const DEFAULT_OVERFLOW_POLICY: OverflowPolicy = OverflowPolicy::DropOldest;

#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    slots: Box<[T]>,
    write: usize,
    read: usize,
    policy: OverflowPolicy,
    dropped: u64,
}

impl<T: Copy + Default> EventQueue<T> {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Result<Self> {
        ensure!(capacity > 0, "event queue capacity must be non-zero");
        Ok(Self {
            slots: vec![T::default(); capacity].into_boxed_slice(),
            write: 0,
            read: 0,
            policy,
            dropped: 0,
        })
    }

    /// Appends an event. Never blocks and never fails; on overflow the
    /// configured [`OverflowPolicy`] decides which event is lost.
    pub fn push(&mut self, item: T) {
        let capacity = self.slots.len();
        if self.len() == capacity {
            self.dropped += 1;
            match self.policy {
                OverflowPolicy::DropNewest => {
                    trace!("EventQueue: full ({}), dropping incoming event", capacity);
                    return;
                }
                OverflowPolicy::DropOldest => {
                    trace!("EventQueue: full ({}), overwriting oldest event", capacity);
                    self.read = self.read.wrapping_add(1);
                }
            }
        }
        self.slots[self.write % capacity] = item;
        self.write = self.write.wrapping_add(1);
    }

    /// Takes the oldest unread event, or `None` when the queue is empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.read == self.write {
            return None;
        }
        let item = self.slots[self.read % self.slots.len()];
        self.read = self.read.wrapping_add(1);
        Some(item)
    }
}

impl<T> EventQueue<T> {
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Events lost to overflow since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Raw cursor positions `(write, read)`.
    pub fn cursors(&self) -> (usize, usize) {
        (self.write, self.read)
    }
}
