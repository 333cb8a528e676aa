use std::collections::VecDeque;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SlottedQueue is a multi-producer, single-consumer FIFO backed by two buffers. Producers always
/// push into the active buffer. The consumer swaps the active buffer out wholesale and drains it
/// without holding the lock, while producers keep filling the other slot.
///
/// The critical section for both sides is a push or a pointer swap, so producers never wait on the
/// consumer's processing of a batch.
pub(crate) struct SlottedQueue<T> {
    slots: Mutex<Slots<T>>,
}

struct Slots<T> {
    active: VecDeque<T>,
    // `None` while the consumer is holding the other buffer.
    spare: Option<VecDeque<T>>,
}

impl<T> SlottedQueue<T> {
    pub(crate) fn new() -> Self {
        SlottedQueue {
            slots: Mutex::new(Slots {
                active: VecDeque::new(),
                spare: Some(VecDeque::new()),
            }),
        }
    }

    pub(crate) fn enqueue(&self, item: T) {
        self.lock().active.push_back(item);
    }

    /// Swaps buffers iff the active buffer is non-empty. The returned buffer yields the items in the
    /// order they were enqueued. When dropped, it is handed back to the queue as the spare slot, and
    /// any items that were not drained are put back in front of everything enqueued since the swap.
    pub(crate) fn try_swap(&self) -> Option<SwappedBuffer<'_, T>> {
        let mut slots = self.lock();
        if slots.active.is_empty() {
            return None;
        }

        // The spare is only missing if a previous buffer is still held by a consumer. We don't
        // block on it, we just pay for a fresh allocation.
        let next = slots.spare.take().unwrap_or_default();
        let buffer = mem::replace(&mut slots.active, next);

        Some(SwappedBuffer { queue: self, buffer })
    }

    /// Number of items waiting in the active buffer.
    pub(crate) fn len(&self) -> usize {
        self.lock().active.len()
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        // Every critical section is a single VecDeque operation, so a panic elsewhere can't have left
        // the slots half-updated.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn recycle(&self, mut buffer: VecDeque<T>) {
        let mut slots = self.lock();
        if !buffer.is_empty() {
            // Leftovers are older than anything that arrived after the swap.
            buffer.append(&mut slots.active);
            mem::swap(&mut buffer, &mut slots.active);
        }
        buffer.clear();
        if slots.spare.is_none() {
            slots.spare = Some(buffer);
        }
    }
}

impl<T> Default for SlottedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A batch of items swapped out of a [`SlottedQueue`]. Producers can't reach this buffer until it is
/// dropped and cycled back in.
pub(crate) struct SwappedBuffer<'a, T> {
    queue: &'a SlottedQueue<T>,
    buffer: VecDeque<T>,
}

impl<T> SwappedBuffer<'_, T> {
    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl<T> Iterator for SwappedBuffer<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buffer.len(), Some(self.buffer.len()))
    }
}

impl<T> Drop for SwappedBuffer<'_, T> {
    fn drop(&mut self) {
        self.queue.recycle(mem::take(&mut self.buffer));
    }
}
