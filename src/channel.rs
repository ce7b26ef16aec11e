//! Unbounded FIFO channel connecting processors to their environment.
//!
//! Push never blocks; pop blocks the calling thread until an element is
//! available. A channel has no capacity bound and no close/EOF signal:
//! producers signal completion only by halting, which consumers observe by
//! polling the owning processor's halted flag alongside emptiness.

use crossbeam_channel::{Receiver, Sender};

/// Unbounded FIFO queue of integers, safe for concurrent pushers and
/// poppers from independent threads.
///
/// Cloning a `Channel` yields another handle onto the same queue; elements
/// are delivered in push order with no loss or duplication regardless of
/// how pushes and pops interleave across handles.
#[derive(Debug, Clone)]
pub struct Channel {
    tx: Sender<i64>,
    rx: Receiver<i64>,
}

impl Channel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Appends `value` to the tail. Never blocks.
    pub fn push(&self, value: i64) {
        // Cannot fail: this handle keeps its own receiver alive.
        let _ = self.tx.send(value);
    }

    /// Pushes each byte of `text` as its integer value, in order.
    ///
    /// Interactive peers use this to feed command strings to a running
    /// processor one character code at a time.
    pub fn push_ascii(&self, text: &str) {
        for byte in text.bytes() {
            self.push(i64::from(byte));
        }
    }

    /// Removes and returns the head, blocking while the channel is empty.
    ///
    /// # Panics
    ///
    /// Never panics in practice: every `Channel` handle keeps its own
    /// sender alive, so the receiver cannot observe disconnection.
    #[must_use]
    pub fn pop(&self) -> i64 {
        self.rx
            .recv()
            .expect("every channel handle keeps a sender alive")
    }

    /// Removes and returns the head, or `None` when the channel is empty.
    #[must_use]
    pub fn try_pop(&self) -> Option<i64> {
        self.rx.try_recv().ok()
    }

    /// Removes and returns every currently pending element, oldest first.
    /// Never blocks.
    #[must_use]
    pub fn drain(&self) -> Vec<i64> {
        self.rx.try_iter().collect()
    }

    /// Returns the number of currently pending elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns true when no elements are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use proptest::prelude::*;

    use super::Channel;

    #[test]
    fn pops_observe_push_order() {
        let channel = Channel::new();
        for value in [3, 1, 4, 1, 5] {
            channel.push(value);
        }
        assert_eq!(channel.len(), 5);
        assert_eq!(channel.drain(), vec![3, 1, 4, 1, 5]);
        assert!(channel.is_empty());
    }

    #[test]
    fn try_pop_on_empty_channel_is_none() {
        let channel = Channel::new();
        assert_eq!(channel.try_pop(), None);
        channel.push(9);
        assert_eq!(channel.try_pop(), Some(9));
        assert_eq!(channel.try_pop(), None);
    }

    #[test]
    fn pop_blocks_until_another_handle_pushes() {
        let channel = Channel::new();
        let producer = channel.clone();
        let consumer = thread::spawn(move || channel.pop());
        producer.push(17);
        assert_eq!(consumer.join().expect("consumer should finish"), 17);
    }

    #[test]
    fn push_ascii_pushes_byte_values_in_order() {
        let channel = Channel::new();
        channel.push_ascii("A,B\n");
        assert_eq!(channel.drain(), vec![65, 44, 66, 10]);
    }

    #[test]
    fn concurrent_producers_each_keep_their_own_order() {
        let channel = Channel::new();
        let a = channel.clone();
        let b = channel.clone();
        let writer_a = thread::spawn(move || {
            for k in 0..100 {
                a.push(k);
            }
        });
        let writer_b = thread::spawn(move || {
            for k in 1000..1100 {
                b.push(k);
            }
        });
        writer_a.join().expect("producer a should finish");
        writer_b.join().expect("producer b should finish");

        let values = channel.drain();
        assert_eq!(values.len(), 200);
        let from_a: Vec<i64> = values.iter().copied().filter(|v| *v < 1000).collect();
        let from_b: Vec<i64> = values.iter().copied().filter(|v| *v >= 1000).collect();
        assert_eq!(from_a, (0..100).collect::<Vec<i64>>());
        assert_eq!(from_b, (1000..1100).collect::<Vec<i64>>());
    }

    proptest! {
        #[test]
        fn property_fifo_law_over_arbitrary_sequences(values in proptest::collection::vec(any::<i64>(), 0..64)) {
            let channel = Channel::new();
            for value in &values {
                channel.push(*value);
            }
            let mut popped = Vec::with_capacity(values.len());
            while let Some(value) = channel.try_pop() {
                popped.push(value);
            }
            prop_assert_eq!(popped, values);
        }
    }
}
