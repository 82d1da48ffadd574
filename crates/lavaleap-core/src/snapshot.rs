use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use rmp_serde::decode::Error as DecodeError;
pub use rmp_serde::encode::Error as EncodeError;

/// Encode a frame snapshot as MessagePack for handoff to a renderer.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    rmp_serde::to_vec(value)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    rmp_serde::from_slice(bytes)
}

/// A published frame: the sequence number and an immutable value.
#[derive(Debug)]
pub struct Published<T> {
    pub frame: u64,
    pub value: T,
}

type Slot<T> = Arc<Mutex<Arc<Published<T>>>>;

/// Simulation-side half of a double-buffered snapshot slot.
///
/// The writer builds the next frame off to the side and swaps it in; readers
/// only ever see a complete, immutable frame.
#[derive(Debug)]
pub struct SnapshotWriter<T> {
    slot: Slot<T>,
    frame: u64,
}

/// Render-side half. Cheap to clone.
#[derive(Debug)]
pub struct SnapshotReader<T> {
    slot: Slot<T>,
}

impl<T> Clone for SnapshotReader<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Create a connected writer/reader pair seeded with `initial` as frame 0.
pub fn snapshot_channel<T>(initial: T) -> (SnapshotWriter<T>, SnapshotReader<T>) {
    let slot = Arc::new(Mutex::new(Arc::new(Published {
        frame: 0,
        value: initial,
    })));
    (
        SnapshotWriter {
            slot: Arc::clone(&slot),
            frame: 0,
        },
        SnapshotReader { slot },
    )
}

fn lock<T>(slot: &Slot<T>) -> MutexGuard<'_, Arc<Published<T>>> {
    // A panicking reader cannot leave a half-written frame behind: the swap
    // is a single pointer assignment.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T> SnapshotWriter<T> {
    /// Publish the next frame, returning its sequence number.
    pub fn publish(&mut self, value: T) -> u64 {
        self.frame += 1;
        let next = Arc::new(Published {
            frame: self.frame,
            value,
        });
        *lock(&self.slot) = next;
        self.frame
    }
}

impl<T> SnapshotReader<T> {
    /// The most recently published frame.
    pub fn latest(&self) -> Arc<Published<T>> {
        Arc::clone(&lock(&self.slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Frame {
        x: f32,
        label: String,
    }

    #[test]
    fn reader_sees_initial_frame() {
        let (_writer, reader) = snapshot_channel(5u32);
        let latest = reader.latest();
        assert_eq!(latest.frame, 0);
        assert_eq!(latest.value, 5);
    }

    #[test]
    fn held_frame_is_not_mutated_by_publish() {
        let (mut writer, reader) = snapshot_channel(vec![1, 2, 3]);
        let held = reader.latest();
        assert_eq!(writer.publish(vec![9]), 1);
        assert_eq!(held.value, vec![1, 2, 3]);
        let fresh = reader.clone().latest();
        assert_eq!(fresh.frame, 1);
        assert_eq!(fresh.value, vec![9]);
    }

    #[test]
    fn publish_across_threads() {
        let (mut writer, reader) = snapshot_channel(0u64);
        let render = std::thread::spawn(move || {
            let mut last = 0;
            for _ in 0..1000 {
                let frame = reader.latest();
                assert!(frame.frame >= last, "frames must never go backwards");
                assert_eq!(frame.value, frame.frame * 10);
                last = frame.frame;
            }
        });
        for i in 1..=500u64 {
            writer.publish(i * 10);
        }
        render.join().expect("render thread panicked");
    }

    #[test]
    fn messagepack_encoding() {
        let frame = Frame {
            x: 1.5,
            label: "idle".to_string(),
        };
        let bytes = encode(&frame).expect("encode");
        let back: Frame = decode(&bytes).expect("decode");
        assert_eq!(back, frame);
        assert!(decode::<Frame>(&[0xc1]).is_err());
    }
}
