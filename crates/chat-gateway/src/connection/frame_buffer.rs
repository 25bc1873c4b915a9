//! Frame buffer for accumulating fragmented reads.
//!
//! The transport reports each fragment together with the number of bytes
//! still outstanding for the current frame. Once that count reaches zero
//! the accumulated bytes form one complete frame.

use bytes::{Bytes, BytesMut};

use crate::error::DecodeError;

const INITIAL_CAPACITY: usize = 16 * 1024;

/// Accumulates fragments of one inbound frame at a time
#[derive(Debug)]
pub struct FrameBuffer {
    buffer: BytesMut,
    max_frame_bytes: usize,
    /// Set while the tail of an oversized frame is being dropped
    discarding: bool,
}

impl FrameBuffer {
    /// Create a buffer that refuses frames larger than `max_frame_bytes`
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY.min(max_frame_bytes)),
            max_frame_bytes,
            discarding: false,
        }
    }

    /// Append a fragment; returns the whole frame once `remaining` is zero
    ///
    /// Empty flushes on an empty buffer produce nothing. An oversized frame
    /// is reported once and the rest of it is dropped silently.
    pub fn push(&mut self, fragment: &[u8], remaining: usize) -> Result<Option<Bytes>, DecodeError> {
        if self.discarding {
            if remaining == 0 {
                self.discarding = false;
            }
            return Ok(None);
        }

        let expected = self
            .buffer
            .len()
            .saturating_add(fragment.len())
            .saturating_add(remaining);
        if expected > self.max_frame_bytes {
            self.buffer.clear();
            self.discarding = remaining > 0;
            return Err(DecodeError::Oversized {
                max: self.max_frame_bytes,
            });
        }

        self.buffer.extend_from_slice(fragment);

        if remaining > 0 || self.buffer.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.buffer.split().freeze()))
    }

    /// Bytes accumulated for the frame in progress
    #[inline]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}
