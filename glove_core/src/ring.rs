//! Bounded wraparound byte queue shared between the main loop and the
//! serial handlers.
//!
//! The queue carries its two indices modulo the capacity and nothing
//! else: there is no occupancy bit, no full flag, no overflow signal.
//! Writes past the unread length silently overwrite the oldest unread
//! bytes. That lossy-under-backpressure behavior is a contract, not an
//! accident; DESIGN.md records it as an open question.

/// Byte capacity of the serial send/receive queues.
pub const SERIAL_QUEUE_CAPACITY: usize = 64;

/// Fixed-capacity FIFO byte queue with wraparound indices.
///
/// `N` must be a power of two so the wraparound is a single bitmask
/// instead of a division. On the device that is a hard performance
/// requirement; here it is enforced at compile time and kept as a
/// documented invariant of the type.
#[derive(Debug, Clone)]
pub struct RingQueue<const N: usize> {
    buf: [u8; N],
    read_idx: usize,
    write_idx: usize,
}

impl<const N: usize> RingQueue<N> {
    // N is a power of two, so N - 1 is all ones and `& MASK` is the
    // modulo. Evaluated at compile time; a non-power-of-two N fails
    // the build.
    const MASK: usize = {
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");
        N - 1
    };

    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            read_idx: 0,
            write_idx: 0,
        }
    }

    /// Reset both indices. Any unread data becomes unreachable.
    pub fn clear(&mut self) {
        self.read_idx = 0;
        self.write_idx = 0;
    }

    /// Copy `data` into the queue byte by byte, wrapping the write
    /// index. Never fails, never blocks; overwrites the oldest unread
    /// bytes when `data.len()` exceeds the free space.
    pub fn write(&mut self, data: &[u8]) {
        for &b in data {
            self.buf[self.write_idx] = b;
            self.write_idx = (self.write_idx + 1) & Self::MASK;
        }
    }

    /// Text overload for NUL-terminated diagnostics: writes the bytes
    /// of `s` up to (excluding) the first NUL.
    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        match bytes.iter().position(|&b| b == 0) {
            Some(nul) => self.write(&bytes[..nul]),
            None => self.write(bytes),
        }
    }

    /// Copy up to `out.len()` bytes out of the queue, returning the
    /// count actually copied. A short read means the queue drained;
    /// it is not an error.
    pub fn read(&mut self, out: &mut [u8]) -> usize {
        for (i, slot) in out.iter_mut().enumerate() {
            if self.is_empty() {
                return i;
            }
            *slot = self.buf[self.read_idx];
            self.read_idx = (self.read_idx + 1) & Self::MASK;
        }
        out.len()
    }

    /// Unread byte count: `(write - read) mod N`, with the wrapped
    /// case handled explicitly.
    pub fn len(&self) -> usize {
        if self.write_idx >= self.read_idx {
            self.write_idx - self.read_idx
        } else {
            N + self.write_idx - self.read_idx
        }
    }

    /// Empty iff the indices coincide. A writer that laps the reader
    /// by exactly a multiple of `N` therefore reads as empty; that is
    /// a consequence of the two-index representation and is preserved.
    pub fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }
}

impl<const N: usize> Default for RingQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_roundtrip() {
        let mut q: RingQueue<8> = RingQueue::new();
        q.write(&[1, 2, 3, 4, 5]);
        assert_eq!(q.len(), 5);
        let mut out = [0u8; 8];
        let n = q.read(&mut out);
        assert_eq!(&out[..n], &[1, 2, 3, 4, 5]);
        assert!(q.is_empty());
    }

    #[test]
    fn short_read_is_normal() {
        let mut q: RingQueue<8> = RingQueue::new();
        q.write(&[9, 8]);
        let mut out = [0u8; 6];
        assert_eq!(q.read(&mut out), 2);
        assert_eq!(q.read(&mut out), 0);
    }

    #[test]
    fn len_handles_wrapped_indices() {
        let mut q: RingQueue<8> = RingQueue::new();
        let mut out = [0u8; 8];
        // Move both indices near the end, then wrap the writer.
        q.write(&[0; 6]);
        assert_eq!(q.read(&mut out[..6]), 6);
        q.write(&[1, 2, 3, 4]);
        assert_eq!(q.len(), 4);
        let n = q.read(&mut out);
        assert_eq!(&out[..n], &[1, 2, 3, 4]);
    }

    #[test]
    fn overwrite_keeps_most_recent_readable_suffix() {
        let mut q: RingQueue<8> = RingQueue::new();
        q.write(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        // 11 mod 8 = 3 readable bytes, and they are the newest three.
        assert_eq!(q.len(), 3);
        let mut out = [0u8; 8];
        let n = q.read(&mut out);
        assert_eq!(&out[..n], &[9, 10, 11]);
    }

    #[test]
    fn writing_exactly_capacity_reads_as_empty() {
        let mut q: RingQueue<8> = RingQueue::new();
        q.write(&[0xAA; 8]);
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn write_str_stops_at_nul() {
        let mut q: RingQueue<16> = RingQueue::new();
        q.write_str("ok\0discarded");
        let mut out = [0u8; 16];
        let n = q.read(&mut out);
        assert_eq!(&out[..n], b"ok");
    }
}
