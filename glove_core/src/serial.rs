//! Interrupt-driven full-duplex serial transport.
//!
//! Two independent byte pipes, each backed by one [`RingQueue`]: the
//! control loop enqueues into the send queue and drains the receive
//! queue; the platform layer invokes [`SerialTransport::on_tx_ready`]
//! whenever the output register is empty and [`SerialTransport::on_rx`]
//! for every arriving byte. On the device those entry points are the
//! transmit-ready and receive-complete interrupt service routines; in
//! the simulation they are called from the wire thread.
//!
//! The transmit interrupt is edge-enabled: `send` arms it, and the
//! handler disarms it the moment the send queue drains, so an idle link
//! never busy-storms the handler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ring::{RingQueue, SERIAL_QUEUE_CAPACITY};
use crate::sync::IrqCell;

/// Cloneable handle to one logical serial channel. Clones share the
/// same queues, so the control loop and the handler context each hold
/// their own handle.
#[derive(Clone)]
pub struct SerialTransport {
    tx: IrqCell<RingQueue<SERIAL_QUEUE_CAPACITY>>,
    rx: IrqCell<RingQueue<SERIAL_QUEUE_CAPACITY>>,
    tx_armed: Arc<AtomicBool>,
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialTransport {
    pub fn new() -> Self {
        Self {
            tx: IrqCell::new(RingQueue::new()),
            rx: IrqCell::new(RingQueue::new()),
            tx_armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enqueue bytes for transmission and arm the transmit-ready
    /// notification. Always succeeds; under sustained backpressure the
    /// oldest unsent bytes are silently overwritten (ring contract).
    pub fn send(&self, bytes: &[u8]) {
        self.tx.with(|q| q.write(bytes));
        self.tx_armed.store(true, Ordering::Release);
    }

    /// NUL-terminated text overload of [`send`](Self::send), used for
    /// human-readable diagnostics.
    pub fn send_str(&self, msg: &str) {
        self.tx.with(|q| q.write_str(msg));
        self.tx_armed.store(true, Ordering::Release);
    }

    /// Non-blocking drain of up to `out.len()` received bytes; returns
    /// the actual count, 0 when nothing is pending.
    pub fn recv(&self, out: &mut [u8]) -> usize {
        self.rx.with(|q| q.read(out))
    }

    /// Whether the platform layer should keep delivering
    /// transmit-ready notifications.
    pub fn tx_armed(&self) -> bool {
        self.tx_armed.load(Ordering::Acquire)
    }

    /// Transmit-ready handler entry point: pop the next byte for the
    /// output register. Disarms itself when the queue drains so the
    /// notification source can be switched off. Bounded: one queue
    /// operation.
    pub fn on_tx_ready(&self) -> Option<u8> {
        self.tx.with(|q| {
            let mut byte = [0u8; 1];
            let n = q.read(&mut byte);
            if q.is_empty() {
                self.tx_armed.store(false, Ordering::Release);
            }
            (n == 1).then_some(byte[0])
        })
    }

    /// Receive-complete handler entry point: unconditionally enqueue
    /// the incoming byte (lossy when the receive queue is full).
    /// Bounded: one queue operation.
    pub fn on_rx(&self, byte: u8) {
        self.rx.with(|q| q.write(&[byte]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_handler_bytes_arrive_in_order() {
        let t = SerialTransport::new();
        for b in [0x81, 0x02, 0x00, 0x2A] {
            t.on_rx(b);
        }
        let mut out = [0u8; 64];
        let n = t.recv(&mut out);
        assert_eq!(&out[..n], &[0x81, 0x02, 0x00, 0x2A]);
    }

    #[test]
    fn send_arms_and_drain_disarms() {
        let t = SerialTransport::new();
        assert!(!t.tx_armed());
        t.send(&[1, 2]);
        assert!(t.tx_armed());
        assert_eq!(t.on_tx_ready(), Some(1));
        assert!(t.tx_armed());
        assert_eq!(t.on_tx_ready(), Some(2));
        assert!(!t.tx_armed());
        assert_eq!(t.on_tx_ready(), None);
    }

    #[test]
    fn send_str_stops_at_nul() {
        let t = SerialTransport::new();
        t.send_str("hi\0junk");
        let mut wire = Vec::new();
        while let Some(b) = t.on_tx_ready() {
            wire.push(b);
        }
        assert_eq!(wire, b"hi");
    }

    #[test]
    fn clones_are_the_same_channel() {
        let main = SerialTransport::new();
        let handler = main.clone();
        main.send(&[7]);
        assert_eq!(handler.on_tx_ready(), Some(7));
    }
}
