//! Background threads standing in for the serial and timer interrupts.
//!
//! On the real device the transmit-ready, receive-complete and timer
//! handlers run in interrupt context. Here each is a thread that calls
//! the same handler entry points at a configurable pace. Every spawned
//! thread is shut down and joined when its owner is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel as xch;
use glove_core::SerialTransport;
use glove_core::scheduler::TickHandle;
use glove_core::util::period_us;

/// Byte-level serial wire between a transport and a pair of channels
/// representing the host end.
pub struct SerialWire {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl SerialWire {
    /// Spawn the wire thread. Armed transmit bytes drain to `to_host`;
    /// bytes from `from_host` are delivered through the receive
    /// handler. `poll` paces the loop when the wire is idle.
    pub fn spawn(
        transport: SerialTransport,
        to_host: xch::Sender<u8>,
        from_host: xch::Receiver<u8>,
        poll: Duration,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("serial wire thread received shutdown signal");
                    break;
                }

                let mut moved = false;
                if transport.tx_armed()
                    && let Some(byte) = transport.on_tx_ready()
                {
                    moved = true;
                    if to_host.send(byte).is_err() {
                        tracing::debug!("host receiver disconnected, wire exiting");
                        break;
                    }
                }
                while let Ok(byte) = from_host.try_recv() {
                    moved = true;
                    transport.on_rx(byte);
                }

                if !moved {
                    std::thread::sleep(poll);
                }
            }
            tracing::trace!("serial wire thread exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for SerialWire {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "serial wire thread panicked during shutdown");
        }
    }
}

/// Periodic tick source for the cooldown timers.
pub struct TickTimer {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TickTimer {
    pub fn spawn(handle: TickHandle, hz: u32) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let period = Duration::from_micros(period_us(hz));

        let join_handle = std::thread::spawn(move || {
            while !shutdown_clone.load(Ordering::Relaxed) {
                handle.on_tick();
                std::thread::sleep(period);
            }
            tracing::trace!("tick timer thread exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "tick timer thread panicked during shutdown");
        }
    }
}
