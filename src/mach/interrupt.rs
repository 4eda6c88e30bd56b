use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// ## Cooperative cancellation
///
/// Both flags are polled once per statement. A pause becomes a resumable
/// break; a stop unwinds the run with an error. Clones share the flags,
/// so a handle can be given to a signal handler or another thread.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    pause: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt::default()
    }

    pub fn pause(&self) {
        self.pause.store(true, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.pause.load(Ordering::SeqCst)
    }

    pub fn take_pause(&self) -> bool {
        self.pause.swap(false, Ordering::SeqCst)
    }

    pub fn take_stop(&self) -> bool {
        self.stop.swap(false, Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.pause.store(false, Ordering::SeqCst);
        self.stop.store(false, Ordering::SeqCst);
    }
}
