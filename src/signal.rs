//! # Signal Bridge
//!
//! Maps OS-level interrupt/terminate delivery to in-process callbacks.
//!
//! The only process-wide state is the kind→callback map, and it stores
//! opaque callbacks — never pointers into UI state. An async-signal-safe
//! handler cannot run arbitrary closures, so [`SignalBridge`] parks a
//! `signal-hook` listener thread that receives raw signals and forwards
//! them to [`SignalRegistry::dispatch`] on its own execution context.

use log::{debug, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// The signal classes the console reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Interrupt,
    Terminate,
}

impl SignalKind {
    fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            SIGINT => Some(SignalKind::Interrupt),
            SIGTERM => Some(SignalKind::Terminate),
            _ => None,
        }
    }
}

type SignalCallback = Box<dyn Fn() + Send + Sync>;

/// Process-lifetime registry of signal callbacks with explicit
/// register/unregister. Its lock is distinct from any render-state lock:
/// dispatch runs on the bridge thread, never on the render loop.
#[derive(Default)]
pub struct SignalRegistry {
    callbacks: Mutex<HashMap<SignalKind, SignalCallback>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SignalKind, SignalCallback>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a callback for `kind`, replacing any previous one.
    pub fn register(&self, kind: SignalKind, callback: impl Fn() + Send + Sync + 'static) {
        debug!("registering signal callback for {kind:?}");
        self.lock().insert(kind, Box::new(callback));
    }

    /// Remove the callback for `kind`. Subsequent dispatches are no-ops.
    pub fn unregister(&self, kind: SignalKind) {
        debug!("unregistering signal callback for {kind:?}");
        self.lock().remove(&kind);
    }

    /// Invoke the callback registered for `kind`, if any.
    pub fn dispatch(&self, kind: SignalKind) {
        let callbacks = self.lock();
        match callbacks.get(&kind) {
            Some(callback) => callback(),
            None => debug!("no callback registered for {kind:?}, ignoring"),
        }
    }
}

/// Listener thread tying OS signal delivery to a [`SignalRegistry`].
/// Dropping the bridge closes the listener and joins the thread.
pub struct SignalBridge {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalBridge {
    /// Start listening for SIGINT/SIGTERM and forward them to `registry`.
    pub fn install(registry: Arc<SignalRegistry>) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();
        let thread = thread::spawn(move || {
            for raw in signals.forever() {
                match SignalKind::from_raw(raw) {
                    Some(kind) => {
                        info!("received {kind:?} signal");
                        registry.dispatch(kind);
                    }
                    None => warn!("ignoring unexpected signal {raw}"),
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
