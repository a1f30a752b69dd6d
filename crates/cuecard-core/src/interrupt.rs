#![forbid(unsafe_code)]

//! Process-wide interrupt handling.
//!
//! A single [`Interrupts`] context is created at startup and shared by handle
//! (`Arc`) with everything that needs to observe or raise an interrupt. It
//! bundles three pieces of state:
//!
//! 1. **Interrupt flag** - raised by SIGINT/SIGTERM (via `signal-hook`) or
//!    by the Ctrl+C key in raw mode, polled by the countdown every tick.
//! 2. **Confirmation gate** - at most one "quit?" prompt is in flight; an
//!    interrupt that arrives while the prompt is open is swallowed.
//! 3. **Shutdown hook** - a callback run once when the user confirms quit.
//!
//! Nothing here preempts the control thread. Signal delivery only flips an
//! atomic; the loop decides when to look at it.
//!
//! # Usage
//!
//! ```
//! use cuecard_core::interrupt::Interrupts;
//!
//! let interrupts = Interrupts::new();
//! assert!(!interrupts.is_raised());
//!
//! interrupts.raise();
//! assert!(interrupts.take());
//! assert!(!interrupts.is_raised());
//! ```

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};

type ShutdownHook = Box<dyn FnOnce() + Send>;

/// Shared interrupt state. See the module docs.
pub struct Interrupts {
    raised: Arc<AtomicBool>,
    confirming: AtomicBool,
    shutdown_hook: Mutex<Option<ShutdownHook>>,
}

impl fmt::Debug for Interrupts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupts")
            .field("raised", &self.is_raised())
            .field("confirming", &self.is_confirming())
            .finish_non_exhaustive()
    }
}

impl Default for Interrupts {
    fn default() -> Self {
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            confirming: AtomicBool::new(false),
            shutdown_hook: Mutex::new(None),
        }
    }
}

impl Interrupts {
    /// Create a fresh context behind an `Arc`, ready to be handed out.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raise the interrupt flag.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
        #[cfg(feature = "tracing")]
        tracing::debug!("interrupt raised");
    }

    /// Whether an interrupt is pending.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Consume a pending interrupt. Returns `true` if one was pending.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }

    /// Drop any pending interrupt without acting on it.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }

    /// Whether a quit confirmation is currently open.
    pub fn is_confirming(&self) -> bool {
        self.confirming.load(Ordering::SeqCst)
    }

    /// Try to open the quit confirmation.
    ///
    /// Returns `None` if a confirmation is already in flight. The gate
    /// closes again when the returned guard is dropped.
    pub fn begin_confirmation(&self) -> Option<ConfirmGuard<'_>> {
        self.confirming
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ConfirmGuard { interrupts: self })
    }

    /// Register the callback run by [`Interrupts::run_shutdown_hook`].
    ///
    /// Replaces any previously registered hook.
    pub fn set_shutdown_hook(&self, hook: impl FnOnce() + Send + 'static) {
        if let Ok(mut slot) = self.shutdown_hook.lock() {
            *slot = Some(Box::new(hook));
        }
    }

    /// Run the shutdown hook, if one is registered. Runs at most once.
    ///
    /// Returns `true` if a hook ran.
    pub fn run_shutdown_hook(&self) -> bool {
        let hook = match self.shutdown_hook.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        match hook {
            Some(hook) => {
                #[cfg(feature = "tracing")]
                tracing::info!("running shutdown hook");
                hook();
                true
            }
            None => false,
        }
    }

    /// Route SIGINT and SIGTERM into the interrupt flag.
    ///
    /// Signals stay routed until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handlers cannot be registered.
    pub fn install_signal_handlers(&self) -> io::Result<SignalGuard> {
        SignalGuard::new(Arc::clone(&self.raised))
    }
}

/// Keeps the quit confirmation gate closed while alive.
#[derive(Debug)]
pub struct ConfirmGuard<'a> {
    interrupts: &'a Interrupts,
}

impl Drop for ConfirmGuard<'_> {
    fn drop(&mut self) {
        self.interrupts.confirming.store(false, Ordering::SeqCst);
    }
}

/// Registered signal handlers; unregistered on drop.
#[derive(Debug)]
pub struct SignalGuard {
    #[cfg(unix)]
    ids: Vec<signal_hook::SigId>,
}

impl SignalGuard {
    #[cfg(unix)]
    fn new(flag: Arc<AtomicBool>) -> io::Result<Self> {
        let mut ids = Vec::with_capacity(2);
        for signal in [SIGINT, SIGTERM] {
            ids.push(signal_hook::flag::register(signal, Arc::clone(&flag))?);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("SIGINT/SIGTERM routed to interrupt flag");
        Ok(Self { ids })
    }

    #[cfg(not(unix))]
    fn new(_flag: Arc<AtomicBool>) -> io::Result<Self> {
        Ok(Self {})
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            for id in self.ids.drain(..) {
                signal_hook::low_level::unregister(id);
            }
        }
    }
}
