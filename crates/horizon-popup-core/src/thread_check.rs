//! Thread affinity checks for UI-thread-only state.
//!
//! Popup controllers and the scheduler are `!Send`, so the compiler already
//! keeps them on one thread. Callbacks handed to a host through FFI glue can
//! still slip past that, so controllers also record the thread they were
//! created on and check it on entry in debug builds.
//!
//! ```
//! use horizon_popup_core::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! affinity.debug_check("show");
//! assert!(affinity.is_owner_thread());
//! ```

use std::thread::ThreadId;

/// The thread an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            owner: std::thread::current().id(),
        }
    }

    #[inline]
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the owner.
    #[inline]
    pub fn is_owner_thread(&self) -> bool {
        std::thread::current().id() == self.owner
    }

    /// Panic unless called on the owner thread. `operation` names what was
    /// attempted, for the panic message.
    pub fn check(&self, operation: &str) {
        if !self.is_owner_thread() {
            self.violation(operation);
        }
    }

    /// [`check`](Self::check) in debug builds, nothing in release builds.
    #[inline]
    pub fn debug_check(&self, operation: &str) {
        #[cfg(debug_assertions)]
        self.check(operation);
        #[cfg(not(debug_assertions))]
        let _ = operation;
    }

    #[cold]
    #[inline(never)]
    fn violation(&self, operation: &str) -> ! {
        let current = std::thread::current();
        panic!(
            "popup thread affinity violation: `{operation}` called on thread {:?} ({:?}), \
             but the popup belongs to thread {:?}; schedule the call on the UI thread instead",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
            self.owner,
        )
    }
}
