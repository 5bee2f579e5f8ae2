//! Installing a replacement handle for the lifetime of one body, and putting the previous one back.

use crate::slot::{Handle, Slot};
use std::io;
use std::thread;
use tracing::{debug, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("{stream} is already intercepted; interceptions of the same stream cannot be nested")]
    AlreadyIntercepted { stream: String },

    #[error("interception scope for {stream} has already finished")]
    ScopeFinished { stream: String },
}

impl From<ScopeError> for io::Error {
    fn from(err: ScopeError) -> Self {
        io::Error::other(err)
    }
}

/// Lifecycle of an [`InterceptionScope`]. Both `Restored*` states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    Inactive,
    Active,
    RestoredNormal,
    RestoredAfterFault,
}

type FaultHook<'a> = Box<dyn FnOnce() -> io::Result<()> + 'a>;

/// One interception of one slot.
///
/// Entering installs the replacement and remembers the previous handle. Leaving puts that handle
/// back, whatever the body installed meanwhile. Leaving after a fault (an `Err` from the body, or a
/// panic unwinding through the scope) then runs the fault hook against the restored slot. Hook
/// errors are logged and dropped so they never hide the body's fault.
pub struct InterceptionScope<'a, T: ?Sized> {
    slot: &'a Slot<T>,
    previous: Option<Handle<T>>,
    state: ScopeState,
    on_fault: Option<FaultHook<'a>>,
}

impl<'a, T: ?Sized> InterceptionScope<'a, T> {
    pub fn new(slot: &'a Slot<T>) -> Self {
        Self {
            slot,
            previous: None,
            state: ScopeState::Inactive,
            on_fault: None,
        }
    }

    /// Runs `hook` after restoration when the scope ends in a fault.
    pub fn on_fault(mut self, hook: impl FnOnce() -> io::Result<()> + 'a) -> Self {
        self.on_fault = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> ScopeState {
        self.state
    }

    /// Captures the slot's current handle and installs `replacement`.
    pub fn enter(&mut self, replacement: Handle<T>) -> Result<(), ScopeError> {
        match self.state {
            ScopeState::Inactive => {}
            ScopeState::Active => {
                return Err(ScopeError::AlreadyIntercepted {
                    stream: self.slot.name().to_string(),
                });
            }
            ScopeState::RestoredNormal | ScopeState::RestoredAfterFault => {
                return Err(ScopeError::ScopeFinished {
                    stream: self.slot.name().to_string(),
                });
            }
        }
        self.slot.begin_interception()?;
        self.previous = Some(self.slot.install(replacement));
        self.state = ScopeState::Active;
        debug!("Intercepting {}", self.slot.name());
        Ok(())
    }

    /// Leaves the scope after the body returned normally.
    pub fn complete(&mut self) {
        self.exit(false);
    }

    /// Leaves the scope after the body faulted.
    pub fn fail(&mut self) {
        self.exit(true);
    }

    /// Runs `body` with `replacement` installed.
    ///
    /// The body's result is returned unchanged.
    pub fn run<R, E>(
        mut self,
        replacement: Handle<T>,
        body: impl FnOnce() -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<ScopeError>,
    {
        self.enter(replacement)?;
        let result = body();
        self.exit(result.is_err());
        result
    }

    fn exit(&mut self, faulted: bool) {
        if self.state != ScopeState::Active {
            return;
        }
        if let Some(previous) = self.previous.take() {
            self.slot.install(previous);
        }
        self.slot.end_interception();

        if !faulted {
            self.state = ScopeState::RestoredNormal;
            debug!("Restored {}", self.slot.name());
            return;
        }

        self.state = ScopeState::RestoredAfterFault;
        debug!("Restored {} after a fault", self.slot.name());
        if let Some(hook) = self.on_fault.take() {
            if let Err(e) = hook() {
                warn!(
                    "Failed to write the failure log to {}: {}",
                    self.slot.name(),
                    e
                );
            }
        }
    }
}

impl<T: ?Sized> Drop for InterceptionScope<'_, T> {
    fn drop(&mut self) {
        self.exit(thread::panicking());
    }
}
