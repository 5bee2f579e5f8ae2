//! The calling thread's standard streams and properties.
//!
//! Each thread gets its own slots, so tests running in parallel threads never see each other's
//! interceptions. Handles are cheap clones sharing the thread's state.

use crate::properties::SystemProperties;
use crate::sink::{Sink, WriteSink};
use crate::slot::{Handle, InputSlot, Slot, StreamSlot};
use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Console {
    pub out: StreamSlot,
    pub err: StreamSlot,
    pub input: InputSlot,
    pub properties: SystemProperties,
}

impl Console {
    /// Slots wired to the process's real standard streams.
    pub fn new() -> Self {
        let stdout: Handle<dyn Sink> = Rc::new(RefCell::new(WriteSink::new(io::stdout())));
        let stderr: Handle<dyn Sink> = Rc::new(RefCell::new(WriteSink::new(io::stderr())));
        let stdin: Handle<dyn Read> = Rc::new(RefCell::new(io::stdin()));
        Self {
            out: Slot::new("standard output", stdout),
            err: Slot::new("standard error", stderr),
            input: Slot::new("standard input", stdin),
            properties: SystemProperties::platform_defaults(),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONSOLE: Console = Console::new();
}

/// This thread's console.
pub fn current() -> Console {
    CONSOLE.with(Console::clone)
}

/// This thread's standard output slot.
pub fn out() -> StreamSlot {
    CONSOLE.with(|console| console.out.clone())
}

/// This thread's standard error slot.
pub fn err() -> StreamSlot {
    CONSOLE.with(|console| console.err.clone())
}

/// This thread's standard input slot.
pub fn input() -> InputSlot {
    CONSOLE.with(|console| console.input.clone())
}

/// This thread's properties.
pub fn properties() -> SystemProperties {
    CONSOLE.with(|console| console.properties.clone())
}
