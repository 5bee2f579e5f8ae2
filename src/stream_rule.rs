//! Rules intercepting an output stream (standard output or standard error) for one test.

use crate::config::{CaptureConfig, LogMode};
use crate::console;
use crate::encoding::{EncodingError, TextEncoding};
use crate::managed::ManagedStream;
use crate::properties::SystemProperties;
use crate::rule::TestRule;
use crate::scope::{InterceptionScope, ScopeError};
use crate::sink::Sink;
use crate::slot::{Handle, StreamSlot};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

/// Replaces a stream with a [`ManagedStream`] while a body runs.
///
/// The managed stream is created when the rule is, wrapping whatever the slot held at that moment,
/// so it can be muted or have its log enabled before the body runs as well as from inside it. The
/// captured logs stay readable after `apply` returns.
///
/// If the body fails, the failure log bytes are written unchanged to the restored stream after
/// restoration. The failure log is only filled once [`StreamRule::enable_failure_log`] (usually
/// through [`StreamRule::mute_for_successful_tests`]) has been called.
pub struct StreamRule {
    slot: StreamSlot,
    properties: SystemProperties,
    stream: Rc<RefCell<ManagedStream>>,
}

impl StreamRule {
    /// Creates a rule for `slot`, decoding with the encoding named by `properties`.
    ///
    /// # Errors
    ///
    /// Fails if the `file.encoding` property does not name a supported encoding.
    pub fn new(slot: &StreamSlot, properties: &SystemProperties) -> Result<Self, EncodingError> {
        let encoding = TextEncoding::from_properties(properties)?;
        Ok(Self {
            slot: slot.clone(),
            properties: properties.clone(),
            stream: Rc::new(RefCell::new(ManagedStream::new(slot.current(), encoding))),
        })
    }

    /// A rule for this thread's standard output.
    pub fn stdout() -> Result<Self, EncodingError> {
        Self::new(&console::out(), &console::properties())
    }

    /// A rule for this thread's standard error.
    pub fn stderr() -> Result<Self, EncodingError> {
        Self::new(&console::err(), &console::properties())
    }

    /// A rule that logs everything and, for [`LogMode::LogOnly`], writes nothing to the stream.
    pub fn log_with_mode(
        slot: &StreamSlot,
        properties: &SystemProperties,
        mode: LogMode,
    ) -> Result<Self, EncodingError> {
        let rule = Self::new(slot, properties)?;
        rule.configure(&CaptureConfig::for_log_mode(mode));
        Ok(rule)
    }

    pub fn configure(&self, config: &CaptureConfig) -> &Self {
        if config.mute {
            self.mute();
        }
        if config.mute_for_successful_tests {
            self.mute_for_successful_tests();
        }
        if config.enable_log {
            self.enable_log();
        }
        self
    }

    /// Stops writing to the real stream for the rest of the rule's lifetime.
    pub fn mute(&self) -> &Self {
        self.stream.borrow_mut().mute();
        self
    }

    /// Mutes the stream but replays everything written if the body fails.
    pub fn mute_for_successful_tests(&self) -> &Self {
        self.mute().enable_failure_log()
    }

    /// Records everything written so it is replayed if the body fails.
    pub fn enable_failure_log(&self) -> &Self {
        self.stream.borrow_mut().enable_failure_log();
        self
    }

    pub fn enable_log(&self) -> &Self {
        self.stream.borrow_mut().enable_log();
        self
    }

    pub fn clear_log(&self) -> &Self {
        self.stream.borrow_mut().clear_log();
        self
    }

    /// Everything logged since the log was enabled or last cleared.
    pub fn log(&self) -> String {
        self.stream.borrow().log()
    }

    /// [`StreamRule::log`] with the platform line separator replaced by `\n`.
    pub fn log_with_normalized_line_separator(&self) -> String {
        normalize_line_separator(&self.log(), &self.properties.line_separator())
    }

    pub fn failure_log(&self) -> String {
        self.stream.borrow().failure_log()
    }

    pub fn slot(&self) -> &StreamSlot {
        &self.slot
    }

    fn write_failure_log(&self) -> io::Result<()> {
        let bytes = {
            let stream = self
                .stream
                .try_borrow()
                .map_err(|_| io::Error::other("managed stream is still borrowed"))?;
            if stream.failure_log_bytes().is_empty() {
                return Ok(());
            }
            stream.failure_log_bytes().to_vec()
        };
        let mut destination = self.slot.current();
        destination.write_bytes(&bytes)?;
        destination.flush()
    }
}

impl TestRule for StreamRule {
    fn apply<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<ScopeError>,
    {
        let replacement: Handle<dyn Sink> = self.stream.clone();
        InterceptionScope::new(&self.slot)
            .on_fault(|| self.write_failure_log())
            .run(replacement, body)
    }
}

/// Replaces every occurrence of `line_separator` with `\n`.
pub fn normalize_line_separator(text: &str, line_separator: &str) -> String {
    if line_separator.is_empty() || line_separator == "\n" {
        return text.to_string();
    }
    text.replace(line_separator, "\n")
}
