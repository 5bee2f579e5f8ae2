//! SysRules - intercept and restore standard streams and process properties around a test
//!
//! This crate replaces a stream with a managed proxy for the duration of a test body. The proxy can
//! mute the real destination, record everything written, and replay the recording to the real
//! destination when the body fails, so failure diagnostics are never lost. The previous stream is
//! always put back, whether the body returns, fails or panics.

pub mod capture;
pub mod cli;
pub mod config;
pub mod console;
pub mod encoding;
pub mod input;
pub mod managed;
pub mod properties;
pub mod rule;
pub mod runner;
pub mod scope;
pub mod sink;
pub mod slot;
pub mod stream_rule;

pub use capture::LogCapture;
pub use config::{CaptureConfig, LogMode};
pub use input::TextFromStandardInput;
pub use managed::ManagedStream;
pub use properties::{ProvideSystemProperty, RestoreSystemProperties, SystemProperties};
pub use rule::TestRule;
pub use scope::{InterceptionScope, ScopeError, ScopeState};
pub use sink::{MutableSink, Sink, Tee, WriteSink};
pub use slot::{Handle, InputSlot, Slot, StreamSlot};
pub use stream_rule::StreamRule;
