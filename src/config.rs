/// Configuration applied to a stream rule before its body runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Stop writing to the real destination.
    pub mute: bool,

    /// Stop writing to the real destination, but replay everything written if the body fails.
    pub mute_for_successful_tests: bool,

    /// Record everything written so it can be read back as text.
    pub enable_log: bool,
}

impl CaptureConfig {
    /// The configuration matching a [`LogMode`].
    pub fn for_log_mode(mode: LogMode) -> Self {
        Self {
            mute: mode == LogMode::LogOnly,
            mute_for_successful_tests: false,
            enable_log: true,
        }
    }
}

/// Whether a logging rule still lets writes through to the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogMode {
    /// Capture and keep writing to the stream.
    #[default]
    LogAndWriteToStream,

    /// Capture only.
    LogOnly,
}
