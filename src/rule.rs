use crate::scope::ScopeError;

/// Something that wraps a test body with setup and guaranteed teardown.
///
/// The body's own error (or panic) always reaches the caller unchanged. `E: From<ScopeError>` lets a
/// rule report that it could not be entered through the body's error type.
pub trait TestRule {
    fn apply<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<ScopeError>;
}
