//! Process properties and the rules that snapshot and restore them.

use crate::rule::TestRule;
use crate::scope::ScopeError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

pub const LINE_SEPARATOR: &str = "line.separator";
pub const FILE_ENCODING: &str = "file.encoding";
pub const OS_NAME: &str = "os.name";

/// A point-in-time copy of every property.
pub type PropertiesSnapshot = BTreeMap<String, String>;

/// String properties shared by everything holding a clone of this handle.
#[derive(Debug, Clone, Default)]
pub struct SystemProperties {
    values: Rc<RefCell<PropertiesSnapshot>>,
}

impl SystemProperties {
    /// An empty property set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Properties describing the running platform.
    pub fn platform_defaults() -> Self {
        let properties = Self::empty();
        let line_separator = if cfg!(windows) { "\r\n" } else { "\n" };
        properties.set(LINE_SEPARATOR, line_separator);
        properties.set(FILE_ENCODING, platform_file_encoding());
        properties.set(OS_NAME, std::env::consts::OS);
        properties
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Sets a property and returns its previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.borrow_mut().insert(key.into(), value.into())
    }

    /// Removes a property and returns its previous value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.borrow_mut().remove(key)
    }

    pub fn snapshot(&self) -> PropertiesSnapshot {
        self.values.borrow().clone()
    }

    /// Replaces every property with the snapshot's contents.
    pub fn restore(&self, snapshot: PropertiesSnapshot) {
        *self.values.borrow_mut() = snapshot;
    }

    /// The platform line separator, falling back to `\n`.
    pub fn line_separator(&self) -> String {
        self.get(LINE_SEPARATOR).unwrap_or_else(|| "\n".to_string())
    }
}

#[cfg(windows)]
fn platform_file_encoding() -> String {
    use windows::Win32::Globalization::GetACP;

    // The ANSI code page, not the console's OEM one.
    let code_page = unsafe { GetACP() };
    crate::encoding::file_encoding_for_code_page(code_page)
}

#[cfg(not(windows))]
fn platform_file_encoding() -> String {
    "UTF-8".to_string()
}

/// Restores the snapshot when dropped.
struct RestoreGuard<'a> {
    properties: &'a SystemProperties,
    snapshot: Option<PropertiesSnapshot>,
}

impl<'a> RestoreGuard<'a> {
    fn new(properties: &'a SystemProperties) -> Self {
        Self {
            properties,
            snapshot: Some(properties.snapshot()),
        }
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            debug!("Restoring {} system properties", snapshot.len());
            self.properties.restore(snapshot);
        }
    }
}

/// Undoes every property change made while the body runs.
#[derive(Debug, Clone)]
pub struct RestoreSystemProperties {
    properties: SystemProperties,
}

impl RestoreSystemProperties {
    pub fn new(properties: &SystemProperties) -> Self {
        Self {
            properties: properties.clone(),
        }
    }
}

impl TestRule for RestoreSystemProperties {
    fn apply<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<ScopeError>,
    {
        let _guard = RestoreGuard::new(&self.properties);
        body()
    }
}

/// Sets (or clears) properties for the duration of the body.
#[derive(Debug, Clone)]
pub struct ProvideSystemProperty {
    properties: SystemProperties,
    values: Vec<(String, Option<String>)>,
}

impl ProvideSystemProperty {
    pub fn new(properties: &SystemProperties) -> Self {
        Self {
            properties: properties.clone(),
            values: Vec::new(),
        }
    }

    /// Provides `value` for `key`.
    pub fn and(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((key.into(), Some(value.into())));
        self
    }

    /// Removes `key` while the body runs.
    pub fn and_cleared(mut self, key: impl Into<String>) -> Self {
        self.values.push((key.into(), None));
        self
    }
}

impl TestRule for ProvideSystemProperty {
    fn apply<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<ScopeError>,
    {
        let _guard = RestoreGuard::new(&self.properties);
        for (key, value) in &self.values {
            match value {
                Some(value) => {
                    self.properties.set(key.clone(), value.clone());
                }
                None => {
                    self.properties.remove(key);
                }
            }
        }
        body()
    }
}
