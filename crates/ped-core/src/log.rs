//! Diagnostics surfaced through caller-registered callbacks.
//!
//! The engine never writes to a destination itself.  Each message is
//! emitted as a `tracing` event (visible to any installed subscriber) and
//! handed to the callback registered for its level, if there is one.

use std::fmt;

/// Severity of a diagnostic message.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warning, LogLevel::Error];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug   => "debug",
            LogLevel::Info    => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error   => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host-supplied message sink.
pub type LogCallback = Box<dyn Fn(&str) + Send + Sync + 'static>;

/// Per-level callback registry.
///
/// Messages are only formatted into a `String` when a callback is registered
/// for their level.
#[derive(Default)]
pub struct Logger {
    callbacks: [Option<LogCallback>; 4],
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `level`, replacing any previous one.
    pub fn set_callback<F>(&mut self, level: LogLevel, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callbacks[level.slot()] = Some(Box::new(callback));
    }

    /// Builder-style variant of [`set_callback`](Self::set_callback).
    pub fn with_callback<F>(mut self, level: LogLevel, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.set_callback(level, callback);
        self
    }

    pub fn clear_callback(&mut self, level: LogLevel) {
        self.callbacks[level.slot()] = None;
    }

    pub fn has_callback(&self, level: LogLevel) -> bool {
        self.callbacks[level.slot()].is_some()
    }

    pub fn log(&self, level: LogLevel, msg: impl fmt::Display) {
        match level {
            LogLevel::Debug   => tracing::debug!(target: "ped", "{msg}"),
            LogLevel::Info    => tracing::info!(target: "ped", "{msg}"),
            LogLevel::Warning => tracing::warn!(target: "ped", "{msg}"),
            LogLevel::Error   => tracing::error!(target: "ped", "{msg}"),
        }
        if let Some(callback) = &self.callbacks[level.slot()] {
            callback(&msg.to_string());
        }
    }

    #[inline]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Debug, msg);
    }

    #[inline]
    pub fn info(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Info, msg);
    }

    #[inline]
    pub fn warning(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Warning, msg);
    }

    #[inline]
    pub fn error(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Error, msg);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<&str> = LogLevel::ALL
            .iter()
            .filter(|l| self.has_callback(**l))
            .map(|l| l.as_str())
            .collect();
        f.debug_struct("Logger").field("callbacks", &registered).finish()
    }
}
