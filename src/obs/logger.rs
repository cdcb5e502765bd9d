//! Injectable logger used for retry warnings, refresh notices, and operation failures.

// self
use crate::_prelude::*;

/// Four-level logger injected through [`ClientConfig`](crate::config::ClientConfig).
///
/// The client never touches global logging state; whatever implementation is supplied here is
/// the only sink it writes to.
pub trait Logger
where
	Self: 'static + Send + Sync,
{
	/// Informational message.
	fn info(&self, message: &str);

	/// Failure that is propagated to the caller.
	fn error(&self, message: &str);

	/// Recoverable condition such as a retried request.
	fn warn(&self, message: &str);

	/// Diagnostic detail.
	fn debug(&self, message: &str);
}

/// Logger that discards every message. Used when no logger is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;
impl Logger for NoopLogger {
	fn info(&self, _: &str) {}

	fn error(&self, _: &str) {}

	fn warn(&self, _: &str) {}

	fn debug(&self, _: &str) {}
}

/// Logger that forwards each level to the matching `tracing` macro under the `keez_client` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
#[cfg(feature = "tracing")]
impl Logger for TracingLogger {
	fn info(&self, message: &str) {
		tracing::info!(target: "keez_client", "{message}");
	}

	fn error(&self, message: &str) {
		tracing::error!(target: "keez_client", "{message}");
	}

	fn warn(&self, message: &str) {
		tracing::warn!(target: "keez_client", "{message}");
	}

	fn debug(&self, message: &str) {
		tracing::debug!(target: "keez_client", "{message}");
	}
}

/// Logger that keeps every message in memory, grouped by level.
///
/// Handy for asserting on retry warnings and failure reports in tests.
#[derive(Debug, Default)]
pub struct MemoryLogger {
	entries: Mutex<Vec<(LogLevel, String)>>,
}
impl MemoryLogger {
	/// Returns every recorded message at `level`, oldest first.
	pub fn messages(&self, level: LogLevel) -> Vec<String> {
		self.entries
			.lock()
			.iter()
			.filter(|(entry_level, _)| *entry_level == level)
			.map(|(_, message)| message.clone())
			.collect()
	}

	fn push(&self, level: LogLevel, message: &str) {
		self.entries.lock().push((level, message.to_owned()));
	}
}
impl Logger for MemoryLogger {
	fn info(&self, message: &str) {
		self.push(LogLevel::Info, message);
	}

	fn error(&self, message: &str) {
		self.push(LogLevel::Error, message);
	}

	fn warn(&self, message: &str) {
		self.push(LogLevel::Warn, message);
	}

	fn debug(&self, message: &str) {
		self.push(LogLevel::Debug, message);
	}
}

/// Levels understood by [`Logger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
	/// [`Logger::info`].
	Info,
	/// [`Logger::error`].
	Error,
	/// [`Logger::warn`].
	Warn,
	/// [`Logger::debug`].
	Debug,
}
