//! Logging hooks for the extraction pipeline.
//!
//! The pipeline never logs through a global switch. Callers pass an
//! [`Observer`] down every call; [`TracingObserver`] forwards to `tracing`,
//! [`SilentObserver`] drops everything.

use std::fmt;

/// Severity of an observer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Decisions taken while walking the tree.
    Debug,
    /// Stage-level progress.
    Info,
    /// Recoverable problems (malformed JSON-LD, failed language checks).
    Warn,
}

/// Receiver of pipeline log messages.
pub trait Observer {
    /// Handle one message.
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    /// Log at debug level.
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    /// Log at info level.
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    /// Log at warn level.
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }
}

/// Forwards messages to the `tracing` crate under target `article_extractor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        match level {
            Level::Debug => tracing::debug!(target: "article_extractor", "{}", args),
            Level::Info => tracing::info!(target: "article_extractor", "{}", args),
            Level::Warn => tracing::warn!(target: "article_extractor", "{}", args),
        }
    }
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl Observer for SilentObserver {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(Level, String)>>);

    impl Observer for Recorder {
        fn log(&self, level: Level, args: fmt::Arguments<'_>) {
            self.0.borrow_mut().push((level, args.to_string()));
        }
    }

    #[test]
    fn test_helpers_forward_level() {
        let recorder = Recorder::default();
        recorder.debug(format_args!("a {}", 1));
        recorder.warn(format_args!("b"));
        let seen = recorder.0.borrow();
        assert_eq!(seen[0], (Level::Debug, "a 1".to_string()));
        assert_eq!(seen[1], (Level::Warn, "b".to_string()));
    }

    #[test]
    fn test_tracing_observer_does_not_panic_without_subscriber() {
        TracingObserver.info(format_args!("no subscriber installed"));
        SilentObserver.warn(format_args!("dropped"));
    }
}
