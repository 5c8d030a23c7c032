//! Logger handed to a source at construction.
//!
//! Records go through the `log` facade types, so the same `env_logger`
//! setup as everywhere else applies unless a sink is injected.

use log::{Level, Log, Metadata, Record};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
enum Sink {
    /// Whatever logger is installed in the `log` facade
    Global,
    Custom(Arc<dyn Log>),
}

/// Logger bound to one source's target
#[derive(Clone)]
pub struct SourceLogger {
    target: String,
    sink: Sink,
}

impl fmt::Debug for SourceLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceLogger")
            .field("target", &self.target)
            .field("custom_sink", &matches!(self.sink, Sink::Custom(_)))
            .finish()
    }
}

impl SourceLogger {
    /// Logger writing to the global `log` facade
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            sink: Sink::Global,
        }
    }

    /// Logger writing to the given sink only
    pub fn with_sink(target: impl Into<String>, sink: Arc<dyn Log>) -> Self {
        Self {
            target: target.into(),
            sink: Sink::Custom(sink),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder()
            .level(level)
            .target(&self.target)
            .build();

        match &self.sink {
            Sink::Global => {
                if level > log::max_level() {
                    return;
                }
                emit(log::logger(), &metadata, args);
            }
            Sink::Custom(sink) => emit(sink.as_ref(), &metadata, args),
        }
    }
}

fn emit(sink: &dyn Log, metadata: &Metadata<'_>, args: fmt::Arguments<'_>) {
    if !sink.enabled(metadata) {
        return;
    }
    sink.log(
        &Record::builder()
            .metadata(metadata.clone())
            .args(args)
            .module_path_static(Some(module_path!()))
            .build(),
    );
}
