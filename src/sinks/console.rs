//! Console sink implementation

use crate::core::{Level, LogRecord, LoggerError, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Line format written by [`ConsoleSink`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO ] db - connected pool=4`
    #[default]
    Text,

    /// One JSON object per line
    Json,
}

/// Writes records to stdout, routing Error and above to stderr
pub struct ConsoleSink {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_field_logger::sinks::{ConsoleSink, OutputFormat};
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Render a record as one line, without the trailing newline
    pub fn format(&self, record: &LogRecord) -> Result<String> {
        match self.output_format {
            OutputFormat::Text => Ok(self.format_text(record)),
            OutputFormat::Json => Ok(serde_json::to_string(record)?),
        }
    }

    fn format_text(&self, record: &LogRecord) -> String {
        let level_str = self.level_label(record.level);
        let timestamp_str = record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let name = if record.logger.is_empty() {
            "root"
        } else {
            record.logger.as_str()
        };

        let base = format!(
            "[{}] [{}] {} - {}",
            timestamp_str, level_str, name, record.message
        );

        if record.fields.is_empty() {
            base
        } else {
            format!("{} {}", base, record.fields.format_fields())
        }
    }

    #[cfg(feature = "console")]
    fn level_label(&self, level: Level) -> String {
        let label = format!("{:5}", level.to_str());
        if self.use_colors {
            label.color(level.color_code()).to_string()
        } else {
            label
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_label(&self, level: Level) -> String {
        format!("{:5}", level.to_str())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.format(record)?;

        let written = if record.level >= Level::Error {
            writeln!(std::io::stderr().lock(), "{}", line)
        } else {
            writeln!(std::io::stdout().lock(), "{}", line)
        };

        written.map_err(|e| LoggerError::io_operation("writing to console", "console sink failed", e))
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
