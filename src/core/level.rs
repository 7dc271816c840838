//! Log level definitions

use super::overflow_policy::LogPriority;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity. Filtering keeps a record when
/// `record.level >= effective_level(logger)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum Level {
    #[default]
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

impl Level {
    /// All levels in ascending severity.
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }

    /// Inverse of `level as u8`; out-of-range values saturate to `Panic`.
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            5 => Level::Fatal,
            _ => Level::Panic,
        }
    }

    /// Preservation priority under async queue overflow
    pub fn priority(&self) -> LogPriority {
        match self {
            Level::Trace | Level::Debug | Level::Info => LogPriority::Normal,
            Level::Warn => LogPriority::High,
            Level::Error | Level::Fatal | Level::Panic => LogPriority::Critical,
        }
    }

    /// Whether emitting at this level ends the process after delivery
    pub fn is_terminal(&self) -> bool {
        matches!(self, Level::Fatal | Level::Panic)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Trace => BrightBlack,
            Level::Debug => Blue,
            Level::Info => Green,
            Level::Warn => Yellow,
            Level::Error => Red,
            Level::Fatal => BrightRed,
            Level::Panic => Magenta,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            "PANIC" => Ok(Level::Panic),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
        assert!(Level::Fatal < Level::Panic);
    }

    #[test]
    fn test_level_u8_roundtrip() {
        for level in Level::ALL {
            assert_eq!(Level::from_u8(level as u8), level);
        }
        assert_eq!(Level::from_u8(200), Level::Panic);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("Panic".parse::<Level>(), Ok(Level::Panic));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_priority() {
        assert_eq!(Level::Info.priority(), LogPriority::Normal);
        assert_eq!(Level::Warn.priority(), LogPriority::High);
        assert_eq!(Level::Panic.priority(), LogPriority::Critical);
    }

    #[test]
    fn test_level_serde() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, "\"Warn\"");
        let level: Level = serde_json::from_str("\"Error\"").unwrap();
        assert_eq!(level, Level::Error);
    }
}
