use std::str::FromStr;
use thiserror::Error;

/// A time-range expression that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time range format: {0:?} (expected <number><h|d|w|M>, e.g. 7d)")]
pub struct InvalidTimeRange(pub String);

/// Unit suffix of a time-range expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
    /// Thirty days
    Months,
}

impl TimeUnit {
    fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'h' => Some(TimeUnit::Hours),
            'd' => Some(TimeUnit::Days),
            'w' => Some(TimeUnit::Weeks),
            'M' => Some(TimeUnit::Months),
            _ => None,
        }
    }

    pub fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Hours => 60 * 60,
            TimeUnit::Days => 24 * 60 * 60,
            TimeUnit::Weeks => 7 * 24 * 60 * 60,
            TimeUnit::Months => 30 * 24 * 60 * 60,
        }
    }

    pub fn suffix(&self) -> char {
        match self {
            TimeUnit::Hours => 'h',
            TimeUnit::Days => 'd',
            TimeUnit::Weeks => 'w',
            TimeUnit::Months => 'M',
        }
    }
}

/// A look-back window such as `7d` or `12h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub amount: u64,
    pub unit: TimeUnit,
}

impl TimeRange {
    pub fn new(amount: u64, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }

    /// Window length in seconds, saturating on overflow
    pub fn as_seconds(&self) -> u64 {
        self.amount.saturating_mul(self.unit.seconds())
    }
}

impl FromStr for TimeRange {
    type Err = InvalidTimeRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidTimeRange(s.to_string());

        let suffix = s.chars().last().ok_or_else(invalid)?;
        let unit = TimeUnit::from_suffix(suffix).ok_or_else(invalid)?;
        let digits = &s[..s.len() - suffix.len_utf8()];

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let amount = digits.parse::<u64>().map_err(|_| invalid())?;

        Ok(TimeRange::new(amount, unit))
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}
