use crate::error::ModelError;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// A stop number in EMT Madrid's numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopId(NonZeroU32);

impl StopId {
    /// Returns `None` for zero.
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl FromStr for StopId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| ModelError::InvalidStopId(trimmed.to_string()))
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stop to report on, optionally with a human label ("home", "gym").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTarget {
    pub label: Option<String>,
    pub stop: StopId,
}

impl StopTarget {
    pub fn labelled(label: impl Into<String>, stop: StopId) -> Self {
        Self {
            label: Some(label.into()),
            stop,
        }
    }

    /// Section heading printed before this stop's estimates.
    pub fn heading(&self) -> String {
        match &self.label {
            Some(label) => format!("Bus estimates for {label} stop:"),
            None => format!("Bus estimates for stop {}:", self.stop),
        }
    }
}

/// Parses `"1490"` or `"home=1490"`.
impl FromStr for StopTarget {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((label, id)) => {
                let label = label.trim();
                if label.is_empty() {
                    return Err(ModelError::InvalidTarget(s.to_string()));
                }
                Ok(Self::labelled(label, id.parse()?))
            }
            None => Ok(Self {
                label: None,
                stop: s.parse()?,
            }),
        }
    }
}
