use std::fmt;

/// One upcoming arrival as published on a stop's board.
///
/// All three fields are free text copied from the source table; `time`
/// can be anything from "3 min" to ">20 min" or "Arriving".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalEstimate {
    /// Line label (e.g., "27", "N1").
    pub line: String,
    /// Destination or direction label (e.g., "Sol").
    pub direction: String,
    /// Time-to-arrival text.
    pub time: String,
}

impl ArrivalEstimate {
    pub fn new(
        line: impl Into<String>,
        direction: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            line: line.into(),
            direction: direction.into(),
            time: time.into(),
        }
    }
}

impl fmt::Display for ArrivalEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line: {}, Direction: {}, Time: {}",
            self.line, self.direction, self.time
        )
    }
}
