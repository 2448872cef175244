use nextbus_model::StopId;
use reqwest::StatusCode;
use thiserror::Error;

/// Failures while fetching or reading one stop's board.
///
/// None of these are fatal to a run: callers log them and move on to the
/// next stop.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Connection, DNS, timeout or body read failure.
    #[error("Error retrieving data for stop {stop}: {source}")]
    Transport {
        stop: StopId,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error retrieving data for stop {stop}: HTTP {status}")]
    Status { stop: StopId, status: StatusCode },

    #[error("No table found for stop {stop}.")]
    MissingTable { stop: StopId },
}

impl AcquireError {
    pub fn stop(&self) -> StopId {
        match self {
            AcquireError::Transport { stop, .. }
            | AcquireError::Status { stop, .. }
            | AcquireError::MissingTable { stop } => *stop,
        }
    }
}
