pub mod board;
pub mod client;
pub mod error;
pub mod normalize;
pub mod preflight;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use board::{parse_board, ParsedBoard, SkippedRow};
pub use client::{ClientConfig, StopBoardClient};
pub use error::AcquireError;
pub use report::Report;
