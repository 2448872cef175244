pub mod error;
pub mod estimate;
pub mod stop;

pub use error::*;
pub use estimate::*;
pub use stop::*;
