pub mod config;
pub mod contest_status;
pub mod lifecycle;
pub mod ticker;
pub mod timing;

pub use config::ClockConfig;
pub use contest_status::{ContestStatus, ParseStatusError};
pub use lifecycle::ContestSnapshot;
pub use ticker::Ticker;
pub use timing::{Computed, Remaining};
