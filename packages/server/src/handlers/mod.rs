pub mod clock;
pub mod contest;
pub mod problem;
