pub mod contest;
pub mod problem;
pub mod shared;
