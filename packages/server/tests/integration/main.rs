mod clock;
mod common;
mod problem;
