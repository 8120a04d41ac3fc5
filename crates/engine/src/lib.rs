pub mod batch;
pub mod coverage;
pub mod input;
pub mod schedule;
