pub mod application;
pub mod job;
pub mod patch;
pub mod profile;
