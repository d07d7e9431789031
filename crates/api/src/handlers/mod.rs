pub mod jobs;
pub mod process;
