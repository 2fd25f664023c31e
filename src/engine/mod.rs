//! Engine module: job control, outcome recording, progress, CLI plumbing

pub mod arg_parser;
pub mod cli;
pub mod content_id;
pub mod job;
pub mod outcome;
pub mod progress;
pub mod tools;
pub mod tracker;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use content_id::ContentIdGenerator;
pub use job::{completion_message, create_job_request, establish_job, finalize_job};
pub use outcome::{OutcomeRecorder, RemoteSink, classify};
pub use tools::{
    glob_match, has_extension, is_excluded, is_os_hidden_file, should_include_in_walk,
};
pub use tracker::ProgressTracker;
