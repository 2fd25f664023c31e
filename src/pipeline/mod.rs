//! Pipeline components: discovery walk, worker context and channels, workers, scheduling.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod worker;

pub use context::{PipelineChannels, WorkerContext, create_pipeline_channels};
pub use error_handler::report_skipped_paths;
pub use orchestrator::{run_items, run_parallel, run_sequential, shutdown_workers};
pub use walk::{Discovery, WalkOutcome, discover, run_walk_loop, to_outcome_walkdir};
pub use worker::{is_cancelled, process_item, read_and_parse, spawn_workers};
