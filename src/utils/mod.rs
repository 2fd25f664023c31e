pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod remote_env;
pub mod settings_toml;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, effective_concurrency, max_open_fds, max_workers_by_fd_limit};
pub use logger::{Colors, setup_logging};
pub use remote_env::{RemoteEnv, load_remote_env};
pub use settings_toml::{
    SettingsToml, apply_file_to_config, load_settings_toml, read_settings_toml,
};
