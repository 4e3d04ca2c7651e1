// Operator configuration, env-file persistence and logging setup.

pub mod config;
pub mod envfile;
pub mod logging;

pub use config::OperatorConfig;
pub use envfile::EnvFile;
pub use logging::init_logging;
