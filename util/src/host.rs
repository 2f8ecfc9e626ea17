//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "BOT_SW_ROOT";

/// Get the software root directory.
///
/// The root is given by the `BOT_SW_ROOT` environment variable. The `params` and `sessions`
/// directories are resolved relative to it.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
