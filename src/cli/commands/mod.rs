//! Each subcommand lives in its own file and owns its error reporting.

mod check;
mod log;

pub use check::cmd_check;
pub use log::cmd_log;
