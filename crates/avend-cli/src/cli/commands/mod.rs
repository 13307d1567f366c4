//! CLI command handlers. Each command is in its own file.

mod checksum;
mod list;
mod manifest;
mod sync;

pub use checksum::run_checksum;
pub use list::run_list;
pub use manifest::run_manifest;
pub use sync::run_sync;
#[cfg(test)]
pub(crate) use sync::exit_status;
