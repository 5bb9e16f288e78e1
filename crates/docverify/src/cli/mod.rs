mod commands;
mod config_cmd;
mod inspect;
mod recent;
mod register;
mod utils;
mod verify;

pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use inspect::{handle_hash, handle_link, handle_normalize};
pub use recent::handle_recent;
pub use register::handle_add;
pub use utils::{config_path, init_logging, load_config, FAIL};
pub use verify::{handle_batch, handle_verify};
