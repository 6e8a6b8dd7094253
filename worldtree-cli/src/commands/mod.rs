pub mod config_cmd;
pub mod preview_cmd;
pub mod simulate_cmd;
