pub mod check_cmd;
pub mod config_cmd;
pub mod output;
pub mod renderer;
