pub mod build;
mod command_result;
pub mod helper;
pub mod init;

pub use command_result::*;
