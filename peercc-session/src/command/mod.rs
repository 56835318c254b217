mod command;
mod command_queue;

pub use command::*;
pub use command_queue::*;
