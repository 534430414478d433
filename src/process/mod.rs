// Process invoker
//
// Runs external tools synchronously, capturing their output and enforcing
// an optional wall-clock bound.

mod command;
mod runner;

pub use command::{CommandSpec, CommandOutput};
pub use runner::{CommandRunner, SystemRunner};
