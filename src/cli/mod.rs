mod args;

pub use args::{CliArgs, Command, FilterArgs, GenerateArgs, SummaryArgs};
