//! CLI argument parsing.

mod args;

pub use args::{
    CancelArgs, Cli, Command, CommandLine, GlobalArgs, ListArgs, StatusArgs, SubmitArgs,
};
