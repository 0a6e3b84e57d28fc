//! The `completions` command.

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;

pub fn run(args: &CompletionsArgs) -> Result<u8> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "sherpa", &mut std::io::stdout());
    Ok(0)
}
