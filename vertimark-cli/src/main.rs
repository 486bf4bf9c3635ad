// vertimark-cli/src/main.rs
//
// Entry point for the `vertimark` binary. Parses arguments, dispatches the
// subcommand and turns its outcome into a process exit code.

use clap::Parser;
use console::style;
use std::process;
use vertimark_cli::{Cli, Commands, run_watermark, terminal};

fn main() {
    terminal::init_colors();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run_watermark(args),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            log::debug!("Fatal: {e}");
            eprintln!("{} {e}", style("Error:").red().bold());
            process::exit(1);
        }
    }
}
