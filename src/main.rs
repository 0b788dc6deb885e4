use std::process::ExitCode;

use clap::Parser;
use cses_tests::cli::{Cli, NoPrompt, Prompt, TerminalPrompt};
use env_logger::Env;
use log::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "cses_tests=debug"
    } else {
        "cses_tests=info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();

    let mut prompt: Box<dyn Prompt> = if cli.no_interaction {
        Box::new(NoPrompt)
    } else {
        Box::new(TerminalPrompt)
    };
    let pipeline = match cli.resolve(&mut *prompt) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match pipeline.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("run failed with {}", e.kind());
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
