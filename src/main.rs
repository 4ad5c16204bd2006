use anyhow::Result;

use wyco_league::cli::Command;
use wyco_league::{
    handle_completions, handle_dedupe, handle_import_members, handle_ingest, handle_merge,
    handle_process, handle_prune, handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Ingest { path } => handle_ingest(path),
        Command::Process { include_inactive } => handle_process(*include_inactive),
        Command::ImportMembers { csv } => handle_import_members(csv),
        Command::Dedupe { dry_run } => handle_dedupe(*dry_run),
        Command::Merge { into, from } => handle_merge(*into, *from),
        Command::Prune { before } => handle_prune(*before),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
