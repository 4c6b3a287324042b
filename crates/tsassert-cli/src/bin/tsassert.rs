//! `tsassert`: one-shot `transform`/`analyze` subcommands for local
//! debugging, driving a single-file `ProjectSession` directly rather
//! than talking the framed protocol (that's `tsassert-server`'s job).

use anyhow::Result;
use clap::Parser;

use tsassert_cli::args::{CliArgs, Commands};
use tsassert_cli::{run_analyze, run_transform};
use tsassert_session::ProjectSession;

fn main() -> Result<()> {
    tsassert_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let mut session = ProjectSession::open(args.project.as_deref())?;

    let report = match args.command {
        Commands::Transform { file, flavor } => run_transform(&mut session, &file, flavor.into())?,
        Commands::Analyze { file } => run_analyze(&mut session, &file)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
