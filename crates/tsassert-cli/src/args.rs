//! CLI arguments for the `tsassert` one-shot binary, split into its own
//! module so `tests/cli_tests.rs` can parse against it directly rather
//! than spawning the binary (as the teacher's `args.rs`/`args_tests.rs`
//! do for `tsz`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use tsassert_session::Flavor as SessionFlavor;

#[derive(Parser, Debug)]
#[command(name = "tsassert", version, about = "Injects runtime type-assertion code at transform boundaries")]
pub struct CliArgs {
    /// Path to a tsassert.json config file. Defaults to the file's directory when omitted.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite a file, inserting validator calls at every validated site.
    Transform {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Flavor::Ts)]
        flavor: Flavor,
    },
    /// Report every candidate site in a file without rewriting it.
    Analyze { file: PathBuf },
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flavor {
    #[default]
    Ts,
    Js,
}

impl From<Flavor> for SessionFlavor {
    fn from(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Ts => SessionFlavor::Ts,
            Flavor::Js => SessionFlavor::Js,
        }
    }
}

#[cfg(test)]
#[path = "tests/args.rs"]
mod tests;
