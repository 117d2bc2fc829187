use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and structurally validate a suite file.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the component tree and each case's execution order.
    Tree {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check whether re-parenting a component would create a cycle.
    CheckParent {
        path: PathBuf,
        component: String,
        /// Proposed parent; omit to detach the component.
        #[arg(long)]
        parent: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    RunScript {
        path: PathBuf,
        script: String,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run a component together with all of its descendants.
    RunComponent {
        path: PathBuf,
        component: String,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    RunCase {
        path: PathBuf,
        case: String,
        #[command(flatten)]
        run: RunArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
