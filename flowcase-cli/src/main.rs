use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;

pub use args::*;
use commands::Command;
use cmd::run::RunTarget;

#[derive(Debug, Parser)]
#[command(name = "flowcase", version, about = "API test suite runner")]
struct Cli {
    #[command(flatten)]
    log: LogArgs,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log.log_format);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
        Command::Tree { path, output } => cmd::tree::tree_cmd(&path, output).await,
        Command::CheckParent {
            path,
            component,
            parent,
            output,
        } => {
            cmd::check_parent::check_parent_cmd(&path, &component, parent.as_deref(), output)
                .await
        }
        Command::RunScript {
            path,
            script,
            run,
            output,
        } => cmd::run::run_cmd(&path, RunTarget::Script(script), run, output).await,
        Command::RunComponent {
            path,
            component,
            run,
            output,
        } => cmd::run::run_cmd(&path, RunTarget::Component(component), run, output).await,
        Command::RunCase {
            path,
            case,
            run,
            output,
        } => cmd::run::run_cmd(&path, RunTarget::Case(case), run, output).await,
    }
}
