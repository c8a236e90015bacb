use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "adc", version, about = "Citrix ADC file and certificate operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

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
        Command::Execute {
            path,
            continue_on_fail,
            out_dir,
            events,
            operation,
            appliance,
            output,
        } => {
            cmd::execute::execute_cmd(
                &path,
                continue_on_fail,
                out_dir.as_deref(),
                events,
                &operation,
                &appliance,
                &output,
            )
            .await
        }
        Command::Plan {
            path,
            operation,
            output,
        } => cmd::plan::plan_cmd(&path, &operation, &output).await,
    }
}
