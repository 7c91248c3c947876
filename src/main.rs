//! Binary entry point: parse, wire, run, render, exit.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use broker_cli::cli::output::{Envelope, OutputMode};
use broker_cli::cli::{resolve_output_mode, App, Cli};
use broker_cli::config::Settings;
use broker_cli::error::Error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let output = resolve_output_mode(cli.output, cli.json, &settings);
    let command = cli.command.name();

    let app = match App::from_settings(settings, output, cli.non_interactive).await {
        Ok(app) => app,
        Err(err) => exit_with_error(command, output, &err),
    };

    match app.run(&cli.command).await {
        Ok(result) => match output {
            OutputMode::Json => println!("{}", Envelope::success(command, result.data).to_json()),
            OutputMode::Text => println!("{}", result.text),
        },
        Err(err) => exit_with_error(command, output, &err),
    }
}

fn exit_with_error(command: &str, output: OutputMode, err: &Error) -> ! {
    match output {
        // Errors still go to stdout in JSON mode so consumers always get
        // a parseable envelope.
        OutputMode::Json => println!("{}", Envelope::failure(command, err).to_json()),
        OutputMode::Text => eprintln!("Error: {err}"),
    }
    std::process::exit(err.exit_code());
}
