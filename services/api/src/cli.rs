use crate::evaluate::{run_evaluate, EvaluateArgs};
use crate::server;
use benefit_eligibility::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Benefit Eligibility Estimator",
    about = "Estimate pension and income supplement eligibility over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a set of facts once and print the result as JSON
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["benefit-eligibility-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_collects_repeated_facts() {
        let cli = Cli::try_parse_from([
            "benefit-eligibility-api",
            "evaluate",
            "--fact",
            "age=65",
            "--fact",
            "country=home",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Evaluate(args)) => assert_eq!(args.facts.len(), 2),
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn malformed_fact_is_rejected_by_parser() {
        let result =
            Cli::try_parse_from(["benefit-eligibility-api", "evaluate", "--fact", "age"]);
        assert!(result.is_err());
    }
}
