mod cli;
mod evaluate;
mod infra;
mod routes;
mod server;

use benefit_eligibility::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

/// Text for stderr when the process fails. Eligibility failures are already rendered to stdout
/// by `evaluate`, so they get none.
pub fn failure_message(err: &AppError) -> Option<String> {
    match err {
        AppError::Eligibility(_) => None,
        other => Some(format!("application error: {other}")),
    }
}
