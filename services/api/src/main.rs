use benefit_eligibility_api::{failure_message, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        if let Some(message) = failure_message(&err) {
            eprintln!("{message}");
        }
        std::process::exit(1);
    }
}
