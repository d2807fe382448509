mod cli;
mod generate;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Check for --generate flag
    if args.iter().any(|arg| arg == "--generate") {
        // Build a dataset (optionally with parallel optimal labeling)
        generate::run_generate(&args).await?;
    } else {
        // Solve mode: reduce every word of an existing dataset file
        cli::run_solve(&args)?;
    }

    Ok(())
}
