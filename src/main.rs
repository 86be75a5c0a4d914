// src/main.rs

use jobexec::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(failed) if failed > 0 => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("jobexec error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// Returns the number of failed jobs.
async fn run_main() -> anyhow::Result<usize> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let errors = run(args).await?;
    Ok(errors.len())
}
