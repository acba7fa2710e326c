use clap::Parser;
use tracing::error;

use reqres_contract::cli::{self, CliConfig, EXIT_CONFIG_ERROR};
use reqres_contract::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    telemetry::init("info");
    let args = CliConfig::parse();

    let code = match cli::run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            EXIT_CONFIG_ERROR
        }
    };
    std::process::exit(code);
}
