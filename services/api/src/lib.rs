mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use school_inquiry::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
