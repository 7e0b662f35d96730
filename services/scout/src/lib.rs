mod cli;
mod infra;
mod pipeline;
mod routes;
mod server;

use deal_scout::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
