mod app;
mod config;
mod error;
mod logging;
mod quick_add;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config.log_file, &config.log_level)?;
    let mut app = app::App::connect(config).await?;
    app.run().await?;
    Ok(())
}
