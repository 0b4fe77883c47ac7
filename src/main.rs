use glow_server::core::{Config, run};
use glow_server::utils::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = Config::from_env();
    run(config).await?;
    Ok(())
}
