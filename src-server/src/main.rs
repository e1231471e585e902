use tubeseg_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tubeseg_core::init_logging(&config.log_filter);

    tubeseg_server_lib::run(config).await
}
