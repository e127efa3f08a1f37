use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deep_researcher::cli::Args;
use deep_researcher::{ResearchError, launch};

#[tokio::main]
async fn main() -> Result<()> {
    // .env中的凭据只在启动时读取一次
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let default_filter = if args.verbose {
        "deep_researcher=debug"
    } else {
        "deep_researcher=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let topic = args.topic.clone();
    let config = args.into_config()?;

    match launch(&config, &topic).await {
        Ok(_) => Ok(()),
        Err(e) => {
            if let Some(ResearchError::RateLimited { .. }) = e.downcast_ref::<ResearchError>() {
                eprintln!(
                    "⏳ 触发了模型服务的限流，请等待约{}秒后重试",
                    config.rate_limit_wait_secs
                );
            }
            Err(e)
        }
    }
}
