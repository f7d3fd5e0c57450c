use anyhow::Context;
use tracing::{error, info};

use review_topics::{app, config::Config, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Docker healthcheck in a distroless image
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match review_topics::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Healthcheck failed: {e}");
                std::process::exit(1)
            }
        }
    }

    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");

        if let Some(location) = panic_info.location() {
            error!(
                thread = thread_name,
                file = location.file(),
                line = location.line(),
                column = location.column(),
                message,
                "panic occurred"
            );
        } else {
            error!(
                thread = thread_name,
                message, "panic occurred without location information"
            );
        }
    }));

    observability::init_tracing().context("failed to initialize tracing")?;
    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        bind_addr = %config.http_bind(),
        vectorizer_path = %config.vectorizer_path().display(),
        model_path = %config.model_path().display(),
        "configuration loaded"
    );

    app::run(config).await.context("review topic service failed")?;
    Ok(())
}
