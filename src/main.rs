use std::sync::Arc;

use email_router::config::AppConfig;
use email_router::dispatch::ensure_crypto_provider;
use email_router::{Dispatcher, EmailProcessor, GeminiClassifier, InboundEmail, Router};

const USAGE: &str = "usage: email-router <subject> <body> [--dry-run]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    ensure_crypto_provider();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut dry_run = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }
    let [subject, body] = <[String; 2]>::try_from(positional)
        .map_err(|_| anyhow::anyhow!("{USAGE}"))?;

    let config = AppConfig::from_env()?;

    eprintln!("📬 email-router v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.classifier.model);
    eprintln!("   SMTP: {}:{}", config.smtp.host, config.smtp.port);
    eprintln!("   Marketing route: {:?}", config.marketing_route);

    let classifier = Arc::new(GeminiClassifier::new(config.classifier.clone())?);
    let router = Router::new(classifier).with_marketing_route(config.marketing_route);
    let email = InboundEmail::new(subject, body);

    let sender = match (&config.sender, dry_run) {
        (Some(sender), false) => sender.clone(),
        (None, false) => {
            anyhow::bail!("EMAIL_USERNAME and EMAIL_PASSWORD must be set to send (or pass --dry-run)")
        }
        (_, true) => {
            let request = email_router::ClassificationRequest {
                api_key: config.api_key.clone(),
                subject: email.subject.clone(),
                body: email.body.clone(),
            };
            let decision = router.decide(&request, &config.directory, None).await;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            return Ok(());
        }
    };

    let processor = EmailProcessor::new(router, Dispatcher::smtp(config.smtp.clone()));
    let processed = processor
        .process(&config.api_key, &email, &config.directory, None, &sender)
        .await;

    println!("{}", serde_json::to_string_pretty(&processed)?);
    Ok(())
}
