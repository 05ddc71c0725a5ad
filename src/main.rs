use anyhow::Result;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use pdex_swap::{
    config::AppConfig,
    dex::EthersGateway,
    engine::SwapEngine,
    errors::{self, AppError},
    models::SwapRequest,
    utils,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "quote".into());
    let success = app(&mode).await?;
    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns `false` when a swap was attempted and failed.
async fn app(mode: &str) -> errors::Result<bool> {
    let config = AppConfig::load()?;
    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;

    tracing::info!(%mode, rpc = %config.rpc_url, pool = ?config.pool, "[INIT] pdex-swap starting");

    match config.private_key.clone() {
        Some(key) => {
            let chain_id = provider.get_chainid().await?;
            let wallet = key.parse::<LocalWallet>()?.with_chain_id(chain_id.as_u64());
            tracing::info!(account = ?wallet.address(), %chain_id, "[INIT] signer ready");
            let client = Arc::new(SignerMiddleware::new(provider, wallet));
            run(EthersGateway::new(client, config.swap_helper), &config, mode).await
        }
        None => {
            tracing::info!("[INIT] no PRIVATE_KEY set, running read-only");
            run(EthersGateway::new(Arc::new(provider), config.swap_helper), &config, mode).await
        }
    }
}

async fn run<M: Middleware + 'static>(
    gateway: EthersGateway<M>,
    config: &AppConfig,
    mode: &str,
) -> errors::Result<bool> {
    let token_in = gateway.describe_token(config.token_in).await?;
    let token_out = gateway.describe_token(config.token_out).await?;

    let mut request = SwapRequest::new(token_in, token_out, config.amount_in.clone(), config.pool)
        .with_slippage_bps(config.slippage_bps)
        .with_deadline_secs(config.deadline_secs);
    if let Some(recipient) = config.recipient {
        request = request.with_recipient(recipient);
    }

    let engine = SwapEngine::new(gateway);
    match mode {
        "quote" => {
            let amount_out = engine.quote(&request).await?;
            tracing::info!(
                amount_in = %request.amount_in,
                token_in = %request.token_in.symbol,
                %amount_out,
                token_out = %request.token_out.symbol,
                "[QUOTE] estimate"
            );
            println!("{amount_out}");
            Ok(true)
        }
        "swap" => {
            let outcome = engine.execute(&request).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(outcome.success)
        }
        other => Err(AppError::Config(format!(
            "unknown mode '{other}', expected 'quote' or 'swap'"
        ))),
    }
}
