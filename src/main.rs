use clap::Parser;
use miette::{IntoDiagnostic, Result};
use speiorden::application::registration::{Credentials, OrderRegistrar};
use speiorden::domain::bank::BankCodeRegistry;
use speiorden::domain::order::OrderRecord;
use speiorden::domain::ports::{GatewayClientBox, Payload, SignatureEngineBox};
use speiorden::domain::protocol::field;
use speiorden::infrastructure::ed25519::Ed25519Signer;
use speiorden::infrastructure::http::{GatewayConfig, HttpGatewayClient};
use speiorden::interfaces::csv::bank_code_reader::BankCodeReader;
use speiorden::interfaces::json::{read_order, write_payload};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with the order fields, keyed by wire names
    order: PathBuf,

    /// Base URL of the payment gateway
    #[arg(long, env = "SPEI_BASE_URL")]
    base_url: String,

    /// Company name the orders are registered under
    #[arg(long, env = "SPEI_COMPANY")]
    company: String,

    /// File holding the base64 private key
    #[arg(long, env = "SPEI_PRIVATE_KEY")]
    private_key: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// CSV file (abm,code,name) replacing the embedded bank registry
    #[arg(long)]
    bank_registry: Option<PathBuf>,

    /// Print the signed payload instead of submitting it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.bank_registry {
        let file = File::open(path).into_diagnostic()?;
        let registry = BankCodeReader::new(file).into_registry().into_diagnostic()?;
        tracing::info!(banks = registry.len(), "loaded bank registry");
        BankCodeRegistry::install(registry).into_diagnostic()?;
    }

    let private_key = std::fs::read(&cli.private_key).into_diagnostic()?;
    let config = GatewayConfig {
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
    };
    let gateway: GatewayClientBox = Box::new(HttpGatewayClient::new(config).into_diagnostic()?);
    let signer: SignatureEngineBox = Box::new(Ed25519Signer);
    let registrar = OrderRegistrar::new(
        gateway,
        signer,
        Credentials {
            company: cli.company,
            private_key,
        },
    );

    let fields = read_order(File::open(&cli.order).into_diagnostic()?).into_diagnostic()?;
    let record = OrderRecord::new(fields).into_diagnostic()?;

    let stdout = io::stdout();
    if cli.dry_run {
        let payload = registrar.prepare(&record).into_diagnostic()?;
        write_payload(stdout.lock(), &payload).into_diagnostic()?;
        return Ok(());
    }

    let record = registrar.submit(record).await.into_diagnostic()?;
    let mut summary = Payload::new();
    summary.insert(field::ID.into(), record.assigned_id().into());
    summary.insert(field::TRACKING_KEY.into(), record.tracking_key().into());
    summary.insert(
        field::NUMERIC_REFERENCE.into(),
        record.numeric_reference().into(),
    );
    write_payload(stdout.lock(), &summary).into_diagnostic()?;

    Ok(())
}
