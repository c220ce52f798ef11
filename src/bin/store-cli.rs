use std::path::PathBuf;

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use local_store::blockchain::deploy::{deploy, load_bytecode};
use local_store::blockchain::wallet::{detect_provider, request_account, WalletProvider};
use local_store::blockchain::BlockchainError;
use local_store::config::load_or_default;
use local_store::lifecycle::{connect_store, open_store};
use local_store::observability::logging;
use local_store::store::ProductForm;

#[derive(Parser)]
#[command(name = "store-cli")]
#[command(about = "One-shot commands against the Local Store contract", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "local-store.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authorized account (never prompts)
    Account,
    /// List every product
    Products,
    /// Show account and store balances
    Balances,
    /// List a new product
    Add {
        name: String,
        description: String,
        /// Price in ether, e.g. 0.01
        price: String,
        quantity: String,
        category: String,
    },
    /// Purchase a product by id, paying the configured amount
    Purchase { id: u64 },
    /// Deploy the contract from a compiled artifact
    Deploy {
        #[arg(long)]
        artifact: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;
    logging::init_logging(&config.observability.log_level);

    let output = match cli.command {
        Commands::Account => {
            let store = open_store(&config).await?;
            json!({ "account": store.account() })
        }
        Commands::Products => {
            let store = open_store(&config).await?;
            serde_json::to_value(store.list_products().await?)?
        }
        Commands::Balances => {
            let store = open_store(&config).await?;
            let balances = store.balances().await?;
            json!({
                "account": store.account(),
                "account_balance": balances.account,
                "store_balance": balances.store,
            })
        }
        Commands::Add {
            name,
            description,
            price,
            quantity,
            category,
        } => {
            let store = connect_store(&config).await?;
            let form = ProductForm::new(name, description, price, quantity, category);
            let receipt = store.add_product(&form).await?;
            json!({ "tx_hash": receipt.tx_hash, "block_number": receipt.block_number })
        }
        Commands::Purchase { id } => {
            let store = connect_store(&config).await?;
            let id = U256::from(id);
            let receipt = store.purchase_product(id).await?;
            json!({
                "product_id": id,
                "paid": store.purchase_amount(),
                "tx_hash": receipt.tx_hash,
                "block_number": receipt.block_number,
            })
        }
        Commands::Deploy { artifact } => {
            let wallet = detect_provider(&config)?.ok_or(BlockchainError::NoProvider)?;
            let from = request_account(Some(&wallet as &dyn WalletProvider)).await?;
            let bytecode = load_bytecode(&artifact)?;
            let deployment = deploy(wallet.client(), from, bytecode).await?;
            json!({
                "address": deployment.address,
                "tx_hash": deployment.tx_hash,
                "block_number": deployment.block_number,
            })
        }
    };

    print_json(&output)
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
