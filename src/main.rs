//! Local Store terminal front end.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin ──▶ input::parse_command ──▶ ViewHandle ──▶ ViewController
//!                                                        │   ▲
//!                                             effects    ▼   │ events
//!                                         ┌──────────────────────────┐
//!                                         │ wallet gateway           │
//!                                         │ contract binder          │
//!                                         │ store client             │
//!                                         └──────────────────────────┘
//!   stdout ◀── render ◀── watch<Arc<ViewState>> ◀───────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use local_store::config::load_or_default;
use local_store::lifecycle::{build_gateway, signals, Shutdown};
use local_store::observability::{logging, metrics};
use local_store::view::{self, Command, ViewController, ViewSettings};

#[derive(Parser)]
#[command(name = "local-store")]
#[command(about = "Terminal client for the Local Store contract", long_about = None)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(short, long, default_value = "local-store.toml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));
    // A stdin read blocked on the terminal must not hold the process open.
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_or_default(&cli.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config = %cli.config.display(),
        rpc_url = %config.network.rpc_url,
        contract = %config.contract.address,
        "local-store v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let settings = ViewSettings::from_config(&config)?;
    let gateway = build_gateway(&config).await?;
    let (controller, handle) = ViewController::new(gateway, settings);

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    let controller_task = tokio::spawn(controller.run(shutdown.subscribe()));

    let mut snapshots = handle.subscribe();
    let mut render_shutdown = shutdown.subscribe();
    let render_task = tokio::spawn(async move {
        loop {
            let screen = view::render(&snapshots.borrow_and_update());
            println!("\n{screen}");
            tokio::select! {
                _ = render_shutdown.recv() => break,
                changed = snapshots.changed() => if changed.is_err() { break },
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_shutdown = shutdown.subscribe();
    loop {
        let line = tokio::select! {
            _ = input_shutdown.recv() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match view::parse_command(&line) {
            Ok(Command::Intent(intent)) => {
                if !handle.send(intent).await {
                    break;
                }
            }
            Ok(Command::Help) => println!("{}", view::input::HELP),
            Ok(Command::Quit) => break,
            Err(message) => println!("{message}"),
        }
    }

    shutdown.trigger();
    let _ = controller_task.await;
    let _ = render_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
