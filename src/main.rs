// Trap Verify CLI
//
// Two flows: `decode` turns a hex-encoded (uint256,string) payload into a
// readable balance and tag with no network access; `check` verifies the
// configured trap contract has bytecode and simulates its collect() method.

use anyhow::Result;
use clap::{Parser, Subcommand};

use trap_verify::abi;
use trap_verify::check;
use trap_verify::config::Config;
use trap_verify::error::TrapError;
use trap_verify::provider::{BackendKind, ProviderAdapter};

/// Trap contract checker and collect() payload decoder
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a hex-encoded (uint256,string) collect() payload
    Decode {
        /// Hex payload, raw or 0x-prefixed; falls back to HEX from the environment
        hex: Option<String>,
    },

    /// Check the trap contract configured via RPC_URL and TRAP_ADDRESS
    Check,
}

fn main() {
    env_logger::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    let outcome = match cli.command {
        Commands::Decode { hex } => run_decode(&config, hex.as_deref()),
        Commands::Check => run_check(&config),
    };

    if let Err(err) = outcome {
        eprintln!("{err}");
        let code = err
            .downcast_ref::<TrapError>()
            .map(TrapError::exit_code)
            .unwrap_or(99);
        std::process::exit(code);
    }
}

fn run_decode(config: &Config, arg_hex: Option<&str>) -> Result<()> {
    let runtime = BackendKind::probe()?;
    let input = arg_hex
        .or(config.hex_payload.as_deref())
        .ok_or_else(|| {
            TrapError::Configuration(
                "Usage: trap-verify decode <hex> (or set HEX in the environment)".into(),
            )
        })?;

    // Malformed payloads end the decode flow but do not fail the process.
    if let Err(err) = decode_and_print(runtime, input) {
        eprintln!("{err}");
    }
    Ok(())
}

fn decode_and_print(runtime: BackendKind, input: &str) -> Result<(), TrapError> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    let payload =
        hex::decode(stripped).map_err(|e| TrapError::DecodePayload(e.to_string()))?;
    let tuple = abi::decode_collect(&payload)?;

    println!("Decoded collect() ->");
    println!("  balance (wei): {}", tuple.balance);
    println!("  balance (ETH): {}", runtime.format_ether(&tuple.balance));
    println!("  tag          : {}", tuple.tag);
    Ok(())
}

fn run_check(config: &Config) -> Result<()> {
    let (rpc_url, address) = config.require_check()?;
    let adapter = ProviderAdapter::connect(&rpc_url)?;

    println!("RPC: {rpc_url}");
    println!("Trap: {address}");

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(check::run_check_flow(&adapter, &address))?;

    if let Some(tuple) = outcome.collected {
        println!("Decoded balance: {} wei", tuple.balance);
        println!("Decoded balance (ETH): {}", adapter.format_ether(&tuple.balance));
        println!("Decoded tag: {}", tuple.tag);
    }
    Ok(())
}
