//! abicodec CLI — selectors, calldata encoding and call/log/revert decoding
//! from a JSON ABI or a file of human-readable signatures.
//!
//! # Commands
//! ```text
//! abicodec signature    "<declaration>"
//! abicodec encode-call  --abi <file> --function <name|signature> --args <json>
//! abicodec decode-call  --abi <file> --calldata <hex>
//! abicodec decode-log   --abi <file> --topics <hex>... --data <hex>
//! abicodec decode-logs  --abi <file> --file <logs.json> --mode skip|collect|throw
//! abicodec decode-error --abi <file> --data <hex>
//! ```

use abicodec_evm::{normalizer, ErrorMode, Interface, Method};
use abicodec_observability::{init_tracing, LogConfig};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

mod abi_source;
mod cmd_decode;
mod cmd_signature;

#[derive(Parser)]
#[command(
    name = "abicodec",
    about = "EVM ABI toolkit: selectors, calldata and event-log codec",
    long_about = "
abicodec: compute selectors and topic hashes, encode calldata and decode
calls, event logs and custom-error revert data.

--abi accepts a JSON ABI (.json, a bare array or a build artifact with an
`abi` field) or a text file with one human-readable declaration per line.

ENVIRONMENT VARIABLES:
  RUST_LOG    Overrides --log-level with full tracing filter directives
",
    version
)]
struct Cli {
    /// Enable verbose output (debug logs for the abicodec crates)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Global log level: trace | debug | info | warn | error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one declaration and print its canonical signature and hash
    Signature {
        /// e.g. "function transfer(address to, uint256 amount)"
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a function call to ABI calldata
    #[command(name = "encode-call")]
    EncodeCall {
        /// Path to the ABI (.json) or signatures file
        #[arg(long)]
        abi: String,
        /// Function name, or full signature to pick an overload
        #[arg(long)]
        function: String,
        /// JSON array (or object keyed by parameter name) of arguments,
        /// e.g. '["0xabc...", "1000000"]'
        #[arg(long, default_value = "[]")]
        args: String,
    },

    /// Decode function call calldata
    #[command(name = "decode-call")]
    DecodeCall {
        #[arg(long)]
        abi: String,
        /// Raw calldata (0x-prefixed hex)
        #[arg(long)]
        calldata: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode an event log from raw topics + data
    #[command(name = "decode-log")]
    DecodeLog {
        #[arg(long)]
        abi: String,
        /// topics[0] = event topic0, topics[1..] = indexed params
        #[arg(long, num_args = 1..)]
        topics: Vec<String>,
        /// Non-indexed params (hex, 0x-prefixed)
        #[arg(long, default_value = "0x")]
        data: String,
        /// Emitting contract, echoed in the output
        #[arg(long)]
        address: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a JSON array of logs in parallel
    #[command(name = "decode-logs")]
    DecodeLogs {
        #[arg(long)]
        abi: String,
        /// File holding `[{"address":..., "topics":[...], "data":"0x..."}, ...]`
        #[arg(long)]
        file: String,
        /// What to do with logs that fail to decode: skip | collect | throw
        #[arg(long, default_value = "skip", value_parser = parse_error_mode)]
        mode: ErrorMode,
    },

    /// Decode custom-error revert data
    #[command(name = "decode-error")]
    DecodeError {
        #[arg(long)]
        abi: String,
        /// Revert data (0x-prefixed hex, selector included)
        #[arg(long)]
        data: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().with_level(&cli.log_level);
    log_config.json = cli.json_logs;
    if cli.verbose {
        for component in ["abicodec_core", "abicodec_evm", "abicodec"] {
            log_config = log_config.with_component(component, "debug");
        }
    }
    init_tracing(&log_config).map_err(|e| anyhow!("initialise logging: {e}"))?;

    match cli.command {
        Commands::Signature { text, json } => cmd_signature::run(&text, json),

        Commands::EncodeCall { abi, function, args } => cmd_encode_call(&abi, &function, &args),

        Commands::DecodeCall { abi, calldata, json } => {
            cmd_decode::decode_call(&calldata, &abi, json)
        }

        Commands::DecodeLog { abi, topics, data, address, json } => {
            cmd_decode::decode_log(&topics, &data, address.as_deref(), &abi, json)
        }

        Commands::DecodeLogs { abi, file, mode } => cmd_decode::decode_logs(&file, &abi, mode),

        Commands::DecodeError { abi, data, json } => cmd_decode::decode_error(&data, &abi, json),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_encode_call(abi_path: &str, function: &str, args_json: &str) -> Result<()> {
    let iface = abi_source::load_interface(abi_path)?;
    let method = resolve_method(&iface, function)?;

    let args = normalizer::from_json_str(args_json).context("parse args JSON")?;
    let calldata = method
        .encode_call(&args)
        .with_context(|| format!("encode arguments for {}", method.signature()))?;
    println!("0x{}", hex::encode(&calldata));
    Ok(())
}

/// A full signature picks one method; a bare name must not be overloaded.
fn resolve_method<'a>(iface: &'a Interface, function: &'a str) -> Result<&'a Method> {
    if function.contains('(') {
        return iface
            .method_by_signature(function)
            .ok_or_else(|| anyhow!("no function with signature '{function}'"));
    }
    let mut candidates = iface.methods_by_name(function);
    match (candidates.next(), candidates.next()) {
        (Some(method), None) => Ok(method),
        (None, _) => bail!("no function named '{function}'"),
        (Some(_), Some(_)) => {
            let overloads: Vec<&str> = iface.methods_by_name(function).map(Method::signature).collect();
            bail!(
                "'{function}' is overloaded; pass one of: {}",
                overloads.join(", ")
            )
        }
    }
}

fn parse_error_mode(text: &str) -> Result<ErrorMode, String> {
    serde_json::from_value(serde_json::Value::String(text.to_lowercase()))
        .map_err(|_| format!("unknown mode '{text}' (expected skip, collect or throw)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface() -> Interface {
        Interface::from_signatures([
            "function transfer(address dst, uint256 wad)",
            "function transfer(address src, address dst, uint256 wad)",
            "function approve(address spender, uint256 amount)",
        ])
        .unwrap()
    }

    #[test]
    fn resolves_by_name_or_signature() {
        let iface = iface();
        assert_eq!(resolve_method(&iface, "approve").unwrap().hex_selector(), "0x095ea7b3");
        assert_eq!(
            resolve_method(&iface, "transfer(address,address,uint256)").unwrap().hex_selector(),
            "0xbeabacc8"
        );
        let err = resolve_method(&iface, "transfer").unwrap_err().to_string();
        assert!(err.contains("overloaded"), "{err}");
        assert!(resolve_method(&iface, "mint").is_err());
    }

    #[test]
    fn error_modes() {
        assert_eq!(parse_error_mode("Collect"), Ok(ErrorMode::Collect));
        assert_eq!(parse_error_mode("throw"), Ok(ErrorMode::Throw));
        assert!(parse_error_mode("ignore").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
