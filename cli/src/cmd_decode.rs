//! `abicodec decode-*` — calldata, log and revert-data decoding.

use abicodec_core::{RawLog, Value, B256};
use abicodec_evm::{batch, fingerprint, ErrorMode};
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::abi_source::{load_interface, parse_hex};

pub fn decode_call(calldata: &str, abi_path: &str, as_json: bool) -> Result<()> {
    let iface = load_interface(abi_path)?;
    let bytes = parse_hex(calldata, "calldata")?;
    let decoded = iface.decode_call(&bytes).context("decode calldata")?;

    if as_json {
        print_json(&decoded)
    } else {
        println!("Function:  {}", decoded.function_name);
        println!("Signature: {}", decoded.signature);
        println!("Selector:  {}", decoded.selector_hex());
        print_fields("Inputs", &decoded.inputs);
        Ok(())
    }
}

pub fn decode_log(
    topics: &[String],
    data: &str,
    address: Option<&str>,
    abi_path: &str,
    as_json: bool,
) -> Result<()> {
    let iface = load_interface(abi_path)?;
    let topics = topics
        .iter()
        .map(|t| fingerprint::parse_topic(t).ok_or_else(|| anyhow!("invalid topic '{t}'")))
        .collect::<Result<Vec<B256>>>()?;
    let mut log = RawLog::new(topics, parse_hex(data, "data")?);
    if let Some(address) = address {
        log = log.with_address(address.parse().with_context(|| format!("invalid address '{address}'"))?);
    }

    let decoded = iface.parse_log(&log).context("decode log")?;

    if as_json {
        print_json(&decoded)
    } else {
        println!("Event:     {}", decoded.event);
        println!("Signature: {}", decoded.signature);
        if let Some(address) = decoded.address {
            println!("Address:   {}", address.to_checksum(None));
        }
        print_fields("Fields", &decoded.fields);
        Ok(())
    }
}

/// Decode a JSON array of logs (`{address?, topics, data}`) in parallel.
pub fn decode_logs(file: &str, abi_path: &str, mode: ErrorMode) -> Result<()> {
    let iface = load_interface(abi_path)?;
    let text = std::fs::read_to_string(file).with_context(|| format!("read logs file '{file}'"))?;
    let logs: Vec<RawLog> =
        serde_json::from_str(&text).with_context(|| format!("parse logs in '{file}'"))?;

    let result = batch::decode_logs(&iface, &logs, mode)?;

    #[derive(Serialize)]
    struct Failure {
        index: usize,
        error: String,
    }

    let out = serde_json::json!({
        "total": logs.len(),
        "decoded": result
            .logs
            .iter()
            .map(|(index, log)| serde_json::json!({ "index": index, "log": log }))
            .collect::<Vec<_>>(),
        "errors": result
            .errors
            .iter()
            .map(|(index, err)| Failure { index: *index, error: err.to_string() })
            .collect::<Vec<_>>(),
    });
    print_json(&out)
}

pub fn decode_error(data: &str, abi_path: &str, as_json: bool) -> Result<()> {
    let iface = load_interface(abi_path)?;
    let bytes = parse_hex(data, "revert data")?;
    let decoded = iface.decode_error(&bytes).context("decode revert data")?;

    if as_json {
        print_json(&decoded)
    } else {
        println!("Error:     {}", decoded.error_name);
        println!("Signature: {}", decoded.signature);
        print_fields("Inputs", &decoded.inputs);
        Ok(())
    }
}

fn print_fields(title: &str, fields: &IndexMap<String, Value>) {
    println!("{title}:");
    for (name, value) in fields {
        println!("  {name}: {value}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
