//! Loading an [`Interface`] from the `--abi` argument, plus hex helpers
//! shared by the commands.

use abicodec_evm::Interface;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// `.json` files are JSON ABIs (bare array or build artifact); anything else
/// is read as one human-readable declaration per line.
pub fn load_interface(path: &str) -> Result<Interface> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read ABI file '{path}'"))?;
    let is_json = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let iface = if is_json {
        Interface::from_json(&text).with_context(|| format!("parse JSON ABI '{path}'"))?
    } else {
        Interface::from_signatures(signature_lines(&text))
            .with_context(|| format!("parse signatures in '{path}'"))?
    };
    debug!(path, json = is_json, "loaded interface");
    Ok(iface)
}

/// Non-blank lines that are not `#` comments.
pub fn signature_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Decode `0x`-prefixed (or bare) hex.
pub fn parse_hex(text: &str, what: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).with_context(|| format!("invalid {what} hex"))
}
