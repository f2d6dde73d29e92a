//! `abicodec signature` — canonical signature and fingerprint of one
//! human-readable declaration.

use abicodec_evm::{parse_declaration, Declaration};
use anyhow::{Context, Result};
use serde_json::json;

pub fn run(text: &str, as_json: bool) -> Result<()> {
    let decl = parse_declaration(text).with_context(|| format!("parse declaration '{text}'"))?;

    let (kind, signature, hash_label, hash) = match &decl {
        Declaration::Function(m) => ("function", m.signature().to_string(), "selector", m.hex_selector()),
        Declaration::Constructor(m) => ("constructor", m.signature().to_string(), "selector", m.hex_selector()),
        Declaration::Error(e) => ("error", e.signature().to_string(), "selector", e.hex_selector()),
        Declaration::Event(e) => ("event", e.signature().to_string(), "topic0", e.hex_topic0()),
    };

    if as_json {
        let out = json!({ "kind": kind, "signature": signature, hash_label: hash });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Kind:      {kind}");
        println!("Signature: {signature}");
        println!("{:<10} {hash}", format!("{}:", capitalize(hash_label)));
        if let Declaration::Event(e) = &decl {
            println!("Indexed:   {}", e.indexed_count());
            if e.is_anonymous() {
                println!("Anonymous: yes (topic0 is not emitted)");
            }
        }
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
