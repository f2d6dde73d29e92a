//! Structured (JSON) ABI front-end.
//!
//! Each argument object is rendered back into type-grammar text,
//! recursing through `components` for tuples, and parsed by the grammar:
//!
//! ```text
//! {"type": "tuple[]", "components": [{"type": "uint256", "name": "id"}]}
//!   → tuple(uint256 id)[]
//! ```

use abicodec_core::{error::SchemaError, TupleElem, Type};
use serde::Deserialize;
use tracing::debug;

use crate::interface::{CustomError, Event, Interface, Method};

/// One argument object of a JSON ABI entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub components: Vec<AbiParam>,
    /// Solidity-level type (e.g. `struct Order[]`); informational only.
    #[serde(default)]
    pub internal_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbiEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
    #[serde(default)]
    constant: bool,
    #[serde(default)]
    anonymous: bool,
    #[serde(default)]
    state_mutability: Option<String>,
}

/// Either a bare entry array or a build artifact carrying one under `abi`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AbiDocument {
    Entries(Vec<AbiEntry>),
    Artifact { abi: Vec<AbiEntry> },
}

/// Parse a JSON ABI document into an [`Interface`].
pub fn parse(json: &str) -> Result<Interface, SchemaError> {
    let entries = match serde_json::from_str::<AbiDocument>(json) {
        Ok(AbiDocument::Entries(entries)) | Ok(AbiDocument::Artifact { abi: entries }) => entries,
        // Re-parse as a plain array so the error names the real problem.
        Err(_) => serde_json::from_str::<Vec<AbiEntry>>(json)?,
    };

    let mut iface = Interface::new();
    for entry in entries {
        match entry.kind.as_str() {
            "constructor" => {
                let inputs = params_to_elems(&entry.inputs)?;
                iface.set_constructor(Method::new("", inputs, Vec::new(), false))?;
            }
            "function" | "" => {
                let constant = entry.constant
                    || matches!(entry.state_mutability.as_deref(), Some("view" | "pure"));
                let inputs = params_to_elems(&entry.inputs)?;
                let outputs = params_to_elems(&entry.outputs)?;
                iface.add_method(Method::new(entry.name, inputs, outputs, constant))?;
            }
            "event" => {
                let inputs = params_to_elems(&entry.inputs)?;
                iface.add_event(Event::new(entry.name, inputs, entry.anonymous))?;
            }
            "error" => {
                let inputs = params_to_elems(&entry.inputs)?;
                iface.add_error(CustomError::new(entry.name, inputs))?;
            }
            "fallback" | "receive" => {}
            other => return Err(SchemaError::UnknownEntryKind(other.to_string())),
        }
    }

    debug!(
        methods = iface.methods().count(),
        events = iface.events().count(),
        errors = iface.errors().count(),
        "interface built from JSON ABI"
    );
    Ok(iface)
}

/// Resolve a list of argument objects into tuple members.
pub fn params_to_elems(params: &[AbiParam]) -> Result<Vec<TupleElem>, SchemaError> {
    params
        .iter()
        .map(|p| {
            let text = render_param_type(p);
            let ty = Type::parse(&text).map_err(|source| SchemaError::InvalidType {
                name: p.name.clone(),
                source,
            })?;
            Ok(TupleElem {
                name: p.name.clone(),
                ty,
                indexed: p.indexed,
            })
        })
        .collect()
}

/// Grammar text for one argument: `tuple(...)` with its components for
/// tuple types, keeping any array suffix.
pub fn render_param_type(param: &AbiParam) -> String {
    let Some(suffix) = param.ty.strip_prefix("tuple") else {
        return param.ty.clone();
    };
    let members: Vec<String> = param
        .components
        .iter()
        .map(|c| {
            let ty = render_param_type(c);
            if is_plain_ident(&c.name) {
                format!("{ty} {}", c.name)
            } else {
                ty
            }
        })
        .collect();
    format!("tuple({}){suffix}", members.join(","))
}

/// Names that survive a trip through the lexer as a single identifier.
fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && name != "tuple"
        && name != "indexed"
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20: &str = r#"[
        {"type":"function","name":"transfer","stateMutability":"nonpayable",
         "inputs":[{"name":"dst","type":"address"},{"name":"wad","type":"uint256"}],
         "outputs":[{"name":"","type":"bool"}]},
        {"type":"function","name":"balanceOf","stateMutability":"view",
         "inputs":[{"name":"owner","type":"address"}],
         "outputs":[{"name":"","type":"uint256"}]},
        {"type":"event","name":"Transfer","anonymous":false,
         "inputs":[{"name":"from","type":"address","indexed":true},
                   {"name":"to","type":"address","indexed":true},
                   {"name":"value","type":"uint256","indexed":false}]},
        {"type":"error","name":"Paused","inputs":[]},
        {"type":"fallback"},
        {"type":"receive","stateMutability":"payable"}
    ]"#;

    #[test]
    fn parses_erc20() {
        let iface = parse(ERC20).unwrap();
        assert_eq!(iface.methods().count(), 2);
        let transfer = iface.method_by_hex_selector("0xa9059cbb").unwrap();
        assert_eq!(transfer.name(), "transfer");
        assert!(!transfer.is_constant());
        assert!(iface.method_by_signature("balanceOf(address)").unwrap().is_constant());
        let event = iface.event_by_signature("Transfer(address,address,uint256)").unwrap();
        assert_eq!(event.indexed_count(), 2);
        assert!(iface.error_by_name("Paused").is_some());
    }

    #[test]
    fn tuple_components_render_into_grammar() {
        let param: AbiParam = serde_json::from_str(
            r#"{"name":"orders","type":"tuple[2][]","internalType":"struct Order[2][]",
                "components":[{"name":"id","type":"uint256"},
                              {"name":"legs","type":"tuple[]",
                               "components":[{"name":"","type":"bytes32"}]}]}"#,
        )
        .unwrap();
        assert_eq!(
            render_param_type(&param),
            "tuple(uint256 id,tuple(bytes32)[] legs)[2][]"
        );
        let elems = params_to_elems(&[param]).unwrap();
        assert_eq!(elems[0].ty.canonical(), "(uint256,(bytes32)[])[2][]");
    }

    #[test]
    fn artifact_wrapper_is_accepted() {
        let json = format!(r#"{{"contractName":"Token","abi":{ERC20}}}"#);
        assert_eq!(parse(&json).unwrap().methods().count(), 2);
    }

    #[test]
    fn schema_errors() {
        let dup_ctor = r#"[{"type":"constructor","inputs":[]},{"type":"constructor","inputs":[]}]"#;
        assert!(matches!(parse(dup_ctor), Err(SchemaError::DuplicateConstructor)));

        let unknown = r#"[{"type":"modifier","name":"x"}]"#;
        assert!(matches!(parse(unknown), Err(SchemaError::UnknownEntryKind(_))));

        let bad_type = r#"[{"type":"function","name":"f","inputs":[{"name":"x","type":"uint7"}]}]"#;
        assert!(matches!(parse(bad_type), Err(SchemaError::InvalidType { .. })));

        assert!(matches!(parse("not json"), Err(SchemaError::Json(_))));
    }
}
