use abicodec_core::{grammar::MAX_DEPTH, parse_type, GrammarError, TupleElem, Type};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Bool),
        Just(Type::Address),
        Just(Type::String),
        Just(Type::Bytes),
        Just(Type::Function),
        (1usize..=32).prop_map(|n| Type::Uint(n * 8)),
        (1usize..=32).prop_map(|n| Type::Int(n * 8)),
        (1usize..=32).prop_map(Type::FixedBytes),
    ]
}

fn param_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z_][a-z0-9_]{0,6}".prop_filter("keyword", |s| s != "tuple" && s != "indexed"),
    ]
}

fn any_type() -> impl Strategy<Value = Type> {
    leaf().prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Type::Slice(Box::new(t))),
            (inner.clone(), 1usize..4).prop_map(|(t, n)| Type::Array(Box::new(t), n)),
            prop::collection::vec((inner, param_name(), any::<bool>()), 0..4).prop_map(
                |elems| {
                    Type::Tuple(
                        elems
                            .into_iter()
                            .map(|(ty, name, indexed)| TupleElem { name, ty, indexed })
                            .collect(),
                    )
                }
            ),
        ]
    })
}

/// Drop names and `indexed` flags, as the canonical rendering does.
fn strip(ty: &Type) -> Type {
    match ty {
        Type::Array(elem, n) => Type::Array(Box::new(strip(elem)), *n),
        Type::Slice(elem) => Type::Slice(Box::new(strip(elem))),
        Type::Tuple(elems) => Type::tuple_of(elems.iter().map(|e| strip(&e.ty))),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn formatted_types_parse_back(ty in any_type()) {
        let text = ty.format(true);
        let parsed = parse_type(&text);
        prop_assert_eq!(parsed, Ok(ty));
    }

    #[test]
    fn canonical_form_parses_to_unnamed_tree(ty in any_type()) {
        let parsed = parse_type(&ty.canonical()).unwrap();
        prop_assert_eq!(parsed.canonical(), ty.canonical());
        prop_assert_eq!(parsed, strip(&ty));
    }

    #[test]
    fn parser_never_panics(input in "[ -~]{0,40}") {
        let _ = parse_type(&input);
    }

    #[test]
    fn bracket_soup_never_panics(input in "[()\\[\\]a-z0-9, ]{0,4000}") {
        let _ = parse_type(&input);
    }

    #[test]
    fn nesting_depth_is_bounded(depth in 1usize..1000, tuples in any::<bool>()) {
        let text = if tuples {
            format!("{}uint8{}", "(".repeat(depth), ")".repeat(depth))
        } else {
            format!("uint8{}", "[]".repeat(depth))
        };
        let result = parse_type(&text);
        if depth <= MAX_DEPTH {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(GrammarError::TooDeep { limit: MAX_DEPTH }));
        }
    }

    #[test]
    fn leading_zero_widths_are_rejected(width in 1usize..=32) {
        let text = format!("bytes0{width}");
        prop_assert_eq!(parse_type(&text), Err(GrammarError::LeadingZero(text.clone())));
    }

    #[test]
    fn bad_widths_are_rejected(bits in 1usize..512) {
        let result = parse_type(&format!("uint{bits}"));
        prop_assert_eq!(result.is_ok(), bits % 8 == 0 && bits <= 256);
    }
}
