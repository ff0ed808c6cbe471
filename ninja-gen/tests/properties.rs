//! Property-based tests for escapable strings and line wrapping.
//!
//! These check, for generated inputs:
//! 1. Literal text survives parse + render unchanged.
//! 2. Declared variables render to their value verbatim.
//! 3. Wrapping never splits a token and keeps multi-token lines in width.
//! 4. Rendering the same statement twice gives identical bytes.

use std::collections::BTreeMap;

use ninja_gen::{BuildEdge, Error, NinjaString, NinjaWriter, Segment, TokenGroup};
use proptest::prelude::*;

// -- Strategies --

fn literal_text() -> impl Strategy<Value = String> {
    "[^$]{0,40}"
}

fn var_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}"
}

fn path_token() -> impl Strategy<Value = String> {
    "[a-z0-9_./]{1,40}"
}

fn tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(path_token(), 0..5)
}

fn edge() -> impl Strategy<Value = BuildEdge> {
    (
        "[a-z]{1,10}",
        prop::collection::vec(path_token(), 1..5),
        tokens(),
        tokens(),
        tokens(),
        tokens(),
        tokens(),
    )
        .prop_map(|(rule, outs, implicit_outs, ins, implicit_ins, order_only, validations)| {
            let escaped = |ts: Vec<String>| {
                TokenGroup::escaped(ts.into_iter().map(NinjaString::literal).collect())
            };
            BuildEdge {
                outputs: TokenGroup::plain(outs),
                implicit_outputs: escaped(implicit_outs),
                inputs: escaped(ins),
                implicit_inputs: TokenGroup::plain(implicit_ins),
                order_only: escaped(order_only),
                validations: TokenGroup::plain(validations),
                ..BuildEdge::new(rule)
            }
        })
}

fn render(edge: &BuildEdge, width: usize) -> String {
    let mut w = NinjaWriter::with_line_width(Vec::new(), width);
    w.build(None, edge).unwrap();
    String::from_utf8(w.into_inner()).unwrap()
}

// -- Properties --

proptest! {
    #[test]
    fn literal_text_round_trips(text in literal_text()) {
        let s = NinjaString::parse(None, &text).unwrap();
        prop_assert_eq!(s.render(None), text.clone());

        let scope: BTreeMap<String, String> = BTreeMap::new();
        prop_assert_eq!(s.render(Some(&scope)), text);
    }

    #[test]
    fn doubled_dollar_is_one_literal_dollar(a in literal_text(), b in literal_text()) {
        let s = NinjaString::parse(None, &format!("{a}$${b}")).unwrap();
        prop_assert_eq!(s.segments(), &[Segment::Literal(format!("{a}${b}"))]);
        // Rendered back out, the consumer reads the same single `$`.
        let reparsed = NinjaString::parse(None, &s.render(None)).unwrap();
        prop_assert_eq!(reparsed, s);
    }

    #[test]
    fn declared_variable_renders_verbatim(
        name in var_name(),
        value in "\\PC{0,30}",
        braced in any::<bool>(),
    ) {
        let mut scope = BTreeMap::new();
        scope.insert(name.clone(), value.clone());
        let text = if braced { format!("${{{name}}}") } else { format!("${name}") };

        let s = NinjaString::parse(Some(&scope), &text).unwrap();
        prop_assert_eq!(s.render(Some(&scope)), value);
    }

    #[test]
    fn undeclared_variable_needs_no_scope(name in var_name(), other in var_name()) {
        prop_assume!(name != other);
        let mut scope = BTreeMap::new();
        scope.insert(other, "x".to_string());
        let text = format!("${{{name}}}");

        let err = NinjaString::parse(Some(&scope), &text).unwrap_err();
        prop_assert!(matches!(err, Error::UndeclaredVariable(ref n) if *n == name));
        prop_assert!(NinjaString::parse(None, &text).is_ok());
    }

    #[test]
    fn wrapping_never_splits_tokens(edge in edge(), width in 10usize..120) {
        let wrapped = render(&edge, width);
        let unwrapped = render(&edge, usize::MAX);
        prop_assert!(!unwrapped.trim_end().contains('\n'));
        prop_assert_eq!(wrapped.replace(" $\n        ", " "), unwrapped);
    }

    #[test]
    fn wrapped_lines_fit_unless_single_token(edge in edge(), width in 10usize..120) {
        let out = render(&edge, width);
        for line in out.lines() {
            let content = line.trim_start().trim_end_matches(" $");
            prop_assert!(
                line.len() <= width || !content.contains(' '),
                "line {:?} exceeds width {}", line, width
            );
        }
    }

    #[test]
    fn rendering_is_repeatable(edge in edge(), width in 10usize..120) {
        prop_assert_eq!(render(&edge, width), render(&edge, width));
    }
}
