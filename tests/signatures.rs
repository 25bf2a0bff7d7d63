use test_log::test;

use qint_rs::compile::Compiler;
use qint_rs::error::{CompileError, ParseError};
use qint_rs::limits::Limits;
use qint_rs::signature::{Signature, SignatureKind};

fn sig(expr: &str) -> Signature {
    match qint_rs::compile(expr) {
        Ok(signature) => signature,
        Err(e) => panic!("failed to compile {:?}: {}", expr, e),
    }
}

fn err(expr: &str) -> CompileError {
    match qint_rs::compile(expr) {
        Ok(signature) => panic!("{:?} compiled to {}", expr, signature),
        Err(e) => e,
    }
}

#[test]
fn test_deterministic() {
    for expr in ["1", "1&(2|3)", "!4|5&6", "10 & !(20 | 30)"] {
        assert_eq!(sig(expr), sig(expr));
    }
}

#[test]
fn test_equivalent_expressions() {
    assert_eq!(sig("1&(2|3)"), sig("(1&2)|(1&3)"));
    assert_eq!(sig("!(1|2)"), sig("!1&!2"));
    assert_eq!(sig("!!7"), sig("7"));
    assert_eq!(sig("3 & 1"), sig("1&3"));
    assert_eq!(sig("1|2|3"), sig("3|(2|1)"));
}

#[cfg(feature = "xor")]
#[test]
fn test_xor_equivalence() {
    assert_eq!(sig("1^2"), sig("(1&!2)|(!1&2)"));
    assert_eq!(sig("1^1"), Signature::contradiction());
}

#[test]
fn test_distinct_expressions() {
    assert_ne!(sig("1&2"), sig("1|2"));
    assert_ne!(sig("1&2"), sig("1&3"));
    assert_ne!(sig("1"), sig("!1"));
}

#[test]
fn test_collapse() {
    assert_eq!(sig("1|!1").as_bytes(), &[0, 0, 0, 0, 0xFF]);
    assert_eq!(sig("1&!1").as_bytes(), &[0, 0, 0, 0, 0x00]);
    // Collapsed forms carry no literals.
    assert_eq!(sig("1|!1"), sig("2|!2|3"));
    assert_eq!(sig("1&!1").kind(), SignatureKind::Contradiction);
}

#[test]
fn test_single_literal() {
    assert_eq!(sig("5").as_bytes(), &[0, 0, 0, 1, 0, 0, 0, 5, 0b10]);
    assert_eq!(sig("!5").as_bytes(), &[0, 0, 0, 1, 0, 0, 0, 5, 0b01]);
}

#[test]
fn test_layout() {
    let s = sig("300 | 70000");
    assert_eq!(
        s.as_bytes(),
        &[0, 0, 0, 2, 0, 0, 0x01, 0x2C, 0, 0x01, 0x11, 0x70, 0b1110]
    );
    assert_eq!(Signature::from_bytes(s.as_bytes()), Ok(s));
}

#[test]
fn test_grammar_errors() {
    assert_eq!(err(""), CompileError::Parse(ParseError::EmptyExpression));
    assert_eq!(err("()"), CompileError::Parse(ParseError::EmptyExpression));
    assert_eq!(err("&3"), CompileError::Parse(ParseError::RvalueExpected { offset: 0 }));
    assert_eq!(err("3&"), CompileError::Parse(ParseError::RvalueExpected { offset: 1 }));
    assert_eq!(err("(1"), CompileError::Parse(ParseError::UnmatchedOpen { offset: 0 }));
    assert_eq!(err("1)"), CompileError::Parse(ParseError::UnmatchedClose { offset: 1 }));
    assert_eq!(
        err("1 & a"),
        CompileError::Parse(ParseError::InvalidCharacter { ch: 'a', offset: 4 })
    );
}

#[test]
fn test_symbol_limit() {
    let expr = (1..=17).map(|i| i.to_string()).collect::<Vec<_>>().join("|");
    assert_eq!(err(&expr), CompileError::TooManySymbols { count: 17, max: 16 });
    assert!(err(&expr).is_resource_limit());

    let compiler = Compiler::new(Limits::permissive());
    let s = compiler.compile(&expr, false, false).unwrap();
    assert_eq!(s.literals(), (1..=17).collect::<Vec<u32>>());
    assert_eq!(s.len(), 4 + 17 * 4 + (1 << 17) / 8);
}

#[test]
fn test_throw_flags() {
    let compiler = Compiler::default();
    assert_eq!(compiler.compile("4&!4", true, true), Err(CompileError::AlwaysFalse));
    assert_eq!(compiler.compile("4|!4", true, true), Err(CompileError::AlwaysTrue));
    assert_eq!(compiler.compile("4&!4", false, true), Ok(Signature::contradiction()));
    assert_eq!(compiler.compile("4|!4", true, false), Ok(Signature::tautology()));
}

#[test]
fn test_membership() {
    let s = sig("(1 | 2) & !3");
    assert!(s.matches(&[1]));
    assert!(s.matches(&[2, 1]));
    assert!(!s.matches(&[1, 3]));
    assert!(!s.matches(&[]));
    assert!(!s.matches(&[4, 5]));
}

#[test]
fn test_long_chain_is_a_resource_error() {
    let chain = vec!["1"; 200_000].join("|");
    let e = err(&chain);
    assert!(e.is_resource_limit());
    assert!(matches!(e, CompileError::Parse(ParseError::TooDeep { limit: 256, .. })));

    // Chains within the depth limit still compile.
    assert_eq!(sig(&vec!["1"; 200].join("|")), sig("1"));
}

#[test]
fn test_symbol_cap_is_a_resource_error() {
    let expr = (1..=32).map(|i| i.to_string()).collect::<Vec<_>>().join("&");
    let e = Compiler::new(Limits::permissive()).compile(&expr, false, false).unwrap_err();
    assert_eq!(e, CompileError::TooManySymbols { count: 32, max: 31 });
    assert!(Limits::new(40, 256).is_err());
}
