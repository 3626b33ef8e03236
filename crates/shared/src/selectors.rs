//! Values derived from state. Nothing here is stored; callers recompute on
//! every read.

use std::sync::OnceLock;

use regex::Regex;

use crate::{domain::CrateType, state::AppState};

fn crate_type_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*#!\s*\[\s*crate_type\s*=\s*"([^"]*)"\s*\]"#)
            .expect("valid regex")
    })
}

fn main_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bfn\s+main\s*\(\s*\)").expect("valid regex"))
}

fn test_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\s*\[\s*test\s*\]").expect("valid regex"))
}

pub fn has_main_function(code: &str) -> bool {
    main_function().is_match(code)
}

pub fn has_tests(code: &str) -> bool {
    test_attribute().is_match(code)
}

/// An explicit `#![crate_type = "..."]` wins when it names a known type;
/// otherwise a `fn main()` makes it a binary.
pub fn crate_type_of(code: &str) -> CrateType {
    let declared = crate_type_attribute()
        .captures(code)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<CrateType>().ok());

    match declared {
        Some(crate_type) => crate_type,
        None if has_main_function(code) => CrateType::Bin,
        None => CrateType::Lib,
    }
}

pub fn crate_type(state: &AppState) -> CrateType {
    crate_type_of(&state.code)
}

pub fn run_as_test(state: &AppState) -> bool {
    has_tests(&state.code) && !has_main_function(&state.code)
}

#[cfg(test)]
#[path = "tests/selectors_tests.rs"]
mod tests;
