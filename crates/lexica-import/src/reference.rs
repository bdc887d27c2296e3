//! Reference collaborator implementations for tests and embedding.
//!
//! Production deployments supply their own identifier-substitution and
//! expression-compiler services; these implementations keep the pipeline
//! runnable end to end without them.

use regex::{Captures, Regex};

use lexica_types::ComponentId;

use crate::aggregate::{
    CompileError, CompiledExpression, ExpressionCompiler, IdentifierRewriter,
};

/// Rewrites `:123456` legacy identifier references into canonical
/// identifier references (`:uuid`), leaving everything else untouched.
pub struct CanonicalRewriter {
    legacy_ref: Regex,
}

impl CanonicalRewriter {
    pub fn new() -> Self {
        Self {
            legacy_ref: Regex::new(r":(\d+)").expect("valid literal pattern"),
        }
    }
}

impl Default for CanonicalRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierRewriter for CanonicalRewriter {
    fn rewrite_legacy_ids(&self, text: &str) -> String {
        self.legacy_ref
            .replace_all(text, |caps: &Captures<'_>| {
                format!(":{}", ComponentId::from_legacy(&caps[1]))
            })
            .into_owned()
    }
}

/// Identity rewrite, for content whose identifiers are already canonical.
pub struct PassthroughRewriter;

impl IdentifierRewriter for PassthroughRewriter {
    fn rewrite_legacy_ids(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Reference expression compiler.
///
/// Performs a parenthesis-balance sanity check over both inputs and returns
/// the combined source form as the canonical text. It is insensitive to
/// fragment order only in the sense that it never reorders what it is
/// given; membership is the caller's contract.
pub struct EchoCompiler;

impl ExpressionCompiler for EchoCompiler {
    fn compile(
        &self,
        class_expressions: &str,
        property_expressions: &str,
    ) -> Result<CompiledExpression, CompileError> {
        for (label, text) in [
            ("class", class_expressions),
            ("property", property_expressions),
        ] {
            check_balance(label, text)?;
        }
        Ok(CompiledExpression::new(format!(
            "Class[{}] Property[{}]",
            class_expressions.trim(),
            property_expressions.trim()
        )))
    }
}

fn check_balance(label: &str, text: &str) -> Result<(), CompileError> {
    let mut depth = 0i64;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CompileError(format!(
                        "unbalanced ')' in {label} expressions"
                    )));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CompileError(format!(
            "unbalanced '(' in {label} expressions"
        )));
    }
    Ok(())
}
