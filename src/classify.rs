//! Type classifier: raw type token → semantic category + canonical name.
//!
//! Total over its input domain: anything unrecognized is treated as an
//! object reference rather than rejected, so classification never fails.
//! The known-type registry is a separate, advisory check that feeds the
//! per-run unknown-type warnings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

// ------------------------------- Tables ----------------------------------- //

/// Suffix that marks a token as a generated-object reference even when it is
/// not in any table (e.g. `CustomerDTO`).
const OBJECT_SUFFIX: &str = "dto";

/// `list < inner >`, case-insensitive, inner captured verbatim.
static LIST_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^list\s*<\s*(.*?)\s*>$").expect("list shape regex"));

/// Lower-cased synonym → canonical type name.
static CANONICAL: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("string", "String"),
        ("int", "Integer"),
        ("integer", "Integer"),
        ("long", "Long"),
        ("double", "Double"),
        ("float", "Float"),
        ("boolean", "Boolean"),
        ("char", "Character"),
        ("character", "Character"),
        ("byte", "Byte"),
        ("short", "Short"),
        ("void", "Void"),
        ("date", "Date"),
        ("datetime", "LocalDateTime"),
        ("timestamp", "Timestamp"),
        ("localdate", "LocalDate"),
        ("localdatetime", "LocalDateTime"),
        ("decimal", "BigDecimal"),
        ("bigdecimal", "BigDecimal"),
    ])
});

static SCALAR: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "string", "int", "integer", "long", "double", "float", "boolean", "char", "character",
        "byte", "short", "void",
    ])
});

static DATE_TIME: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["date", "datetime", "timestamp", "localdate", "localdatetime"]));

static DECIMAL: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from(["decimal", "bigdecimal"]));

// ------------------------------- Category --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Primitive,
    Wrapper,
    DateTime,
    Decimal,
    ListOfPrimitive,
    ListOfObject,
    ObjectRef,
}

impl Category {
    /// Container categories spawn a nested class definition.
    pub fn is_container(self) -> bool {
        matches!(self, Category::ObjectRef | Category::ListOfObject)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Category::ListOfPrimitive | Category::ListOfObject)
    }
}

// ------------------------------- Classify --------------------------------- //

pub fn classify(raw_type: &str) -> Category {
    let token = raw_type.trim();
    let lower = token.to_lowercase();

    if let Some(caps) = LIST_SHAPE.captures(token) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return if classify(inner).is_container() {
            Category::ListOfObject
        } else {
            Category::ListOfPrimitive
        };
    }
    // Bare `list` has no element type to inspect, so it needs a child class.
    if lower == "list" {
        return Category::ListOfObject;
    }

    if SCALAR.contains(lower.as_str()) {
        // The wrapper spelling (`Integer`, `Long`) starts uppercase; the raw
        // spelling (`int`, `long`) does not. Downstream treats both alike.
        return if token.chars().next().is_some_and(|c| c.is_uppercase()) {
            Category::Wrapper
        } else {
            Category::Primitive
        };
    }
    if DATE_TIME.contains(lower.as_str()) {
        return Category::DateTime;
    }
    if DECIMAL.contains(lower.as_str()) {
        return Category::Decimal;
    }

    // Everything else, including namespaced and `*DTO` tokens, is assumed to
    // reference an object. Unknown input is inferred, never rejected.
    Category::ObjectRef
}

/// Canonical type name for a token: synonyms normalized, list shapes rebuilt
/// around the canonical inner name, unknown tokens passed through unchanged.
pub fn canonical_name(raw_type: &str) -> String {
    let token = raw_type.trim();
    if let Some(caps) = LIST_SHAPE.captures(token) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return format!("List<{}>", canonical_name(inner));
    }
    let lower = token.to_lowercase();
    match CANONICAL.get(lower.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => token.to_string(),
    }
}

/// Only the canonical string type gets blank-forbidding constraints; every
/// other required field gets the null-forbidding kind.
pub fn is_string_like(canonical_type: &str) -> bool {
    canonical_type == "String"
}

// ---------------------------- Known registry ------------------------------ //

/// Advisory check: is this a token the generator recognizes? Unknown tokens
/// still classify (as ObjectRef) but are reported back per invocation.
pub fn is_known_type(raw_type: &str) -> bool {
    let token = raw_type.trim();
    if token.is_empty() {
        return false;
    }
    if let Some(caps) = LIST_SHAPE.captures(token) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return !inner.is_empty() && is_known_type(inner);
    }
    let lower = token.to_lowercase();
    SCALAR.contains(lower.as_str())
        || DATE_TIME.contains(lower.as_str())
        || DECIMAL.contains(lower.as_str())
        || lower == "list"
        || lower == "object"
        || lower.ends_with(OBJECT_SUFFIX)
        || token.contains('.')
}

// ------------------------------- Tests ------------------------------------ //
