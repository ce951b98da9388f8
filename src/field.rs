// Data model for the generation pipeline. No rendering logic here.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

use crate::classify::Category;
use crate::config::ValidationNamespace;

// ------------------------------ FieldSpec --------------------------------- //

/// One row of the human-authored field list. Immutable once created; the
/// input sequence order is significant and preserved throughout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// 1-based nesting depth relative to the root class.
    pub level: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub raw_type: String,
    /// `"N"` or `"N,M"`, absent when unconstrained.
    #[serde(default)]
    pub size: Option<String>,
    /// Accepts a JSON bool or the legacy `"Y"`/`"N"` string form.
    #[serde(default, deserialize_with = "required_flag")]
    pub required: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub pattern: Option<String>,
}

impl FieldSpec {
    /// Size constraint, if present and non-empty.
    pub fn size_constraint(&self) -> Option<&str> {
        self.size.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn pattern_constraint(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|s| !s.is_empty())
    }
}

fn required_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        // Only "Y" means required, matching the source tables.
        Flag::Text(s) => s.trim().eq_ignore_ascii_case("y"),
    })
}

// ---------------------------- ResolvedField ------------------------------- //

/// A field after category/canonical-type inference and, for containers,
/// the containment rewrite. Created once by the resolver, never mutated.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub spec: FieldSpec,
    pub category: Category,
    /// Normalized type used in the rendered declaration. For containers this
    /// is the child class name (or `List<ChildName>`).
    pub canonical_type: String,
    /// Lower-camel identifier derived from `spec.name`.
    pub identifier: String,
    pub imports: BTreeSet<ImportSym>,
}

impl ResolvedField {
    pub fn is_string_like(&self) -> bool {
        crate::classify::is_string_like(&self.canonical_type)
    }
}

// ------------------------------ ClassNode --------------------------------- //

/// One class definition in the containment tree. The root carries no
/// originating field; every non-root node originates from a container field.
#[derive(Debug)]
pub struct ClassNode {
    pub class_name: String,
    /// Insertion order = discovery order among siblings.
    pub fields: Vec<ResolvedField>,
    pub children: Vec<ClassNode>,
    pub originating_field: Option<Box<ResolvedField>>,
}

impl ClassNode {
    /// Pre-order walk: the node itself, then children in discovery order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ClassNode)) {
        visit(self);
        for child in &self.children {
            child.walk(&mut *visit);
        }
    }
}

// ------------------------------ ImportSym --------------------------------- //

/// Symbolic import tokens. Resolved to concrete Java import paths at emit
/// time, when the validation namespace root is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSym {
    List,
    UtilDate,
    SqlTimestamp,
    LocalDate,
    LocalDateTime,
    BigDecimal,
    Pattern,
    NotBlank,
    NotNull,
    Size,
    Digits,
    Valid,
}

impl ImportSym {
    /// Import symbol contributed by a canonical scalar type, if any.
    pub fn for_canonical(canonical_type: &str) -> Option<ImportSym> {
        match canonical_type {
            "Date" => Some(ImportSym::UtilDate),
            "Timestamp" => Some(ImportSym::SqlTimestamp),
            "LocalDate" => Some(ImportSym::LocalDate),
            "LocalDateTime" => Some(ImportSym::LocalDateTime),
            "BigDecimal" => Some(ImportSym::BigDecimal),
            _ => None,
        }
    }

    pub fn path(self, namespace: ValidationNamespace) -> String {
        match self {
            ImportSym::List => "java.util.List".to_string(),
            ImportSym::UtilDate => "java.util.Date".to_string(),
            ImportSym::SqlTimestamp => "java.sql.Timestamp".to_string(),
            ImportSym::LocalDate => "java.time.LocalDate".to_string(),
            ImportSym::LocalDateTime => "java.time.LocalDateTime".to_string(),
            ImportSym::BigDecimal => "java.math.BigDecimal".to_string(),
            // The marker annotation lives at the namespace root, the
            // constraint annotations one package below it.
            ImportSym::Valid => format!("{}.Valid", namespace.root()),
            ImportSym::Pattern => format!("{}.constraints.Pattern", namespace.root()),
            ImportSym::NotBlank => format!("{}.constraints.NotBlank", namespace.root()),
            ImportSym::NotNull => format!("{}.constraints.NotNull", namespace.root()),
            ImportSym::Size => format!("{}.constraints.Size", namespace.root()),
            ImportSym::Digits => format!("{}.constraints.Digits", namespace.root()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_accepts_bool_and_legacy_string_forms() {
        let a: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"A","type":"String","required":true}"#)
                .unwrap();
        let b: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"B","type":"String","required":"Y"}"#)
                .unwrap();
        let c: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"C","type":"String","required":"N"}"#)
                .unwrap();
        let d: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"D","type":"String"}"#).unwrap();
        assert!(a.required);
        assert!(b.required);
        assert!(!c.required);
        assert!(!d.required);
    }

    #[test]
    fn size_constraint_filters_blank_values() {
        let f: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"A","type":"String","size":" "}"#).unwrap();
        assert_eq!(f.size_constraint(), None);
        let g: FieldSpec =
            serde_json::from_str(r#"{"level":1,"name":"A","type":"decimal","size":"5,2"}"#)
                .unwrap();
        assert_eq!(g.size_constraint(), Some("5,2"));
    }

    #[test]
    fn import_paths_follow_the_namespace_flag() {
        assert_eq!(
            ImportSym::NotBlank.path(ValidationNamespace::Legacy),
            "javax.validation.constraints.NotBlank"
        );
        assert_eq!(
            ImportSym::NotBlank.path(ValidationNamespace::Modern),
            "jakarta.validation.constraints.NotBlank"
        );
        assert_eq!(ImportSym::Valid.path(ValidationNamespace::Modern), "jakarta.validation.Valid");
        assert_eq!(ImportSym::List.path(ValidationNamespace::Legacy), "java.util.List");
    }
}
