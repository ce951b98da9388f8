//! Structure resolver: rebuilds the containment tree from the flat,
//! level-tagged field sequence.
//!
//! Single forward pass over input order with a stack of open container
//! scopes (levels strictly increasing). A field one level below the
//! innermost open container attaches there; root-level fields attach to the
//! root; anything else has no resolvable ancestor and is dropped from the
//! tree. Linear in the number of fields, no history besides the stack.

use std::collections::BTreeSet;
use std::mem;

use crate::classify::{self, Category};
use crate::config::GeneratorConfig;
use crate::field::{ClassNode, FieldSpec, ImportSym, ResolvedField};
use crate::naming;

pub struct Resolution {
    pub root: ClassNode,
    /// Raw type tokens the registry did not recognize, deduplicated and
    /// sorted. Advisory: the fields still resolved as object references.
    pub unknown_types: Vec<String>,
}

pub fn analyze(fields: &[FieldSpec], root_name: &str, config: &GeneratorConfig) -> Resolution {
    let min_level = fields.iter().map(|f| f.level).min().unwrap_or(1);

    let mut arena = vec![Slot::new(root_name.to_string())];
    let mut open: Vec<(u32, usize)> = Vec::new();
    let mut unknown: BTreeSet<String> = BTreeSet::new();

    for spec in fields {
        if !classify::is_known_type(&spec.raw_type) {
            unknown.insert(spec.raw_type.trim().to_string());
        }
        let category = classify::classify(&spec.raw_type);

        // A container at level L shadows anything open at L or deeper; a
        // plain field at level L only ends scopes deeper than L.
        if category.is_container() {
            while open.last().is_some_and(|&(level, _)| level >= spec.level) {
                open.pop();
            }
        } else {
            while open.last().is_some_and(|&(level, _)| level > spec.level) {
                open.pop();
            }
        }

        let parent = if spec.level == min_level {
            Some(0)
        } else {
            // The enclosing scope must sit exactly one level up. It is not
            // necessarily the innermost entry: a sibling container at the
            // field's own level stays open underneath it.
            let target = spec.level - 1;
            open.iter().rev().find_map(|&(level, id)| (level == target).then_some(id))
        };
        let Some(parent) = parent else {
            // No resolvable container ancestor: dropped, silently.
            continue;
        };

        let mut field = ResolvedField {
            spec: spec.clone(),
            category,
            canonical_type: classify::canonical_name(&spec.raw_type),
            identifier: naming::lower_first(&spec.name),
            imports: BTreeSet::new(),
        };

        let child_class = category.is_container().then(|| {
            naming::class_name(
                spec.level,
                &spec.name,
                &config.class_name_overrides,
                &config.reserved_names,
            )
        });
        if let Some(class_name) = &child_class {
            field.canonical_type = if category == Category::ListOfObject {
                format!("List<{class_name}>")
            } else {
                class_name.clone()
            };
        }
        field.imports = import_set(&field);

        if let Some(class_name) = child_class {
            let child = arena.len();
            arena.push(Slot {
                class_name,
                origin: Some(field.clone()),
                ..Slot::default()
            });
            arena[parent].children.push(child);
            open.push((spec.level, child));
        }
        arena[parent].fields.push(field);
    }

    Resolution {
        root: build_node(&mut arena, 0),
        unknown_types: unknown.into_iter().collect(),
    }
}

// ------------------------------- Imports ---------------------------------- //

fn import_set(field: &ResolvedField) -> BTreeSet<ImportSym> {
    let mut set = BTreeSet::new();

    if field.category.is_list() {
        set.insert(ImportSym::List);
        if let Some(sym) = list_inner(&field.canonical_type).and_then(ImportSym::for_canonical) {
            set.insert(sym);
        }
    } else if let Some(sym) = ImportSym::for_canonical(&field.canonical_type) {
        set.insert(sym);
    }

    if field.spec.pattern_constraint().is_some() {
        set.insert(ImportSym::Pattern);
    }
    if field.spec.required {
        set.insert(if field.is_string_like() { ImportSym::NotBlank } else { ImportSym::NotNull });
    }
    if field.is_string_like() && field.spec.size_constraint().is_some() {
        set.insert(ImportSym::Size);
    }
    if field.category == Category::Decimal && field.spec.size_constraint().is_some() {
        set.insert(ImportSym::Digits);
    }
    if field.category.is_container() {
        set.insert(ImportSym::Valid);
    }
    set
}

fn list_inner(canonical: &str) -> Option<&str> {
    canonical.strip_prefix("List<").and_then(|rest| rest.strip_suffix('>'))
}

// -------------------------------- Arena ----------------------------------- //

#[derive(Default)]
struct Slot {
    class_name: String,
    fields: Vec<ResolvedField>,
    children: Vec<usize>,
    origin: Option<ResolvedField>,
}

impl Slot {
    fn new(class_name: String) -> Self {
        Slot { class_name, ..Slot::default() }
    }
}

/// Move the arena slots into an owned tree. Child ids are always greater
/// than their parent's, so taking each slot once is safe.
fn build_node(arena: &mut Vec<Slot>, id: usize) -> ClassNode {
    let slot = mem::take(&mut arena[id]);
    let mut children = Vec::with_capacity(slot.children.len());
    for child in slot.children {
        children.push(build_node(arena, child));
    }
    ClassNode {
        class_name: slot.class_name,
        fields: slot.fields,
        children,
        originating_field: slot.origin.map(Box::new),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn spec(level: u32, name: &str, raw_type: &str) -> FieldSpec {
        FieldSpec {
            level,
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            size: None,
            required: false,
            comment: String::new(),
            pattern: None,
        }
    }

    fn sized(level: u32, name: &str, raw_type: &str, size: &str, required: bool) -> FieldSpec {
        FieldSpec { size: Some(size.to_string()), required, ..spec(level, name, raw_type) }
    }

    fn config_with_override(level: u32, name: &str, class: &str) -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        let mut inner = IndexMap::new();
        inner.insert(name.to_string(), class.to_string());
        config.class_name_overrides.insert(level, inner);
        config
    }

    #[test]
    fn scenario_builds_child_class_with_override() {
        let fields = vec![
            sized(1, "UserId", "String", "20", true),
            spec(1, "SupList", "List<Object>"),
            sized(2, "Code", "String", "5", false),
        ];
        let config = config_with_override(1, "SupList", "SupListDTO");
        let resolution = analyze(&fields, "MainDTO", &config);
        let root = &resolution.root;

        assert_eq!(root.class_name, "MainDTO");
        assert_eq!(root.fields.len(), 2);
        assert_eq!(root.fields[0].canonical_type, "String");
        assert!(root.fields[0].imports.contains(&ImportSym::NotBlank));
        assert!(root.fields[0].imports.contains(&ImportSym::Size));
        assert_eq!(root.fields[1].canonical_type, "List<SupListDTO>");
        assert_eq!(root.fields[1].category, Category::ListOfObject);
        assert!(root.fields[1].imports.contains(&ImportSym::Valid));

        assert_eq!(root.children.len(), 1);
        let child = &root.children[0];
        assert_eq!(child.class_name, "SupListDTO");
        assert_eq!(child.fields.len(), 1);
        assert_eq!(child.fields[0].identifier, "code");
        assert!(child.children.is_empty());
        let origin = child.originating_field.as_deref().unwrap();
        assert!(origin.category.is_container());
    }

    #[test]
    fn field_without_container_ancestor_is_dropped() {
        let fields = vec![
            spec(1, "UserId", "String"),
            spec(3, "Orphan", "String"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        let mut names = Vec::new();
        resolution.root.walk(&mut |node| {
            names.extend(node.fields.iter().map(|f| f.spec.name.clone()));
        });
        assert_eq!(names, vec!["UserId".to_string()]);
    }

    #[test]
    fn shallower_field_closes_deeper_scopes_only() {
        let fields = vec![
            spec(1, "Sup", "Object"),
            spec(2, "Detail", "Object"),
            spec(1, "Flag", "boolean"),
            spec(3, "Deep", "String"),
            spec(2, "Code", "String"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        let root = &resolution.root;
        // `Flag` at level 1 ends the Detail scope, so `Deep` is dropped; the
        // Sup scope at level 1 stays open for `Code`.
        assert_eq!(root.fields.len(), 2);
        let sup = &root.children[0];
        assert_eq!(sup.class_name, "SupDTO");
        let names: Vec<_> = sup.fields.iter().map(|f| f.spec.name.as_str()).collect();
        assert_eq!(names, vec!["Detail", "Code"]);
        let detail = &sup.children[0];
        assert!(detail.fields.is_empty());
    }

    #[test]
    fn container_at_same_level_shadows_the_previous_one() {
        let fields = vec![
            spec(1, "First", "Object"),
            spec(1, "Second", "Object"),
            spec(2, "Code", "String"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        let root = &resolution.root;
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].fields.is_empty());
        assert_eq!(root.children[1].class_name, "SecondDTO");
        assert_eq!(root.children[1].fields.len(), 1);
    }

    #[test]
    fn preorder_flattening_reproduces_the_partition() {
        let fields = vec![
            spec(1, "A", "String"),
            spec(1, "Sup", "list"),
            spec(2, "B", "String"),
            spec(2, "Sub", "Object"),
            spec(3, "C", "int"),
            spec(2, "D", "String"),
            spec(1, "E", "String"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        let mut partition = Vec::new();
        resolution.root.walk(&mut |node| {
            let names: Vec<_> = node.fields.iter().map(|f| f.spec.name.clone()).collect();
            partition.push((node.class_name.clone(), names));
        });
        assert_eq!(
            partition,
            vec![
                ("MainDTO".to_string(), vec!["A".into(), "Sup".into(), "E".into()]),
                ("SupDTO".to_string(), vec!["B".into(), "Sub".into(), "D".into()]),
                ("SubDTO".to_string(), vec!["C".into()]),
            ]
        );
        // Every attached field still counts exactly once.
        let total: usize = partition.iter().map(|(_, names)| names.len()).sum();
        assert_eq!(total, fields.len());
    }

    #[test]
    fn list_of_primitive_is_normalized_and_spawns_no_child() {
        let fields = vec![spec(1, "Tags", "list<string>")];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        let root = &resolution.root;
        assert!(root.children.is_empty());
        assert_eq!(root.fields[0].canonical_type, "List<String>");
        assert!(root.fields[0].imports.contains(&ImportSym::List));
    }

    #[test]
    fn non_container_fields_keep_the_classifier_canonical_type() {
        let fields = vec![
            spec(1, "A", " int "),
            spec(1, "B", "decimal"),
            spec(1, "C", "list<datetime>"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        for field in &resolution.root.fields {
            assert_eq!(field.canonical_type, classify::canonical_name(&field.spec.raw_type));
        }
    }

    #[test]
    fn root_level_follows_the_minimum_level_present() {
        let fields = vec![spec(2, "A", "String"), spec(2, "Sup", "Object"), spec(3, "B", "String")];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        assert_eq!(resolution.root.fields.len(), 2);
        assert_eq!(resolution.root.children[0].fields.len(), 1);
    }

    #[test]
    fn unknown_types_are_collected_per_invocation() {
        let fields = vec![
            spec(1, "A", "Customer"),
            spec(1, "B", "customer"),
            spec(1, "C", "Customer"),
            spec(1, "D", "CustomerDTO"),
            spec(1, "E", "List<Object>"),
        ];
        let resolution = analyze(&fields, "MainDTO", &GeneratorConfig::default());
        assert_eq!(resolution.unknown_types, vec!["Customer".to_string(), "customer".to_string()]);
    }

    #[test]
    fn empty_input_yields_a_bare_root() {
        let resolution = analyze(&[], "MainDTO", &GeneratorConfig::default());
        assert!(resolution.root.fields.is_empty());
        assert!(resolution.root.children.is_empty());
        assert!(resolution.root.originating_field.is_none());
    }
}
