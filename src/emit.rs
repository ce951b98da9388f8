//! Class emitter: deterministic rendering of one resolved class node into
//! Java source text. Output well-formedness is the downstream formatter's
//! problem, not checked here.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::classify::Category;
use crate::config::{GeneratorConfig, NamingStyle};
use crate::field::{ClassNode, ResolvedField};
use crate::naming;

#[derive(Debug, Error)]
pub enum EmitError {
    /// Contract violation from upstream; resolved fields always carry a
    /// canonical type.
    #[error("field `{field}` of class `{class}` has no canonical type")]
    MissingCanonicalType { class: String, field: String },
}

pub fn render_class(node: &ClassNode, config: &GeneratorConfig) -> Result<String, EmitError> {
    let mut out = String::new();
    package_declaration(&mut out, config);
    import_block(&mut out, &node.fields, config);
    class_comment(&mut out, config);

    out.push_str("@Data\n");
    out.push_str(&format!("public class {} {{\n\n", node.class_name));
    for field in &node.fields {
        field_block(&mut out, node, field, config)?;
    }
    out.push_str("}\n");
    Ok(out)
}

// ------------------------------ Sections ---------------------------------- //

fn package_declaration(out: &mut String, config: &GeneratorConfig) {
    if !config.target_package.is_empty() {
        out.push_str(&format!("package {};\n\n", config.target_package));
    }
}

fn import_block(out: &mut String, fields: &[ResolvedField], config: &GeneratorConfig) {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    imports.insert("com.fasterxml.jackson.annotation.JsonProperty".to_string());
    if config.alias_styles.iter().any(|style| *style != NamingStyle::None) {
        imports.insert("com.fasterxml.jackson.annotation.JsonAlias".to_string());
    }
    imports.insert("lombok.Data".to_string());
    for field in fields {
        for sym in &field.imports {
            imports.insert(sym.path(config.validation));
        }
    }
    // BTreeSet iteration gives the lexicographic order the block is
    // specified to have.
    for import in &imports {
        out.push_str(&format!("import {import};\n"));
    }
    out.push('\n');
}

fn class_comment(out: &mut String, config: &GeneratorConfig) {
    if config.direction_comment.is_empty() {
        return;
    }
    out.push_str("/**\n");
    out.push_str(&format!(" * {}\n", config.message_id));
    out.push_str(&format!(" * {}\n", config.direction_comment));
    if !config.author.is_empty() {
        out.push_str(&format!(" * @author {}\n", config.author));
    }
    out.push_str(" */\n");
}

fn field_block(
    out: &mut String,
    node: &ClassNode,
    field: &ResolvedField,
    config: &GeneratorConfig,
) -> Result<(), EmitError> {
    if field.canonical_type.trim().is_empty() {
        return Err(EmitError::MissingCanonicalType {
            class: node.class_name.clone(),
            field: field.spec.name.clone(),
        });
    }

    if !field.spec.comment.is_empty() {
        out.push_str(&format!("    /** {} */\n", field.spec.comment));
    }

    let messages = &config.messages;
    let name = &field.identifier;
    let comment = &field.spec.comment;

    if let Some(pattern) = field.spec.pattern_constraint() {
        out.push_str(&format!(
            "    @Pattern(regexp = \"{pattern}\", message = \"{}\")\n",
            messages.pattern_message(name, comment)
        ));
    }
    if field.spec.required {
        if field.is_string_like() {
            out.push_str(&format!(
                "    @NotBlank(message = \"{}\")\n",
                messages.not_blank_message(name, comment)
            ));
        } else {
            out.push_str(&format!(
                "    @NotNull(message = \"{}\")\n",
                messages.not_null_message(name, comment)
            ));
        }
    }
    if field.is_string_like() {
        if let Some(size) = field.spec.size_constraint() {
            out.push_str(&format!(
                "    @Size(max = {size}, message = \"{}\")\n",
                messages.size_message(name, comment, size)
            ));
        }
    }
    if field.category == Category::Decimal {
        if let Some(size) = field.spec.size_constraint() {
            let (integer, fraction) = split_digits(size);
            out.push_str(&format!(
                "    @Digits(integer = {integer}, fraction = {fraction}, message = \"{}\")\n",
                messages.digits_message(name, comment, integer, fraction)
            ));
        }
    }
    if field.category.is_container() {
        out.push_str("    @Valid\n");
    }

    let primary = naming::property_name(&field.spec.name, config.property_style);
    if let Some(primary_name) = &primary {
        out.push_str(&format!("    @JsonProperty(\"{primary_name}\")\n"));
    }

    let mut aliases: Vec<String> = Vec::new();
    for style in config.alias_styles.iter().filter(|style| **style != NamingStyle::None) {
        if let Some(alias) = naming::property_name(&field.spec.name, *style) {
            if primary.as_ref() != Some(&alias) && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
    }
    if !aliases.is_empty() {
        let quoted: Vec<String> = aliases.iter().map(|alias| format!("\"{alias}\"")).collect();
        out.push_str(&format!("    @JsonAlias({{{}}})\n", quoted.join(", ")));
    }

    out.push_str(&format!("    private {} {};\n\n", field.canonical_type, field.identifier));
    Ok(())
}

/// `"N,M"` → (N, M); a missing or empty fraction part defaults to `0`.
fn split_digits(size: &str) -> (&str, &str) {
    match size.split_once(',') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim();
            (integer.trim(), if fraction.is_empty() { "0" } else { fraction })
        }
        None => (size.trim(), "0"),
    }
}

// ------------------------------- Tests ------------------------------------ //
