//! One generation request end to end: validate the configuration snapshot,
//! resolve the tree, emit every class pre-order. Synchronous and stateless
//! across requests; fails atomically, so a partial class map never escapes.

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::{ConfigError, GeneratorConfig};
use crate::emit::{self, EmitError};
use crate::field::FieldSpec;
use crate::resolve;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Result of one generation run, plus the diagnostics the caller is expected
/// to surface.
#[derive(Debug)]
pub struct Generation {
    /// class name → rendered source, in pre-order (parent before children).
    pub classes: IndexMap<String, String>,
    /// Classes whose field list came out empty. Usually a type-column
    /// mistake in the input, not an error.
    pub empty_classes: Vec<String>,
    /// Raw type tokens not recognized by the classifier tables, per
    /// invocation (treated as object references anyway).
    pub unknown_types: Vec<String>,
}

impl Generation {
    pub fn total_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn non_empty_classes(&self) -> usize {
        self.classes.len() - self.empty_classes.len()
    }
}

pub fn generate(
    fields: &[FieldSpec],
    config: &GeneratorConfig,
) -> Result<Generation, GenerateError> {
    config.validate()?;

    let root_name = config.root_name();
    let resolution = resolve::analyze(fields, &root_name, config);

    let mut classes = IndexMap::new();
    let mut empty_classes = Vec::new();
    let mut result = Ok(());
    resolution.root.walk(&mut |node| {
        if result.is_err() {
            return;
        }
        if node.fields.is_empty() {
            empty_classes.push(node.class_name.clone());
        }
        match emit::render_class(node, config) {
            Ok(source) => {
                classes.insert(node.class_name.clone(), source);
            }
            Err(err) => result = Err(err),
        }
    });
    result?;

    Ok(Generation { classes, empty_classes, unknown_types: resolution.unknown_types })
}

// ------------------------------- Tests ------------------------------------ //
