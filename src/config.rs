//! Generation-request configuration: one snapshot per run, validated before
//! resolution begins. Loaded from a JSON file, overridable from the CLI.

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// level → field name → configured class name.
pub type LevelOverrides = IndexMap<u32, IndexMap<String, String>>;

// -------------------------------- Enums ----------------------------------- //

/// Message direction. Selects the root-class suffix; `None` disables the
/// message-id naming scheme entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Outbound,
    Inbound,
}

/// Which validation namespace the emitted annotations import from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidationNamespace {
    /// `javax.validation`
    #[default]
    Legacy,
    /// `jakarta.validation`
    Modern,
}

impl ValidationNamespace {
    pub fn root(self) -> &'static str {
        match self {
            ValidationNamespace::Legacy => "javax.validation",
            ValidationNamespace::Modern => "jakarta.validation",
        }
    }
}

/// Deterministic transforms from a raw field name to a serialized property
/// name. `None` is the "omit" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NamingStyle {
    #[default]
    AsIs,
    Upper,
    Lower,
    UpperSnake,
    LowerCamel,
    UpperCamel,
    None,
}

// --------------------------- Reserved names ------------------------------- //

/// A container name whose class name is looked up at a fixed override slot,
/// wherever in the tree the container appears.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReservedName {
    pub name: String,
    /// Level key of the override slot to consult.
    pub slot: u32,
}

fn default_reserved() -> Vec<ReservedName> {
    vec![
        ReservedName { name: "SupList".to_string(), slot: 1 },
        ReservedName { name: "SubSeqnoList".to_string(), slot: 2 },
    ]
}

// ------------------------- Validation messages ---------------------------- //

/// Templates for the constraint messages. Placeholders `${name}`,
/// `${comment}` and, where applicable, `${max}`/`${integer}`/`${fraction}`
/// are substituted; anything unmatched stays verbatim. `${comment}` falls
/// back to the property name when the field has no comment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageTemplates {
    pub pattern: String,
    pub not_blank: String,
    pub not_null: String,
    pub size: String,
    pub digits: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            pattern: "${name} 格式不正確".to_string(),
            not_blank: "${name} 不得為空".to_string(),
            not_null: "${name} 為必填".to_string(),
            size: "${name} 長度不得超過${max}".to_string(),
            digits: "${name}格式不正確，整數位最多${integer}位，小數位最多${fraction}位".to_string(),
        }
    }
}

impl MessageTemplates {
    pub fn pattern_message(&self, name: &str, comment: &str) -> String {
        render(&self.pattern, name, comment, &[])
    }

    pub fn not_blank_message(&self, name: &str, comment: &str) -> String {
        render(&self.not_blank, name, comment, &[])
    }

    pub fn not_null_message(&self, name: &str, comment: &str) -> String {
        render(&self.not_null, name, comment, &[])
    }

    pub fn size_message(&self, name: &str, comment: &str, max: &str) -> String {
        render(&self.size, name, comment, &[("max", max)])
    }

    pub fn digits_message(&self, name: &str, comment: &str, integer: &str, fraction: &str) -> String {
        render(&self.digits, name, comment, &[("integer", integer), ("fraction", fraction)])
    }
}

fn render(template: &str, name: &str, comment: &str, extra: &[(&str, &str)]) -> String {
    let comment = if comment.is_empty() { name } else { comment };
    let mut out = template.replace("${name}", name).replace("${comment}", comment);
    for (key, value) in extra {
        out = out.replace(&format!("${{{key}}}"), value);
    }
    out
}

// ----------------------------- GeneratorConfig ---------------------------- //

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Target package for every emitted class. Must be non-empty.
    pub target_package: String,
    pub message_id: String,
    pub direction: Direction,
    /// Class-level comment line; the comment block is emitted only when this
    /// is non-empty.
    pub direction_comment: String,
    pub author: String,
    /// Explicit root class name, used when the message-id scheme is off.
    pub root_class_name: String,
    pub validation: ValidationNamespace,
    pub property_style: NamingStyle,
    /// Additional alias styles; `none` entries and duplicates of the primary
    /// value are skipped at emission.
    pub alias_styles: Vec<NamingStyle>,
    pub class_name_overrides: LevelOverrides,
    pub reserved_names: Vec<ReservedName>,
    pub messages: MessageTemplates,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_package: String::new(),
            message_id: String::new(),
            direction: Direction::None,
            direction_comment: String::new(),
            author: String::new(),
            root_class_name: String::new(),
            validation: ValidationNamespace::Legacy,
            property_style: NamingStyle::AsIs,
            alias_styles: Vec::new(),
            class_name_overrides: LevelOverrides::new(),
            reserved_names: default_reserved(),
            messages: MessageTemplates::default(),
        }
    }
}

impl GeneratorConfig {
    /// Resolved root class name for this configuration.
    pub fn root_name(&self) -> String {
        crate::naming::root_class_name(&self.message_id, self.direction, &self.root_class_name)
    }

    /// Fatal pre-resolution check. Lists every offending field rather than
    /// stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.target_package.trim().is_empty() {
            problems.push("targetPackage must not be empty".to_string());
        }
        if self.root_name().trim().is_empty() {
            problems.push("root class name must not be empty".to_string());
        }
        if problems.is_empty() { Ok(()) } else { Err(ConfigError { problems }) }
    }
}

#[derive(Debug, Error)]
#[error("invalid generator configuration: {}", problems.join("; "))]
pub struct ConfigError {
    pub problems: Vec<String>,
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_package_is_fatal_and_lists_the_field() {
        let config = GeneratorConfig::default();
        let err = config.validate().unwrap_err();
        assert_eq!(err.problems, vec!["targetPackage must not be empty".to_string()]);
    }

    #[test]
    fn whitespace_root_name_is_fatal() {
        let config = GeneratorConfig {
            target_package: "com.bank.dto".into(),
            root_class_name: "   ".into(),
            ..GeneratorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.problems, vec!["root class name must not be empty".to_string()]);
    }

    #[test]
    fn valid_config_passes() {
        let config = GeneratorConfig {
            target_package: "com.bank.dto".into(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.root_name(), "MainDTO");
    }

    #[test]
    fn comment_placeholder_falls_back_to_the_name() {
        let messages = MessageTemplates {
            not_null: "${comment} is required".into(),
            ..MessageTemplates::default()
        };
        assert_eq!(messages.not_null_message("userId", ""), "userId is required");
        assert_eq!(messages.not_null_message("userId", "user id"), "user id is required");
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let messages =
            MessageTemplates { size: "${name} over ${max} (${nope})".into(), ..Default::default() };
        assert_eq!(messages.size_message("code", "", "5"), "code over 5 (${nope})");
    }

    #[test]
    fn config_file_keys_deserialize() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{
                "targetPackage": "com.bank.dto",
                "messageId": "rib1234",
                "direction": "outbound",
                "validation": "modern",
                "propertyStyle": "upper-camel",
                "aliasStyles": ["lower-camel", "upper-snake"],
                "classNameOverrides": {"1": {"SupList": "SupListDTO"}},
                "messages": {"notNull": "${name} required"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.root_name(), "RIB1234Tranrq");
        assert_eq!(config.validation, ValidationNamespace::Modern);
        assert_eq!(config.property_style, NamingStyle::UpperCamel);
        assert_eq!(
            config.class_name_overrides.get(&1).and_then(|m| m.get("SupList")).map(String::as_str),
            Some("SupListDTO")
        );
        assert_eq!(config.messages.not_null, "${name} required");
        // Untouched templates keep their defaults.
        assert_eq!(config.messages.size, MessageTemplates::default().size);
        assert_eq!(config.reserved_names.len(), 2);
    }
}
