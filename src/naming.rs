//! Name resolver: class names, root class name, serialized-property styles.
//!
//! Pure functions over their inputs. Class-name resolution goes through the
//! declarative override/reserved tables; nothing here branches on literal
//! field names.

use crate::config::{Direction, LevelOverrides, NamingStyle, ReservedName};

/// Suffix appended to a capitalized field name when no override applies.
pub const CLASS_SUFFIX: &str = "DTO";

/// Root class name when neither an explicit name nor a message id is given.
pub const DEFAULT_ROOT: &str = "MainDTO";

const OUTBOUND_SUFFIX: &str = "Tranrq";
const INBOUND_SUFFIX: &str = "Tranrs";

// ----------------------------- Class names -------------------------------- //

/// Resolve the class name for a container field at `level`.
///
/// Precedence: direct override for (level, name) → reserved-name slot
/// override → `capitalize(name) + CLASS_SUFFIX`.
pub fn class_name(
    level: u32,
    field_name: &str,
    overrides: &LevelOverrides,
    reserved: &[ReservedName],
) -> String {
    if let Some(configured) = override_for(overrides, level, field_name) {
        return configured.to_string();
    }
    if let Some(entry) = reserved.iter().find(|r| r.name == field_name) {
        if let Some(configured) = override_for(overrides, entry.slot, field_name) {
            return configured.to_string();
        }
    }
    format!("{}{}", capitalize(field_name), CLASS_SUFFIX)
}

fn override_for<'a>(overrides: &'a LevelOverrides, level: u32, name: &str) -> Option<&'a str> {
    overrides
        .get(&level)
        .and_then(|m| m.get(name))
        .map(String::as_str)
        .filter(|s| !s.is_empty())
}

/// Root class name.
///
/// With no message id (or direction None) the explicit name wins, falling
/// back to `MainDTO`. Otherwise the uppercased message id gets the direction
/// suffix (`Tranrq` outbound, `Tranrs` inbound).
pub fn root_class_name(message_id: &str, direction: Direction, explicit_name: &str) -> String {
    let message_id = message_id.trim();
    if message_id.is_empty() || direction == Direction::None {
        return if explicit_name.is_empty() {
            DEFAULT_ROOT.to_string()
        } else {
            explicit_name.to_string()
        };
    }
    let suffix = match direction {
        Direction::Outbound => OUTBOUND_SUFFIX,
        Direction::Inbound => INBOUND_SUFFIX,
        Direction::None => unreachable!("handled above"),
    };
    format!("{}{}", message_id.to_uppercase(), suffix)
}

// ---------------------------- Property names ------------------------------ //

/// Apply a naming style to a raw field name. `None` means "omit" and yields
/// no name at all (used to suppress alias generation).
pub fn property_name(field_name: &str, style: NamingStyle) -> Option<String> {
    match style {
        NamingStyle::AsIs => Some(field_name.to_string()),
        NamingStyle::Upper => Some(field_name.to_uppercase()),
        NamingStyle::Lower => Some(field_name.to_lowercase()),
        NamingStyle::UpperSnake => Some(to_upper_snake(field_name)),
        NamingStyle::LowerCamel => Some(lower_first(&to_camel(field_name, false))),
        NamingStyle::UpperCamel => Some(capitalize(&to_camel(field_name, true))),
        NamingStyle::None => None,
    }
}

/// First char uppercased, rest untouched.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// First char lowercased, rest untouched. Field identifiers use this.
pub fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `ProposalEntityList` → `PROPOSAL_ENTITY_LIST`: a separator at each
/// lower→upper transition, then everything uppercased.
fn to_upper_snake(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, ch) in input.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push('_');
        }
        out.extend(ch.to_uppercase());
    }
    out
}

/// Camel-case a name that is either underscore/whitespace-delimited or
/// already camel-ish. Delimited tokens are lowercased and capitalized per
/// token; camel-ish input is re-split at uppercase boundaries.
fn to_camel(input: &str, capitalize_first: bool) -> String {
    if input.is_empty() {
        return String::new();
    }

    if input.contains('_') || input.contains(char::is_whitespace) {
        let mut out = String::with_capacity(input.len());
        for (i, part) in input
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .enumerate()
        {
            let part = part.to_lowercase();
            if i == 0 && !capitalize_first {
                out.push_str(&part);
            } else {
                out.push_str(&capitalize(&part));
            }
        }
        return out;
    }

    let mut out = String::with_capacity(input.len());
    let mut word = String::new();
    for ch in input.chars() {
        if ch.is_uppercase() && !word.is_empty() {
            let lowercase_head = out.is_empty() && !capitalize_first;
            push_word(&mut out, &word, lowercase_head);
            word.clear();
        }
        word.push(ch);
    }
    let lowercase_head = out.is_empty() && !capitalize_first;
    push_word(&mut out, &word, lowercase_head);
    out
}

fn push_word(out: &mut String, word: &str, lowercase_head: bool) {
    let mut chars = word.chars();
    let Some(head) = chars.next() else { return };
    if lowercase_head {
        out.extend(head.to_lowercase());
    } else {
        out.extend(head.to_uppercase());
    }
    out.push_str(&chars.as_str().to_lowercase());
}

// ------------------------------- Tests ------------------------------------ //
