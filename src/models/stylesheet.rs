use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single `property: value` declaration inside a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Property name as written in the source
    pub property: String,

    /// Value text with surrounding whitespace trimmed
    pub value: String,

    /// Whether the declaration carried `!important`
    pub important: bool,

    /// Line number of the property name (1-based)
    pub line: usize,

    /// Column number of the property name (1-based)
    pub column: usize,
}

impl Declaration {
    /// Lowercased property name, used for case-insensitive lookups
    pub fn property_lower(&self) -> String {
        self.property.to_ascii_lowercase()
    }
}

/// A style rule: selector plus its declarations in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Selector text as written (whole selector list, trimmed)
    pub selector: String,

    /// Declarations in source order
    pub declarations: Vec<Declaration>,

    /// Line number where the selector starts (1-based)
    pub line: usize,

    /// Column number where the selector starts (1-based)
    pub column: usize,

    /// Enclosing at-rule prelude chain for nested rules
    /// (e.g. `@media (max-width: 600px)`), `None` at top level
    pub at_context: Option<String>,
}

impl Rule {
    /// Last-wins map of lowercased property name to declaration.
    ///
    /// Duplicate properties resolve to the one written last, matching how
    /// the cascade treats repeated declarations of equal weight.
    pub fn property_map(&self) -> HashMap<String, &Declaration> {
        let mut map = HashMap::new();
        for decl in &self.declarations {
            map.insert(decl.property_lower(), decl);
        }
        map
    }

    /// Whether the rule declares the given property (case-insensitive)
    pub fn has_property(&self, property: &str) -> bool {
        let wanted = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .any(|d| d.property_lower() == wanted)
    }
}

/// The parsed rule model for one stylesheet.
///
/// Never mutated after parsing; detectors only read from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    /// All rules, top-level and at-rule-nested alike, flattened in
    /// source order
    pub rules: Vec<Rule>,

    /// Size of the original source in bytes
    pub source_bytes: usize,
}

impl Stylesheet {
    /// Total number of declarations across all rules
    pub fn declaration_count(&self) -> usize {
        self.rules.iter().map(|r| r.declarations.len()).sum()
    }
}
