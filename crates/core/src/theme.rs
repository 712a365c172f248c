//! Component style configuration.
//!
//! Maps component → slot → class string, with compound overrides keyed by
//! a `(color, variant)` pair.

use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Solid,
    Outline,
    Soft,
    Subtle,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Solid,
        Variant::Outline,
        Variant::Soft,
        Variant::Subtle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Solid => "solid",
            Variant::Outline => "outline",
            Variant::Soft => "soft",
            Variant::Subtle => "subtle",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown variant '{}'", s))
    }
}

/// Style rule applied when both color and variant match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundVariant {
    pub component: String,
    pub color: Color,
    pub variant: Variant,
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Semantic color name → palette name, e.g. `primary = "blue"`
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub components: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub compound_variants: Vec<CompoundVariant>,
}

impl Theme {
    pub fn palette(&self, color: Color) -> Option<&str> {
        self.colors.get(color.as_str()).map(String::as_str)
    }

    pub fn slot_class(&self, component: &str, slot: &str) -> Option<&str> {
        self.components
            .get(component)?
            .get(slot)
            .map(String::as_str)
    }

    /// Base slot class followed by every matching compound override, in
    /// declaration order
    pub fn resolve(&self, component: &str, slot: &str, color: Color, variant: Variant) -> String {
        let overrides = self
            .compound_variants
            .iter()
            .filter(|cv| cv.component == component && cv.color == color && cv.variant == variant)
            .filter_map(|cv| cv.slots.get(slot).map(String::as_str));

        self.slot_class(component, slot)
            .into_iter()
            .chain(overrides)
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
