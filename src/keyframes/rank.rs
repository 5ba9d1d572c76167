use std::cmp::Ordering;
use std::collections::HashMap;

use crate::dataset::model::Element;

/// Tableau10 default colors, used when the caller supplies no palette.
const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// One entity's position within a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedEntry {
    /// Entity name.
    pub name: String,
    /// Value at this frame's time point (possibly interpolated).
    pub value: f64,
    /// Zero-based rank by descending value, capped at the max rank. Capped
    /// entities keep their true value but share the capped rank so they sit
    /// at or below the last visible slot without reflowing.
    pub rank: usize,
}

/// Rank every element by descending value at one synthetic time point.
///
/// Ties break by element declaration order (the sort is stable). `rank` is
/// `min(position, max_rank)`; every element appears in the output regardless
/// of rank, only rendering truncates to the visible top-N.
pub fn rank_entities(
    elements: &[Element],
    max_rank: usize,
    value_of: impl Fn(&str) -> f64,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = elements
        .iter()
        .map(|e| RankedEntry {
            name: e.name.clone(),
            value: value_of(&e.name),
            rank: 0,
        })
        .collect();

    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i.min(max_rank);
    }
    entries
}

/// An ordered list of bar colors.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette(Vec<String>);

impl Palette {
    /// The built-in Tableau10 palette.
    pub fn tableau10() -> Self {
        Self(TABLEAU10.iter().map(|c| (*c).to_string()).collect())
    }

    /// Parse a user palette string (`"#4e79a7, #f28e2c, ..."`).
    ///
    /// Anything that does not look like a comma-separated hex list falls back
    /// to the Tableau10 default.
    pub fn parse(spec: &str) -> Self {
        if spec.len() > 6 && spec.contains('#') {
            let colors: Vec<String> = spec
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if !colors.is_empty() {
                return Self(colors);
            }
        }
        Self::tableau10()
    }

    /// Color at `index`, cycling past the end. An empty palette (possible
    /// only through deserialization) falls back to the built-in colors.
    pub fn color(&self, index: usize) -> &str {
        if self.0.is_empty() {
            return TABLEAU10[index % TABLEAU10.len()];
        }
        &self.0[index % self.0.len()]
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette is empty (never true for constructed palettes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::tableau10()
    }
}

/// Deterministic entity-to-color assignment, fixed for the lifetime of one
/// frame sequence.
///
/// When any element declares a category, color is a function of category
/// (shared across the category); otherwise it is a function of entity name.
/// Assignment order is first-seen element order, so the mapping is stable
/// across frames and across rebuilds of the same dataset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorMap {
    by_name: HashMap<String, String>,
}

impl ColorMap {
    /// Assign palette colors to every element.
    pub fn assign(elements: &[Element], palette: &Palette) -> Self {
        let by_category = elements.iter().any(|e| e.category.is_some());
        let mut key_slots: HashMap<&str, usize> = HashMap::new();
        let mut by_name = HashMap::new();

        for element in elements {
            let key: &str = if by_category {
                element.category.as_deref().unwrap_or(&element.name)
            } else {
                &element.name
            };
            let next = key_slots.len();
            let slot = *key_slots.entry(key).or_insert(next);
            by_name.insert(element.name.clone(), palette.color(slot).to_string());
        }

        Self { by_name }
    }

    /// Color for an entity name, if it was part of the assignment.
    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframes/rank.rs"]
mod tests;
