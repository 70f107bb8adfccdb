use crate::error::{LabelerError, Result};
use crate::store::is_representable;
use std::collections::HashMap;

/// Highest digit key that selects a class.
pub const MAX_SELECTABLE_CLASSES: usize = 9;

/// Filename → class-name mapping that remembers insertion order.
///
/// Re-inserting an existing filename replaces its class in place, so the row
/// keeps the position it had when it was first labeled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, file: &str) -> bool {
        self.index.contains_key(file)
    }

    pub fn get(&self, file: &str) -> Option<&str> {
        self.index
            .get(file)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// Stores `class` for `file`, returning the class it replaced.
    pub fn insert(&mut self, file: impl Into<String>, class: impl Into<String>) -> Option<String> {
        let file = file.into();
        let class = class.into();
        match self.index.get(&file) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, class)),
            None => {
                self.index.insert(file.clone(), self.entries.len());
                self.entries.push((file, class));
                None
            }
        }
    }

    /// Inserts only when `file` has no label yet. Returns whether it was added.
    pub fn insert_if_absent(&mut self, file: &str, class: &str) -> bool {
        if self.contains(file) {
            return false;
        }
        self.insert(file, class);
        true
    }

    /// Iterates `(filename, class)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }
}

impl<F, C> FromIterator<(F, C)> for LabelMap
where
    F: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        let mut map = LabelMap::new();
        for (file, class) in iter {
            map.insert(file, class);
        }
        map
    }
}

/// Ordered class names; the digit `n` selects entry `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(LabelerError::EmptyClassList);
        }
        if let Some(bad) = names.iter().find(|n| !is_representable(n)) {
            return Err(LabelerError::Unrepresentable { value: bad.clone() });
        }
        if names.len() > MAX_SELECTABLE_CLASSES {
            tracing::warn!(
                "{} classes configured; only the first {MAX_SELECTABLE_CLASSES} can be selected",
                names.len()
            );
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Class bound to digit key `digit`, if that key is in range.
    pub fn for_digit(&self, digit: u8) -> Option<&str> {
        let digit = usize::from(digit);
        if !(1..=MAX_SELECTABLE_CLASSES).contains(&digit) {
            return None;
        }
        self.names.get(digit - 1).map(String::as_str)
    }

    /// Names reachable from the keyboard, paired with their digit.
    pub fn selectable(&self) -> impl Iterator<Item = (u8, &str)> {
        self.names
            .iter()
            .take(MAX_SELECTABLE_CLASSES)
            .enumerate()
            .map(|(idx, name)| (idx as u8 + 1, name.as_str()))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
