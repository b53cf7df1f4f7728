use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two theme names the way a menu presents them to a person.
///
/// Names are ordered by their base letters first, ignoring case and accents
/// (`Adwaita` < `breeze` < `Ébène` < `Zorin`). Accents break ties next, the
/// unaccented name first. Names that still only differ in case are ordered
/// lowercase first, so the comparison is total and two distinct names never
/// compare equal.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

/// Deduplicated, sorted collection of discovered icon theme names.
///
/// A `ThemeSet` is only built through [`ThemeSet::from_names`] (which the
/// scanner uses), so it never holds duplicates and is always in
/// [`locale_compare`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThemeSet {
    names: Vec<String>,
}

impl ThemeSet {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: HashSet<String> = names.into_iter().map(Into::into).collect();
        let mut names: Vec<String> = unique.into_iter().collect();
        names.sort_by(|a, b| locale_compare(a, b));
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<'a> IntoIterator for &'a ThemeSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Selection state of a single menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Active,
    Inactive,
}

impl Marker {
    pub fn is_active(self) -> bool {
        matches!(self, Marker::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub name: String,
    pub marker: Marker,
}

/// Result of reconciling a [`ThemeSet`] against the active theme name.
///
/// Entries keep the order of the theme set they were built from. At most one
/// entry is ever [`Marker::Active`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MarkerMap {
    entries: Vec<MenuEntry>,
}

impl MarkerMap {
    /// Mark the entry equal to `active` and clear every other one.
    ///
    /// An `active` value that names no entry leaves the whole map inactive.
    pub fn reconcile(theme_set: &ThemeSet, active: &str) -> Self {
        let entries = theme_set
            .iter()
            .map(|name| MenuEntry {
                name: name.to_string(),
                marker: if name == active {
                    Marker::Active
                } else {
                    Marker::Inactive
                },
            })
            .collect();

        Self { entries }
    }

    /// Build entries for `theme_set`, reusing markers from `previous` for names
    /// that were already present. Used when the active value could not be read.
    pub fn carry_over(theme_set: &ThemeSet, previous: &MarkerMap) -> Self {
        match previous.active() {
            Some(active) => Self::reconcile(theme_set, active),
            None => Self {
                entries: theme_set
                    .iter()
                    .map(|name| MenuEntry {
                        name: name.to_string(),
                        marker: Marker::Inactive,
                    })
                    .collect(),
            },
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == name && entry.marker.is_active())
    }

    pub fn active(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.marker.is_active())
            .map(|entry| entry.name.as_str())
    }

    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.marker.is_active())
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
