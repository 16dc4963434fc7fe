//! Metric categories (one chart panel each) and the user's category filter.

use log::warn;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Label the presentation layer uses for "every category".
pub const ALL_LABEL: &str = "All";

/// How a category's series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Area,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Area => "area",
        })
    }
}

/// A named group of related metrics rendered as one panel.
///
/// The declaration order is the order panels are rendered in, and `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Temperature,
    Precipitation,
    Snow,
    Wind,
    Pressure,
    Sunshine,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Temperature,
        Category::Precipitation,
        Category::Snow,
        Category::Wind,
        Category::Pressure,
        Category::Sunshine,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Temperature => "Temperature",
            Category::Precipitation => "Precipitation",
            Category::Snow => "Snow",
            Category::Wind => "Wind",
            Category::Pressure => "Pressure",
            Category::Sunshine => "Sunshine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Which categories the user wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every available category.
    #[default]
    All,
    /// Only these categories (still subject to availability).
    Only(BTreeSet<Category>),
}

impl CategoryFilter {
    /// Builds a filter from the labels selected in the UI.
    ///
    /// An empty selection, or one containing `"All"`, means [`CategoryFilter::All`].
    /// Unknown labels are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use swiss_weather_tracker::{Category, CategoryFilter};
    ///
    /// assert_eq!(CategoryFilter::from_labels(["All", "Wind"]), CategoryFilter::All);
    /// let wind = CategoryFilter::from_labels(["Wind"]);
    /// assert!(wind.allows(Category::Wind));
    /// assert!(!wind.allows(Category::Snow));
    /// ```
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = BTreeSet::new();
        let mut any_label = false;
        for label in labels {
            let label = label.as_ref();
            any_label = true;
            if label.trim().eq_ignore_ascii_case(ALL_LABEL) {
                return CategoryFilter::All;
            }
            match label.parse::<Category>() {
                Ok(category) => {
                    selected.insert(category);
                }
                Err(e) => warn!("Ignoring filter label: {}", e),
            }
        }
        if any_label {
            CategoryFilter::Only(selected)
        } else {
            CategoryFilter::All
        }
    }

    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        CategoryFilter::Only(categories.into_iter().collect())
    }

    pub fn allows(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected.contains(&category),
        }
    }

    /// Keeps the categories of `available` this filter allows, in enumeration order.
    pub fn apply(&self, available: &BTreeSet<Category>) -> Vec<Category> {
        available
            .iter()
            .copied()
            .filter(|c| self.allows(*c))
            .collect()
    }
}
