// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed product category taxonomy shown in the category picker.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Top-level product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Category {
    Floor,
    Paint,
    Furniture,
}

impl Category {
    pub fn subcategories(self) -> &'static [&'static str] {
        match self {
            Category::Floor => &["Wood", "Carpet", "Tile"],
            Category::Paint => &["Interior", "Exterior"],
            Category::Furniture => &["Sofas", "Tables", "Chairs"],
        }
    }

    pub fn all() -> impl Iterator<Item = Category> {
        Category::iter()
    }

    /// Finds the category owning `subcategory` (case-insensitive).
    pub fn of_subcategory(subcategory: &str) -> Option<Category> {
        Category::iter().find(|c| {
            c.subcategories()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(subcategory))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn three_categories_with_subcategories() {
        let all: Vec<_> = Category::all().collect();
        assert_eq!(all, vec![Category::Floor, Category::Paint, Category::Furniture]);
        assert_eq!(Category::Floor.subcategories(), &["Wood", "Carpet", "Tile"]);
    }

    #[test]
    fn parses_from_display_name() {
        assert_eq!(Category::from_str("Paint").unwrap(), Category::Paint);
        assert!(Category::from_str("Lighting").is_err());
    }

    #[test]
    fn finds_owner_of_subcategory() {
        assert_eq!(Category::of_subcategory("carpet"), Some(Category::Floor));
        assert_eq!(Category::of_subcategory("Sofas"), Some(Category::Furniture));
        assert_eq!(Category::of_subcategory("Roof"), None);
    }
}
