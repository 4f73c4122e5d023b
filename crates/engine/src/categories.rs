//! Spending categories.
//!
//! Categories are soft labels: expenses refer to them by name, so deleting
//! or adding a category never touches existing expenses.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Colour used for expenses whose category no longer exists.
pub const FALLBACK_COLOR: &str = "hsl(220, 10%, 50%)";
/// Icon used for expenses whose category no longer exists.
pub const FALLBACK_ICON: &str = "📦";

/// Colour preselected for new categories.
pub const DEFAULT_COLOR: &str = "hsl(168, 76%, 36%)";

/// Colours offered by the category editor.
pub const COLOR_OPTIONS: [&str; 8] = [
    DEFAULT_COLOR,
    "hsl(38, 92%, 50%)",
    "hsl(280, 65%, 60%)",
    "hsl(340, 75%, 55%)",
    "hsl(200, 70%, 50%)",
    "hsl(142, 76%, 36%)",
    "hsl(220, 10%, 50%)",
    "hsl(15, 80%, 55%)",
];

/// Icons offered by the category editor.
pub const ICON_OPTIONS: [&str; 15] = [
    "🍽️", "🚗", "🛍️", "🎬", "💡", "💊", "📦", "✈️", "🏠", "📚", "🎮", "💼", "🎁", "☕", "🏋️",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    /// Build a category with a fresh id. Blank icon or colour take the defaults.
    pub fn new(name: &str, icon: &str, color: &str) -> Self {
        let icon = icon.trim();
        let color = color.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            color: if color.is_empty() {
                DEFAULT_COLOR.to_string()
            } else {
                color.to_string()
            },
            icon: if icon.is_empty() {
                FALLBACK_ICON.to_string()
            } else {
                icon.to_string()
            },
        }
    }

    /// Key used to compare names case-insensitively.
    pub fn name_key(&self) -> String {
        normalize_name_key(&self.name)
    }
}

/// Case-folded, NFKC-normalised form of a category name.
pub fn normalize_name_key(name: &str) -> String {
    name.trim().nfkc().collect::<String>().to_lowercase()
}

/// The categories seeded for an identity with nothing saved yet.
pub fn default_categories() -> Vec<Category> {
    [
        ("1", "Food & Dining", "hsl(168, 76%, 36%)", "🍽️"),
        ("2", "Transportation", "hsl(38, 92%, 50%)", "🚗"),
        ("3", "Shopping", "hsl(280, 65%, 60%)", "🛍️"),
        ("4", "Entertainment", "hsl(340, 75%, 55%)", "🎬"),
        ("5", "Bills & Utilities", "hsl(200, 70%, 50%)", "💡"),
        ("6", "Health", "hsl(142, 76%, 36%)", "💊"),
        ("7", "Other", "hsl(220, 10%, 50%)", "📦"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}
