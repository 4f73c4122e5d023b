//! Aggregations behind the spending-by-category chart.

use crate::{
    Category, Expense,
    categories::{FALLBACK_COLOR, FALLBACK_ICON},
};

/// Sum spent on one category name.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub color: String,
    pub icon: String,
}

impl CategoryTotal {
    /// Percentage of `grand_total` covered by this slice.
    pub fn share(&self, grand_total: f64) -> f64 {
        if grand_total <= 0.0 {
            return 0.0;
        }
        self.total / grand_total * 100.0
    }
}

/// Totals grouped by category name, largest first.
///
/// Ties keep the order in which names first appear in `expenses`. Names with
/// no matching category (orphans) are still reported, with the fallback
/// colour and icon.
pub fn category_totals(expenses: &[Expense], categories: &[Category]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        if let Some(slot) = totals.iter_mut().find(|t| t.name == expense.category) {
            slot.total += expense.amount;
            continue;
        }
        let category = categories.iter().find(|c| c.name == expense.category);
        totals.push(CategoryTotal {
            name: expense.category.clone(),
            total: expense.amount,
            color: category.map_or(FALLBACK_COLOR, |c| c.color.as_str()).to_string(),
            icon: category.map_or(FALLBACK_ICON, |c| c.icon.as_str()).to_string(),
        });
    }

    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

pub fn grand_total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Render an amount as dollars with two decimals.
pub fn format_amount(value: f64) -> String {
    format!("${value:.2}")
}
