use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::summary_model::{DashboardSummary, MonthlySeries, Totals};
use crate::constants::{
    FOOD_TIP_THRESHOLD, MONTHLY_SERIES_LEN, OVERSPEND_RATIO, RECENT_WINDOW_DAYS,
};
use crate::entries::{BudgetEntry, EntryType};

const OVERSPEND_TIP: &str = "You've spent more than 50% of your income in the last 30 days.";
const FOOD_TIP: &str = "Your food expenses are high. Consider meal planning.";

/// Sums saturate at `Decimal::MAX` so stored rows can never overflow the view.
pub fn totals(entries: &[BudgetEntry]) -> Totals {
    let (total_income, total_expense) =
        entries
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), e| {
                match e.entry_type {
                    EntryType::Income => (income.saturating_add(e.amount), expense),
                    EntryType::Expense => (income, expense.saturating_add(e.amount)),
                }
            });
    Totals {
        total_income,
        total_expense,
        balance: total_income.saturating_sub(total_expense),
    }
}

/// Advisory tips. The overspending check uses the totals of the whole list;
/// the food check only looks at entries dated within the recent window.
pub fn spending_tips(entries: &[BudgetEntry], totals: &Totals, today: NaiveDate) -> Vec<String> {
    let mut tips = Vec::new();

    if totals.total_income > Decimal::ZERO
        && totals.total_expense > totals.total_income * OVERSPEND_RATIO
    {
        tips.push(OVERSPEND_TIP.to_string());
    }

    let window_start = today - Duration::days(RECENT_WINDOW_DAYS);
    let recent_food: Decimal = entries
        .iter()
        .filter(|e| e.date >= window_start)
        .filter(|e| e.category.to_lowercase() == "food")
        .fold(Decimal::ZERO, |sum, e| sum.saturating_add(e.amount));
    if recent_food > FOOD_TIP_THRESHOLD {
        tips.push(FOOD_TIP.to_string());
    }

    tips
}

/// Sums expenses per month label and keeps the last groups by first-seen
/// position in `entries`. The result is not re-sorted by calendar month, so
/// for a newest-first list the kept groups are the oldest months seen.
pub fn monthly_series(entries: &[BudgetEntry]) -> MonthlySeries {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| e.entry_type == EntryType::Expense) {
        let label = entry.date.format("%B %Y").to_string();
        match index.get(&label) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(entry.amount),
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, entry.amount));
            }
        }
    }

    let skip = order.len().saturating_sub(MONTHLY_SERIES_LEN);
    let (labels, values): (Vec<String>, Vec<Decimal>) = order.into_iter().skip(skip).unzip();
    MonthlySeries { labels, values }
}

pub fn summarize(entries: &[BudgetEntry], today: NaiveDate) -> DashboardSummary {
    let totals = totals(entries);
    let tips = spending_tips(entries, &totals, today);
    let series = monthly_series(entries);
    DashboardSummary {
        totals,
        tips,
        chart_labels: series.labels,
        chart_data: series.values,
    }
}
