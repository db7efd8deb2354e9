#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{CategoryFilter, DateRange, Expense, FilterSpec, SortKey};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn exp(id: i64, d: &str, amount: Option<Decimal>, category: &str) -> Expense {
    Expense {
        id,
        user_id: 1,
        title: format!("expense {id}"),
        amount,
        category: category.into(),
        date: date(d),
        is_recurring: false,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn sample() -> Vec<Expense> {
    vec![
        exp(1, "2024-01-05", Some(dec!(100)), "Food"),
        exp(2, "2024-01-10", Some(dec!(50)), "Food"),
        exp(3, "2024-01-08", Some(dec!(30)), "Transport"),
    ]
}

fn spec(range: DateRange, sort: SortKey) -> FilterSpec {
    FilterSpec {
        category: CategoryFilter::All,
        date_range: range,
        sort,
    }
}

fn ids(expenses: &[Expense]) -> Vec<i64> {
    expenses.iter().map(|e| e.id).collect()
}

// ── Worked examples ──────────────────────────────────────────

#[test]
fn test_date_asc_example() {
    let view = build_view(
        &sample(),
        &spec(DateRange::All, SortKey::DateAsc),
        None,
        date("2024-01-31"),
    );
    assert_eq!(ids(&view.expenses), vec![1, 3, 2]);
    assert_eq!(view.summary.total, dec!(180));
    assert_eq!(view.summary.transaction_count, 3);
    let top = view.summary.top_category.unwrap();
    assert_eq!(top.name, "Food");
    assert_eq!(top.total, dec!(150));
    assert!(view.summary.budget.is_none());
}

#[test]
fn test_budget_over_example() {
    let progress = BudgetProgress::new(dec!(200), dec!(250)).unwrap();
    assert_eq!(progress.remaining, dec!(-50));
    assert_eq!(progress.percentage, dec!(125));
    assert_eq!(progress.clamped_percentage(), dec!(100));
    assert_eq!(progress.status, BudgetStatus::Over);
}

#[test]
fn test_custom_range_start_after_end_is_empty() {
    let range = DateRange::Custom {
        start: Some(date("2024-02-01")),
        end: Some(date("2024-01-01")),
    };
    let view = build_view(
        &sample(),
        &spec(range, SortKey::DateDesc),
        None,
        date("2024-03-01"),
    );
    assert!(view.expenses.is_empty());
    assert_eq!(view.summary.total, Decimal::ZERO);
}

#[test]
fn test_empty_input_has_no_data() {
    let view = build_view(&[], &FilterSpec::default(), None, date("2024-01-01"));
    assert!(view.expenses.is_empty());
    assert_eq!(view.summary.total, Decimal::ZERO);
    assert_eq!(view.summary.transaction_count, 0);
    assert!(view.summary.top_category.is_none());
    assert!(view.summary.daily_totals.is_empty());
    assert!(view.summary.category_totals.is_empty());
    assert!(!view.summary.has_data());
}

// ── Filtering ────────────────────────────────────────────────

#[test]
fn test_all_filters_keep_every_record() {
    let input = sample();
    for key in SortKey::all() {
        let out = build_view(&input, &spec(DateRange::All, *key), None, date("2030-01-01"));
        assert_eq!(out.expenses.len(), input.len());
        let mut got = ids(&out.expenses);
        got.sort();
        assert_eq!(got, vec![1, 2, 3]);
    }
}

#[test]
fn test_category_filter_exact_match() {
    let mut input = sample();
    input.push(exp(4, "2024-01-09", Some(dec!(5)), "food"));
    let spec = FilterSpec {
        category: CategoryFilter::Only("Food".into()),
        date_range: DateRange::All,
        sort: SortKey::DateAsc,
    };
    let out = filter_expenses(&input, &spec, date("2024-01-31"));
    assert_eq!(ids(&out), vec![1, 2]);
}

#[test]
fn test_week_filter_is_inclusive_of_seven_days_ago() {
    let input = vec![
        exp(1, "2024-03-07", Some(dec!(1)), "Food"),
        exp(2, "2024-03-08", Some(dec!(1)), "Food"),
        exp(3, "2024-03-15", Some(dec!(1)), "Food"),
        exp(4, "2024-03-16", Some(dec!(1)), "Food"),
    ];
    let out = filter_expenses(
        &input,
        &spec(DateRange::Week, SortKey::DateAsc),
        date("2024-03-15"),
    );
    assert_eq!(ids(&out), vec![2, 3, 4]);
}

#[test]
fn test_month_filter_starts_on_first_of_month() {
    let input = vec![
        exp(1, "2024-02-29", Some(dec!(1)), "Food"),
        exp(2, "2024-03-01", Some(dec!(1)), "Food"),
        exp(3, "2024-03-20", Some(dec!(1)), "Food"),
    ];
    let out = filter_expenses(
        &input,
        &spec(DateRange::Month, SortKey::DateAsc),
        date("2024-03-10"),
    );
    assert_eq!(ids(&out), vec![2, 3]);
}

#[test]
fn test_custom_range_open_bounds() {
    let input = sample();
    let only_start = DateRange::Custom {
        start: Some(date("2024-01-08")),
        end: None,
    };
    let only_end = DateRange::Custom {
        start: None,
        end: Some(date("2024-01-08")),
    };
    let open = DateRange::Custom {
        start: None,
        end: None,
    };
    let today = date("2024-06-01");
    let asc = |range| ids(&build_view(&input, &spec(range, SortKey::DateAsc), None, today).expenses);
    assert_eq!(asc(only_start), vec![3, 2]);
    assert_eq!(asc(only_end), vec![1, 3]);
    assert_eq!(asc(open), vec![1, 3, 2]);
}

#[test]
fn test_filters_compose_with_and() {
    let input = vec![
        exp(1, "2024-03-02", Some(dec!(10)), "Travel"),
        exp(2, "2024-02-02", Some(dec!(10)), "Travel"),
        exp(3, "2024-03-03", Some(dec!(10)), "Shopping"),
    ];
    let spec = FilterSpec {
        category: CategoryFilter::Only("Travel".into()),
        date_range: DateRange::Month,
        sort: SortKey::DateDesc,
    };
    let view = build_view(&input, &spec, None, date("2024-03-10"));
    assert_eq!(ids(&view.expenses), vec![1]);
    assert_eq!(view.summary.total, dec!(10));
}

// ── Sorting ──────────────────────────────────────────────────

#[test]
fn test_sort_amount_both_directions() {
    let mut list = sample();
    sort_expenses(&mut list, SortKey::AmountDesc);
    assert_eq!(ids(&list), vec![1, 2, 3]);
    sort_expenses(&mut list, SortKey::AmountAsc);
    assert_eq!(ids(&list), vec![3, 2, 1]);
}

#[test]
fn test_sort_is_stable_on_ties() {
    let mut list = vec![
        exp(1, "2024-01-05", Some(dec!(10)), "A"),
        exp(2, "2024-01-05", Some(dec!(20)), "B"),
        exp(3, "2024-01-04", Some(dec!(10)), "C"),
        exp(4, "2024-01-05", Some(dec!(10)), "D"),
    ];
    sort_expenses(&mut list, SortKey::DateDesc);
    assert_eq!(ids(&list), vec![1, 2, 4, 3]);

    sort_expenses(&mut list, SortKey::AmountAsc);
    assert_eq!(ids(&list), vec![1, 4, 3, 2]);
}

#[test]
fn test_sort_is_idempotent() {
    for key in SortKey::all() {
        let mut once = sample();
        sort_expenses(&mut once, *key);
        let mut twice = once.clone();
        sort_expenses(&mut twice, *key);
        assert_eq!(ids(&once), ids(&twice), "{}", key.as_str());
    }
}

#[test]
fn test_invalid_amount_sorts_as_zero() {
    let mut list = vec![
        exp(1, "2024-01-01", Some(dec!(5)), "A"),
        exp(2, "2024-01-01", None, "A"),
    ];
    sort_expenses(&mut list, SortKey::AmountAsc);
    assert_eq!(ids(&list), vec![2, 1]);
}

// ── Aggregation ──────────────────────────────────────────────

#[test]
fn test_totals_are_order_independent() {
    let input = vec![
        exp(1, "2024-01-01", Some(dec!(12.10)), "Food"),
        exp(2, "2024-01-02", Some(dec!(3.45)), "Travel"),
        exp(3, "2024-01-02", Some(dec!(7.00)), "Food"),
        exp(4, "2024-01-04", Some(dec!(0.99)), "Other"),
    ];
    let baseline = summarize(&input, None);
    let mut reversed = input.clone();
    reversed.reverse();
    let mut rotated = input.clone();
    rotated.rotate_left(2);
    for shuffled in [reversed, rotated] {
        let s = summarize(&shuffled, None);
        assert_eq!(s.total, baseline.total);
        assert_eq!(s.category_totals, baseline.category_totals);
        assert_eq!(s.daily_totals, baseline.daily_totals);
    }
    assert_eq!(baseline.total, dec!(23.54));
}

#[test]
fn test_top_category_tie_breaks_alphabetically() {
    let input = vec![
        exp(1, "2024-01-01", Some(dec!(40)), "Travel"),
        exp(2, "2024-01-01", Some(dec!(40)), "Shopping"),
        exp(3, "2024-01-01", Some(dec!(10)), "Food"),
    ];
    let summary = summarize(&input, None);
    assert_eq!(summary.top_category.unwrap().name, "Shopping");
    let names: Vec<&str> = summary
        .category_totals
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Shopping", "Travel", "Food"]);
}

#[test]
fn test_top_category_on_unsorted_totals() {
    let totals = vec![
        CategoryTotal {
            name: "B".into(),
            total: dec!(5),
        },
        CategoryTotal {
            name: "C".into(),
            total: dec!(9),
        },
        CategoryTotal {
            name: "A".into(),
            total: dec!(9),
        },
    ];
    assert_eq!(top_category(&totals).unwrap().name, "A");
    assert!(top_category(&[]).is_none());
}

#[test]
fn test_invalid_amount_listed_but_not_summed() {
    let input = vec![
        exp(1, "2024-01-01", Some(dec!(25)), "Food"),
        exp(2, "2024-01-02", None, "Food"),
    ];
    let view = build_view(&input, &spec(DateRange::All, SortKey::DateAsc), None, date("2024-01-03"));
    assert_eq!(view.expenses.len(), 2);
    assert_eq!(view.summary.total, dec!(25));
    assert_eq!(view.summary.transaction_count, 2);
    assert_eq!(view.summary.invalid_amounts, 1);
}

#[test]
fn test_daily_totals_group_and_order_across_years() {
    let input = vec![
        exp(1, "2024-01-02", Some(dec!(5)), "Food"),
        exp(2, "2023-12-30", Some(dec!(7)), "Food"),
        exp(3, "2024-01-02", Some(dec!(3)), "Travel"),
        exp(4, "2023-01-02", Some(dec!(1)), "Travel"),
    ];
    let days = daily_totals(&input);
    let got: Vec<(NaiveDate, Decimal)> = days.iter().map(|d| (d.date, d.total)).collect();
    assert_eq!(
        got,
        vec![
            (date("2023-01-02"), dec!(1)),
            (date("2023-12-30"), dec!(7)),
            (date("2024-01-02"), dec!(8)),
        ]
    );
    assert_eq!(days[0].label(), "Jan 2");
    assert_eq!(days[1].label(), "Dec 30");
}

#[test]
fn test_aggregates_use_filtered_set() {
    let input = vec![
        exp(1, "2024-03-02", Some(dec!(10)), "Food"),
        exp(2, "2024-01-02", Some(dec!(1000)), "Travel"),
    ];
    let view = build_view(
        &input,
        &spec(DateRange::Month, SortKey::DateDesc),
        Some(dec!(100)),
        date("2024-03-15"),
    );
    assert_eq!(view.summary.total, dec!(10));
    assert_eq!(view.summary.top_category.unwrap().name, "Food");
    let budget = view.summary.budget.unwrap();
    assert_eq!(budget.remaining, dec!(90));
    assert_eq!(budget.percentage, dec!(10));
    assert_eq!(budget.status, BudgetStatus::OnTrack);
}

#[test]
fn test_budget_status_thresholds() {
    let status = |spent| BudgetProgress::new(dec!(100), spent).unwrap().status;
    assert_eq!(status(dec!(80)), BudgetStatus::OnTrack);
    assert_eq!(status(dec!(80.01)), BudgetStatus::Warning);
    assert_eq!(status(dec!(100)), BudgetStatus::Warning);
    assert_eq!(status(dec!(100.01)), BudgetStatus::Over);
}

#[test]
fn test_non_positive_budget_is_ignored() {
    assert!(BudgetProgress::new(Decimal::ZERO, dec!(10)).is_none());
    assert!(summarize(&sample(), Some(dec!(-1))).budget.is_none());
}
