use chrono::NaiveDate;

use super::expense::DATE_FORMAT;
use super::Category;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) selects everything; anything else is an exact category name.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        match Category::find(trimmed) {
            Some(cat) => Self::Only(cat.name.to_string()),
            None => Self::Only(trimmed.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => name == category,
        }
    }

    /// All -> first category -> ... -> last category -> All.
    pub fn cycle(&self) -> Self {
        let all = Category::all();
        match self {
            Self::All => all
                .first()
                .map(|c| Self::Only(c.name.to_string()))
                .unwrap_or(Self::All),
            Self::Only(name) => {
                let idx = all.iter().position(|c| c.name == name);
                match idx.and_then(|i| all.get(i + 1)) {
                    Some(next) => Self::Only(next.name.to_string()),
                    None => Self::All,
                }
            }
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All Categories"),
            Self::Only(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    All,
    Week,
    #[default]
    Month,
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom { .. } => "custom",
        }
    }

    /// Parse a range keyword. `custom` starts with both bounds open.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all-time" => Some(Self::All),
            "week" | "7d" => Some(Self::Week),
            "month" => Some(Self::Month),
            "custom" => Some(Self::Custom {
                start: None,
                end: None,
            }),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All Time".into(),
            Self::Week => "This Week".into(),
            Self::Month => "This Month".into(),
            Self::Custom { start, end } => {
                let fmt = |d: &Option<NaiveDate>| {
                    d.map(|d| d.format(DATE_FORMAT).to_string())
                        .unwrap_or_else(|| "…".into())
                };
                format!("{} to {}", fmt(start), fmt(end))
            }
        }
    }

    /// All -> Week -> Month -> Custom -> All. Custom bounds are dropped on the way out.
    pub fn cycle(&self) -> Self {
        match self {
            Self::All => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Custom {
                start: None,
                end: None,
            },
            Self::Custom { .. } => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date-desc" | "newest" => Some(Self::DateDesc),
            "date-asc" | "oldest" => Some(Self::DateAsc),
            "amount-desc" | "highest" => Some(Self::AmountDesc),
            "amount-asc" | "lowest" => Some(Self::AmountAsc),
            _ => None,
        }
    }

    pub fn all() -> &'static [SortKey] {
        &[
            Self::DateDesc,
            Self::DateAsc,
            Self::AmountDesc,
            Self::AmountAsc,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DateDesc => "Newest First",
            Self::DateAsc => "Oldest First",
            Self::AmountDesc => "Highest Amount",
            Self::AmountAsc => "Lowest Amount",
        }
    }

    pub fn cycle(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|k| k == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// Transient view parameters. Never persisted; every session starts from the default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub category: CategoryFilter,
    pub date_range: DateRange,
    pub sort: SortKey,
}

impl FilterSpec {
    /// Set the lower custom bound, switching to a custom range if needed.
    pub fn set_custom_start(&mut self, date: Option<NaiveDate>) {
        let end = match self.date_range {
            DateRange::Custom { end, .. } => end,
            _ => None,
        };
        self.date_range = DateRange::Custom { start: date, end };
    }

    /// Set the upper custom bound, switching to a custom range if needed.
    pub fn set_custom_end(&mut self, date: Option<NaiveDate>) {
        let start = match self.date_range {
            DateRange::Custom { start, .. } => start,
            _ => None,
        };
        self.date_range = DateRange::Custom { start, end: date };
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.category,
            self.date_range.label(),
            self.sort.label()
        )
    }
}
