/// A reference category: display name plus a `#RRGGBB` tag color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub color: &'static str,
}

const CATEGORIES: &[Category] = &[
    Category { name: "Food & Dining", color: "#EF4444" },
    Category { name: "Transportation", color: "#F59E0B" },
    Category { name: "Shopping", color: "#8B5CF6" },
    Category { name: "Entertainment", color: "#EC4899" },
    Category { name: "Bills & Utilities", color: "#3B82F6" },
    Category { name: "Healthcare", color: "#10B981" },
    Category { name: "Education", color: "#6366F1" },
    Category { name: "Travel", color: "#14B8A6" },
    Category { name: "Personal Care", color: "#F97316" },
    Category { name: "Other", color: "#6B7280" },
];

/// Used for expenses whose category is not in the reference list.
pub const FALLBACK_CATEGORY: &str = "Other";

const GRAY: (u8, u8, u8) = (107, 114, 128);

impl Category {
    pub fn all() -> &'static [Category] {
        CATEGORIES
    }

    /// Find a category by name (case-insensitive).
    pub fn find(name: &str) -> Option<&'static Category> {
        let lower = name.trim().to_lowercase();
        CATEGORIES.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// RGB color for an expense category; unknown names get the "Other" color.
    pub fn color_of(name: &str) -> (u8, u8, u8) {
        Self::find(name)
            .or_else(|| Self::find(FALLBACK_CATEGORY))
            .map_or(GRAY, |c| c.rgb())
    }

    /// Parse the hex color into an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(self.color).unwrap_or(GRAY)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub(crate) fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
