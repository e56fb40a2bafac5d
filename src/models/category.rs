use rust_decimal::Decimal;

/// The fixed set of spending categories. Every lookup below is an exhaustive
/// `match`, so adding a variant fails to compile until each table covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Travel,
    Bills,
    Shopping,
    Health,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Others => "Others",
        }
    }

    /// All categories in display order. Breakdown ties keep this order.
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Travel,
            Self::Bills,
            Self::Shopping,
            Self::Health,
            Self::Others,
        ]
    }

    /// Strict, case-insensitive lookup. Used for direct input where an
    /// unknown name is a caller error.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == lower)
    }

    /// Lenient lookup for imported rows: anything unrecognized lands in `Others`.
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Others)
    }

    /// Chart color as an HSL triple.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "hsl(38, 92%, 50%)",
            Self::Travel => "hsl(217, 91%, 60%)",
            Self::Bills => "hsl(0, 72%, 51%)",
            Self::Shopping => "hsl(280, 65%, 60%)",
            Self::Health => "hsl(160, 84%, 39%)",
            Self::Others => "hsl(222, 20%, 50%)",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "utensils",
            Self::Travel => "plane",
            Self::Bills => "receipt",
            Self::Shopping => "shopping-bag",
            Self::Health => "heart",
            Self::Others => "more-horizontal",
        }
    }

    /// Monthly limit used when seeding a fresh budget schedule.
    pub fn default_budget(&self) -> Decimal {
        match self {
            Self::Food => Decimal::from(400),
            Self::Bills => Decimal::from(300),
            Self::Travel => Decimal::from(200),
            Self::Shopping | Self::Health | Self::Others => Decimal::from(150),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
