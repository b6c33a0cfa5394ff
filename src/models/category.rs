use serde::ser::{Serialize, Serializer};

/// Numeric sentinel threshold for undefined CASFRI codes. Codes strictly
/// below this value (e.g. -8888, -9999) mean null/unknown/not-applicable;
/// exactly -8000 is a defined value.
pub const NUMERIC_NULL_THRESHOLD: f64 = -8000.0;

/// Label sentinels for undefined CASFRI categories.
pub const NULL_VALUE_LABELS: [&str; 2] = ["NOT_APPLICABLE", "NULL_VALUE"];

/// A grouping category for one analysis column: either a numeric code
/// (years, percentages, CASFRI integer codes) or a text label (species
/// codes, class names).
///
/// The numeric/label decision is made once, when the raw cell is parsed,
/// so null classification never has to re-inspect value types downstream.
#[derive(Debug, Clone)]
pub enum Category {
    Numeric(f64),
    Label(String),
}

impl Category {
    /// Parse a raw cell into a category. Anything that parses as a number
    /// is numeric; everything else is a label.
    pub fn parse(cell: &str) -> Category {
        let trimmed = cell.trim();
        match trimmed.parse::<f64>() {
            Ok(value) => Category::Numeric(value),
            Err(_) => Category::Label(trimmed.to_string()),
        }
    }

    /// Whether this category is one of CASFRI's undefined sentinels.
    pub fn is_undefined(&self) -> bool {
        match self {
            Category::Numeric(value) => *value < NUMERIC_NULL_THRESHOLD,
            Category::Label(label) => NULL_VALUE_LABELS.contains(&label.as_str()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Numeric(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            Category::Label(label) => write!(f, "{label}"),
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Category::Numeric(a), Category::Numeric(b)) => a.total_cmp(b).is_eq(),
            (Category::Label(a), Category::Label(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Category {}

// Numeric categories order before labels; numerics use IEEE total order so
// grouped results have a stable, pandas-like sorted index.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Category::Numeric(a), Category::Numeric(b)) => a.total_cmp(b),
            (Category::Label(a), Category::Label(b)) => a.cmp(b),
            (Category::Numeric(_), Category::Label(_)) => std::cmp::Ordering::Less,
            (Category::Label(_), Category::Numeric(_)) => std::cmp::Ordering::Greater,
        }
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Category::Numeric(value) => {
                0u8.hash(state);
                value.to_bits().hash(state);
            }
            Category::Label(label) => {
                1u8.hash(state);
                label.hash(state);
            }
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Category::Numeric(value) => serializer.serialize_f64(*value),
            Category::Label(label) => serializer.serialize_str(label),
        }
    }
}
