use once_cell::sync::Lazy;

/// Color used when a palette has no colors at all.
pub const FALLBACK_COLOR: &str = "#1c1c1c";

static STANDARD: Lazy<Palette> = Lazy::new(|| {
    Palette::from_rules([
        ("Personal Growth", "#dd7834"),
        ("Personal", "#388592"),
        ("Fun & Recreation", "#2782a2"),
        ("Family", "#cb5252"),
        ("Work", "#71b199"),
        ("Health", "#957367"),
        ("Romance", "#c0243a"),
        ("Friends", "#cc5e5e"),
        ("Birthdays", "#284128"),
        ("Tasks", "#474544"),
        ("tran.van.tuan", "#c53130"),
    ])
});

/// A label substring that pins a calendar to a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRule {
    pub pattern: String,
    pub color: String,
}

/// Ordered colors plus substring rules checked in order, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
    rules: Vec<ColorRule>,
}

impl Palette {
    #[must_use]
    pub const fn new(colors: Vec<String>, rules: Vec<ColorRule>) -> Self {
        Self { colors, rules }
    }

    /// Builds a palette whose colors are the rule colors, in rule order.
    pub fn from_rules<I, P, C>(rules: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let rules: Vec<ColorRule> = rules
            .into_iter()
            .map(|(pattern, color)| ColorRule {
                pattern: pattern.into(),
                color: color.into(),
            })
            .collect();
        let colors = rules.iter().map(|rule| rule.color.clone()).collect();

        Self { colors, rules }
    }

    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Color for a calendar: the first rule whose pattern occurs in `label`,
    /// else a palette entry picked by hashing `calendar_id`.
    #[must_use]
    pub fn color_for(&self, calendar_id: &str, label: &str) -> &str {
        if let Some(rule) = self.rules.iter().find(|rule| label.contains(&rule.pattern)) {
            return &rule.color;
        }

        if self.colors.is_empty() {
            return FALLBACK_COLOR;
        }

        // The remainder is below `colors.len()` and fits in a usize.
        let index = (fnv1a(calendar_id.as_bytes()) % self.colors.len() as u64) as usize;
        &self.colors[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        STANDARD.clone()
    }
}

/// 64-bit FNV-1a.
#[must_use]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
    const PRIME: u64 = 1_099_511_628_211;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}
