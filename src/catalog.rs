//! Candidate filter values for the product listing.
//!
//! Each list carries one `None` slot: drawing it means "no filter", and the
//! corresponding query parameter is left out entirely.

pub type Candidate = Option<&'static str>;

pub const CATEGORIES: [Candidate; 6] = [
    Some("games"),
    Some("books"),
    Some("collectibles"),
    Some("gadgets"),
    Some("home"),
    None,
];

pub const KEYWORDS: [Candidate; 8] = [
    Some("board"),
    Some("space"),
    Some("retro"),
    Some("limited"),
    Some("flash"),
    Some("sale"),
    Some("top"),
    None,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    pub categories: &'static [Candidate],
    pub keywords: &'static [Candidate],
}

impl Catalog {
    pub const fn new(categories: &'static [Candidate], keywords: &'static [Candidate]) -> Self {
        Self { categories, keywords }
    }

    /// Category values that are real filters, in declaration order.
    pub fn real_categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.categories.iter().flatten().copied()
    }

    pub fn real_keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().flatten().copied()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&CATEGORIES, &KEYWORDS)
    }
}
