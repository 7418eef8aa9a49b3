use serde::{Deserialize, Serialize};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// An origin country the catalog can be filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: &'static str,
    pub name: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category { code: "NG", name: "Nigeria" },
    Category { code: "ZA", name: "South Africa" },
    Category { code: "KE", name: "Kenya" },
    Category { code: "GH", name: "Ghana" },
    Category { code: "ET", name: "Ethiopia" },
    Category { code: "EG", name: "Egypt" },
    Category { code: "MA", name: "Morocco" },
    Category { code: "DZ", name: "Algeria" },
    Category { code: "UG", name: "Uganda" },
    Category { code: "TN", name: "Tunisia" },
];

/// Parameters for one discover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub origin_country: &'static str,
    pub page: u32,
}

impl DiscoverQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("include_adult", "false".to_string()),
            ("include_video", "false".to_string()),
            ("language", "en-US".to_string()),
            ("page", self.page.to_string()),
            ("sort_by", "popularity.desc".to_string()),
            ("with_origin_country", self.origin_country.to_string()),
        ]
    }
}

/// A discover result as the catalog returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl CatalogEntry {
    /// Has a poster and a non-empty overview.
    pub fn is_publishable(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        has(&self.overview) && has(&self.poster_path)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DiscoverPage {
    #[serde(default)]
    pub results: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// A catalog entry chosen for publishing, with everything the composer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Origin country name.
    pub origin: String,
    pub media_url: String,
    /// "Name as Character", at most a handful.
    pub credits: Vec<String>,
    /// Four digits, or empty when unknown.
    pub release_year: String,
    pub rating: f64,
}

impl Item {
    pub fn from_entry(entry: &CatalogEntry, category: &Category, credits: Vec<String>) -> Self {
        let poster = entry.poster_path.as_deref().unwrap_or_default();
        Self {
            id: entry.id.to_string(),
            title: entry
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown Title".to_string()),
            summary: entry.overview.clone().unwrap_or_default(),
            origin: category.name.to_string(),
            media_url: format!("{}{}", POSTER_BASE_URL, poster),
            credits,
            release_year: entry
                .release_date
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(4)
                .collect(),
            rating: entry.vote_average.unwrap_or(0.0),
        }
    }
}

/// Keep the first `limit` cast entries that name a character.
pub fn credit_lines(cast: &[CastMember], limit: usize) -> Vec<String> {
    cast.iter()
        .take(limit)
        .filter_map(|m| match m.character.as_deref() {
            Some(character) if !character.is_empty() => {
                Some(format!("{} as {}", m.name, character))
            }
            _ => None,
        })
        .collect()
}
