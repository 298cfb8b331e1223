use serde::{Deserialize, Serialize};

use crate::display;

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named area whose center is the anchor of the place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub name: String,
    pub center: GeoPoint,
}

impl Neighborhood {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            center: GeoPoint::new(lat, lng),
        }
    }
}

// --- Categories ---

/// URL halves the provider uses for sized images: `prefix + size + suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub prefix: String,
    pub suffix: String,
}

impl ImageUrl {
    pub fn sized(&self, size: &str) -> String {
        format!("{}{}{}", self.prefix, size, self.suffix)
    }
}

/// A node of the provider's category hierarchy. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub plural_name: String,
    #[serde(default)]
    pub icon: Option<ImageUrl>,
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, plural_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            plural_name: plural_name.into(),
            icon: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Category>) -> Self {
        self.children = children;
        self
    }

    /// 44px header icon for the category list, empty when the provider sent none.
    pub fn header_icon_url(&self) -> String {
        self.icon
            .as_ref()
            .map(|icon| icon.sized("44"))
            .unwrap_or_default()
    }

    /// Plural name, shortened when it would not fit the category header.
    pub fn display_name(&self) -> String {
        display::truncate_label(&self.plural_name)
    }

    pub fn summary(&self) -> CategoryRef {
        CategoryRef {
            id: self.id.clone(),
            name: self.name.clone(),
            plural_name: self.plural_name.clone(),
        }
    }
}

/// Flat reference to a category, as attached to a place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plural_name: String,
}

// --- Places ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub url: ImageUrl,
    /// Index of the photo within its place, used by the slideshow.
    pub position: usize,
}

impl Photo {
    pub fn thumbnail_url(&self) -> String {
        self.url.sized("100x100")
    }

    pub fn preview_url(&self) -> String {
        self.url.sized("500x500")
    }
}

/// An opening interval in 24h "HHMM" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSpan {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    /// Day indices, 1 = Monday .. 7 = Sunday.
    pub days: Vec<u8>,
    pub open: Vec<OpenSpan>,
}

impl Timeframe {
    /// e.g. "Mon - Tue - Wed"
    pub fn days_label(&self) -> String {
        self.days
            .iter()
            .map(|d| display::day_name(*d))
            .collect::<Vec<_>>()
            .join(" - ")
    }

    /// First open span, e.g. "08 h 00 - 17 h 30". Empty when no span is listed.
    pub fn hours_label(&self) -> String {
        match self.open.first() {
            Some(span) => format!(
                "{} - {}",
                display::format_hour(&span.start),
                display::format_hour(&span.end)
            ),
            None => String::new(),
        }
    }
}

/// Opening hours of a place. A missing or failed hours lookup is `Unavailable`;
/// an empty schedule is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "timeframes", rename_all = "snake_case")]
pub enum OpenHours {
    #[default]
    Unavailable,
    Schedule(Vec<Timeframe>),
}

impl OpenHours {
    pub fn timeframes(&self) -> &[Timeframe] {
        match self {
            OpenHours::Unavailable => &[],
            OpenHours::Schedule(frames) => frames,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub location: GeoPoint,
    pub address_lines: Vec<String>,
    /// Leaf categories the provider tagged the place with.
    pub leaf_categories: Vec<CategoryRef>,
    /// Top-level categories reachable from the leaf tags. Filled in before the
    /// place enters the index.
    #[serde(default)]
    pub resolved_categories: Vec<CategoryRef>,
    #[serde(default)]
    pub hours: OpenHours,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Place {
    pub fn leaf_category_ids(&self) -> impl Iterator<Item = &str> {
        self.leaf_categories.iter().map(|c| c.id.as_str())
    }

    pub fn belongs_to(&self, category_id: &str) -> bool {
        self.resolved_categories.iter().any(|c| c.id == category_id)
    }

    /// Places that resolve into no category are indexed but never shown.
    pub fn is_displayable(&self) -> bool {
        !self.resolved_categories.is_empty()
    }

    /// Names a search query may hit: leaf tags first, then resolved roots.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.leaf_categories
            .iter()
            .chain(self.resolved_categories.iter())
            .map(|c| c.name.as_str())
    }

    pub fn thumbnail_url(&self) -> String {
        self.photos
            .first()
            .map(Photo::thumbnail_url)
            .unwrap_or_default()
    }

    pub fn formatted_categories(&self) -> String {
        self.resolved_categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
