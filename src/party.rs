//! Static party-planning lookups: menus, occasions, catering and themes.

use serde::{Deserialize, Serialize};

/// Fallback menu for occasions without a dedicated one.
pub const CUSTOM_MENU: &str = "Custom menu for the butler.";

/// Fallback when no superhero theme matches the category.
pub const THEME_NOT_FOUND: &str =
    "Themed party idea not found. Try 'classic heroes', 'villain masquerade', or 'futuristic Gotham'.";

/// Kinds of party Alfred knows how to cater for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Casual,
    Formal,
    Superhero,
    Custom,
}

impl Occasion {
    pub const ALL: [Occasion; 4] = [
        Occasion::Casual,
        Occasion::Formal,
        Occasion::Superhero,
        Occasion::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Casual => "casual",
            Occasion::Formal => "formal",
            Occasion::Superhero => "superhero",
            Occasion::Custom => "custom",
        }
    }

    /// Exact, case-sensitive match. Anything unrecognised is a custom party.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == key)
            .unwrap_or(Occasion::Custom)
    }

    pub fn menu(&self) -> &'static str {
        match self {
            Occasion::Casual => "Pizza, snacks, and drinks.",
            Occasion::Formal => "3-course dinner with wine and dessert.",
            Occasion::Superhero => "Buffet with high-energy and healthy food.",
            Occasion::Custom => CUSTOM_MENU,
        }
    }
}

impl std::fmt::Display for Occasion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggest a menu for the given occasion key.
pub fn suggest_menu(occasion: &str) -> &'static str {
    Occasion::from_key(occasion).menu()
}

/// Comma-separated list of supported occasions.
pub fn list_occasions() -> String {
    Occasion::ALL
        .iter()
        .map(Occasion::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A rated catering service in Gotham City.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CateringService {
    pub name: &'static str,
    pub rating: f32,
}

pub const CATERING_SERVICES: [CateringService; 3] = [
    CateringService {
        name: "Gotham Catering Co.",
        rating: 4.9,
    },
    CateringService {
        name: "Wayne Manor Catering",
        rating: 4.8,
    },
    CateringService {
        name: "Gotham City Events",
        rating: 4.7,
    },
];

/// Highest-rated catering service, optionally narrowed by a search term.
///
/// The term is matched case-insensitively against service names. When it
/// matches nothing, every service is considered.
pub fn best_catering_service(query: Option<&str>) -> &'static str {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let matching: Vec<&CateringService> = match &needle {
        Some(n) => CATERING_SERVICES
            .iter()
            .filter(|s| s.name.to_lowercase().contains(n.as_str()))
            .collect(),
        None => Vec::new(),
    };

    let candidates: Vec<&CateringService> = if matching.is_empty() {
        CATERING_SERVICES.iter().collect()
    } else {
        matching
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.rating.total_cmp(&b.rating))
        .map(|s| s.name)
        .unwrap_or(CATERING_SERVICES[0].name)
}

const THEMES: [(&str, &str); 3] = [
    (
        "classic heroes",
        "Justice League Gala: Guests come dressed as their favorite DC heroes with themed cocktails like 'The Kryptonite Punch'.",
    ),
    (
        "villain masquerade",
        "Gotham Rogues' Ball: A mysterious masquerade where guests dress as classic Batman villains.",
    ),
    (
        "futuristic gotham",
        "Neo-Gotham Night: A cyberpunk-style party inspired by Batman Beyond, with neon decorations and futuristic gadgets.",
    ),
];

/// Superhero party theme for a category. The category is lowercased first.
pub fn superhero_theme(category: &str) -> &'static str {
    let key = category.trim().to_lowercase();
    THEMES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, idea)| *idea)
        .unwrap_or(THEME_NOT_FOUND)
}
