use serde::{Deserialize, Serialize, Serializer};

use crate::error::DataIntegrityError;
use crate::models::{ChangeDirection, InterviewStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Users,
    Calendar,
    Clock,
    TrendingUp,
    Video,
    FileText,
    Plus,
    MoreVertical,
    ArrowRight,
    Github,
    Mail,
}

/// Symbolic name and text glyph for every icon.
static ICON_TABLE: [(Icon, &str, &str); 11] = [
    (Icon::Users, "users", "👥"),
    (Icon::Calendar, "calendar", "📅"),
    (Icon::Clock, "clock", "🕒"),
    (Icon::TrendingUp, "trending-up", "📈"),
    (Icon::Video, "video", "🎥"),
    (Icon::FileText, "file-text", "📄"),
    (Icon::Plus, "plus", "＋"),
    (Icon::MoreVertical, "more-vertical", "⋮"),
    (Icon::ArrowRight, "arrow-right", "→"),
    (Icon::Github, "github", "🐙"),
    (Icon::Mail, "mail", "✉"),
];

impl Icon {
    fn entry(self) -> &'static (Icon, &'static str, &'static str) {
        let row = match self {
            Icon::Users => 0,
            Icon::Calendar => 1,
            Icon::Clock => 2,
            Icon::TrendingUp => 3,
            Icon::Video => 4,
            Icon::FileText => 5,
            Icon::Plus => 6,
            Icon::MoreVertical => 7,
            Icon::ArrowRight => 8,
            Icon::Github => 9,
            Icon::Mail => 10,
        };
        &ICON_TABLE[row]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn glyph(self) -> &'static str {
        self.entry().2
    }
}

impl std::str::FromStr for Icon {
    type Err = DataIntegrityError;

    /// Accepts kebab, snake or Pascal case (`trending-up`, `trending_up`, `TrendingUp`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        ICON_TABLE
            .iter()
            .find(|(_, name, _)| name.replace('-', "") == wanted)
            .map(|(icon, _, _)| *icon)
            .ok_or_else(|| DataIntegrityError::UnknownIcon(value.to_string()))
    }
}

impl Serialize for Icon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Icon {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Styling for a stat card's delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Affirmative,
    Warning,
}

impl From<ChangeDirection> for Tone {
    fn from(direction: ChangeDirection) -> Self {
        match direction {
            ChangeDirection::Positive => Tone::Affirmative,
            ChangeDirection::Negative => Tone::Warning,
        }
    }
}

/// Visual category of an interview status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Pending,
    Success,
    Danger,
}

impl From<InterviewStatus> for Badge {
    fn from(status: InterviewStatus) -> Self {
        match status {
            InterviewStatus::Scheduled => Badge::Pending,
            InterviewStatus::Completed => Badge::Success,
            InterviewStatus::Cancelled => Badge::Danger,
        }
    }
}

/// Entrance animation shared by every element of a kind. Item `i` of a list
/// starts `stagger_ms * i` after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealAnimation {
    pub duration_ms: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub stagger_ms: u32,
}

impl RevealAnimation {
    pub const CARD: RevealAnimation = RevealAnimation::new(300, 0, 20, 100);
    pub const LIST_ITEM: RevealAnimation = RevealAnimation::new(300, -20, 0, 100);
    pub const ACTION: RevealAnimation = RevealAnimation::new(300, 0, 10, 100);
    pub const PANEL: RevealAnimation = RevealAnimation::new(500, 0, 20, 200);
    pub const HERO: RevealAnimation = RevealAnimation::new(500, 0, 20, 0);

    pub const fn new(duration_ms: u32, offset_x: i32, offset_y: i32, stagger_ms: u32) -> Self {
        Self {
            duration_ms,
            offset_x,
            offset_y,
            stagger_ms,
        }
    }

    pub fn delay_ms(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.stagger_ms.saturating_mul(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "&'static str")]
pub enum Route {
    Home,
    Login,
    Dashboard,
    Interviews,
    Analytics,
    Terms,
    Privacy,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Login,
        Route::Dashboard,
        Route::Interviews,
        Route::Analytics,
        Route::Terms,
        Route::Privacy,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Interviews => "/dashboard/interviews",
            Route::Analytics => "/dashboard/analytics",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }
}

impl From<Route> for &'static str {
    fn from(route: Route) -> Self {
        route.path()
    }
}

impl std::str::FromStr for Route {
    type Err = DataIntegrityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            path => path,
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| DataIntegrityError::UnknownRoute(value.to_string()))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_icon_has_a_table_entry() {
        for &(icon, name, glyph) in ICON_TABLE.iter() {
            assert_eq!(icon.entry().0, icon);
            assert_eq!(icon.name(), name);
            assert_eq!(icon.glyph(), glyph);
            assert_eq!(name.parse::<Icon>(), Ok(icon));
        }
        assert_eq!("TrendingUp".parse::<Icon>(), Ok(Icon::TrendingUp));
        assert_eq!("more_vertical".parse::<Icon>(), Ok(Icon::MoreVertical));
        assert!("sparkles".parse::<Icon>().is_err());
    }

    #[test]
    fn each_status_maps_to_its_own_badge() {
        let badges: Vec<Badge> = InterviewStatus::ALL.into_iter().map(Badge::from).collect();
        assert_eq!(badges, vec![Badge::Pending, Badge::Success, Badge::Danger]);
    }

    #[test]
    fn reveal_delay_staggers_by_index() {
        assert_eq!(RevealAnimation::CARD.delay_ms(0), 0);
        assert_eq!(RevealAnimation::CARD.delay_ms(3), 300);
        assert_eq!(RevealAnimation::PANEL.delay_ms(1), 200);
        assert_eq!(RevealAnimation::HERO.delay_ms(5), 0);
    }

    #[test]
    fn routes_resolve_from_paths() {
        for route in Route::ALL {
            assert_eq!(route.path().parse::<Route>(), Ok(route));
        }
        assert_eq!("/dashboard/".parse::<Route>(), Ok(Route::Dashboard));
        assert_eq!("".parse::<Route>(), Ok(Route::Home));
        assert_eq!(
            "/settings".parse::<Route>(),
            Err(DataIntegrityError::UnknownRoute("/settings".to_string()))
        );
    }
}
