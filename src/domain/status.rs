// Status display vocabulary shared by equipment and device rows
use serde::Serialize;

/// Colour tier a status badge is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Good,
    Caution,
    Warning,
    Critical,
    Neutral,
}

impl StatusTier {
    /// (foreground, background) colours for the HTML badge
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            StatusTier::Good => ("#155724", "#d4edda"),
            StatusTier::Caution => ("#856404", "#fff3cd"),
            StatusTier::Warning => ("#8a4b08", "#ffe5cc"),
            StatusTier::Critical => ("#721c24", "#f8d7da"),
            StatusTier::Neutral => ("#383d41", "#e2e3e5"),
        }
    }
}

/// Anything rendered as a status badge.
pub trait StatusDisplay {
    fn label(&self) -> String;
    fn tier(&self) -> StatusTier;
}
