#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Persisted preference wins; otherwise follow the system setting.
    pub fn resolve(persisted: Option<Theme>, system_prefers_dark: bool) -> Theme {
        match persisted {
            Some(theme) => theme,
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Theme> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}
