use crate::shell::Section;

/// Normalize a route path to `/<path>` with no trailing slash.
///
/// Exactly one leading slash is kept and trailing slashes are dropped, so `""`,
/// `"/"` and `"//"` all become `"/"`, and `"events/"` becomes `"/events"`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let body = path.strip_prefix('/').unwrap_or(path);
    let body = body.trim_end_matches('/');
    format!("/{body}")
}

/// Link target for a route path; the same string [`crate::Router::navigate_to`] sets.
#[must_use]
pub fn href(path: &str) -> String {
    format!("#{}", normalize_path(path))
}

/// Extract the route path from a location fragment (`"#/cart"` → `"/cart"`).
#[must_use]
pub fn path_from_fragment(fragment: &str) -> String {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    if raw.is_empty() {
        return String::from("/");
    }
    normalize_path(raw)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    Home,
    Events,
    Bookings,
    Cart,
    Auth,
    Staff,
    Preferences,
}

impl Route {
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Events,
        Self::Bookings,
        Self::Cart,
        Self::Auth,
        Self::Staff,
        Self::Preferences,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Events => "/events",
            Self::Bookings => "/bookings",
            Self::Cart => "/cart",
            Self::Auth => "/auth",
            Self::Staff => "/staff",
            Self::Preferences => "/preferences",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let normalized = normalize_path(path);
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Self::Home => Section::Home,
            Self::Events => Section::Events,
            Self::Bookings => Section::Bookings,
            Self::Cart => Section::Cart,
            Self::Auth => Section::Auth,
            Self::Staff => Section::Staff,
            Self::Preferences => Section::Preferences,
        }
    }

    /// Whether the route needs a signed-in session before it may be shown.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Staff | Self::Preferences)
    }

    #[must_use]
    pub fn href(self) -> String {
        href(self.path())
    }
}
