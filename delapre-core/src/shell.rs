/// Top-level sections of the single-page app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Home,
    Events,
    Bookings,
    Cart,
    Auth,
    Staff,
    Preferences,
}

impl Section {
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
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "homeSection",
            Self::Events => "eventsSection",
            Self::Bookings => "bookingsSection",
            Self::Cart => "cartSection",
            Self::Auth => "authSection",
            Self::Staff => "staffSection",
            Self::Preferences => "preferencesSection",
        }
    }
}

/// Section visibility. At most one section is visible once a navigation completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shell {
    visible: Option<Section>,
}

impl Shell {
    /// Hide every section, then reveal `section`.
    pub fn show(&mut self, section: Section) {
        self.hide_all();
        self.visible = Some(section);
    }

    pub fn hide_all(&mut self) {
        self.visible = None;
    }

    #[must_use]
    pub const fn visible(&self) -> Option<Section> {
        self.visible
    }

    #[must_use]
    pub fn is_visible(&self, section: Section) -> bool {
        self.visible == Some(section)
    }

    /// Every section with its visibility, in page order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, bool)> + '_ {
        Section::ALL
            .into_iter()
            .map(|section| (section, self.is_visible(section)))
    }
}
