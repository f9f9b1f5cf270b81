use super::PageController;
use crate::shell::Section;

/// Landing section; its shortcuts are plain navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomePage;

impl PageController for HomePage {
    fn section(&self) -> Section {
        Section::Home
    }
}
