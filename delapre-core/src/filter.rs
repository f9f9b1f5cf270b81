use crate::model::EventSummary;

pub const ALL_CATEGORIES: &str = "all";

const TITLE_KEYWORDS: [(&str, &str); 3] = [("tour", "tours"), ("talk", "talks"), ("family", "family")];

/// Client-side filter of the events grid. Reset on every visit to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub category: String,
    pub search: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
        }
    }
}

impl EventFilter {
    #[must_use]
    pub fn matches(&self, event: &EventSummary) -> bool {
        self.matches_search(event) && self.matches_category(event)
    }

    #[must_use]
    pub fn apply<'a>(&self, events: &'a [EventSummary]) -> Vec<&'a EventSummary> {
        events.iter().filter(|event| self.matches(event)).collect()
    }

    fn matches_search(&self, event: &EventSummary) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&event.title, &event.description, &event.location]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_category(&self, event: &EventSummary) -> bool {
        if self.category == ALL_CATEGORIES {
            return true;
        }
        event_category(event).is_some_and(|category| category == self.category.to_lowercase())
    }
}

/// Category an event files under: its own field, else a keyword in the title.
#[must_use]
pub fn event_category(event: &EventSummary) -> Option<String> {
    if let Some(category) = event
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
    {
        return Some(category.to_lowercase());
    }
    let title = event.title.to_lowercase();
    TITLE_KEYWORDS
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, category)| (*category).to_string())
}

/// Filter choices: `all` followed by each category in order of first appearance.
#[must_use]
pub fn category_options(events: &[EventSummary]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for category in events.iter().filter_map(event_category) {
        if !options.contains(&category) {
            options.push(category);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, category: Option<&str>) -> EventSummary {
        EventSummary {
            title: title.to_string(),
            description: String::from("A walk around the grounds"),
            location: String::from("Delapre Abbey"),
            category: category.map(str::to_string),
            ..EventSummary::default()
        }
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let events = [event("Abbey Gardens Tour", None), event("History Talk", None)];
        let filter = EventFilter {
            search: String::from("GARDENS"),
            ..EventFilter::default()
        };
        assert_eq!(filter.apply(&events).len(), 1);
        let by_location = EventFilter {
            search: String::from("abbey"),
            ..EventFilter::default()
        };
        assert_eq!(by_location.apply(&events).len(), 2);
    }

    #[test]
    fn category_falls_back_to_title_keyword() {
        assert_eq!(
            event_category(&event("Family Fun Day", None)).as_deref(),
            Some("family")
        );
        assert_eq!(
            event_category(&event("Family Fun Day", Some("Workshops"))).as_deref(),
            Some("workshops")
        );
        assert_eq!(event_category(&event("Open Day", None)), None);
    }

    #[test]
    fn category_filter_and_options() {
        let events = [
            event("Abbey Gardens Tour", None),
            event("History Talk", None),
            event("Evening Tour", None),
            event("Open Day", None),
        ];
        assert_eq!(category_options(&events), vec!["all", "tours", "talks"]);
        let tours = EventFilter {
            category: String::from("tours"),
            ..EventFilter::default()
        };
        assert_eq!(tours.apply(&events).len(), 2);
        assert_eq!(EventFilter::default().apply(&events).len(), 4);
    }
}
