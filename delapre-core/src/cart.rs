//! Shopping cart of event bookings
//!
//! Every mutation keeps two invariants per line: `guest_count <= max_guests`
//! and `guest_names.len() == guest_count`.
use crate::model::EventSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Largest party the guest selector offers for one line.
pub const MAX_GUESTS_PER_LINE: u32 = 4;

/// Ticket type of a single guest; drives the price multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestType {
    #[default]
    Adult,
    Child,
    Concession,
}

impl GuestType {
    pub const ALL: [Self; 3] = [Self::Adult, Self::Child, Self::Concession];

    /// Share of the adult price, in percent.
    #[must_use]
    pub const fn price_percent(self) -> i64 {
        match self {
            Self::Adult => 100,
            Self::Child | Self::Concession => 20,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Child => "Child",
            Self::Concession => "Concession",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Adult => "Adult",
            Self::Child => "Child",
            Self::Concession => "Concession (65+)",
        }
    }

    /// Parse a stored type name; anything unknown is an adult ticket.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .unwrap_or_default()
    }
}

/// One attendee on a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GuestRepr")]
pub struct Guest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GuestType,
}

/// Stored guest entries come as plain names from older clients or as records.
#[derive(Deserialize)]
#[serde(untagged)]
enum GuestRepr {
    Name(String),
    Detail {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
    Other(Value),
}

impl From<GuestRepr> for Guest {
    fn from(repr: GuestRepr) -> Self {
        match repr {
            GuestRepr::Name(name) => Self {
                name,
                kind: GuestType::Adult,
            },
            GuestRepr::Detail { name, kind } => Self {
                name: name.unwrap_or_default(),
                kind: kind.as_deref().map(GuestType::parse_lenient).unwrap_or_default(),
            },
            GuestRepr::Other(_) => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{title} is sold out and cannot be booked.")]
    SoldOut { title: String },
    #[error("event {0} is not in the cart")]
    NotInCart(u64),
    #[error("guest {index} is not part of this booking")]
    GuestOutOfRange { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Incremented { guest_count: u32 },
    /// The line was already at its maximum party size
    AtLimit { guest_count: u32 },
}

/// A pending booking for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub event: EventSummary,
    pub guest_count: u32,
    pub guest_names: Vec<Guest>,
    #[serde(rename = "maxGuests")]
    pub max_guests: u32,
}

impl CartLine {
    #[must_use]
    pub fn new(event: EventSummary) -> Self {
        let max_guests = line_limit(event.available());
        let mut line = Self {
            event,
            guest_count: 1,
            guest_names: Vec::new(),
            max_guests,
        };
        line.normalize();
        line
    }

    /// Rebuild a line from persisted JSON written by any client version.
    ///
    /// Returns `None` only when the referenced event cannot be read.
    #[must_use]
    pub fn from_persisted(raw: &Value) -> Option<Self> {
        let event: EventSummary = serde_json::from_value(raw.get("event")?.clone()).ok()?;

        let guest_count = raw
            .get("guest_count")
            .and_then(positive_count)
            .unwrap_or(1);
        let guest_names = match raw.get("guest_names") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| serde_json::from_value::<Guest>(entry.clone()).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        };
        let max_guests = line_limit(
            raw.get("maxGuests")
                .and_then(positive_count)
                .or_else(|| event.spots_left.filter(|spots| *spots > 0))
                .or_else(|| Some(event.capacity).filter(|capacity| *capacity > 0))
                .unwrap_or(1),
        );

        let mut line = Self {
            event,
            guest_count,
            guest_names,
            max_guests,
        };
        line.normalize();
        Some(line)
    }

    /// Clamp the party size and resize the guest list to match it.
    pub fn normalize(&mut self) {
        self.guest_count = self.guest_count.min(self.max_guests);
        self.resize_guests();
    }

    /// Set the party size, clamped to `max_guests`. Returns the stored count.
    pub fn set_guest_count(&mut self, count: u32) -> u32 {
        self.guest_count = count;
        self.normalize();
        self.guest_count
    }

    /// Line price in pence: per guest, base price scaled by ticket type.
    #[must_use]
    pub fn total_pence(&self) -> i64 {
        let base = self.event.price_pence();
        if base == 0 {
            return 0;
        }
        self.guest_names
            .iter()
            .map(|guest| guest_price_pence(base, guest.kind))
            .sum()
    }

    fn resize_guests(&mut self) {
        let count = self.guest_count as usize;
        if self.guest_names.len() > count {
            self.guest_names.truncate(count);
        } else {
            self.guest_names.resize_with(count, Guest::default);
        }
    }

    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.guest_count <= self.max_guests && self.guest_names.len() == self.guest_count as usize
    }
}

/// Price of one guest in pence, rounded to the nearest penny.
#[must_use]
pub const fn guest_price_pence(base_pence: i64, kind: GuestType) -> i64 {
    (base_pence * kind.price_percent() + 50) / 100
}

fn positive_count(value: &Value) -> Option<u32> {
    let count = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 1.0).map(|n| n.floor() as u64))?;
    u32::try_from(count).ok().filter(|count| *count > 0)
}

/// Shopping cart state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Create a new empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted JSON, skipping unreadable lines.
    #[must_use]
    pub fn from_persisted(raw: &Value) -> Self {
        let Value::Array(entries) = raw else {
            return Self::new();
        };
        let lines: Vec<CartLine> = entries.iter().filter_map(CartLine::from_persisted).collect();
        if lines.len() < entries.len() {
            log::warn!(
                "dropped {} unreadable cart line(s) during hydration",
                entries.len() - lines.len()
            );
        }
        Self { lines }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find a cart line by event ID.
    #[must_use]
    pub fn find_line(&self, event_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.event.id == event_id)
    }

    /// Find a mutable cart line by event ID.
    pub fn find_line_mut(&mut self, event_id: u64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.event.id == event_id)
    }

    /// Add one guest for `event`.
    ///
    /// A new line starts with a single adult guest; an existing line takes the
    /// fresh event snapshot and grows by one, up to the line limit.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SoldOut`] when the event has no places left; the cart
    /// is unchanged.
    pub fn add_event(&mut self, event: &EventSummary) -> Result<AddOutcome, CartError> {
        let available = event.available();
        if available == 0 {
            return Err(CartError::SoldOut {
                title: event.title.clone(),
            });
        }

        if let Some(line) = self.find_line_mut(event.id) {
            let before = line.guest_count;
            line.event = event.clone();
            line.max_guests = line_limit(available);
            let after = line.set_guest_count(before.saturating_add(1));
            return Ok(if after > before {
                AddOutcome::Incremented { guest_count: after }
            } else {
                AddOutcome::AtLimit { guest_count: after }
            });
        }

        self.lines.push(CartLine::new(event.clone()));
        Ok(AddOutcome::Added)
    }

    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] for an unknown event.
    pub fn set_guest_count(&mut self, event_id: u64, count: u32) -> Result<u32, CartError> {
        self.find_line_mut(event_id)
            .map(|line| line.set_guest_count(count))
            .ok_or(CartError::NotInCart(event_id))
    }

    /// # Errors
    ///
    /// Returns an error for an unknown event or a guest index beyond the party size.
    pub fn set_guest_name(
        &mut self,
        event_id: u64,
        index: usize,
        name: &str,
    ) -> Result<(), CartError> {
        self.guest_mut(event_id, index)?.name = name.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error for an unknown event or a guest index beyond the party size.
    pub fn set_guest_type(
        &mut self,
        event_id: u64,
        index: usize,
        kind: GuestType,
    ) -> Result<(), CartError> {
        self.guest_mut(event_id, index)?.kind = kind;
        Ok(())
    }

    fn guest_mut(&mut self, event_id: u64, index: usize) -> Result<&mut Guest, CartError> {
        let line = self
            .find_line_mut(event_id)
            .ok_or(CartError::NotInCart(event_id))?;
        line.guest_names
            .get_mut(index)
            .ok_or(CartError::GuestOutOfRange { index })
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, event_id: u64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.event.id != event_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn total_pence(&self) -> i64 {
        self.lines.iter().map(CartLine::total_pence).sum()
    }

    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.lines.iter().all(CartLine::invariants_hold)
    }
}

/// Largest party one line may hold: the remaining places, at most
/// [`MAX_GUESTS_PER_LINE`] and never below one.
fn line_limit(available: u32) -> u32 {
    available.clamp(1, MAX_GUESTS_PER_LINE)
}

/// Party sizes the guest selector offers for a line: `1..=min(available, 4)`.
#[must_use]
pub fn guest_count_options(available: u32) -> Vec<u32> {
    (1..=available.min(MAX_GUESTS_PER_LINE)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(id: u64, price: f64, capacity: u32, spots_left: Option<u32>) -> EventSummary {
        EventSummary {
            id,
            title: format!("Event {id}"),
            price,
            capacity,
            spots_left,
            ..EventSummary::default()
        }
    }

    #[test]
    fn adding_sold_out_event_is_rejected_without_change() {
        let mut cart = Cart::new();
        let err = cart.add_event(&event(1, 5.0, 10, Some(0))).unwrap_err();
        assert!(matches!(err, CartError::SoldOut { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn adding_existing_event_increments_up_to_capacity() {
        let mut cart = Cart::new();
        let tour = event(1, 5.0, 10, Some(2));
        assert_eq!(cart.add_event(&tour), Ok(AddOutcome::Added));
        assert_eq!(
            cart.add_event(&tour),
            Ok(AddOutcome::Incremented { guest_count: 2 })
        );
        assert_eq!(
            cart.add_event(&tour),
            Ok(AddOutcome::AtLimit { guest_count: 2 })
        );
        let line = cart.find_line(1).unwrap();
        assert_eq!(line.guest_names.len(), 2);
        assert!(cart.invariants_hold());
    }

    #[test]
    fn repeated_adds_stop_at_the_selector_limit() {
        let mut cart = Cart::new();
        let tour = event(1, 5.0, 20, None);
        for _ in 0..5 {
            cart.add_event(&tour).unwrap();
        }
        let line = cart.find_line(1).unwrap();
        assert_eq!(line.guest_count, MAX_GUESTS_PER_LINE);
        assert!(guest_count_options(line.max_guests).contains(&line.guest_count));
        assert_eq!(
            cart.add_event(&tour),
            Ok(AddOutcome::AtLimit { guest_count: 4 })
        );
        assert_eq!(cart.set_guest_count(1, 9), Ok(4));
        assert!(cart.invariants_hold());
    }

    #[test]
    fn persisted_party_sizes_fit_the_selector() {
        let raw = json!({
            "event": {"id": 3, "title": "Tour", "capacity": 30},
            "guest_count": 7,
            "maxGuests": 12
        });
        let line = CartLine::from_persisted(&raw).unwrap();
        assert_eq!(line.max_guests, 4);
        assert_eq!(line.guest_count, 4);
        assert_eq!(guest_count_options(line.max_guests).last(), Some(&4));
    }

    #[test]
    fn resizing_guests_preserves_existing_entries() {
        let mut cart = Cart::new();
        cart.add_event(&event(1, 5.0, 10, None)).unwrap();
        cart.set_guest_count(1, 3).unwrap();
        cart.set_guest_name(1, 0, "Ada").unwrap();
        cart.set_guest_type(1, 1, GuestType::Child).unwrap();
        cart.set_guest_count(1, 2).unwrap();
        let line = cart.find_line(1).unwrap();
        assert_eq!(line.guest_names[0].name, "Ada");
        assert_eq!(line.guest_names[1].kind, GuestType::Child);
        assert_eq!(line.guest_names.len(), 2);

        cart.set_guest_count(1, 4).unwrap();
        let line = cart.find_line(1).unwrap();
        assert_eq!(line.guest_names[3], Guest::default());
    }

    #[test]
    fn guest_count_clamps_to_max_guests() {
        let mut cart = Cart::new();
        cart.add_event(&event(1, 5.0, 3, None)).unwrap();
        assert_eq!(cart.set_guest_count(1, 9), Ok(3));
        assert!(cart.invariants_hold());
        assert_eq!(cart.set_guest_count(2, 1), Err(CartError::NotInCart(2)));
    }

    #[test]
    fn guest_edits_outside_party_are_rejected() {
        let mut cart = Cart::new();
        cart.add_event(&event(1, 5.0, 3, None)).unwrap();
        assert_eq!(
            cart.set_guest_name(1, 4, "Nope"),
            Err(CartError::GuestOutOfRange { index: 4 })
        );
    }

    #[test]
    fn adult_and_child_line_totals_twelve_pounds() {
        let mut line = CartLine::new(event(1, 10.0, 3, None));
        line.set_guest_count(2);
        line.guest_names[1].kind = GuestType::Child;
        assert_eq!(line.total_pence(), 1200);
    }

    #[test]
    fn free_events_cost_nothing_for_any_guest_type() {
        let mut free = event(1, 10.0, 3, None);
        free.is_free = true;
        let mut line = CartLine::new(free);
        line.set_guest_count(3);
        line.guest_names[2].kind = GuestType::Concession;
        assert_eq!(line.total_pence(), 0);
    }

    #[test]
    fn cart_total_sums_lines() {
        let mut cart = Cart::new();
        cart.add_event(&event(1, 10.0, 3, None)).unwrap();
        cart.add_event(&event(2, 2.5, 3, None)).unwrap();
        cart.set_guest_type(2, 0, GuestType::Concession).unwrap();
        assert_eq!(cart.total_pence(), 1000 + 50);
    }

    #[test]
    fn persisted_line_repairs_legacy_shapes() {
        let raw = json!({
            "event": {"id": 7, "title": "Talk", "capacity": 20, "spots_left": 5},
            "guest_names": ["Ada", {"name": "Bo", "type": "Child"}, 42, {"type": "Dragon"}]
        });
        let line = CartLine::from_persisted(&raw).unwrap();
        assert_eq!(line.guest_count, 1);
        assert_eq!(line.max_guests, 4);
        assert_eq!(line.guest_names, vec![Guest {
            name: String::from("Ada"),
            kind: GuestType::Adult
        }]);
    }

    #[test]
    fn persisted_line_falls_back_through_capacity_fields() {
        let raw = json!({
            "event": {"id": 7, "title": "Talk", "capacity": 0, "spots_left": 0},
            "guest_count": 3,
            "guest_names": "not a list"
        });
        let line = CartLine::from_persisted(&raw).unwrap();
        assert_eq!(line.max_guests, 1);
        assert_eq!(line.guest_count, 1);
        assert_eq!(line.guest_names.len(), 1);

        let no_event = json!({"guest_count": 2});
        assert!(CartLine::from_persisted(&no_event).is_none());
    }

    #[test]
    fn selector_offers_at_most_four_guests() {
        assert_eq!(guest_count_options(0), Vec::<u32>::new());
        assert_eq!(guest_count_options(2), vec![1, 2]);
        assert_eq!(guest_count_options(30), vec![1, 2, 3, 4]);
    }
}
