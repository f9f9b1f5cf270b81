use super::{Notice, PageController};
use crate::api::ApiError;
use crate::checkout::{
    CheckoutError, booking_requests, guest_booking_requests, validate_availability,
    validate_guest_contact,
};
use crate::effect::Effect;
use crate::model::GuestInfo;
use crate::shell::Section;
use crate::state::ClientState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartPage {
    /// Guest checkout fields, pre-filled from remembered details
    pub guest_form: GuestInfo,
    pub status: Option<Notice>,
    pub submitting: bool,
}

impl CartPage {
    /// Authenticated checkout. Validation failures never reach the network.
    pub fn checkout(&mut self, state: &ClientState) -> Option<Effect> {
        if self.submitting {
            return None;
        }
        let checked = if state.is_authenticated() {
            validate_availability(state)
        } else {
            Err(CheckoutError::SignInRequired)
        };
        if let Err(err) = checked {
            self.reject(&err);
            return None;
        }
        self.status = None;
        self.submitting = true;
        log::info!("submitting checkout for {} line(s)", state.cart.len());
        Some(Effect::Checkout(booking_requests(&state.cart)))
    }

    /// Guest checkout. Contact details are checked before availability.
    pub fn guest_checkout(&mut self, state: &ClientState) -> Option<Effect> {
        if self.submitting {
            return None;
        }
        let info = match validate_guest_contact(
            &self.guest_form.email,
            &self.guest_form.name,
            &self.guest_form.phone,
        ) {
            Ok(info) => info,
            Err(err) => {
                self.reject(&err);
                return None;
            }
        };
        if let Err(err) = validate_availability(state) {
            self.reject(&err);
            return None;
        }
        self.status = None;
        self.submitting = true;
        log::info!("submitting guest checkout for {} line(s)", state.cart.len());
        let requests = guest_booking_requests(&state.cart, &info);
        Some(Effect::GuestCheckout { info, requests })
    }

    fn reject(&mut self, err: &CheckoutError) {
        log::debug!("checkout rejected: {err}");
        self.status = Some(Notice::error(err.to_string()));
    }

    /// Report a checkout response. Returns whether every line was booked.
    pub fn finish_checkout(
        &mut self,
        state: &ClientState,
        booked: &[u64],
        result: Result<(), ApiError>,
        guest: Option<&GuestInfo>,
    ) -> bool {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.status = guest.map(|info| {
                    Notice::success(format!(
                        "Booking confirmed! A confirmation will be sent to {}.",
                        info.email
                    ))
                });
                true
            }
            Err(err) => {
                log::warn!("checkout failed after {} booking(s): {err}", booked.len());
                self.status = Some(Notice::error(failure_message(state, booked, &err)));
                false
            }
        }
    }
}

fn title_of(state: &ClientState, event_id: u64) -> String {
    state
        .cart
        .find_line(event_id)
        .map_or_else(|| format!("event {event_id}"), |line| line.event.title.clone())
}

fn failure_message(state: &ClientState, booked: &[u64], err: &ApiError) -> String {
    let failed = state
        .cart
        .lines
        .iter()
        .find(|line| !booked.contains(&line.event.id))
        .map(|line| line.event.title.clone());
    let message = match failed {
        Some(title) => format!("Could not book {title}: {err}"),
        None => err.to_string(),
    };
    if booked.is_empty() {
        return message;
    }
    let titles: Vec<String> = booked.iter().map(|id| title_of(state, *id)).collect();
    format!("{message} (already booked: {})", titles.join(", "))
}

impl PageController for CartPage {
    fn section(&self) -> Section {
        Section::Cart
    }

    fn on_show(&mut self, state: &ClientState) {
        self.status = None;
        if self.guest_form == GuestInfo::default()
            && let Some(info) = state.guest_info.as_ref()
        {
            self.guest_form = info.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventSummary;

    fn cart_with(titles: &[(u64, &str)]) -> ClientState {
        let mut state = ClientState::default();
        for (id, title) in titles {
            state
                .cart
                .add_event(&EventSummary {
                    id: *id,
                    title: (*title).to_string(),
                    capacity: 5,
                    ..EventSummary::default()
                })
                .unwrap();
        }
        state
    }

    #[test]
    fn signed_out_checkout_asks_for_guest_form() {
        let mut page = CartPage::default();
        assert!(page.checkout(&cart_with(&[(1, "Tour")])).is_none());
        assert_eq!(
            page.status.as_ref().map(|notice| notice.message.as_str()),
            Some("Please fill in the guest form or sign in to checkout.")
        );
    }

    #[test]
    fn invalid_guest_email_stops_before_any_effect() {
        let mut page = CartPage {
            guest_form: GuestInfo {
                email: String::from("not-an-email"),
                name: String::from("Ada"),
                phone: String::new(),
            },
            ..CartPage::default()
        };
        assert!(page.guest_checkout(&cart_with(&[(1, "Tour")])).is_none());
        assert!(!page.submitting);
        assert!(page.status.as_ref().is_some_and(Notice::is_error));
    }

    #[test]
    fn remembered_guest_details_prefill_the_form() {
        let mut state = cart_with(&[]);
        let info = GuestInfo {
            email: String::from("ada@example.org"),
            name: String::from("Ada"),
            phone: String::new(),
        };
        state.guest_info = Some(info.clone());
        let mut page = CartPage::default();
        page.on_show(&state);
        assert_eq!(page.guest_form, info);
    }

    #[test]
    fn partial_failure_names_both_sides() {
        let state = cart_with(&[(1, "Tour"), (2, "Talk")]);
        let mut page = CartPage {
            submitting: true,
            ..CartPage::default()
        };
        let err = ApiError::Status {
            status: 409,
            message: String::from("Event is full"),
        };
        assert!(!page.finish_checkout(&state, &[1], Err(err), None));
        assert_eq!(
            page.status.unwrap().message,
            "Could not book Talk: Event is full (already booked: Tour)"
        );
        assert!(!page.submitting);
    }
}
