use super::{Notice, PageController, signed_in};
use crate::api::ApiError;
use crate::effect::Effect;
use crate::forms::PreferencesForm;
use crate::load::{Generation, LoadState, Resource};
use crate::model::Preferences;
use crate::shell::Section;
use crate::state::ClientState;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesPage {
    pub form: PreferencesForm,
    pub current: Resource<Preferences>,
    pub status: Option<Notice>,
    pub saving: bool,
}

impl PreferencesPage {
    /// Take edited fields from the view; SMS is switched off when the phone is cleared.
    pub fn update_form(&mut self, mut form: PreferencesForm) {
        if !form.sms_available() {
            form.sms_opt_in = false;
        }
        self.form = form;
    }

    pub fn save(&mut self) -> Option<Effect> {
        if self.saving {
            return None;
        }
        match self.form.validate() {
            Ok(preferences) => {
                self.status = None;
                self.saving = true;
                Some(Effect::SavePreferences(preferences))
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
                None
            }
        }
    }

    pub fn finish_load(&mut self, generation: Generation, result: Result<Preferences, ApiError>) {
        let form = result.as_ref().ok().map(PreferencesForm::from);
        if self.current.finish(generation, result)
            && let Some(form) = form
        {
            self.form = form;
        }
    }

    pub fn finish_save(&mut self, result: Result<Preferences, ApiError>) {
        self.saving = false;
        match result {
            Ok(preferences) => {
                log::info!("preferences saved");
                self.form = PreferencesForm::from(&preferences);
                *self.current.state_mut() = LoadState::Ready(preferences);
                self.status = Some(Notice::success("Preferences saved."));
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
            }
        }
    }
}

impl PageController for PreferencesPage {
    fn section(&self) -> Section {
        Section::Preferences
    }

    fn guard(&self, state: &ClientState) -> bool {
        signed_in(state)
    }

    fn on_show(&mut self, _state: &ClientState) {
        self.status = None;
    }

    fn load(&mut self, _state: &ClientState) -> Vec<Effect> {
        vec![Effect::LoadPreferences {
            generation: self.current.begin(),
        }]
    }
}
