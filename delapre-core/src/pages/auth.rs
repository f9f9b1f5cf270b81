use super::{Notice, PageController};
use crate::api::{ApiError, AuthResponse};
use crate::effect::Effect;
use crate::forms::{LoginForm, RegisterForm};
use crate::shell::Section;
use crate::state::ClientState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthView {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPage {
    pub view: AuthView,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub status: Option<Notice>,
    pub submitting: bool,
}

impl AuthPage {
    pub fn select(&mut self, view: AuthView) {
        if self.view != view {
            self.status = None;
        }
        self.view = view;
    }

    pub fn submit_login(&mut self) -> Option<Effect> {
        if self.submitting {
            return None;
        }
        match self.login.validate() {
            Ok(credentials) => {
                self.status = None;
                self.submitting = true;
                Some(Effect::Login(credentials))
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
                None
            }
        }
    }

    pub fn submit_register(&mut self) -> Option<Effect> {
        if self.submitting {
            return None;
        }
        match self.register.validate() {
            Ok(registration) => {
                self.status = None;
                self.submitting = true;
                Some(Effect::Register(registration))
            }
            Err(err) => {
                self.status = Some(Notice::error(err.to_string()));
                None
            }
        }
    }

    /// Report a sign-in response; returns the session on success.
    pub fn finish(
        &mut self,
        view: AuthView,
        result: Result<AuthResponse, ApiError>,
    ) -> Option<AuthResponse> {
        self.submitting = false;
        match result {
            Ok(response) => {
                let message = match view {
                    AuthView::Login => "Signed in successfully.",
                    AuthView::Register => "Account created. You are signed in.",
                };
                self.status = Some(Notice::success(message));
                self.login = LoginForm::default();
                self.register = RegisterForm::default();
                self.view = AuthView::Login;
                Some(response)
            }
            Err(err) => {
                log::info!("sign-in rejected: {err}");
                self.status = Some(Notice::error(err.to_string()));
                None
            }
        }
    }
}

impl PageController for AuthPage {
    fn section(&self) -> Section {
        Section::Auth
    }

    fn on_show(&mut self, _state: &ClientState) {
        self.login.password.clear();
        self.register.password.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;

    #[test]
    fn incomplete_login_is_rejected_locally() {
        let mut page = AuthPage::default();
        assert!(page.submit_login().is_none());
        assert!(page.status.as_ref().is_some_and(Notice::is_error));
    }

    #[test]
    fn registration_success_returns_to_login_view() {
        let mut page = AuthPage {
            view: AuthView::Register,
            register: RegisterForm {
                first_name: String::from("Ada"),
                last_name: String::from("Lovelace"),
                email: String::from("ada@example.org"),
                password: String::from("secret"),
            },
            ..AuthPage::default()
        };
        assert!(matches!(page.submit_register(), Some(Effect::Register(_))));
        assert!(page.submit_register().is_none());

        let response = AuthResponse {
            token: String::from("tok"),
            user: User::default(),
        };
        assert!(page.finish(AuthView::Register, Ok(response)).is_some());
        assert_eq!(page.view, AuthView::Login);
        assert_eq!(page.register, RegisterForm::default());
        assert_eq!(
            page.status.map(|notice| notice.message),
            Some(String::from("Account created. You are signed in."))
        );
    }

    #[test]
    fn revisiting_keeps_an_unfinished_sign_in_locked() {
        let mut page = AuthPage {
            submitting: true,
            ..AuthPage::default()
        };
        page.login.email = String::from("ada@example.org");
        page.login.password = String::from("secret");
        page.on_show(&ClientState::default());
        assert!(page.submitting);
        assert!(page.submit_login().is_none());
    }
}
