//! Screen objects for the Ohouse app
//!
//! Each screen owns the locators and multi-step interactions of one app
//! screen and is built on the [`Ui`](crate::wait::Ui) wait primitives.

mod email_login;
mod home;
mod intro;
mod popup;

pub use email_login::{
    EmailLoginScreen, LoginAttempt, EMAIL_FIELD_LABEL, LOGIN_LIMITED_TEXT, PASSWORD_FIELD_LABEL,
};
pub use home::{HomeLandmark, HomeScreen};
pub use intro::{IntroScreen, EMAIL_LOGIN_LABEL};
pub use popup::{PopupHandler, AUTOFILL_SAVE_NO_ID, BOTTOM_SHEET_MIN_BUTTONS};
