//! Receiver details step: who the gift is for and how to reach them.

use mithai_core::{Email, PhoneNumber};
use serde::Serialize;

use crate::validation::{Field, FieldErrors};

/// Maximum length of the gift message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 200;

const MSG_CONTACT_REQUIRED: &str = "Please provide at least WhatsApp or Email";
const MSG_INVALID_PHONE: &str = "Please enter a valid 10-digit mobile number";
const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";

/// Raw receiver form input, as typed.
///
/// The `set_*` methods apply the same input sanitising the form fields do;
/// the fields stay public so a host can also fill them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverForm {
    pub sender_name: String,
    pub receiver_name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl ReceiverForm {
    /// Keep digits only, at most ten of them.
    pub fn set_phone(&mut self, value: &str) {
        self.phone = value
            .chars()
            .filter(char::is_ascii_digit)
            .take(PhoneNumber::DIGITS)
            .collect();
    }

    /// Store the email as typed (trimmed).
    pub fn set_email(&mut self, value: &str) {
        value.trim().clone_into(&mut self.email);
    }

    /// Truncate the message to [`MAX_MESSAGE_CHARS`] characters.
    pub fn set_message(&mut self, value: &str) {
        self.message = value.chars().take(MAX_MESSAGE_CHARS).collect();
    }

    /// Validate the form.
    ///
    /// At least one of phone and email is required. When both are blank only
    /// that combined error is reported, on both fields.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for every field that failed.
    pub fn validate(&self) -> Result<ReceiverDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        let phone_raw = self.phone.trim();
        let email_raw = self.email.trim();

        if phone_raw.is_empty() && email_raw.is_empty() {
            errors.insert(Field::Phone, MSG_CONTACT_REQUIRED);
            errors.insert(Field::Email, MSG_CONTACT_REQUIRED);
            return Err(errors);
        }

        let phone = if phone_raw.is_empty() {
            None
        } else {
            PhoneNumber::parse(phone_raw)
                .inspect_err(|_| errors.insert(Field::Phone, MSG_INVALID_PHONE))
                .ok()
        };

        let email = if email_raw.is_empty() {
            None
        } else {
            Email::parse(email_raw)
                .inspect_err(|_| errors.insert(Field::Email, MSG_INVALID_EMAIL))
                .ok()
        };

        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            errors.insert(
                Field::Message,
                format!("Message must be at most {MAX_MESSAGE_CHARS} characters"),
            );
        }

        errors.into_result(ReceiverDetails {
            sender_name: non_blank(&self.sender_name),
            receiver_name: non_blank(&self.receiver_name),
            phone,
            email,
            message: non_blank(&self.message),
        })
    }
}

/// Validated contact details for the gift recipient.
///
/// Invariant: at least one of `phone` and `email` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverDetails {
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
    #[serde(rename = "whatsappNumber")]
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
    pub message: Option<String>,
}

impl ReceiverDetails {
    /// Best human-readable label for the recipient.
    #[must_use]
    pub fn recipient_label(&self) -> String {
        self.receiver_name
            .clone()
            .or_else(|| self.email.as_ref().map(ToString::to_string))
            .or_else(|| self.phone.as_ref().map(ToString::to_string))
            .unwrap_or_default()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
