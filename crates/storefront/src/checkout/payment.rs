//! Payment step: card or UPI details entered by the sender.
//!
//! Validation is purely syntactic. No card network or UPI handle is ever
//! contacted; see [`super::gateway`] for the mocked processing step.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use mithai_core::PaymentMethod;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::validation::{Field, FieldErrors};

const CARD_DIGITS: usize = 16;
const MAX_CVV_DIGITS: usize = 4;
const MIN_CARD_NAME_LETTERS: usize = 3;

const MSG_CARD_NUMBER: &str = "Please enter a valid 16-digit card number";
const MSG_CARD_NAME: &str = "Please enter the name on card";
const MSG_EXPIRY: &str = "Please enter a valid expiry date (MM/YY)";
const MSG_CVV: &str = "Please enter a valid CVV";
const MSG_UPI: &str = "Please enter a valid UPI ID (e.g., username@upi)";

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("Invalid regex"));
static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})$").expect("Invalid regex"));
static CVV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("Invalid regex"));
static UPI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+$").expect("Invalid regex"));

// =============================================================================
// Raw form input
// =============================================================================

/// Card fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    /// Digits grouped in fours, e.g. `"4111 1111 1111 1111"`.
    pub number: String,
    pub name: String,
    /// `MM/YY`.
    pub expiry: String,
    pub cvv: String,
}

impl CardForm {
    /// Keep digits only (max 16) and group them in fours.
    pub fn set_number(&mut self, value: &str) {
        self.number = format_card_number(value);
    }

    /// Keep ASCII letters and spaces, upper-cased.
    pub fn set_name(&mut self, value: &str) {
        self.name = value
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
            .map(|c| c.to_ascii_uppercase())
            .collect();
    }

    /// Keep digits only and insert `/` after the month.
    pub fn set_expiry(&mut self, value: &str) {
        self.expiry = format_expiry(value);
    }

    /// Keep digits only, at most four.
    pub fn set_cvv(&mut self, value: &str) {
        self.cvv = value
            .chars()
            .filter(char::is_ascii_digit)
            .take(MAX_CVV_DIGITS)
            .collect();
    }
}

/// Raw payment form: the selected method plus the inputs for each method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub method: PaymentMethod,
    pub card: CardForm,
    pub upi_id: String,
}

impl PaymentForm {
    /// A card payment form.
    #[must_use]
    pub const fn card(card: CardForm) -> Self {
        Self {
            method: PaymentMethod::Card,
            card,
            upi_id: String::new(),
        }
    }

    /// A UPI payment form.
    #[must_use]
    pub fn upi(upi_id: &str) -> Self {
        let mut form = Self {
            method: PaymentMethod::Upi,
            ..Self::default()
        };
        form.set_upi_id(upi_id);
        form
    }

    /// Store the UPI id lower-cased.
    pub fn set_upi_id(&mut self, value: &str) {
        self.upi_id = value.trim().to_lowercase();
    }

    /// Validate the inputs for the selected method against `today`.
    ///
    /// Only the selected method's fields are checked.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for every field that failed.
    pub fn validate(&self, today: NaiveDate) -> Result<PaymentDetails, FieldErrors> {
        match self.method {
            PaymentMethod::Card => validate_card(&self.card, today).map(PaymentDetails::Card),
            PaymentMethod::Upi => {
                let mut errors = FieldErrors::new();
                if !UPI_RE.is_match(&self.upi_id) {
                    errors.insert(Field::UpiId, MSG_UPI);
                }
                errors.into_result(PaymentDetails::Upi {
                    upi_id: self.upi_id.clone(),
                })
            }
        }
    }
}

// =============================================================================
// Validated details
// =============================================================================

/// Card expiry month and two-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardExpiry {
    pub month: u32,
    pub year: u32,
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year)
    }
}

/// Validated card details. Number and CVV never appear in `Debug` output.
#[derive(Clone)]
pub struct CardDetails {
    number: SecretString,
    pub name: String,
    pub expiry: CardExpiry,
    cvv: SecretString,
}

impl CardDetails {
    /// Last four digits of the card number, for receipts.
    #[must_use]
    pub fn last4(&self) -> String {
        let digits = self.number.expose_secret();
        digits
            .get(digits.len().saturating_sub(4)..)
            .unwrap_or_default()
            .to_owned()
    }

    /// The bare 16-digit card number.
    #[must_use]
    pub fn number(&self) -> &SecretString {
        &self.number
    }

    /// The card verification value.
    #[must_use]
    pub fn cvv(&self) -> &SecretString {
        &self.cvv
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("name", &self.name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Validated payment data for the selected method.
#[derive(Debug, Clone)]
pub enum PaymentDetails {
    Card(CardDetails),
    Upi { upi_id: String },
}

impl PaymentDetails {
    /// The method these details belong to.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Card(_) => PaymentMethod::Card,
            Self::Upi { .. } => PaymentMethod::Upi,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_card(card: &CardForm, today: NaiveDate) -> Result<CardDetails, FieldErrors> {
    let mut errors = FieldErrors::new();

    let number: String = card.number.chars().filter(|c| !c.is_whitespace()).collect();
    if !CARD_NUMBER_RE.is_match(&number) {
        errors.insert(Field::CardNumber, MSG_CARD_NUMBER);
    }

    let name = card.name.trim();
    let letters = name.chars().filter(char::is_ascii_alphabetic).count();
    let name_ok = letters >= MIN_CARD_NAME_LETTERS
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
    if !name_ok {
        errors.insert(Field::CardName, MSG_CARD_NAME);
    }

    let expiry = parse_expiry(&card.expiry, today);
    if expiry.is_none() {
        errors.insert(Field::Expiry, MSG_EXPIRY);
    }

    if !CVV_RE.is_match(&card.cvv) {
        errors.insert(Field::Cvv, MSG_CVV);
    }

    match expiry {
        Some(expiry) if errors.is_empty() => Ok(CardDetails {
            number: SecretString::from(number),
            name: name.to_owned(),
            expiry,
            cvv: SecretString::from(card.cvv.clone()),
        }),
        _ => Err(errors),
    }
}

/// Parse `MM/YY` and reject months outside 1-12 or dates before `today`'s month.
fn parse_expiry(value: &str, today: NaiveDate) -> Option<CardExpiry> {
    let caps = EXPIRY_RE.captures(value)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let year: u32 = caps.get(2)?.as_str().parse().ok()?;

    if !(1..=12).contains(&month) {
        return None;
    }

    let current_year = u32::try_from(today.year().rem_euclid(100)).ok()?;
    let current_month = today.month();
    if year < current_year || (year == current_year && month < current_month) {
        return None;
    }

    Some(CardExpiry { month, year })
}

/// Digits only, max 16, grouped in fours separated by single spaces.
#[must_use]
pub fn format_card_number(value: &str) -> String {
    let digits: Vec<char> = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(CARD_DIGITS)
        .collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digits only; once two digits are present a `/` follows the month.
#[must_use]
pub fn format_expiry(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() >= 2 {
        let (month, year) = digits.split_at(2);
        format!("{month}/{year}")
    } else {
        digits
    }
}
