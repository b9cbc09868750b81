//! Simulated payment details and the receipt a successful checkout produces.

use crate::types::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One input on the payment form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentField {
    /// Cardholder first name
    FirstName,
    /// Cardholder last name
    LastName,
    /// Receipt email
    Email,
    /// Card number
    CardNumber,
    /// Card expiry, `MM/YY`
    ExpiryDate,
    /// Card security code
    Cvv,
    /// Billing street address
    Address,
    /// Billing city
    City,
    /// Billing postal code
    ZipCode,
}

impl PaymentField {
    /// Fields that must be filled in before paying
    pub const REQUIRED: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::CardNumber,
        Self::ExpiryDate,
        Self::Cvv,
    ];

    /// Form label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::CardNumber => "Card Number",
            Self::ExpiryDate => "Expiry Date",
            Self::Cvv => "CVV",
            Self::Address => "Address",
            Self::City => "City",
            Self::ZipCode => "ZIP Code",
        }
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user typed into the payment sheet
///
/// No payment is processed. `Debug` output masks the card number and CVV,
/// and serialization leaves both out, since checkout actions are logged and
/// broadcast to observers. A deserialized form has them blank.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentForm {
    /// Cardholder first name
    pub first_name: String,
    /// Cardholder last name
    pub last_name: String,
    /// Receipt email
    pub email: String,
    /// Card number, digits with optional spaces
    #[serde(skip_serializing, default)]
    pub card_number: String,
    /// Card expiry, `MM/YY`
    pub expiry_date: String,
    /// Card security code
    #[serde(skip_serializing, default)]
    pub cvv: String,
    /// Billing street address
    pub address: String,
    /// Billing city
    pub city: String,
    /// Billing postal code
    pub zip_code: String,
}

impl PaymentForm {
    /// Value typed into `field`
    #[must_use]
    pub fn field(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::FirstName => &self.first_name,
            PaymentField::LastName => &self.last_name,
            PaymentField::Email => &self.email,
            PaymentField::CardNumber => &self.card_number,
            PaymentField::ExpiryDate => &self.expiry_date,
            PaymentField::Cvv => &self.cvv,
            PaymentField::Address => &self.address,
            PaymentField::City => &self.city,
            PaymentField::ZipCode => &self.zip_code,
        }
    }

    /// Required fields that are blank, in form order
    #[must_use]
    pub fn missing_fields(&self) -> Vec<PaymentField> {
        PaymentField::REQUIRED
            .into_iter()
            .filter(|field| self.field(*field).trim().is_empty())
            .collect()
    }

    /// Card number reduced to its last four digits, e.g. `•••• 4242`
    #[must_use]
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("•••• {tail}")
    }
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("card_number", &self.masked_card_number())
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"***")
            .field("address", &self.address)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .finish()
    }
}

/// Proof of a completed checkout
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Events that were paid for
    pub event_ids: Vec<EventId>,
    /// Sum of `price * quantity` over the paid lines
    pub total_amount: f64,
    /// When the checkout completed
    pub paid_at: DateTime<Utc>,
}
