//! Shipping address.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};

/// Where an order ships to. All four fields are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
}

impl ShippingAddress {
    /// Create a new address.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// Check that every field is filled in.
    ///
    /// Reports the first blank field in form order.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let fields = [
            ("address", &self.address),
            ("city", &self.city),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.address, self.city, self.postal_code, self.country
        )
    }
}
