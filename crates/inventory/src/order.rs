//! Supplier order requests.
//!
//! Only the message is built here; handing it to a mail client is the
//! caller's business.

use serde::{Deserialize, Serialize};

use crate::car::Car;

/// A preformatted order message addressed to a car's supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl OrderRequest {
    pub const SUBJECT: &'static str = "New car order";

    /// Order message for `car`, with the quantity line left for the sender.
    pub fn for_car(car: &Car) -> Self {
        Self {
            recipient: car.email.trim().to_string(),
            subject: Self::SUBJECT.to_string(),
            body: format!("Car name: {}\nQuantity: ", car.name.trim()),
        }
    }

    /// Order message for `car` with the requested quantity filled in.
    pub fn for_car_with_quantity(car: &Car, quantity: u32) -> Self {
        let mut request = Self::for_car(car);
        request.body.push_str(&quantity.to_string());
        request
    }

    /// `mailto:` address for the recipient.
    pub fn mailto_uri(&self) -> String {
        format!("mailto:{}", self.recipient)
    }
}
