//! Field sets accepted by the store and their validation.
//!
//! [`CarValues`] is the loose request shape: every field optional, nothing
//! checked. It becomes a [`NewCar`] (insert) or a [`CarPatch`] (update) only
//! through validation, so the store never sees an unchecked value.

use serde::{Deserialize, Serialize};

use carshop_core::{DomainError, DomainResult};

use crate::car::{Car, CarField};

/// Untyped field set, keyed like the table columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CarValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Number of fields present.
    pub fn len(&self) -> usize {
        [
            self.name.is_some(),
            self.price.is_some(),
            self.quantity.is_some(),
            self.supplier.is_some(),
            self.email.is_some(),
            self.image.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate a complete record for insertion.
    ///
    /// Fields are checked in column order; the first missing or invalid one is
    /// reported.
    pub fn into_new_car(self) -> DomainResult<NewCar> {
        let name = required_text(CarField::Name, self.name)?;
        let price = required_amount(CarField::Price, self.price)?;
        let quantity = required_amount(CarField::Quantity, self.quantity)?;
        let supplier = required_text(CarField::Supplier, self.supplier)?;
        let email = required_text(CarField::Email, self.email)?;
        let image = required_text(CarField::Image, self.image)?;

        Ok(NewCar {
            name,
            price,
            quantity,
            supplier,
            email,
            image,
        })
    }

    /// Validate a partial update. Absent fields stay untouched.
    pub fn into_patch(self) -> DomainResult<CarPatch> {
        Ok(CarPatch {
            name: self.name.map(|v| checked_text(CarField::Name, v)).transpose()?,
            price: self.price.map(|v| checked_amount(CarField::Price, v)).transpose()?,
            quantity: self
                .quantity
                .map(|v| checked_amount(CarField::Quantity, v))
                .transpose()?,
            supplier: self
                .supplier
                .map(|v| checked_text(CarField::Supplier, v))
                .transpose()?,
            email: self.email.map(|v| checked_text(CarField::Email, v)).transpose()?,
            image: self.image.map(|v| checked_text(CarField::Image, v)).transpose()?,
        })
    }
}

fn required_text(field: CarField, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) => checked_text(field, v),
        None => Err(DomainError::invalid_argument(field.as_str(), "is required")),
    }
}

fn required_amount(field: CarField, value: Option<i64>) -> DomainResult<i64> {
    match value {
        Some(v) => checked_amount(field, v),
        None => Err(DomainError::invalid_argument(field.as_str(), "is required")),
    }
}

fn checked_text(field: CarField, value: String) -> DomainResult<String> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_argument(field.as_str(), "cannot be empty"));
    }
    Ok(value)
}

fn checked_amount(field: CarField, value: i64) -> DomainResult<i64> {
    if value < 0 {
        return Err(DomainError::invalid_argument(field.as_str(), "cannot be negative"));
    }
    Ok(value)
}

/// A complete, validated record ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CarValues", into = "CarValues")]
pub struct NewCar {
    name: String,
    price: i64,
    quantity: i64,
    supplier: String,
    email: String,
    image: String,
}

impl NewCar {
    /// The sample record used to seed an empty inventory.
    pub fn demo() -> Self {
        Self {
            name: "Ford Mustang".to_string(),
            price: 25845,
            quantity: 50200,
            supplier: "Fast Car Store".to_string(),
            email: "order@fastcarstore.com".to_string(),
            image: "res://car_default".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Attach the store-assigned id.
    pub fn into_car(self, id: carshop_core::CarId) -> Car {
        Car {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            supplier: self.supplier,
            email: self.email,
            image: self.image,
        }
    }
}

impl TryFrom<CarValues> for NewCar {
    type Error = DomainError;

    fn try_from(values: CarValues) -> Result<Self, Self::Error> {
        values.into_new_car()
    }
}

impl From<NewCar> for CarValues {
    fn from(car: NewCar) -> Self {
        CarValues {
            name: Some(car.name),
            price: Some(car.price),
            quantity: Some(car.quantity),
            supplier: Some(car.supplier),
            email: Some(car.email),
            image: Some(car.image),
        }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarPatch {
    name: Option<String>,
    price: Option<i64>,
    quantity: Option<i64>,
    supplier: Option<String>,
    email: Option<String>,
    image: Option<String>,
}

impl CarPatch {
    /// Patch that only sets the quantity (stock operations).
    pub fn quantity_only(quantity: i64) -> DomainResult<Self> {
        Ok(Self {
            quantity: Some(checked_amount(CarField::Quantity, quantity)?),
            ..Self::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.supplier.is_none()
            && self.email.is_none()
            && self.image.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Overwrite the present fields on `car`.
    pub fn apply_to(&self, car: &mut Car) {
        if let Some(name) = &self.name {
            car.name = name.clone();
        }
        if let Some(price) = self.price {
            car.price = price;
        }
        if let Some(quantity) = self.quantity {
            car.quantity = quantity;
        }
        if let Some(supplier) = &self.supplier {
            car.supplier = supplier.clone();
        }
        if let Some(email) = &self.email {
            car.email = email.clone();
        }
        if let Some(image) = &self.image {
            car.image = image.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CarValues {
        NewCar::demo().into()
    }

    #[test]
    fn complete_values_validate() {
        let car = complete().into_new_car().unwrap();
        assert_eq!(car, NewCar::demo());
        assert_eq!(car.name(), "Ford Mustang");
        assert_eq!(car.quantity(), 50200);
    }

    #[test]
    fn missing_field_is_named() {
        let mut values = complete();
        values.supplier = None;
        let err = values.into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("supplier"));
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = complete().name("   ").into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("name"));

        let err = complete().image("").into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("image"));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = complete().price(-1).into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("price"));

        let err = complete().quantity(-1).into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("quantity"));
    }

    #[test]
    fn zero_amounts_are_valid() {
        let car = complete().price(0).quantity(0).into_new_car().unwrap();
        assert_eq!(car.price(), 0);
        assert_eq!(car.quantity(), 0);
    }

    #[test]
    fn first_invalid_field_wins() {
        let err = CarValues::new().price(-5).into_new_car().unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn patch_keeps_only_present_fields() {
        let patch = CarValues::new().quantity(5).into_patch().unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.quantity(), Some(5));
        assert_eq!(patch.name(), None);

        let mut car = NewCar::demo().into_car(carshop_core::CarId::new(1));
        let before = car.clone();
        patch.apply_to(&mut car);
        assert_eq!(car.quantity, 5);
        assert_eq!(car.name, before.name);
        assert_eq!(car.price, before.price);
    }

    #[test]
    fn patch_validates_present_fields() {
        let err = CarValues::new().quantity(-1).into_patch().unwrap_err();
        assert_eq!(err.field(), Some("quantity"));

        let err = CarValues::new().email(" ").into_patch().unwrap_err();
        assert_eq!(err.field(), Some("email"));
    }

    #[test]
    fn empty_values_give_empty_patch() {
        assert!(CarValues::new().is_empty());
        assert!(CarValues::new().into_patch().unwrap().is_empty());
    }

    #[test]
    fn new_car_deserialization_is_validated() {
        let ok: NewCar = serde_json::from_str(
            r#"{"name":"Fiat 500","price":100,"quantity":1,"supplier":"S","email":"e@x","image":"file:///a.jpg"}"#,
        )
        .unwrap();
        assert_eq!(ok.name(), "Fiat 500");

        let bad = serde_json::from_str::<NewCar>(r#"{"name":"Fiat 500","price":-3}"#);
        assert!(bad.is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank text and non-negative amounts form a valid record.
            #[test]
            fn valid_inputs_always_accepted(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                price in 0i64..=i64::MAX,
                quantity in 0i64..=1_000_000,
                supplier in "[A-Za-z][A-Za-z ]{0,20}",
            ) {
                let car = complete()
                    .name(name.clone())
                    .price(price)
                    .quantity(quantity)
                    .supplier(supplier)
                    .into_new_car();
                prop_assert!(car.is_ok());
                let car = car.unwrap();
                prop_assert_eq!(car.name(), name.as_str());
            }

            /// Property: a negative amount is rejected on insert and on update.
            #[test]
            fn negative_amounts_never_accepted(amount in i64::MIN..0) {
                prop_assert!(complete().price(amount).into_new_car().is_err());
                prop_assert!(complete().quantity(amount).into_new_car().is_err());
                prop_assert!(CarValues::new().price(amount).into_patch().is_err());
                prop_assert!(CarValues::new().quantity(amount).into_patch().is_err());
            }

            /// Property: whitespace-only text is never accepted.
            #[test]
            fn blank_text_never_accepted(blank in "[ \t]{0,8}") {
                let err = complete().email(blank.clone()).into_new_car().unwrap_err();
                prop_assert_eq!(err.field(), Some("email"));
                prop_assert!(CarValues::new().name(blank).into_patch().is_err());
            }
        }
    }
}
