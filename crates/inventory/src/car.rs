use serde::{Deserialize, Serialize};

use carshop_core::{CarId, DomainError, DomainResult, Entity};

/// Columns of the `cars` table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarField {
    Id,
    Name,
    Price,
    Quantity,
    Supplier,
    Email,
    Image,
}

impl CarField {
    pub const ALL: [CarField; 7] = [
        CarField::Id,
        CarField::Name,
        CarField::Price,
        CarField::Quantity,
        CarField::Supplier,
        CarField::Email,
        CarField::Image,
    ];

    /// Column name in the persisted layout.
    pub fn column(&self) -> &'static str {
        match self {
            CarField::Id => "_id",
            CarField::Name => "name",
            CarField::Price => "price",
            CarField::Quantity => "quantity",
            CarField::Supplier => "supplier",
            CarField::Email => "email",
            CarField::Image => "image",
        }
    }

    /// Field name as reported in validation errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarField::Id => "id",
            other => other.column(),
        }
    }
}

impl core::fmt::Display for CarField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CarField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CarField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted || f.column() == wanted)
            .ok_or_else(|| DomainError::invalid_argument("field", format!("unknown field `{s}`")))
    }
}

/// A persisted car record (read model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub supplier: String,
    pub email: String,
    /// URI of the car picture (camera capture, file picker or bundled resource).
    pub image: String,
}

impl Car {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Quantity left after selling one unit.
    pub fn quantity_after_sale(&self) -> DomainResult<i64> {
        if self.quantity <= 0 {
            return Err(DomainError::out_of_stock(format!("car {}", self.id)));
        }
        Ok(self.quantity - 1)
    }

    /// Quantity after receiving `amount` more units.
    pub fn quantity_after_restock(&self, amount: i64) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::invalid_argument(
                CarField::Quantity.as_str(),
                "restock amount must be positive",
            ));
        }
        self.quantity.checked_add(amount).ok_or_else(|| {
            DomainError::invalid_argument(CarField::Quantity.as_str(), "quantity overflow")
        })
    }
}

impl Entity for Car {
    type Id = CarId;

    fn id(&self) -> CarId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(quantity: i64) -> Car {
        Car {
            id: CarId::new(1),
            name: "Ford Mustang".to_string(),
            price: 25845,
            quantity,
            supplier: "Fast Car Store".to_string(),
            email: "order@fastcarstore.com".to_string(),
            image: "res://car_default".to_string(),
        }
    }

    #[test]
    fn sale_decrements_quantity() {
        assert_eq!(car(3).quantity_after_sale().unwrap(), 2);
        assert_eq!(car(1).quantity_after_sale().unwrap(), 0);
    }

    #[test]
    fn sale_rejected_when_out_of_stock() {
        let err = car(0).quantity_after_sale().unwrap_err();
        assert!(matches!(err, DomainError::OutOfStock(_)));
        assert!(!car(0).in_stock());
    }

    #[test]
    fn restock_requires_positive_amount() {
        assert_eq!(car(2).quantity_after_restock(5).unwrap(), 7);
        let err = car(2).quantity_after_restock(0).unwrap_err();
        assert_eq!(err.field(), Some("quantity"));
        assert!(car(i64::MAX).quantity_after_restock(1).is_err());
    }

    #[test]
    fn field_names_parse_from_name_or_column() {
        assert_eq!("price".parse::<CarField>().unwrap(), CarField::Price);
        assert_eq!("_id".parse::<CarField>().unwrap(), CarField::Id);
        assert_eq!("ID".parse::<CarField>().unwrap(), CarField::Id);
        assert!("color".parse::<CarField>().is_err());
    }
}
