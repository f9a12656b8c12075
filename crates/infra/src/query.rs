//! Filter and sort criteria for reads and bulk writes.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use carshop_core::CarId;
use carshop_inventory::{Car, CarField};

/// Filter criteria; every present field must match (logical AND).
///
/// The default filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarFilter {
    /// Exact id.
    pub id: Option<CarId>,
    /// Case-insensitive (ASCII) substring of the name.
    pub name_contains: Option<String>,
    /// Exact supplier.
    pub supplier: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
}

impl CarFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: CarId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn price_between(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.min_quantity = Some(1);
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.max_quantity = Some(0);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluate the filter against an already loaded record.
    pub fn matches(&self, car: &Car) -> bool {
        self.id.is_none_or(|id| car.id == id)
            && self.name_contains.as_deref().is_none_or(|needle| {
                car.name
                    .to_ascii_lowercase()
                    .contains(&needle.to_ascii_lowercase())
            })
            && self.supplier.as_deref().is_none_or(|s| car.supplier == s)
            && self.min_price.is_none_or(|min| car.price >= min)
            && self.max_price.is_none_or(|max| car.price <= max)
            && self.min_quantity.is_none_or(|min| car.quantity >= min)
            && self.max_quantity.is_none_or(|max| car.quantity <= max)
    }

    /// Append a `WHERE` clause (if any criteria are present).
    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        let mut first = true;

        if let Some(id) = self.id {
            conjunction(qb, &mut first);
            qb.push("_id = ").push_bind(id.get());
        }
        if let Some(needle) = &self.name_contains {
            conjunction(qb, &mut first);
            // instr() keeps `%` and `_` in the needle literal, unlike LIKE.
            qb.push("instr(lower(name), lower(")
                .push_bind(needle.clone())
                .push(")) > 0");
        }
        if let Some(supplier) = &self.supplier {
            conjunction(qb, &mut first);
            qb.push("supplier = ").push_bind(supplier.clone());
        }
        if let Some(min) = self.min_price {
            conjunction(qb, &mut first);
            qb.push("price >= ").push_bind(min);
        }
        if let Some(max) = self.max_price {
            conjunction(qb, &mut first);
            qb.push("price <= ").push_bind(max);
        }
        if let Some(min) = self.min_quantity {
            conjunction(qb, &mut first);
            qb.push("quantity >= ").push_bind(min);
        }
        if let Some(max) = self.max_quantity {
            conjunction(qb, &mut first);
            qb.push("quantity <= ").push_bind(max);
        }
    }
}

fn conjunction(qb: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    qb.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Sort by one column; ties are broken by ascending id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: CarField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: CarField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: CarField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Compare two records the way the SQL `ORDER BY` does.
    pub fn compare(&self, a: &Car, b: &Car) -> Ordering {
        let primary = match self.field {
            CarField::Id => a.id.cmp(&b.id),
            CarField::Name => a.name.cmp(&b.name),
            CarField::Price => a.price.cmp(&b.price),
            CarField::Quantity => a.quantity.cmp(&b.quantity),
            CarField::Supplier => a.supplier.cmp(&b.supplier),
            CarField::Email => a.email.cmp(&b.email),
            CarField::Image => a.image.cmp(&b.image),
        };
        let primary = match self.direction {
            Direction::Asc => primary,
            Direction::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Append `ORDER BY`; `None` sorts by id.
    pub(crate) fn push_order_by(order: Option<&SortOrder>, qb: &mut QueryBuilder<'_, Sqlite>) {
        match order {
            Some(order) if order.field != CarField::Id => {
                qb.push(" ORDER BY ")
                    .push(order.field.column())
                    .push(" ")
                    .push(order.direction.sql())
                    .push(", _id ASC");
            }
            Some(order) => {
                qb.push(" ORDER BY _id ").push(order.direction.sql());
            }
            None => {
                qb.push(" ORDER BY _id ASC");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(id: i64, name: &str, price: i64, quantity: i64) -> Car {
        Car {
            id: CarId::new(id),
            name: name.to_string(),
            price,
            quantity,
            supplier: "Fast Car Store".to_string(),
            email: "order@fastcarstore.com".to_string(),
            image: "res://car_default".to_string(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(CarFilter::all().is_empty());
        assert!(CarFilter::all().matches(&car(1, "A", 0, 0)));
    }

    #[test]
    fn criteria_are_combined() {
        let filter = CarFilter::all().name_contains("MUST").in_stock();
        assert!(filter.matches(&car(1, "Ford Mustang", 1, 3)));
        assert!(!filter.matches(&car(2, "Ford Mustang", 1, 0)));
        assert!(!filter.matches(&car(3, "Fiat 500", 1, 3)));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filter = CarFilter::all().price_between(Some(10), Some(20));
        assert!(filter.matches(&car(1, "A", 10, 0)));
        assert!(filter.matches(&car(1, "A", 20, 0)));
        assert!(!filter.matches(&car(1, "A", 21, 0)));
    }

    #[test]
    fn where_clause_uses_bound_parameters() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM cars");
        CarFilter::by_id(CarId::new(3)).supplier("x").push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT * FROM cars WHERE _id = ? AND supplier = ?");
    }

    #[test]
    fn empty_filter_adds_no_where_clause() {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM cars");
        CarFilter::all().push_where(&mut qb);
        assert_eq!(qb.sql(), "DELETE FROM cars");
    }

    #[test]
    fn order_by_breaks_ties_on_id() {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM cars");
        SortOrder::push_order_by(Some(&SortOrder::desc(CarField::Price)), &mut qb);
        assert_eq!(qb.sql(), "SELECT * FROM cars ORDER BY price DESC, _id ASC");

        let a = car(1, "A", 5, 0);
        let b = car(2, "B", 5, 0);
        let c = car(3, "C", 9, 0);
        let mut cars = vec![a.clone(), b.clone(), c.clone()];
        cars.sort_by(|x, y| SortOrder::desc(CarField::Price).compare(x, y));
        assert_eq!(cars, vec![c, a, b]);
    }
}
