//! Record listing and CRUD commands.

use anyhow::Context;
use tracing::info;

use carshop_core::CarId;
use carshop_infra::{CarFilter, InventoryStore, SortOrder};
use carshop_inventory::{CarField, CarValues, NewCar};

use crate::output;

/// Filters and ordering for `carshop list`.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub supplier: Option<String>,
    pub name: Option<String>,
    pub in_stock: bool,
    pub sort: Option<CarField>,
    pub desc: bool,
}

impl ListQuery {
    fn filter(&self) -> CarFilter {
        let mut filter = CarFilter::all();
        if let Some(supplier) = &self.supplier {
            filter = filter.supplier(supplier.clone());
        }
        if let Some(name) = &self.name {
            filter = filter.name_contains(name.clone());
        }
        if self.in_stock {
            filter = filter.in_stock();
        }
        filter
    }

    fn order(&self) -> Option<SortOrder> {
        self.sort.map(|field| {
            if self.desc {
                SortOrder::desc(field)
            } else {
                SortOrder::asc(field)
            }
        })
    }
}

pub async fn list(store: &InventoryStore, query: ListQuery, json: bool) -> anyhow::Result<()> {
    let cars = store
        .list(Some(&query.filter()), query.order())
        .await
        .context("listing cars")?;

    if json {
        output::print_json(&cars)
    } else {
        output::print_table(&cars);
        Ok(())
    }
}

pub async fn show(store: &InventoryStore, id: CarId, json: bool) -> anyhow::Result<()> {
    let car = store
        .get(id)
        .await
        .with_context(|| format!("loading car {id}"))?;

    if json {
        output::print_json(&car)
    } else {
        output::print_details(&car);
        Ok(())
    }
}

pub async fn add(store: &InventoryStore, values: CarValues) -> anyhow::Result<()> {
    let id = store.insert(values).await.context("adding car")?;
    println!("{id}");
    Ok(())
}

pub async fn update(store: &InventoryStore, id: CarId, values: CarValues) -> anyhow::Result<()> {
    if values.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag");
    }

    let rows = store
        .update(id, values)
        .await
        .with_context(|| format!("updating car {id}"))?;
    if rows == 0 {
        anyhow::bail!("no car with id {id}");
    }

    info!(car_id = %id, "car updated");
    Ok(())
}

pub async fn delete(store: &InventoryStore, id: CarId) -> anyhow::Result<()> {
    let rows = store
        .delete_one(id)
        .await
        .with_context(|| format!("deleting car {id}"))?;
    if rows == 0 {
        anyhow::bail!("no car with id {id}");
    }
    Ok(())
}

pub async fn delete_all(store: &InventoryStore) -> anyhow::Result<()> {
    let rows = store.delete_all().await.context("deleting all cars")?;
    println!("{rows}");
    Ok(())
}

/// Insert the sample record.
pub async fn seed(store: &InventoryStore) -> anyhow::Result<()> {
    let id = store
        .insert(NewCar::demo().into())
        .await
        .context("inserting sample car")?;
    println!("{id}");
    Ok(())
}
