use anyhow::Context;

use carshop_core::CarId;
use carshop_infra::InventoryStore;
use carshop_inventory::OrderRequest;

use crate::output;

/// Print the order message for a car's supplier.
pub async fn compose(
    store: &InventoryStore,
    id: CarId,
    quantity: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let car = store
        .get(id)
        .await
        .with_context(|| format!("loading car {id}"))?;

    let request = match quantity {
        Some(quantity) => OrderRequest::for_car_with_quantity(&car, quantity),
        None => OrderRequest::for_car(&car),
    };

    if json {
        return output::print_json(&request);
    }

    println!("To: {}", request.mailto_uri());
    println!("Subject: {}", request.subject);
    println!();
    println!("{}", request.body);
    Ok(())
}
