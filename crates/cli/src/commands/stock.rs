use anyhow::Context;

use carshop_core::CarId;
use carshop_infra::InventoryStore;

pub async fn sell(store: &InventoryStore, id: CarId) -> anyhow::Result<()> {
    let quantity = store
        .sell_one(id)
        .await
        .with_context(|| format!("selling car {id}"))?;
    println!("{quantity}");
    Ok(())
}

pub async fn restock(store: &InventoryStore, id: CarId, amount: i64) -> anyhow::Result<()> {
    let quantity = store
        .restock(id, amount)
        .await
        .with_context(|| format!("restocking car {id}"))?;
    println!("{quantity}");
    Ok(())
}
