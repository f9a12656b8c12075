//! Stdout rendering. Logs go to stderr, so stdout carries only results.

use serde::Serialize;

use carshop_inventory::Car;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table(cars: &[Car]) {
    println!(
        "{:>5}  {:<24}  {:>10}  {:>8}  {}",
        "ID", "NAME", "PRICE", "QTY", "SUPPLIER"
    );
    for car in cars {
        println!("{}", table_row(car));
    }
}

pub fn print_details(car: &Car) {
    println!("id:       {}", car.id);
    println!("name:     {}", car.name);
    println!("price:    {}", car.price);
    println!("quantity: {}", car.quantity);
    println!("supplier: {}", car.supplier);
    println!("email:    {}", car.email);
    println!("image:    {}", car.image);
}

fn table_row(car: &Car) -> String {
    format!(
        "{:>5}  {:<24}  {:>10}  {:>8}  {}",
        car.id,
        truncate(&car.name, 24),
        car.price,
        car.quantity,
        car.supplier
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
