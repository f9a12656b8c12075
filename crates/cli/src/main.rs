//! `carshop`: command-line shell over the inventory store.
//!
//! # Usage
//!
//! ```bash
//! # Add the sample car and list the inventory
//! carshop seed
//! carshop list --in-stock --sort price --desc
//!
//! # Sell one unit, then order more from the supplier
//! carshop sell 1
//! carshop order 1 --quantity 5
//!
//! # Work against a throwaway database
//! carshop --database :memory: list
//! ```
//!
//! The database defaults to `<data_dir>/carshop/carshop.db`; `CARSHOP_DATABASE`
//! or `--database` override it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use carshop_core::CarId;
use carshop_infra::{InventoryStore, StoreConfig};
use carshop_inventory::{CarField, CarValues};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "carshop")]
#[command(author, version, about = "Car inventory store")]
struct Cli {
    /// Database file, or `:memory:` for a throwaway database
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cars
    List {
        /// Only cars from this supplier
        #[arg(long)]
        supplier: Option<String>,

        /// Only cars whose name contains this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Only cars with at least one unit in stock
        #[arg(long)]
        in_stock: bool,

        /// Sort by column (`id`, `name`, `price`, `quantity`, `supplier`, ...)
        #[arg(long, value_name = "COLUMN")]
        sort: Option<CarField>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one car
    Show {
        id: CarId,

        #[arg(long)]
        json: bool,
    },
    /// Add a car
    Add(FieldArgs),
    /// Change some fields of a car
    Update {
        id: CarId,

        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Sell one unit of a car
    Sell { id: CarId },
    /// Receive more units of a car
    Restock {
        id: CarId,

        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Delete a car
    Delete { id: CarId },
    /// Delete every car
    DeleteAll,
    /// Insert the sample car
    Seed,
    /// Compose an order request for a car's supplier
    Order {
        id: CarId,

        /// Fill in the quantity line
        #[arg(long)]
        quantity: Option<u32>,

        #[arg(long)]
        json: bool,
    },
}

/// Car fields given on the command line; absent flags stay unset.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    price: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i64>,

    #[arg(long)]
    supplier: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    image: Option<String>,
}

impl From<FieldArgs> for CarValues {
    fn from(args: FieldArgs) -> Self {
        CarValues {
            name: args.name,
            price: args.price,
            quantity: args.quantity,
            supplier: args.supplier,
            email: args.email,
            image: args.image,
        }
    }
}

#[tokio::main]
async fn main() {
    carshop_observability::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("command failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = StoreConfig::from_env().context("reading configuration")?;
    if let Some(database) = cli.database.as_deref() {
        config = config
            .with_database(database)
            .context("parsing --database")?;
    }

    let store = InventoryStore::open(&config)
        .await
        .with_context(|| format!("opening inventory database {}", config.database))?;

    match cli.command {
        Commands::List {
            supplier,
            name,
            in_stock,
            sort,
            desc,
            json,
        } => {
            let query = commands::records::ListQuery {
                supplier,
                name,
                in_stock,
                sort,
                desc,
            };
            commands::records::list(&store, query, json).await?;
        }
        Commands::Show { id, json } => commands::records::show(&store, id, json).await?,
        Commands::Add(fields) => commands::records::add(&store, fields.into()).await?,
        Commands::Update { id, fields } => {
            commands::records::update(&store, id, fields.into()).await?;
        }
        Commands::Sell { id } => commands::stock::sell(&store, id).await?,
        Commands::Restock { id, amount } => commands::stock::restock(&store, id, amount).await?,
        Commands::Delete { id } => commands::records::delete(&store, id).await?,
        Commands::DeleteAll => commands::records::delete_all(&store).await?,
        Commands::Seed => commands::records::seed(&store).await?,
        Commands::Order { id, quantity, json } => {
            commands::order::compose(&store, id, quantity, json).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse() {
        let cli = Cli::parse_from([
            "carshop",
            "--database",
            ":memory:",
            "list",
            "--in-stock",
            "--sort",
            "price",
            "--desc",
        ]);
        assert_eq!(cli.database.as_deref(), Some(":memory:"));
        match cli.command {
            Commands::List {
                in_stock,
                sort,
                desc,
                ..
            } => {
                assert!(in_stock);
                assert_eq!(sort, Some(CarField::Price));
                assert!(desc);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn update_keeps_absent_fields_unset() {
        let cli = Cli::parse_from(["carshop", "update", "3", "--price", "-1"]);
        match cli.command {
            Commands::Update { id, fields } => {
                assert_eq!(id, CarId::new(3));
                let values = CarValues::from(fields);
                assert_eq!(values.price, Some(-1));
                assert_eq!(values.len(), 1);
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn bad_id_is_a_usage_error() {
        assert!(Cli::try_parse_from(["carshop", "show", "abc"]).is_err());
    }
}
