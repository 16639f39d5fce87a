//! # Seed Data Generator
//!
//! Populates the database with demo print settings and one pricing matrix per
//! book size, for development against a realistic catalogue.
//!
//! ## Usage
//! ```bash
//! # Seed ./folio_dev.db
//! cargo run -p folio-db --bin seed
//!
//! # Specify database path
//! cargo run -p folio-db --bin seed -- --db ./data/folio.db
//!
//! # Overwrite existing settings and matrices
//! cargo run -p folio-db --bin seed -- --force
//! ```
//!
//! ## Generated Data
//! - Book sizes: رقعی, وزیری, خشتی, جیبی (with their dimensions)
//! - Papers: تحریر 70/80/100g, بالک 60/70g, گلاسه 135/170g
//! - Bindings: شومیز, گالینگور, سیمی, منگنه
//! - Extras: one of each billing kind
//!
//! Larger book sizes get proportionally higher page and binding prices.

use folio_core::{
    ConfiguredParameters, ExtraServiceConfig, Money, PageCost, PricingMatrix, PrintType,
    QuantityConstraints, QuantityDiscount, Rate, RestrictionSet,
};
use folio_db::{Database, DbConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::time::Duration;

/// Book sizes with a price factor in percent.
const BOOK_SIZES: &[(&str, i64)] = &[
    ("رقعی (14×20)", 100),
    ("وزیری (17×24)", 130),
    ("خشتی (21×21)", 150),
    ("جیبی (10×17)", 70),
];

/// Paper types: (name, weight, bw page price, color page price).
const PAPERS: &[(&str, u32, i64, i64)] = &[
    ("تحریر", 70, 300, 1_000),
    ("تحریر", 80, 350, 1_100),
    ("تحریر", 100, 420, 1_250),
    ("بالک", 60, 280, 950),
    ("بالک", 70, 320, 1_050),
    ("گلاسه", 135, 900, 1_800),
    ("گلاسه", 170, 1_100, 2_100),
];

/// Bindings: (name, cover weight, per-copy price).
const BINDINGS: &[(&str, u32, i64)] = &[
    ("شومیز", 250, 15_000),
    ("شومیز", 300, 17_000),
    ("گالینگور", 300, 60_000),
    ("سیمی", 250, 12_000),
    ("منگنه", 250, 5_000),
];

fn demo_parameters() -> ConfiguredParameters {
    let mut params = ConfiguredParameters::empty();
    for (name, _) in BOOK_SIZES {
        params = params.with_book_size(*name);
    }
    for (paper, weight, _, _) in PAPERS {
        params = params.with_paper_type(*paper, &[*weight]);
    }
    let mut bindings = BTreeSet::new();
    let mut covers = BTreeSet::new();
    for (binding, cover, _) in BINDINGS {
        if bindings.insert(*binding) {
            params = params.with_binding_type(*binding);
        }
        if covers.insert(*cover) {
            params = params.with_cover_weight(*cover);
        }
    }
    params
        .with_extra_service("سلفون")
        .with_extra_service("لب گرد")
        .with_extra_service("شیرینک")
}

fn scaled(amount: i64, factor: i64) -> Money {
    Money::from_minor(amount * factor / 100)
}

fn demo_matrix(factor: i64) -> PricingMatrix {
    let mut page_costs: BTreeMap<String, BTreeMap<u32, PageCost>> = BTreeMap::new();
    for (paper, weight, bw, color) in PAPERS {
        page_costs.entry(paper.to_string()).or_default().insert(
            *weight,
            PageCost {
                bw: scaled(*bw, factor),
                color: scaled(*color, factor),
            },
        );
    }

    let mut binding_costs: BTreeMap<String, BTreeMap<u32, Money>> = BTreeMap::new();
    for (binding, cover, price) in BINDINGS {
        binding_costs
            .entry(binding.to_string())
            .or_default()
            .insert(*cover, scaled(*price, factor));
    }

    let mut extras_costs = BTreeMap::new();
    extras_costs.insert(
        "سلفون".to_string(),
        ExtraServiceConfig::Fixed {
            price: Money::from_minor(50_000),
        },
    );
    extras_costs.insert(
        "لب گرد".to_string(),
        ExtraServiceConfig::PerUnit {
            price: Money::from_minor(2_000),
        },
    );
    extras_costs.insert(
        "شیرینک".to_string(),
        ExtraServiceConfig::PageBased {
            price: Money::from_minor(100_000),
            step: 4_000,
        },
    );

    // Thin paper cannot take color; staples cannot take a shrink wrap.
    let mut restrictions = RestrictionSet::default();
    restrictions
        .forbidden_print_types
        .entry("بالک".to_string())
        .or_default()
        .insert(60, BTreeSet::from([PrintType::Color]));
    restrictions
        .forbidden_extras
        .insert("منگنه".to_string(), BTreeSet::from(["شیرینک".to_string()]));

    PricingMatrix {
        page_costs,
        binding_costs,
        extras_costs,
        restrictions,
        profit_margin: Rate::from_bps(1_500),
        quantity_discounts: vec![
            QuantityDiscount {
                threshold_quantity: 100,
                discount_fraction: Rate::from_bps(500),
            },
            QuantityDiscount {
                threshold_quantity: 500,
                discount_fraction: Rate::from_bps(1_000),
            },
        ],
        quantity_constraints: QuantityConstraints {
            minimum: 10,
            maximum: 5_000,
            step: 10,
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./folio_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Folio Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./folio_dev.db)");
                println!("  -f, --force        Overwrite existing settings and matrices");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Folio Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.settings().load().await?;
    if !existing.is_empty() && !force {
        println!(
            "⚠ Database already has {} book sizes configured",
            existing.book_size_names().len()
        );
        println!("  Skipping seed. Pass --force to overwrite.");
        return Ok(());
    }

    let params = demo_parameters();
    db.settings().save(&params).await?;
    println!("✓ Saved print settings");

    // No cache: the seeder reads nothing back.
    let matrices = db.matrices(Duration::ZERO);
    for (name, factor) in BOOK_SIZES {
        let key = matrices.save(&params, name, &demo_matrix(*factor)).await?;
        println!("  • {} → matrix saved", key);
    }

    let removed = matrices.cleanup_orphans(&params).await?;
    if removed > 0 {
        println!("✓ Removed {} orphaned matrices", removed);
    }

    let stored = matrices.list_configured_sizes().await?;
    println!();
    println!("✓ {} book sizes priced", stored.len());

    db.close().await;
    Ok(())
}
