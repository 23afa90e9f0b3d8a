// ============================================================================
// Basic Usage Example
// ============================================================================
//
// Run with `cargo run --example basic_usage --features logging` to see the
// catalog's tracing output.

use unit_engine::constants;
use unit_engine::engine::batch;
use unit_engine::formatter::{FormatStyle, QuantityFormatter};
use unit_engine::prelude::*;
use std::sync::Arc;

fn main() {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Unit Engine Example ===\n");

    let catalog = UnitCatalogBuilder::new()
        .define("furlong", "220 yard")
        .define_with_symbol("fortnight", "ftn", "14 day")
        .build(Arc::new(LoggingEventHandler))
        .expect("builtin configuration is valid");

    // Parsing and conversion
    println!("--- Conversion ---");
    let distance = catalog.quantity(1.0, "km").unwrap();
    println!("{} = {:.6}", distance, catalog.convert(&distance, "mi").unwrap());

    let freezing = catalog.quantity(0.0, "degC").unwrap();
    println!("{} = {}", freezing, freezing.to("degF", &catalog).unwrap());
    println!("{} = {}", freezing, freezing.to("K", &catalog).unwrap());

    // Arithmetic
    println!("\n--- Arithmetic ---");
    let time = catalog.quantity(10.0, "s").unwrap();
    let run = catalog.quantity(100.0, "m").unwrap();
    println!("{} / {} = {}", run, time, (&run / &time).unwrap());

    let mass = catalog.quantity(2.0, "kg").unwrap();
    let accel = catalog.quantity(9.80665, "m/s^2").unwrap();
    println!("{} * {} = {}", mass, accel, (&mass * &accel).unwrap());

    match &run + &time {
        Ok(sum) => println!("unexpected sum {}", sum),
        Err(err) => println!("{} + {} -> error: {}", run, time, err),
    }

    // Typos get suggestions
    if let Err(err) = catalog.parse("metr") {
        println!("\n{}", err);
    }

    // Custom units
    println!("\n--- Custom Units ---");
    let speed = catalog.quantity(1.0, "furlong/ftn").unwrap();
    println!("{} = {:.8}", speed, speed.to("m/s", &catalog).unwrap());

    // Arrays and batch helpers
    println!("\n--- Arrays ---");
    let temps = catalog.quantity(vec![-40.0, 0.0, 37.0, 100.0], "celsius").unwrap();
    println!("{} = {}", temps, temps.to("fahrenheit", &catalog).unwrap());
    println!("mean: {}", temps.mean().unwrap());

    let legs = vec![
        catalog.quantity(5.0, "km").unwrap(),
        catalog.quantity(3.1, "mi").unwrap(),
        catalog.quantity(2.0, "furlong").unwrap(),
    ];
    println!("total: {:.3}", batch::sum(&legs).unwrap());

    // Constants and formatting
    println!("\n--- Constants ---");
    let compact = QuantityFormatter::new(FormatStyle::Compact)
        .with_precision(5)
        .with_catalog(&catalog);
    for name in ["speed_of_light", "planck", "boltzmann", "standard_gravity"] {
        let constant = constants::get(name, &catalog).unwrap();
        println!("{:>18}: {}", name, compact.format(&constant));
    }

    let latex = QuantityFormatter::new(FormatStyle::Latex).with_catalog(&catalog);
    println!("{:>18}: {}", "latex", latex.format(&accel));

    // Measurements
    println!("\n--- Uncertainty ---");
    let distance = UncertainQuantity::new(catalog.quantity(100.0, "m").unwrap(), 3.0).unwrap();
    let time = UncertainQuantity::new(catalog.quantity(20.0, "s").unwrap(), 0.8).unwrap();
    println!("{} / {} = {}", distance, time, (&distance / &time).unwrap());

    let disk = catalog.add_binary_prefixes("byte").unwrap();
    println!("{} registered; 1 GiB = {} bit", disk.len(), catalog.convert_value(1.0, "GiB", "bit").unwrap());

    // Unit system context
    println!("\n--- Preferred Units ---");
    catalog.set_default_system(UnitSystem::Imperial);
    println!("{} = {}", accel, accel.to_preferred(&catalog).unwrap());

    let stats = catalog.cache_stats();
    println!(
        "\nCache: {} hits, {} misses, {} entries ({:.0}% hit rate)",
        stats.hits,
        stats.misses,
        stats.entries,
        stats.hit_rate() * 100.0
    );
}
