/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Motion Configuration ===\n");

    println!("Scheduler Settings:");
    println!("  Interval (ms): {}", config.scheduler.interval_ms);
    println!();

    println!("Transition Settings:");
    println!("  Native: {:?}", config.transitions.native);
    println!("  Opacity Filter Step: {:?}", config.transitions.opacity_filter_step);
    println!();

    println!("Demo Settings:");
    println!("  Duration (ms): {}", config.demo.duration_ms);
    println!("  Distance: {}", config.demo.distance);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
