/// Example program to print the loaded configuration
///
/// Run with: cargo run -p tabzoom-config --example print_config

fn main() {
    // Load configuration from tabzoom.toml
    let config = tabzoom_config::TabzoomConfig::load();

    println!("=== Tabzoom Configuration ===\n");

    println!("Transition Settings:");
    println!("  Forward: {:?}", config.transition.forward);
    println!("  Backward: {:?}", config.transition.backward);
    println!("  Interactive Cancel: {:?}", config.transition.interactive_cancel);
    println!("  Interactive Commit: {:?}", config.transition.interactive_commit);
    println!(
        "  Corner Radii: {} -> {}",
        config.transition.small_corner_radius, config.transition.full_corner_radius
    );
    println!();

    println!("Gesture Settings:");
    println!("  Commit Displacement: {}", config.gesture.commit_displacement);
    println!("  Touch Slop: {}", config.gesture.touch_slop);
    println!("  Dismiss Direction: {:?}", config.gesture.dismiss_direction);
    println!();

    println!("Shell Settings:");
    println!(
        "  Screen: {}x{} (safe top {})",
        config.shell.screen_width, config.shell.screen_height, config.shell.safe_area_top_inset
    );
    println!("  New Tab URL: {}", config.shell.new_tab_url);
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
