use crate::config::{AppConfig, config_path};

pub fn run(config: &AppConfig) {
    match config_path() {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not created yet)", path.display()),
        None => println!("# Config file: unavailable (using defaults)"),
    }
    println!();

    for line in config.to_display_lines() {
        println!("{}", line);
    }
}
