//! Shared utilities: logging, name normalisation.

use tracing::Level;

/// Initialize tracing with env filter. Safe to call once at startup.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Normalize a weapon name for lookup (lowercase, trim).
pub fn normalize_name(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize an enum key for loose parsing: lowercase ASCII alphanumerics only, so
/// "Flame Art", "flame-art" and "FlameArt" compare equal.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_trim_lower() {
        assert_eq!(normalize_name("  Heavy Longsword  "), "heavy longsword");
    }

    #[test]
    fn normalize_key_drops_separators() {
        assert_eq!(normalize_key("Hand-to-Hand Art"), "handtohandart");
        assert_eq!(normalize_key("flame_art"), "flameart");
    }
}
