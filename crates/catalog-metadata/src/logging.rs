//! Tracing subscriber setup for the catalog crates

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log targets of the catalog crates.
pub const CATALOG_TARGETS: [&str; 4] = [
    "catalog_fs",
    "catalog_versions",
    "catalog_backend",
    "catalog_metadata",
];

/// Filter directives logging the catalog crates at `level` and everything
/// else at `warn`.
pub fn catalog_filter(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CATALOG_TARGETS.iter().map(|t| format!("{}={}", t, level)));
    directives.join(",")
}

/// Install a global subscriber with the catalog crates at `info`.
///
/// `RUST_LOG` overrides the default filter. Fails if a global subscriber is
/// already installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with_level("info")
}

/// Like [`init`], with the catalog crates at `level` unless `RUST_LOG` is set.
pub fn init_with_level(level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(catalog_filter(level))?,
    };

    let fmt_layer = fmt::layer().with_target(true).compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_scopes_level_to_catalog_crates() {
        assert_eq!(
            catalog_filter("debug"),
            "warn,catalog_fs=debug,catalog_versions=debug,catalog_backend=debug,catalog_metadata=debug"
        );
        assert!(EnvFilter::try_new(catalog_filter("trace")).is_ok());
    }

    #[test]
    fn second_init_fails_without_panicking() {
        let _ = init();
        assert!(init_with_level("debug").is_err());
        tracing::info!("logging initialised");
    }
}
