// Agent identity baked in at build time

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `hostwatch/<version>`, sent as the User-Agent on pushed snapshots.
pub fn user_agent() -> String {
    format!("{NAME}/{VERSION}")
}
