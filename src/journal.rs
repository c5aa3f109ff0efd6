// src/journal.rs
//
// Journal sur stderr (stdout reste réservé au résultat).
// Filtrage par RUST_LOG, `warn` par défaut : seul le repli d’unité par suffixe
// est visible sans réglage.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub fn init_journal() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
