// Logs structurés via tracing
// Les logs `log` d'actix-web (middleware Logger) passent par le même subscriber

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "caisse_backend=info,sea_orm=warn,actix_web=info";

/// Installe le subscriber global. Filtre surchargeable via RUST_LOG,
/// par exemple RUST_LOG=caisse_backend=debug
pub fn init() {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
