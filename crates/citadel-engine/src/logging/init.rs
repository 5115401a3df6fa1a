use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` sets one.
///
/// wgpu is chatty at info level during device creation.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax (e.g. "citadel_engine=trace,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.parse_filters(DEFAULT_FILTER),
        };

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
