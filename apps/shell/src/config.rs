use config::{Config, Environment, File};
use regkit::domain::config::FormConfig;
use serde::Deserialize;
use tracing::info;

/// Shell settings: an optional `regkit.toml` next to the binary, overlaid
/// with `REGKIT__`-prefixed environment variables. Nested keys use double
/// underscores (`REGKIT__FORM__EMAIL_DEBOUNCE_MS` maps to
/// `form.email_debounce_ms`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ShellConfig {
    pub(crate) form: FormConfig,
}

pub(crate) fn load_config() -> Result<ShellConfig, config::ConfigError> {
    info!("Loading config overrides from regkit.toml and REGKIT__* env");
    Config::builder()
        .add_source(File::with_name("regkit").required(false))
        .add_source(
            Environment::with_prefix("REGKIT")
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()?
        .try_deserialize()
}
