//! Demo shell: drives one scripted registration session against the form
//! controller and logs what the model reports along the way.

mod config;

use crate::config::load_config;
use anyhow::Context;
use regkit::CustomerForm;
use regkit::domain::config::FormConfig;
use regkit::registration::EMAIL_PATH;
use regkit_logger::Logger;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _logger = Logger::builder(env!("CARGO_PKG_NAME")).init()?;

    let cfg = load_config().context("Critical: Configuration is malformed")?;

    run_session(&cfg.form).await?;

    Ok(())
}

async fn run_session(config: &FormConfig) -> anyhow::Result<()> {
    let form = CustomerForm::initialize(config);
    info!(valid = form.is_valid(), state = %form.state(), "session started");

    // A user typo in the email field; the message appears only after the
    // field has been quiet for the configured window.
    form.set_value(EMAIL_PATH, "jack@torchwood")?;
    tokio::time::sleep(config.email_debounce() + std::time::Duration::from_millis(50)).await;
    info!(message = %form.email_message(), "after debounce");

    // Text notification makes the phone mandatory.
    form.set_value("notification", "text")?;
    let phone_errors = form.errors_at("phone")?;
    info!(?phone_errors, "text notification selected");
    form.set_value("phone", "029-2044-0400")?;

    form.populate_test_data()?;
    let extra = form.add_address()?;
    form.set_value(&format!("addresses.{extra}.street1"), "Roald Dahl Plass")?;
    form.disable_address(1)?;

    let snapshot = form.save();
    info!(valid = form.is_valid(), addresses = form.address_count(), %snapshot, "session saved");

    form.shutdown();
    Ok(())
}
