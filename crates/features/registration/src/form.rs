use crate::error::RegistrationError;
use crate::events::ValueChanged;
use crate::messages::validation_message;
use crate::rules::{ConditionalRule, phone_requirement};
use parking_lot::{Mutex, RwLock};
use regkit_controls::{Collection, ErrorMap, Field, Group, Value, validate};
use regkit_domain::Customer;
use regkit_domain::config::FormConfig;
use regkit_events::{ChangeBus, debounce_filtered};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Dotted path of the email field inside the confirmation pair.
pub const EMAIL_PATH: &str = "emailGroup.email";

const ADDRESSES: &str = "addresses";

/// Lifecycle of the form controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FormState {
    Initializing,
    Ready,
    Submitting,
}

/// The customer registration form controller.
///
/// Owns the control tree and is its single mutation entry point: every
/// edit goes through a method here, which applies the change, evaluates
/// conditional rules under the same lock, and only then notifies
/// subscribers. Cheap to clone via [`CustomerForm::initialize`]'s internal
/// `Arc`s is not offered; share the controller itself behind an `Arc` if
/// multiple owners need it.
#[derive(Debug)]
pub struct CustomerForm {
    form: Arc<RwLock<Group>>,
    changes: ChangeBus<ValueChanged>,
    email_message: Arc<RwLock<String>>,
    state: RwLock<FormState>,
    rules: Vec<ConditionalRule>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl CustomerForm {
    /// Builds the form in its initial shape and starts the background
    /// watcher that keeps the email validation message fresh.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn initialize(config: &FormConfig) -> Self {
        let form = Arc::new(RwLock::new(build_form()));
        let changes = ChangeBus::new();
        let email_message = Arc::new(RwLock::new(String::new()));

        let controller = Self {
            form,
            changes,
            email_message,
            state: RwLock::new(FormState::Initializing),
            rules: vec![ConditionalRule {
                trigger: "notification",
                target: "phone",
                factory: phone_requirement,
            }],
            tasks: Mutex::new(Vec::new()),
        };
        controller.watch_email(config);

        *controller.state.write() = FormState::Ready;
        info!(debounce_ms = config.email_debounce_ms, "customer form initialized");
        controller
    }

    /// Background subscriber: recomputes the email message only after the
    /// email field has been quiescent for the configured window. Edits to
    /// other fields neither re-arm nor cancel the window.
    fn watch_email(&self, config: &FormConfig) {
        let mut debounced = debounce_filtered(
            self.changes.subscribe(),
            config.email_debounce(),
            |event: &ValueChanged| event.path.as_ref() == EMAIL_PATH,
        );
        let form = Arc::clone(&self.form);
        let message = Arc::clone(&self.email_message);
        self.tasks.lock().push(tokio::spawn(async move {
            while let Some(event) = debounced.recv().await {
                let text = {
                    let form = form.read();
                    form.field(EMAIL_PATH).map(validation_message).unwrap_or_default()
                };
                debug!(value = %event.value, message = %text, "email message refreshed");
                *message.write() = text;
            }
        }));
    }

    /// Sets a field value, applies conditional rules triggered by it, and
    /// publishes a change notification. Rule consequences are applied
    /// under the same lock as the mutation, so no subscriber can observe
    /// the trigger without them.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] for an unknown or non-field path.
    pub fn set_value(&self, path: &str, value: impl Into<Value>) -> Result<(), RegistrationError> {
        let value = value.into();
        {
            let mut form = self.form.write();
            form.set_value(path, value.clone())?;
            for rule in &self.rules {
                if rule.trigger == path {
                    form.set_validators(rule.target, (rule.factory)(&value))?;
                    debug!(trigger = rule.trigger, target = rule.target, "conditional rule applied");
                }
            }
        }
        self.changes.publish(ValueChanged::new(path, value));
        Ok(())
    }

    /// Marks a field touched. Touching the email field refreshes its
    /// message immediately; there is nothing to debounce on blur.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] for an unknown or non-field path.
    pub fn mark_touched(&self, path: &str) -> Result<(), RegistrationError> {
        let mut form = self.form.write();
        form.mark_touched(path)?;
        if path == EMAIL_PATH {
            *self.email_message.write() = validation_message(form.field(EMAIL_PATH)?);
        }
        Ok(())
    }

    /// Appends an empty address sub-form, returning its index. Changes to
    /// the new sub-form are logged by a dedicated subscriber.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] if the addresses collection is gone.
    pub fn add_address(&self) -> Result<usize, RegistrationError> {
        let index = {
            let mut form = self.form.write();
            let addresses = form.collection_mut(ADDRESSES)?;
            addresses.push(build_address());
            addresses.len() - 1
        };
        self.watch_address(index);
        debug!(index, "address sub-form appended");
        Ok(index)
    }

    fn watch_address(&self, index: usize) {
        let mut subscription = self.changes.subscribe();
        self.tasks.lock().push(tokio::spawn(async move {
            let prefix = format!("{ADDRESSES}.{index}.");
            while let Some(event) = regkit_events::recv_change(&mut subscription).await {
                if event.path.starts_with(&prefix) {
                    debug!(path = %event.path, value = %event.value, "address changed");
                }
            }
        }));
    }

    /// Removes an address sub-form from validity aggregation and from the
    /// saved snapshot; its values are retained for re-enabling.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] for an out-of-range index.
    pub fn disable_address(&self, index: usize) -> Result<(), RegistrationError> {
        self.set_address_enabled(index, false)
    }

    /// Restores a previously disabled address sub-form.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] for an out-of-range index.
    pub fn enable_address(&self, index: usize) -> Result<(), RegistrationError> {
        self.set_address_enabled(index, true)
    }

    fn set_address_enabled(&self, index: usize, enabled: bool) -> Result<(), RegistrationError> {
        let mut form = self.form.write();
        form.collection_mut(ADDRESSES)?.set_enabled(index, enabled)?;
        debug!(index, enabled, "address sub-form toggled");
        Ok(())
    }

    /// Fills the form with the demo customer: names and the email pair
    /// are patched (and therefore become dirty), the address collection is
    /// replaced wholesale by three work addresses.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] if the tree no longer matches the
    /// expected shape.
    pub fn populate_test_data(&self) -> Result<(), RegistrationError> {
        let patch = serde_json::json!({
            "firstName": "Jack",
            "lastName": "Harkness",
            "emailGroup": {
                "email": "jack@torchwood.com",
                "confirmEmail": "jack@torchwood.com",
            },
        });
        let addresses = (1..=3).map(|n| populated_address(&format!("work{n}"))).collect();
        let events = self.apply_bulk(&patch, Some(addresses))?;
        for event in events {
            self.changes.publish(event);
        }
        info!("test data populated");
        Ok(())
    }

    /// Loads an existing customer record into the form.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] if the tree no longer matches the
    /// expected shape.
    pub fn load(&self, customer: &Customer) -> Result<(), RegistrationError> {
        let patch = serde_json::json!({
            "firstName": customer.first_name,
            "lastName": customer.last_name,
            "sendCatalog": customer.send_catalog,
            "emailGroup": {
                "email": customer.email,
                "confirmEmail": customer.email,
            },
        });
        let events = self.apply_bulk(&patch, Some(vec![address_from(customer)]))?;
        for event in events {
            self.changes.publish(event);
        }
        info!("customer record loaded");
        Ok(())
    }

    /// Applies a value patch and an optional wholesale address replacement
    /// under one lock, returning the per-field notifications to publish.
    /// Collection replacement produces no per-field events; subscribers
    /// interested in addresses re-read the tree.
    fn apply_bulk(
        &self,
        patch: &serde_json::Value,
        addresses: Option<Vec<Group>>,
    ) -> Result<Vec<ValueChanged>, RegistrationError> {
        let mut form = self.form.write();
        let patched = form.patch_value(patch)?;
        if let Some(groups) = addresses {
            form.set_control(ADDRESSES, Collection::from_groups(groups));
        }
        let mut events = Vec::with_capacity(patched.len());
        for path in &patched {
            events.push(ValueChanged::new(path, form.field(path)?.value().clone()));
        }
        Ok(events)
    }

    /// Serializes the enabled portion of the form and logs it. Validity is
    /// reported alongside; an invalid form still saves, the caller decides
    /// what to do with that.
    #[must_use]
    pub fn save(&self) -> serde_json::Value {
        *self.state.write() = FormState::Submitting;
        let (snapshot, valid) = {
            let form = self.form.read();
            (form.value(), form.is_valid())
        };
        info!(valid, "Saved: {snapshot}");
        *self.state.write() = FormState::Ready;
        snapshot
    }

    /// Latest debounced email validation message (empty when quiet).
    #[must_use]
    pub fn email_message(&self) -> String {
        self.email_message.read().clone()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.form.read().is_valid()
    }

    /// Snapshot of the enabled fields in serialization shape.
    #[must_use]
    pub fn value(&self) -> serde_json::Value {
        self.form.read().value()
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        *self.state.read()
    }

    #[must_use]
    pub fn address_count(&self) -> usize {
        self.form.read().collection(ADDRESSES).map_or(0, Collection::len)
    }

    /// Current error map of the field at `path`.
    ///
    /// # Errors
    /// [`RegistrationError::Control`] for an unknown or non-field path.
    pub fn errors_at(&self, path: &str) -> Result<ErrorMap, RegistrationError> {
        Ok(self.form.read().field(path)?.errors().clone())
    }

    /// Runs a closure against the control tree under a read lock, for
    /// inspection the accessor surface does not cover.
    pub fn with_form<R>(&self, inspect: impl FnOnce(&Group) -> R) -> R {
        inspect(&self.form.read())
    }

    /// A fresh subscription to field change notifications.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Arc<ValueChanged>> {
        self.changes.subscribe()
    }

    /// Stops the background watchers. Also happens on drop.
    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for CustomerForm {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The initial form shape: personal fields, the email confirmation pair,
/// notification preference with its dependent phone field, an optional
/// rating and one address sub-form.
fn build_form() -> Group {
    Group::builder()
        .control(
            "firstName",
            Field::with_validators("", vec![validate::required(), validate::min_length(3)]),
        )
        .control(
            "lastName",
            Field::with_validators("", vec![validate::required(), validate::max_length(50)]),
        )
        .control(
            "emailGroup",
            Group::builder()
                .control(
                    "email",
                    Field::with_validators("", vec![validate::required(), validate::email()]),
                )
                .control("confirmEmail", Field::with_validators("", vec![validate::required()]))
                .validator(validate::match_fields("email", "confirmEmail"))
                .build(),
        )
        .control("phone", Field::new(""))
        .control("notification", Field::new("email"))
        .control("rating", Field::with_validators(Value::Null, vec![validate::range(1.0, 5.0)]))
        .control("sendCatalog", Field::new(true))
        .control(ADDRESSES, Collection::from_groups(vec![build_address()]))
        .build()
}

/// An empty address sub-form. The zip field starts disabled with a
/// placeholder value; it is excluded from validity and serialization until
/// explicitly enabled.
fn build_address() -> Group {
    Group::builder()
        .control("addressType", Field::new("home"))
        .control("street1", Field::with_validators("", vec![validate::required()]))
        .control("street2", Field::new(""))
        .control("city", Field::new(""))
        .control("state", Field::new(""))
        .control("zip", Field::new("1234").disabled())
        .build()
}

/// A pre-filled work address used by [`CustomerForm::populate_test_data`].
/// All fields, zip included, start enabled.
fn populated_address(address_type: &str) -> Group {
    Group::builder()
        .control("addressType", Field::new(address_type))
        .control("street1", Field::with_validators("Mermaid Quay", vec![validate::required()]))
        .control("street2", Field::new(""))
        .control("city", Field::new("Cardiff Bay"))
        .control("state", Field::new("CA"))
        .control("zip", Field::new(""))
        .build()
}

fn address_from(customer: &Customer) -> Group {
    Group::builder()
        .control("addressType", Field::new(customer.address_type.as_str()))
        .control(
            "street1",
            Field::with_validators(
                customer.street1.clone().unwrap_or_default(),
                vec![validate::required()],
            ),
        )
        .control("street2", Field::new(customer.street2.clone().unwrap_or_default()))
        .control("city", Field::new(customer.city.clone().unwrap_or_default()))
        .control("state", Field::new(customer.state.as_str()))
        .control("zip", Field::new(customer.zip.clone().unwrap_or_default()))
        .build()
}
