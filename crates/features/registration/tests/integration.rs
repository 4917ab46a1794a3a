use regkit_controls::{ControlError, ErrorKind, Value};
use regkit_domain::Customer;
use regkit_domain::config::FormConfig;
use regkit_registration::{CustomerForm, EMAIL_PATH, FormState, RegistrationError};
use std::time::Duration;
use tokio::time::advance;

/// Lets the background watchers observe everything published so far.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn fresh_form_shape_and_state() {
    let form = CustomerForm::initialize(&FormConfig::default());

    assert_eq!(form.state(), FormState::Ready);
    assert_eq!(form.address_count(), 1);
    assert!(!form.is_valid());
    assert_eq!(form.email_message(), "");

    let snapshot = form.value();
    assert_eq!(snapshot["notification"], "email");
    assert_eq!(snapshot["sendCatalog"], true);
    assert_eq!(snapshot["rating"], serde_json::Value::Null);
    // The zip field starts disabled and is absent from the snapshot.
    assert_eq!(snapshot["addresses"][0]["addressType"], "home");
    assert!(snapshot["addresses"][0].get("zip").is_none());
}

#[tokio::test]
async fn notification_choice_drives_phone_requirement() {
    let form = CustomerForm::initialize(&FormConfig::default());
    assert!(form.errors_at("phone").unwrap().is_empty());

    form.set_value("notification", "text").unwrap();
    let errors = form.errors_at("phone").unwrap();
    assert!(errors.contains_key(&ErrorKind::Required));

    form.set_value("phone", "029-2044-0400").unwrap();
    assert!(form.errors_at("phone").unwrap().is_empty());

    // Switching away drops the requirement even with the phone cleared.
    form.set_value("phone", "").unwrap();
    form.set_value("notification", "email").unwrap();
    assert!(form.errors_at("phone").unwrap().is_empty());
}

#[tokio::test]
async fn populate_fills_names_email_pair_and_work_addresses() {
    let form = CustomerForm::initialize(&FormConfig::default());
    form.populate_test_data().unwrap();

    let snapshot = form.value();
    assert_eq!(snapshot["firstName"], "Jack");
    assert_eq!(snapshot["lastName"], "Harkness");
    assert_eq!(snapshot["emailGroup"]["email"], "jack@torchwood.com");
    assert_eq!(snapshot["emailGroup"]["confirmEmail"], "jack@torchwood.com");
    assert_eq!(snapshot["addresses"].as_array().unwrap().len(), 3);
    assert_eq!(snapshot["addresses"][0]["addressType"], "work1");
    assert_eq!(snapshot["addresses"][2]["addressType"], "work3");
    assert_eq!(snapshot["addresses"][1]["street1"], "Mermaid Quay");
    assert_eq!(snapshot["addresses"][2]["city"], "Cardiff Bay");
    // Populated addresses come with an enabled (empty) zip.
    assert_eq!(snapshot["addresses"][0]["zip"], "");

    // Both halves of the email pair were patched, so the cross-field
    // match validator is armed and passing.
    form.with_form(|tree| {
        assert!(tree.field(EMAIL_PATH).unwrap().is_dirty());
        assert!(tree.group("emailGroup").unwrap().errors().is_empty());
    });
    assert!(form.is_valid());
}

#[tokio::test]
async fn mismatched_confirmation_invalidates_the_pair() {
    let form = CustomerForm::initialize(&FormConfig::default());
    form.populate_test_data().unwrap();

    form.set_value("emailGroup.confirmEmail", "jack@tardis.com").unwrap();
    form.with_form(|tree| {
        assert!(tree.group("emailGroup").unwrap().errors().contains_key(&ErrorKind::Match));
    });
    assert!(!form.is_valid());
}

#[tokio::test]
async fn disabled_address_leaves_validity_and_snapshot() {
    let form = CustomerForm::initialize(&FormConfig::default());
    form.populate_test_data().unwrap();

    // Break one address, the whole form follows.
    form.set_value("addresses.1.street1", "").unwrap();
    assert!(!form.is_valid());

    form.disable_address(1).unwrap();
    assert!(form.is_valid());
    let snapshot = form.save();
    assert_eq!(snapshot["addresses"].as_array().unwrap().len(), 2);
    assert_eq!(form.state(), FormState::Ready);

    // Re-enabling restores the element with its values intact.
    form.enable_address(1).unwrap();
    assert!(!form.is_valid());
    assert_eq!(form.value()["addresses"].as_array().unwrap().len(), 3);
    assert_eq!(form.value()["addresses"][1]["city"], "Cardiff Bay");
}

#[tokio::test]
async fn added_address_participates_in_validity() {
    let form = CustomerForm::initialize(&FormConfig::default());
    form.populate_test_data().unwrap();
    assert!(form.is_valid());

    let index = form.add_address().unwrap();
    assert_eq!(index, 3);
    assert_eq!(form.address_count(), 4);
    assert!(!form.is_valid());

    form.set_value("addresses.3.street1", "Roald Dahl Plass").unwrap();
    assert!(form.is_valid());
}

#[tokio::test]
async fn load_maps_a_customer_record_onto_the_form() {
    let form = CustomerForm::initialize(&FormConfig::default());
    let customer = Customer {
        first_name: "Gwen".to_owned(),
        last_name: "Cooper".to_owned(),
        email: "gwen@torchwood.com".to_owned(),
        send_catalog: false,
        address_type: "home".to_owned(),
        street1: Some("Heol Sant Helen".to_owned()),
        city: Some("Swansea".to_owned()),
        ..Customer::default()
    };

    form.load(&customer).unwrap();
    let snapshot = form.value();
    assert_eq!(snapshot["firstName"], "Gwen");
    assert_eq!(snapshot["sendCatalog"], false);
    assert_eq!(snapshot["emailGroup"]["confirmEmail"], "gwen@torchwood.com");
    assert_eq!(snapshot["addresses"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["addresses"][0]["street1"], "Heol Sant Helen");
    assert_eq!(snapshot["addresses"][0]["city"], "Swansea");
}

#[tokio::test]
async fn unknown_path_is_an_operational_error() {
    let form = CustomerForm::initialize(&FormConfig::default());
    let result = form.set_value("middleName", "J");
    assert_eq!(
        result,
        Err(RegistrationError::Control(ControlError::NotFound {
            path: "middleName".to_owned()
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn email_message_appears_after_the_quiescence_window() {
    let form = CustomerForm::initialize(&FormConfig::default());

    form.set_value(EMAIL_PATH, "not-an-address").unwrap();
    settle().await;
    advance(Duration::from_millis(999)).await;
    settle().await;
    assert_eq!(form.email_message(), "");

    advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(form.email_message(), "Please enter a valid email address.");

    form.set_value(EMAIL_PATH, "jack@torchwood.com").unwrap();
    settle().await;
    advance(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(form.email_message(), "");
}

#[tokio::test(start_paused = true)]
async fn unrelated_edits_do_not_delay_the_email_message() {
    let form = CustomerForm::initialize(&FormConfig::default());

    form.set_value(EMAIL_PATH, "still@bad").unwrap();
    settle().await;
    advance(Duration::from_millis(800)).await;
    form.set_value("firstName", "Jack").unwrap();
    settle().await;
    advance(Duration::from_millis(200)).await;
    settle().await;

    assert_eq!(form.email_message(), "Please enter a valid email address.");
}

#[tokio::test(start_paused = true)]
async fn rapid_email_edits_collapse_to_one_recomputation() {
    let form = CustomerForm::initialize(&FormConfig::default());

    form.set_value(EMAIL_PATH, "v1").unwrap();
    settle().await;
    advance(Duration::from_millis(500)).await;
    form.set_value(EMAIL_PATH, "v2").unwrap();
    settle().await;
    advance(Duration::from_millis(999)).await;
    settle().await;
    assert_eq!(form.email_message(), "");

    advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(form.email_message(), "Please enter a valid email address.");
}

#[tokio::test]
async fn blur_refreshes_the_email_message_immediately() {
    let form = CustomerForm::initialize(&FormConfig::default());

    form.mark_touched(EMAIL_PATH).unwrap();
    assert_eq!(form.email_message(), "Please enter your email address.");
}

#[tokio::test]
async fn save_reports_the_enabled_subtree() {
    let form = CustomerForm::initialize(&FormConfig::default());
    form.populate_test_data().unwrap();
    form.set_value("rating", 4.0).unwrap();

    let snapshot = form.save();
    assert_eq!(snapshot["rating"], 4.0);
    assert_eq!(snapshot["firstName"], "Jack");
    assert_eq!(form.state(), FormState::Ready);
}

#[tokio::test]
async fn subscribers_see_edits_with_rule_consequences_applied() {
    let form = CustomerForm::initialize(&FormConfig::default());
    let mut subscription = form.subscribe();

    form.set_value("notification", "text").unwrap();

    let event = regkit_events::recv_change(&mut subscription).await.unwrap();
    assert_eq!(event.path.as_ref(), "notification");
    assert_eq!(event.value, Value::from("text"));
    // The phone requirement is already in place by the time the event is out.
    assert!(form.errors_at("phone").unwrap().contains_key(&ErrorKind::Required));
}
