use regkit_controls::validate::{email, match_fields, max_length, min_length, range, required};
use regkit_controls::{Collection, ControlError, ErrorKind, Field, Group, Value};
use serde_json::json;

fn email_group() -> Group {
    Group::builder()
        .control("email", Field::with_validators("", vec![required(), email()]))
        .control("confirmEmail", Field::with_validators("", vec![required()]))
        .validator(match_fields("email", "confirmEmail"))
        .build()
}

fn customer_shape() -> Group {
    Group::builder()
        .control("firstName", Field::with_validators("", vec![required(), min_length(3)]))
        .control("lastName", Field::with_validators("", vec![required(), max_length(50)]))
        .control("emailGroup", email_group())
        .control("rating", Field::with_validators(Value::Null, vec![range(1.0, 5.0)]))
        .control("sendCatalog", Field::new(true))
        .control(
            "addresses",
            Collection::from_groups(vec![address("home", "221B Baker St")]),
        )
        .build()
}

fn address(kind: &str, street: &str) -> Group {
    Group::builder()
        .control("addressType", Field::new(kind))
        .control("street1", Field::with_validators(street, vec![required()]))
        .control("street2", Field::new(""))
        .control("city", Field::new(""))
        .control("state", Field::new(""))
        .control("zip", Field::new("1234").disabled())
        .build()
}

#[test]
fn match_passes_while_either_field_is_pristine() {
    let mut group = email_group();
    assert!(!group.errors().contains_key(&ErrorKind::Match));

    group.set_value("email", "jack@torchwood.com").unwrap();
    // confirmEmail is still pristine, so the cross-field check is skipped.
    assert!(!group.errors().contains_key(&ErrorKind::Match));
}

#[test]
fn match_compares_values_once_both_are_dirty() {
    let mut group = email_group();
    group.set_value("email", "jack@torchwood.com").unwrap();
    group.set_value("confirmEmail", "jack@Torchwood.com").unwrap();
    // Case-sensitive comparison.
    assert!(group.errors().contains_key(&ErrorKind::Match));
    assert!(!group.is_valid());

    group.set_value("confirmEmail", "jack@torchwood.com").unwrap();
    assert!(!group.errors().contains_key(&ErrorKind::Match));
    assert!(group.is_valid());
}

#[test]
fn path_lookup_resolves_nested_and_indexed_segments() {
    let form = customer_shape();
    assert_eq!(form.field("emailGroup.email").unwrap().value(), &Value::from(""));
    assert_eq!(
        form.field("addresses.0.street1").unwrap().value(),
        &Value::from("221B Baker St")
    );

    assert_eq!(
        form.field("middleName").unwrap_err(),
        ControlError::NotFound { path: "middleName".to_owned() }
    );
    assert_eq!(
        form.field("emailGroup.email.local").unwrap_err(),
        ControlError::NotFound { path: "emailGroup.email.local".to_owned() }
    );
    assert!(matches!(
        form.field("addresses.3.street1").unwrap_err(),
        ControlError::IndexOutOfRange { index: 3, len: 1 }
    ));
    assert!(matches!(form.group("firstName").unwrap_err(), ControlError::NotAGroup { .. }));
    assert!(matches!(form.field("emailGroup").unwrap_err(), ControlError::NotAField { .. }));
}

#[test]
fn set_value_revalidates_ancestor_groups_eagerly() {
    let mut form = customer_shape();
    form.set_value("emailGroup.email", "a@b.c").unwrap();
    form.set_value("emailGroup.confirmEmail", "different@b.c").unwrap();

    // The nested group saw the change immediately, without an explicit
    // revalidation call from the outside.
    assert!(form.group("emailGroup").unwrap().errors().contains_key(&ErrorKind::Match));
    assert!(!form.is_valid());
}

#[test]
fn patch_applies_only_the_provided_subset() {
    let mut form = customer_shape();
    let patched = form
        .patch_value(&json!({
            "firstName": "Jack",
            "emailGroup": { "email": "jack@torchwood.com" }
        }))
        .unwrap();

    assert_eq!(patched, vec!["firstName".to_owned(), "emailGroup.email".to_owned()]);
    assert_eq!(form.field("firstName").unwrap().value(), &Value::from("Jack"));
    assert!(form.field("firstName").unwrap().is_dirty());
    // Untouched siblings keep their state.
    assert_eq!(form.field("lastName").unwrap().value(), &Value::from(""));
    assert!(form.field("lastName").unwrap().is_pristine());
}

#[test]
fn patch_with_unknown_key_is_atomic() {
    let mut form = customer_shape();
    let err = form
        .patch_value(&json!({
            "firstName": "Jack",
            "nickName": "Captain"
        }))
        .unwrap_err();

    assert_eq!(err, ControlError::NotFound { path: "nickName".to_owned() });
    // All-or-nothing: the valid part of the patch was not applied either.
    assert_eq!(form.field("firstName").unwrap().value(), &Value::from(""));
    assert!(form.field("firstName").unwrap().is_pristine());
}

#[test]
fn patch_rejects_shape_mismatches() {
    let mut form = customer_shape();
    let err = form.patch_value(&json!({ "firstName": { "no": "objects" } })).unwrap_err();
    assert_eq!(err, ControlError::InvalidPatch { path: "firstName".to_owned() });

    let err = form.patch_value(&json!({ "addresses": [] })).unwrap_err();
    assert_eq!(err, ControlError::InvalidPatch { path: "addresses".to_owned() });

    let err = form.patch_value(&json!("not an object")).unwrap_err();
    assert_eq!(err, ControlError::InvalidPatch { path: String::new() });
}

#[test]
fn disabled_fields_are_excluded_from_validity_and_snapshot() {
    let mut form = customer_shape();
    // street1 of the only address is required and filled; zip is disabled.
    let snapshot = form.value();
    let first = &snapshot["addresses"][0];
    assert_eq!(first["street1"], json!("221B Baker St"));
    assert!(first.get("zip").is_none());

    // An empty required field invalidates the form until it is disabled.
    form.set_value("firstName", "").unwrap();
    assert!(!form.is_valid());
    form.set_enabled_at("firstName", false).unwrap();
    assert!(form.value().get("firstName").is_none());

    form.set_value("lastName", "Harkness").unwrap();
    form.set_value("emailGroup.email", "jack@torchwood.com").unwrap();
    form.set_value("emailGroup.confirmEmail", "jack@torchwood.com").unwrap();
    assert!(form.is_valid());

    form.set_enabled_at("firstName", true).unwrap();
    assert!(!form.is_valid());
}

#[test]
fn snapshot_preserves_value_types() {
    let mut form = customer_shape();
    form.set_value("rating", 4.0).unwrap();
    let snapshot = form.value();
    assert_eq!(snapshot["rating"], json!(4.0));
    assert_eq!(snapshot["sendCatalog"], json!(true));
    assert_eq!(snapshot["firstName"], json!(""));
}

#[test]
fn rating_range_is_enforced_through_the_tree() {
    let mut form = customer_shape();
    // Null rating means "not yet specified" and passes.
    assert!(form.field("rating").unwrap().is_valid());

    form.set_value("rating", 6.0).unwrap();
    assert!(form.field("rating").unwrap().errors().contains_key(&ErrorKind::Range));

    form.set_value("rating", Value::Null).unwrap();
    assert!(form.field("rating").unwrap().is_valid());
}

#[test]
fn collection_push_replace_and_disable() {
    let mut collection = Collection::from_groups(vec![address("home", "a"), address("work", "b")]);
    assert_eq!(collection.len(), 2);

    collection.push(address("summer", "c"));
    assert_eq!(collection.len(), 3);
    assert_eq!(collection.at(2).unwrap().field("street1").unwrap().value(), &Value::from("c"));
    assert!(matches!(
        collection.at(3).unwrap_err(),
        ControlError::IndexOutOfRange { index: 3, len: 3 }
    ));

    collection.set_enabled(0, false).unwrap();
    let values = collection.value();
    assert_eq!(values.as_array().unwrap().len(), 2);
    assert_eq!(values[0]["street1"], json!("b"));

    collection.set_enabled(0, true).unwrap();
    assert_eq!(collection.value().as_array().unwrap().len(), 3);

    collection.replace_all(vec![address("only", "d")]);
    assert_eq!(collection.len(), 1);
}

#[test]
fn disabled_collection_element_is_excluded_from_validity() {
    let mut collection = Collection::from_groups(vec![address("home", "")]);
    // street1 is required and empty.
    assert!(!collection.is_valid());
    collection.set_enabled(0, false).unwrap();
    assert!(collection.is_valid());
}

#[test]
fn set_control_swaps_a_whole_subtree() {
    let mut form = customer_shape();
    form.set_control(
        "addresses",
        Collection::from_groups(vec![address("work1", "x"), address("work2", "y")]),
    );
    assert_eq!(form.collection("addresses").unwrap().len(), 2);
    assert_eq!(form.field("addresses.1.addressType").unwrap().value(), &Value::from("work2"));
}

#[test]
fn validator_swap_through_path_recomputes_immediately() {
    let mut form = customer_shape();
    assert!(form.field("rating").unwrap().is_valid());

    form.set_validators("phoneLike", vec![required()]).unwrap_err();

    form.set_value("rating", Value::Null).unwrap();
    form.set_validators("rating", vec![required()]).unwrap();
    assert!(form.field("rating").unwrap().errors().contains_key(&ErrorKind::Required));
    form.clear_validators("rating").unwrap();
    assert!(form.field("rating").unwrap().is_valid());
}
