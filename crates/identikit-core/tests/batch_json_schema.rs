use identikit_core::BatchResult;
use schemars::schema_for;

#[test]
fn batch_schema_lists_required_record_fields() {
    let schema = schema_for!(BatchResult);
    let json = serde_json::to_value(&schema).expect("serialize json schema");

    let required = json["required"].as_array().expect("top-level required");
    assert!(required.iter().any(|field| field == "results"));
    assert!(required.iter().any(|field| field == "info"));

    let record = &json["definitions"]["IdentityRecord"];
    let record_required: Vec<&str> = record["required"]
        .as_array()
        .expect("record required")
        .iter()
        .filter_map(|field| field.as_str())
        .collect();
    for field in [
        "gender", "name", "location", "email", "login", "dob", "registered", "phone", "cell",
        "id", "picture", "nat",
    ] {
        assert!(record_required.contains(&field), "missing {field}");
    }

    let genders = &json["definitions"]["Gender"]["enum"];
    assert_eq!(genders, &serde_json::json!(["male", "female"]));
}
