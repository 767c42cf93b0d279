use schemars::schema_for;
use solar_tradeoff::input::Input;

#[test]
fn test_generate_json_schema() {
    let schema = schema_for!(Input);
    let schema = serde_json::to_value(&schema).unwrap();
    let required = schema["required"].as_array().unwrap();
    assert!(required.contains(&serde_json::json!("panel_price")));
    assert!(required.contains(&serde_json::json!("panel_sizes")));
}
