use schemars::schema_for;
use solar_tradeoff::input::Input;

fn main() {
    let schema = schema_for!(Input);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
