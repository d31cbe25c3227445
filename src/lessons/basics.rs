//! Scalar types, strings and type inference.

use std::any::type_name_of_val;

use rust_decimal::Decimal;

use super::capitalised;

pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

#[allow(clippy::approx_constant)]
pub fn lines() -> Vec<String> {
    let small: u8 = 255;
    let medium: i16 = 32_000;
    let large: i32 = 2_000_000;
    let very_large = i64::MAX;

    let single: f32 = 3.14;
    let double: f64 = 3.14159265359;
    let money = Decimal::new(1999, 2);

    let name = full_name("John", "Doe");

    let active = true;
    let deleted = false;

    let count = 42;
    let message = "Hello";
    let price = 9.99;

    vec![
        format!("Byte: {small}"),
        format!("Short: {medium}"),
        format!("Int: {large}"),
        format!("Long: {very_large}"),
        format!("Float: {single}"),
        format!("Double: {double}"),
        format!("Decimal: {money}"),
        format!("Full Name: {name}"),
        format!("Name Length: {}", name.len()),
        format!("Uppercase: {}", name.to_uppercase()),
        format!("Lowercase: {}", name.to_lowercase()),
        format!("Active: {}", capitalised(active)),
        format!("Deleted: {}", capitalised(deleted)),
        format!("Count type: {}", type_name_of_val(&count)),
        format!("Message type: {}", type_name_of_val(&message)),
        format!("Price type: {}", type_name_of_val(&price)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_output() {
        let lines = lines();
        assert_eq!(lines[3], format!("Long: {}", 9_223_372_036_854_775_807_i64));
        assert_eq!(lines[4], "Float: 3.14");
        assert_eq!(lines[6], "Decimal: 19.99");
        assert_eq!(lines[8], "Name Length: 8");
        assert_eq!(lines[9], "Uppercase: JOHN DOE");
        assert_eq!(lines[11], "Active: True");
        assert_eq!(lines[12], "Deleted: False");
    }

    #[test]
    fn inferred_types() {
        let lines = lines();
        assert_eq!(lines[13], "Count type: i32");
        assert_eq!(lines[14], "Message type: &str");
        assert_eq!(lines[15], "Price type: f64");
    }
}
