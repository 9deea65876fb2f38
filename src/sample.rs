/// Example document offered when the input is empty.
pub const SAMPLE: &str = r#"{
  "name": "John Doe",
  "age": 30,
  "email": "john.doe@example.com",
  "address": {
    "street": "123 Main St",
    "city": "Anytown",
    "zipCode": "12345",
    "country": "USA"
  },
  "hobbies": [
    "reading",
    "swimming",
    "coding"
  ],
  "isActive": true,
  "lastLogin": null
}"#;

#[cfg(test)]
mod tests {
    use super::SAMPLE;
    use crate::validator::validate_json;

    #[test]
    fn sample_is_already_canonical() {
        let formatted = validate_json(SAMPLE).expect("sample parses");
        assert_eq!(formatted.text, SAMPLE);
    }
}
