use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped stdin as JSON, falling back to YAML.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    parse_piped(trimmed).map(Some)
}

fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<T, Box<dyn std::error::Error>> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text)
            .map_err(|_| format!("Failed to parse stdin as JSON or YAML: {}", json_err).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_parse_json_then_yaml() {
        let json: Value = parse_piped(r#"{"sector_code": 2}"#).unwrap();
        assert_eq!(json["sector_code"], 2);
        let yaml: Value = parse_piped("sector_code: 3\nlegal_form: Partnership").unwrap();
        assert_eq!(yaml["sector_code"], 3);
    }
}
