//! JSON output formatting

use serde::Serialize;

use crate::error::Result;

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_json_object() {
        #[derive(Serialize)]
        struct Row {
            name: String,
        }

        let out = format_json(&vec![Row {
            name: "orders".to_string(),
        }])
        .unwrap();

        assert!(out.contains("\"name\""));
        assert!(out.contains("orders"));
    }
}
