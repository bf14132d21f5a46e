//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No resources found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Format label/value pairs as a borderless detail pane
pub fn format_detail(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct TestRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "STATUS")]
        status: String,
    }

    #[test]
    fn test_format_table_empty() {
        let items: Vec<TestRow> = vec![];
        assert_eq!(format_table(&items), "No resources found.");
    }

    #[test]
    fn test_format_table_rows() {
        let items = vec![
            TestRow {
                name: "orders".to_string(),
                status: "Active".to_string(),
            },
            TestRow {
                name: "billing".to_string(),
                status: "Pending".to_string(),
            },
        ];

        let result = format_table(&items);
        assert!(result.contains("NAME"));
        assert!(result.contains("orders"));
        assert!(result.contains("billing"));
    }

    #[test]
    fn test_format_detail_aligns_labels() {
        let out = format_detail(&[
            ("Name", "orders".to_string()),
            ("Runtime", "python3.12".to_string()),
        ]);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].starts_with("Runtime"));
        // Values line up in one column
        assert_eq!(
            lines[0].find("orders").unwrap(),
            lines[1].find("python3.12").unwrap()
        );
    }
}
