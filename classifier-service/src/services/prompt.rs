//! Classification prompt construction.

/// Fallback label the model must use when nothing in the category list fits.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Build the instruction sent to the model.
///
/// Both lists are embedded as JSON arrays so that quotes and commas inside
/// category names or descriptions survive intact.
pub fn build_prompt(
    transaction_descriptions: &[String],
    categories: &[String],
) -> Result<String, serde_json::Error> {
    let categories_json = serde_json::to_string(categories)?;
    let descriptions_json = serde_json::to_string(transaction_descriptions)?;

    Ok(format!(
        r#"You are a financial classifier.
Map these transaction descriptions to the EXACT category names from this list: {categories_json}.
If a transaction doesn't match well, use "{UNCATEGORIZED}".

Descriptions:
{descriptions_json}

Return ONLY a valid JSON object where keys are indices (strings) and values are Category Names.
Example: {{ "0": "Groceries", "1": "Rent" }}
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompt_embeds_both_lists_as_json() {
        let prompt = build_prompt(
            &strings(&["STARBUCKS #123", "Rent March"]),
            &strings(&["Coffee", "Housing"]),
        )
        .unwrap();

        assert!(prompt.contains(r#"["Coffee","Housing"]"#));
        assert!(prompt.contains(r#"["STARBUCKS #123","Rent March"]"#));
    }

    #[test]
    fn prompt_names_sentinel_and_output_format() {
        let prompt = build_prompt(&strings(&["x"]), &strings(&["y"])).unwrap();

        assert!(prompt.contains(r#"use "Uncategorized""#));
        assert!(prompt.contains("keys are indices (strings)"));
        assert!(prompt.contains(r#"Example: { "0": "Groceries", "1": "Rent" }"#));
    }

    #[test]
    fn prompt_escapes_quotes_in_inputs() {
        let prompt = build_prompt(&strings(&[r#"Joe's "Diner""#]), &strings(&["Food"])).unwrap();
        assert!(prompt.contains(r#"["Joe's \"Diner\""]"#));
    }

    #[test]
    fn empty_lists_still_produce_a_prompt() {
        let prompt = build_prompt(&[], &[]).unwrap();
        assert!(prompt.contains("this list: []"));
        assert!(prompt.contains("Descriptions:\n[]"));
    }
}
