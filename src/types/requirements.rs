//! Requirement document types and validation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One atomic requirement extracted from the generated document
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct RequirementItem {
    /// Source section of the document, e.g. "User Requirements"
    pub group: String,
    /// Human-readable identifier, unique within the result set (e.g. "UR-001")
    pub id: String,
    /// Ordinal within the group, starting at 1
    pub sequence: u32,
    /// What the requirement asks for
    pub description: String,
}

/// A completed structured generation: the document plus its itemized breakdown
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResult {
    /// The full requirements document in Markdown
    pub markdown_output: String,
    /// Every atomic requirement found in the document
    pub requirements_list: Vec<RequirementItem>,
}

impl FormattedResult {
    /// Check the invariants the response schema alone cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.markdown_output.trim().is_empty() {
            return Err("markdownOutput is empty".to_string());
        }

        let mut seen = HashSet::new();
        for (index, item) in self.requirements_list.iter().enumerate() {
            if item.group.trim().is_empty() {
                return Err(format!("requirement #{} has an empty group", index + 1));
            }
            if item.id.trim().is_empty() {
                return Err(format!("requirement #{} has an empty id", index + 1));
            }
            if item.description.trim().is_empty() {
                return Err(format!(
                    "requirement '{}' has an empty description",
                    item.id
                ));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(format!("duplicate requirement id '{}'", item.id));
            }
        }

        Ok(())
    }

    /// Requirements ordered by group (in order of first appearance), then sequence
    pub fn requirements_sorted(&self) -> Vec<&RequirementItem> {
        let mut group_rank: HashMap<&str, usize> = HashMap::new();
        for item in &self.requirements_list {
            let next = group_rank.len();
            group_rank.entry(item.group.as_str()).or_insert(next);
        }

        let mut items: Vec<&RequirementItem> = self.requirements_list.iter().collect();
        // Stable sort keeps the model's order for equal (group, sequence) pairs
        items.sort_by_key(|item| (group_rank[item.group.as_str()], item.sequence));
        items
    }

    /// Distinct groups in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.requirements_list
            .iter()
            .map(|item| item.group.as_str())
            .filter(|group| seen.insert(*group))
            .collect()
    }
}

/// What a single generation produced, depending on the requested mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    Structured(FormattedResult),
    PlainText(String),
}

impl GenerationOutput {
    /// The Markdown document, whichever mode produced it
    pub fn markdown(&self) -> &str {
        match self {
            Self::Structured(result) => &result.markdown_output,
            Self::PlainText(text) => text,
        }
    }

    /// Itemized requirements in (group, sequence) order; empty for plain-text output
    pub fn requirements(&self) -> Vec<&RequirementItem> {
        match self {
            Self::Structured(result) => result.requirements_sorted(),
            Self::PlainText(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(group: &str, id: &str, sequence: u32) -> RequirementItem {
        RequirementItem {
            group: group.to_string(),
            id: id.to_string(),
            sequence,
            description: format!("{id} description"),
        }
    }

    fn result_with(items: Vec<RequirementItem>) -> FormattedResult {
        FormattedResult {
            markdown_output: "# Overview".to_string(),
            requirements_list: items,
        }
    }

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r###"{
            "markdownOutput": "## User Requirements\n- Login",
            "requirementsList": [
                {"group": "User Requirements", "id": "UR-001", "sequence": 1, "description": "Login"}
            ]
        }"###;
        let result: FormattedResult = serde_json::from_str(json).expect("valid result");
        assert_eq!(result.requirements_list.len(), 1);
        assert_eq!(result.requirements_list[0].id, "UR-001");
    }

    #[test]
    fn test_missing_markdown_output_is_rejected() {
        let json = r#"{"requirementsList": []}"#;
        assert!(serde_json::from_str::<FormattedResult>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let result = result_with(vec![item("A", "X-1", 1), item("B", "X-1", 1)]);
        let err = result.validate().expect_err("duplicate ids must fail");
        assert!(err.contains("X-1"));
    }

    #[test]
    fn test_validate_rejects_blank_document() {
        let mut result = result_with(vec![]);
        result.markdown_output = "   ".to_string();
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_sorted_keeps_group_order_and_sequences() {
        let result = result_with(vec![
            item("Key Features", "KF-002", 2),
            item("Constraints", "C-001", 1),
            item("Key Features", "KF-001", 1),
        ]);
        let ids: Vec<&str> = result
            .requirements_sorted()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["KF-001", "KF-002", "C-001"]);
        assert_eq!(result.groups(), vec!["Key Features", "Constraints"]);
    }

    #[test]
    fn test_plain_text_output_has_no_requirements() {
        let output = GenerationOutput::PlainText("# Doc".to_string());
        assert_eq!(output.markdown(), "# Doc");
        assert!(output.requirements().is_empty());
    }
}
