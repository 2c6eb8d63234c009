use crate::types::FormattedResult;
use serde_json::{Value, json};
use std::fmt::Write;

/// Sections the generated document may contain, in the order they must appear
pub const DOCUMENT_SECTIONS: [&str; 5] = [
    "Overview",
    "Key Features",
    "User Requirements",
    "Non-Functional Requirements",
    "Constraints",
];

/// Build the instruction for structured generation (document + itemized list)
pub fn create_instruction(text: &str, has_attachments: bool) -> String {
    let mut prompt = create_document_instruction(text, has_attachments);

    prompt.push_str(
        "\n\nIn addition to the document, produce an itemized breakdown of the requirements.

        1. Every atomic requirement stated in the document must appear exactly once in requirementsList.
        2. Set `group` to the title of the document section the requirement comes from.
        3. Give each requirement an `id` that is unique across the whole list and readable by humans, \
        built from a short prefix for the group and a zero-padded number (for example UR-001, NFR-002).
        4. Number requirements within each group with `sequence`, starting at 1 and increasing by one.
        5. Put the requirement itself in `description`, phrased so it can be read without the document.

        Put the Markdown document in markdownOutput. Respond with a single JSON object that matches the \
        response schema and nothing else.",
    );

    prompt
}

/// Build the instruction for plain-text generation (document only)
pub fn create_plain_instruction(text: &str, has_attachments: bool) -> String {
    let mut prompt = create_document_instruction(text, has_attachments);
    prompt.push_str("\n\nRespond with the Markdown document only, without any surrounding commentary.");
    prompt
}

fn create_document_instruction(text: &str, has_attachments: bool) -> String {
    let mut prompt = String::from(
        "You are an experienced business analyst who turns rough notes into clear, \
        well-organized software requirements documents.\n\n",
    );

    if has_attachments {
        prompt.push_str(
            "The user has provided free-form text together with one or more attached files. \
            Read the attached files carefully and synthesize the requirements jointly from the \
            text and the content of the files. When they disagree, prefer the more specific statement.\n\n",
        );
    } else {
        prompt.push_str(
            "The user has provided the free-form text below. Derive the requirements from it.\n\n",
        );
    }

    prompt.push_str("Organize the document with the following sections, in this order:\n\n");
    for (index, section) in DOCUMENT_SECTIONS.iter().enumerate() {
        writeln!(prompt, "{}. {section}", index + 1).expect("write to string should not fail");
    }

    prompt.push_str(
        "\nInclude a section only if there is applicable content for it. \
        Use Markdown headings for sections, **bold** for key terms, and bulleted or numbered lists \
        for individual requirements. Tables are allowed where they make the content clearer. \
        Write the document in the same language as the user's input.\n\n",
    );

    let trimmed = text.trim();
    if trimmed.is_empty() {
        prompt.push_str("User input: (no text provided; rely on the attached files)");
    } else {
        write!(prompt, "User input:\n{trimmed}").expect("write to string should not fail");
    }

    prompt
}

/// The response schema sent with structured requests
///
/// Uses the service's OpenAPI-style schema dialect rather than JSON Schema.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "markdownOutput": {
                "type": "STRING",
                "description": "The full requirements document formatted as Markdown."
            },
            "requirementsList": {
                "type": "ARRAY",
                "description": "Every atomic requirement extracted from the document.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "group": {
                            "type": "STRING",
                            "description": "Section of the document the requirement belongs to."
                        },
                        "id": {
                            "type": "STRING",
                            "description": "Identifier unique across the list, e.g. UR-001."
                        },
                        "sequence": {
                            "type": "INTEGER",
                            "description": "Position of the requirement within its group, starting at 1."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "The requirement itself."
                        }
                    },
                    "required": ["group", "id", "sequence", "description"],
                    "propertyOrdering": ["group", "id", "sequence", "description"]
                }
            }
        },
        "required": ["markdownOutput", "requirementsList"],
        "propertyOrdering": ["markdownOutput", "requirementsList"]
    })
}

/// JSON Schema of [`FormattedResult`], for documentation and tooling
pub fn formatted_result_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(FormattedResult);
    serde_json::to_string_pretty(&schema)
}
