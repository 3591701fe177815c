//! Enhanced-prompt composition: a basic prompt plus a typed list of
//! improvements becomes the final prompt text sent to the model.
//!
//! Improvements follow the 4D framework's three buckets. Product entries
//! read as free-form context; Process and Performance entries render as
//! bullet lists under their headers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementCategory {
    Product,
    Process,
    Performance,
}

/// One filled-in improvement. `id` identifies the suggestion the user picked
/// (e.g. "audience"); `text` is what they typed for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub category: ImprovementCategory,
    pub id: String,
    pub text: String,
}

const PRODUCT_HEADER: &str = "**Context & Request:**";
const PROCESS_HEADER: &str = "**Process to follow:**";
const PERFORMANCE_HEADER: &str = "**Communication approach:**";

/// Composes the enhanced prompt. Pure: same inputs, same output.
///
/// Category order is fixed (Product, Process, Performance) regardless of the
/// order entries arrive in. Blank entries are skipped; a category with no
/// non-blank entries contributes no header.
pub fn compose_prompt(basic: &str, improvements: &[Improvement]) -> String {
    let mut sections = vec![basic.to_string()];

    push_category(
        &mut sections,
        improvements,
        ImprovementCategory::Product,
        PRODUCT_HEADER,
        false,
    );
    push_category(
        &mut sections,
        improvements,
        ImprovementCategory::Process,
        PROCESS_HEADER,
        true,
    );
    push_category(
        &mut sections,
        improvements,
        ImprovementCategory::Performance,
        PERFORMANCE_HEADER,
        true,
    );

    sections.join("\n")
}

fn push_category(
    sections: &mut Vec<String>,
    improvements: &[Improvement],
    category: ImprovementCategory,
    header: &str,
    bulleted: bool,
) {
    let entries: Vec<&str> = improvements
        .iter()
        .filter(|imp| imp.category == category)
        .map(|imp| imp.text.trim())
        .filter(|text| !text.is_empty())
        .collect();

    if entries.is_empty() {
        return;
    }

    // Leading newline gives a blank line above the header once joined.
    sections.push(format!("\n{header}"));
    for text in entries {
        if bulleted {
            sections.push(format!("- {text}"));
        } else {
            sections.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imp(category: ImprovementCategory, id: &str, text: &str) -> Improvement {
        Improvement {
            category,
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_no_improvements_returns_basic_prompt() {
        assert_eq!(compose_prompt("Write a newsletter", &[]), "Write a newsletter");
    }

    #[test]
    fn test_all_three_categories_in_order() {
        let improvements = vec![
            imp(ImprovementCategory::Performance, "tone", "Warm and direct"),
            imp(ImprovementCategory::Product, "audience", "For parents of year 7 students"),
            imp(ImprovementCategory::Process, "steps", "Draft an outline first"),
        ];

        let prompt = compose_prompt("Write a newsletter", &improvements);

        assert_eq!(
            prompt,
            "Write a newsletter\n\
             \n**Context & Request:**\n\
             For parents of year 7 students\n\
             \n**Process to follow:**\n\
             - Draft an outline first\n\
             \n**Communication approach:**\n\
             - Warm and direct"
        );
    }

    #[test]
    fn test_product_entries_are_not_bulleted() {
        let improvements = vec![imp(ImprovementCategory::Product, "context", "Context line")];
        let prompt = compose_prompt("P", &improvements);
        assert!(prompt.contains("\nContext line"));
        assert!(!prompt.contains("- Context line"));
    }

    #[test]
    fn test_blank_entries_skipped_and_empty_category_omits_header() {
        let improvements = vec![
            imp(ImprovementCategory::Process, "steps", "   "),
            imp(ImprovementCategory::Performance, "tone", "Concise"),
        ];

        let prompt = compose_prompt("P", &improvements);

        assert!(!prompt.contains("**Process to follow:**"));
        assert!(prompt.contains("**Communication approach:**\n- Concise"));
    }

    #[test]
    fn test_category_lowercase_wire_form() {
        let parsed: Improvement = serde_json::from_str(
            r#"{"category":"performance","id":"tone","text":"Plain language"}"#,
        )
        .unwrap();
        assert_eq!(parsed.category, ImprovementCategory::Performance);
    }
}
