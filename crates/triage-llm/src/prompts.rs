//! Triage prompt composition.
//!
//! The prompt is a single user-role message; the hosted model receives no
//! separate system prompt.

/// Delimiter used to render the symptom list.
pub const SYMPTOM_DELIMITER: &str = ", ";

/// Symptom slot text when the patient named nothing.
pub const NO_SYMPTOMS: &str = "no specific symptoms";

/// Render an ordered symptom list for the prompt.
pub fn render_symptoms(symptoms: &[String]) -> String {
    if symptoms.is_empty() {
        NO_SYMPTOMS.to_string()
    } else {
        symptoms.join(SYMPTOM_DELIMITER)
    }
}

/// Build the triage instruction block.
///
/// Deterministic: the same arguments always produce byte-identical output.
pub fn compose_prompt(
    leaflet: &str,
    side_effects: &str,
    symptoms: &[String],
    summary: Option<&str>,
) -> String {
    let symptoms = render_symptoms(symptoms);

    let mut prompt = String::new();
    prompt.push_str("Instructions for the Model:\n\n");
    prompt.push_str(
        "I am giving you a large block of text that contains both drug information \
         (medicine leaflet) and a patient's symptoms. Based on this information, analyze \
         whether the symptoms described are typical side effects of the drug or if they \
         indicate something unusual that may require medical attention.\n\n",
    );

    prompt.push_str("Big Text Block:\n");
    prompt.push_str(leaflet);
    prompt.push_str("\n\n");

    prompt.push_str("Side effects:\n");
    prompt.push_str(side_effects);
    prompt.push_str("\n\n");

    if let Some(summary) = summary {
        prompt.push_str("Patient Summary:\n");
        prompt.push_str(summary);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Patient Query:\n\n");
    prompt.push_str(&format!(
        "The patient said, \"I have {}. Should I be worried?\"\n\n",
        symptoms
    ));

    prompt.push_str("Model's Task:\n\n");
    prompt.push_str(&format!(
        "Analyze the Symptoms: Check if {} are listed as common side effects in the leaflet.\n",
        symptoms
    ));
    if summary.is_some() {
        prompt.push_str(
            "Take the patient summary into account when judging how serious the symptoms are.\n",
        );
    }
    prompt.push_str("Provide a Short Answer:\n");
    prompt.push_str(&format!(
        "- If common: State that these symptoms are **NORMAL** side effects of {}, but suggest \
         monitoring and consulting a doctor if symptoms persist.\n",
        leaflet
    ));
    prompt.push_str(
        "- If uncommon: State that these symptoms are not common, advise **STOPPING** the \
         medication, and suggest seeking medical help immediately.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn symptoms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prompt_contains_facts_verbatim() {
        let prompt = compose_prompt(
            "Ibuprofen 400mg",
            "nausea, heartburn; rarely: black stools",
            &symptoms(&["headache", "nausea"]),
            None,
        );
        assert!(prompt.contains("Ibuprofen 400mg"));
        assert!(prompt.contains("nausea, heartburn; rarely: black stools"));
        assert!(prompt.contains("headache, nausea"));
        assert!(prompt.contains("**NORMAL**"));
        assert!(prompt.contains("**STOPPING**"));
    }

    #[test]
    fn test_summary_block_is_optional() {
        let without = compose_prompt("L", "S", &symptoms(&["rash"]), None);
        assert!(!without.contains("Patient Summary:"));

        let with = compose_prompt("L", "S", &symptoms(&["rash"]), Some("Type 2 diabetic"));
        assert!(with.contains("Patient Summary:\nType 2 diabetic"));
    }

    #[test]
    fn test_empty_symptom_list() {
        let prompt = compose_prompt("L", "S", &[], None);
        assert!(prompt.contains("I have no specific symptoms. Should I be worried?"));
    }

    #[test]
    fn test_section_order() {
        let prompt = compose_prompt("LEAFLET", "EFFECTS", &symptoms(&["cough"]), Some("SUMMARY"));
        let leaflet = prompt.find("LEAFLET").unwrap();
        let effects = prompt.find("EFFECTS").unwrap();
        let summary = prompt.find("SUMMARY").unwrap();
        let task = prompt.find("Model's Task:").unwrap();
        assert!(leaflet < effects && effects < summary && summary < task);
    }

    #[test]
    fn test_render_symptoms() {
        assert_eq!(render_symptoms(&symptoms(&["a"])), "a");
        assert_eq!(render_symptoms(&symptoms(&["a", "b", "c"])), "a, b, c");
        assert_eq!(render_symptoms(&[]), NO_SYMPTOMS);
    }

    proptest! {
        #[test]
        fn prop_compose_is_deterministic(
            leaflet in ".{0,40}",
            side_effects in ".{0,80}",
            list in prop::collection::vec("[a-z ]{1,12}", 0..6),
            summary in prop::option::of(".{0,40}"),
        ) {
            let a = compose_prompt(&leaflet, &side_effects, &list, summary.as_deref());
            let b = compose_prompt(&leaflet, &side_effects, &list, summary.as_deref());
            prop_assert_eq!(&a, &b);
            prop_assert!(a.contains(&leaflet));
            prop_assert!(a.contains(&side_effects));
        }
    }
}
