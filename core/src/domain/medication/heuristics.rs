use std::sync::LazyLock;

use regex::Regex;

use crate::domain::medication::entities::MedicationRecord;

static DOSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:[.,]\d+)?\s?(?:mcg|mg|ml|g|units)\b").expect("valid dosage regex")
});

static FREQUENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:once daily|twice daily|every \d+ (?:hours|hrs)|daily|every day|at bedtime|as needed|prn|weekly|monthly)\b",
    )
    .expect("valid frequency regex")
});

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.|-|•|\*)").expect("valid list item regex"));

static WARNING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)warning|caution|avoid|do not|risk|contraindicat")
        .expect("valid warning regex")
});

static SIDE_EFFECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)side effect|nausea|dizziness|headache|rash|allergic")
        .expect("valid side effect regex")
});

/// Lines 2 through 8 are considered for instructions.
const INSTRUCTION_WINDOW: std::ops::Range<usize> = 1..8;

/// Best-effort field extraction from raw label text (usually OCR output).
///
/// Pure and infallible: empty input gives the empty record.
pub fn extract_medication_fields(text: &str) -> MedicationRecord {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let medication_name = lines.first().map(|l| l.to_string()).unwrap_or_default();

    let dosage = DOSAGE_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let frequency = FREQUENCY_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let window_end = INSTRUCTION_WINDOW.end.min(lines.len());
    let instructions = lines
        .get(INSTRUCTION_WINDOW.start.min(window_end)..window_end)
        .unwrap_or_default()
        .iter()
        .filter(|line| LIST_ITEM_RE.is_match(line) || line.split_whitespace().count() > 3)
        .map(|line| line.to_string())
        .collect();

    let warnings = matching_lines(&lines, &WARNING_RE);
    let side_effects = matching_lines(&lines, &SIDE_EFFECT_RE);

    let plain_language = lines.iter().take(2).copied().collect::<Vec<_>>().join(" ");

    MedicationRecord {
        medication_name,
        generic_name: String::new(),
        dosage,
        frequency,
        instructions,
        warnings,
        side_effects,
        plain_language,
    }
}

fn matching_lines(lines: &[&str], pattern: &Regex) -> Vec<String> {
    lines
        .iter()
        .filter(|line| pattern.is_match(line))
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_record() {
        assert_eq!(extract_medication_fields(""), MedicationRecord::default());
        assert_eq!(extract_medication_fields("   "), MedicationRecord::default());
        assert_eq!(extract_medication_fields("\n \n\t\n"), MedicationRecord::default());
    }

    #[test]
    fn test_amoxicillin_label() {
        let record = extract_medication_fields(
            "Amoxicillin 500mg\nTake twice daily\n1. With food\n2. Avoid alcohol",
        );

        assert_eq!(record.medication_name, "Amoxicillin 500mg");
        assert_eq!(record.dosage, "500mg");
        assert_eq!(record.frequency, "twice daily");
        assert_eq!(record.instructions, vec!["1. With food", "2. Avoid alcohol"]);
        assert_eq!(record.warnings, vec!["2. Avoid alcohol"]);
        assert!(record.side_effects.is_empty());
        assert_eq!(record.plain_language, "Amoxicillin 500mg Take twice daily");
        assert_eq!(record.generic_name, "");
    }

    #[test]
    fn test_dosage_units_and_case() {
        assert_eq!(extract_medication_fields("Vitamin D 1000 UNITS").dosage, "1000 UNITS");
        assert_eq!(extract_medication_fields("Syrup 5 ml per dose").dosage, "5 ml");
        assert_eq!(extract_medication_fields("Levothyroxine 50mcg").dosage, "50mcg");
        assert_eq!(extract_medication_fields("No numbers here").dosage, "");
        assert_eq!(extract_medication_fields("Lisinopril10mg").dosage, "10mg");
        assert_eq!(extract_medication_fields("Tab500mg daily").dosage, "500mg");
    }

    #[test]
    fn test_frequency_vocabulary() {
        assert_eq!(
            extract_medication_fields("Take 1 tablet every 6 hours").frequency,
            "every 6 hours"
        );
        assert_eq!(extract_medication_fields("Use PRN for pain").frequency, "PRN");
        assert_eq!(extract_medication_fields("Apply at bedtime").frequency, "at bedtime");
        assert_eq!(extract_medication_fields("Take with water").frequency, "");
    }

    #[test]
    fn test_instructions_only_from_lines_two_to_eight() {
        let text = "- first line bullet\n\
                    - second\n\
                    short\n\
                    this line has five words\n\
                    l5\nl6\nl7\nl8\n\
                    - ninth line is ignored";
        let record = extract_medication_fields(text);
        assert_eq!(record.instructions, vec!["- second", "this line has five words"]);
    }

    #[test]
    fn test_warnings_and_side_effects() {
        let text = "Ibuprofen 200mg\n\
                    WARNING: may cause stomach bleeding\n\
                    Do not use with other NSAIDs\n\
                    Side effects: nausea, headache\n\
                    Stop if you get a rash";
        let record = extract_medication_fields(text);
        assert_eq!(
            record.warnings,
            vec![
                "WARNING: may cause stomach bleeding",
                "Do not use with other NSAIDs"
            ]
        );
        assert_eq!(
            record.side_effects,
            vec!["Side effects: nausea, headache", "Stop if you get a rash"]
        );
    }

    #[test]
    fn test_single_line_plain_language() {
        let record = extract_medication_fields("  Aspirin  ");
        assert_eq!(record.medication_name, "Aspirin");
        assert_eq!(record.plain_language, "Aspirin");
        assert!(record.instructions.is_empty());
    }
}
