use crate::features::reports::models::Severity;

/// Keyword rules in priority order. The first rule with a keyword contained in
/// the lower-cased text wins; anything unmatched is `Severity::Minor`.
pub const SEVERITY_RULES: &[(Severity, &[&str])] = &[
    (
        Severity::Severe,
        &[
            "death",
            "fatal",
            "collapsed",
            "major",
            "catastrophic",
            "explosion",
        ],
    ),
    (
        Severity::Moderate,
        &[
            "injury",
            "damaged",
            "flood",
            "fire",
            "earthquake",
            "moderate",
        ],
    ),
];

/// Rule-based severity classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityClassifier;

impl SeverityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify free text by substring keyword presence
    pub fn classify(&self, description: &str) -> Severity {
        let text = description.to_lowercase();

        SEVERITY_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(severity, _)| *severity)
            .unwrap_or(Severity::Minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severe_outranks_moderate() {
        let classifier = SeverityClassifier::new();
        assert_eq!(
            classifier.classify("A catastrophic explosion caused major damage"),
            Severity::Severe
        );
        assert_eq!(
            classifier.classify("Flood waters, one fatal accident"),
            Severity::Severe
        );
    }

    #[test]
    fn test_priority_not_position_decides() {
        // "minor" appears first in the text but has no rule; "injury" is Moderate
        assert_eq!(
            SeverityClassifier::new().classify("minor scrape, no real injury"),
            Severity::Moderate
        );
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = SeverityClassifier::new();
        assert_eq!(classifier.classify("BUILDING COLLAPSED"), Severity::Severe);
        assert_eq!(classifier.classify("Small Fire in kitchen"), Severity::Moderate);
    }

    #[test]
    fn test_substring_matching() {
        // "fireworks" contains "fire"
        assert_eq!(
            SeverityClassifier::new().classify("loud fireworks downtown"),
            Severity::Moderate
        );
    }

    #[test]
    fn test_defaults_to_minor() {
        let classifier = SeverityClassifier::new();
        assert_eq!(classifier.classify(""), Severity::Minor);
        assert_eq!(classifier.classify("tree branch on the road"), Severity::Minor);
    }

    #[test]
    fn test_every_keyword_maps_to_its_tier() {
        let classifier = SeverityClassifier::new();
        for (severity, keywords) in SEVERITY_RULES {
            for keyword in *keywords {
                assert_eq!(classifier.classify(keyword), *severity, "{}", keyword);
            }
        }
    }
}
