/// Unit tests for lead scoring
/// Tests end-to-end scoring, priority tiers and recommendation rules
use lead_enhancer_api::models::{Lead, PriorityLevel, DERIVED_FIELDS};
use lead_enhancer_api::pipeline::{sample_leads, score_batch};
use lead_enhancer_api::{score, validate};

fn techcorp() -> Lead {
    Lead {
        company_name: "TechCorp Solutions".to_string(),
        industry: "Technology".to_string(),
        company_size: "50-200".to_string(),
        revenue: "10M-50M".to_string(),
        email: "john.smith@techcorp.com".to_string(),
        phone: "+1-555-123-4567".to_string(),
        linkedin: "https://linkedin.com/company/techcorp".to_string(),
        ..Lead::default()
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_sample_record_is_high_priority() {
        let scored = score(&validate(&techcorp()));

        assert_close(scored.score_breakdown.company, 81.0);
        assert_close(scored.score_breakdown.contact, 85.0);
        assert_close(scored.score_breakdown.engagement, 100.0);
        assert_eq!(scored.lead_score, 80.12);
        assert_eq!(scored.priority_level, PriorityLevel::High);
    }

    #[test]
    fn test_sample_record_recommendations() {
        let scored = score(&validate(&techcorp()));

        assert_eq!(
            scored.recommendations,
            vec![
                "Complete missing information: Website",
                "High-value lead - prioritize for immediate outreach",
            ]
        );
    }

    #[test]
    fn test_rescoring_scored_record_emits_each_key_once() {
        let first = score(&validate(&techcorp()));
        let resubmitted: Lead =
            serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();

        let second = score(&validate(&resubmitted));
        let json = serde_json::to_string(&second).unwrap();

        for key in DERIVED_FIELDS {
            assert_eq!(
                json.matches(&format!("\"{}\":", key)).count(),
                1,
                "key {} repeated",
                key
            );
        }
        assert_eq!(second.lead_score, first.lead_score);
        assert!(second.validated.lead.extra.is_empty());
    }

    #[test]
    fn test_scored_lead_keeps_validation_output() {
        let scored = score(&validate(&techcorp()));

        assert_eq!(scored.validated.lead.company_size, "51-200");
        assert!(scored.validated.validation_flags.has_valid_email);
        assert!(!scored.validated.validation_flags.has_website);
    }
}

#[cfg(test)]
mod tier_tests {
    use super::*;

    #[test]
    fn test_empty_lead_is_low_priority() {
        let scored = score(&validate(&Lead::default()));

        // Only the "Other" industry default contributes
        assert_close(scored.score_breakdown.company, 50.0);
        assert_close(scored.score_breakdown.contact, 0.0);
        assert_eq!(scored.priority_level, PriorityLevel::Low);
        assert_eq!(
            scored.recommendations,
            vec![
                "Consider targeting companies in high-growth industries like Technology or SaaS",
                "Verify and update email address for better contact quality",
                "Add valid phone number to improve contact score",
                "Find and add LinkedIn profile for better engagement",
                "Complete missing information: Company Size, Revenue, Website",
                "This lead may require more nurturing before direct outreach",
            ]
        );
    }

    #[test]
    fn test_high_value_rule_fires_in_medium_tier() {
        let manufacturing = sample_leads()
            .into_iter()
            .find(|lead| lead.industry == "Manufacturing")
            .unwrap();
        let scored = score(&validate(&manufacturing));

        assert_close(scored.score_breakdown.company, 85.0);
        assert_close(scored.score_breakdown.contact, 100.0);
        assert_eq!(scored.lead_score, 79.56);
        assert_eq!(scored.priority_level, PriorityLevel::Medium);
        assert_eq!(
            scored.recommendations,
            vec![
                "This lead may require more nurturing before direct outreach",
                "High-value lead - prioritize for immediate outreach",
            ]
        );
    }
}

#[cfg(test)]
mod recommendation_tests {
    use super::*;

    #[test]
    fn test_completion_hint_omitted_when_named_fields_present() {
        let lead = Lead {
            company_name: "Acme".to_string(),
            company_size: "51-200".to_string(),
            revenue: "1M-5M".to_string(),
            website: "https://acme.com".to_string(),
            ..Lead::default()
        };

        let scored = score(&validate(&lead));

        // Required fields are missing; the hint only looks at its own three
        assert!(scored.score_breakdown.completeness < 70.0);
        assert!(!scored
            .recommendations
            .iter()
            .any(|line| line.starts_with("Complete missing information")));
    }
}

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[test]
    fn test_batch_summary_counts_every_lead() {
        let mut leads = sample_leads();
        leads.push(techcorp());
        leads.push(Lead::default());

        let result = score_batch(&leads);

        assert_eq!(result.summary.total_leads, 5);
        assert_eq!(
            result.summary.high_priority
                + result.summary.medium_priority
                + result.summary.low_priority,
            5
        );
        assert!(result.summary.low_priority >= 1);
        assert_eq!(result.leads.last().unwrap().priority_level, PriorityLevel::Low);
    }
}
