/// Unit tests for lead validation
/// Tests field normalization, contact checks and the data-quality score
use lead_enhancer_api::models::{Deliverability, Lead};
use lead_enhancer_api::validator::{
    standardize_company_size, standardize_revenue, validate, validate_email, REVENUE_BUCKETS,
    SIZE_BUCKETS,
};

fn raw_lead() -> Lead {
    Lead {
        company_name: "  Acme   Widgets Inc ".to_string(),
        contact_name: "jane   DOE".to_string(),
        email: " Jane.Doe@AcmeWidgets.COM ".to_string(),
        phone: "(555) 987-6543".to_string(),
        industry: "b2b software".to_string(),
        company_size: "75 employees".to_string(),
        revenue: "$2.5M".to_string(),
        website: "acmewidgets.com".to_string(),
        linkedin: "linkedin.com/company/acme-widgets".to_string(),
        ..Lead::default()
    }
}

#[cfg(test)]
mod normalization_tests {
    use super::*;

    #[test]
    fn test_revenue_examples() {
        assert_eq!(standardize_revenue("$2.5M"), "1M-5M");
        assert_eq!(standardize_revenue("15000000"), "10M-50M");
        assert_eq!(standardize_revenue("500K"), "0-1M");
    }

    #[test]
    fn test_company_size_examples() {
        assert_eq!(standardize_company_size("75 employees"), "51-200");
        assert_eq!(standardize_company_size("enterprise"), "500+");
    }

    #[test]
    fn test_canonical_buckets_are_fixed_points() {
        for bucket in SIZE_BUCKETS {
            assert_eq!(standardize_company_size(bucket), *bucket);
        }
        for bucket in REVENUE_BUCKETS {
            assert_eq!(standardize_revenue(bucket), *bucket);
        }
    }

    #[test]
    fn test_validate_normalizes_every_field() {
        let validated = validate(&raw_lead());
        let lead = &validated.lead;

        assert_eq!(lead.company_name, "Acme Widgets");
        assert_eq!(lead.contact_name, "Jane Doe");
        assert_eq!(lead.email, "jane.doe@acmewidgets.com");
        assert_eq!(lead.phone, "(555) 987-6543");
        assert_eq!(lead.industry, "Software");
        assert_eq!(lead.company_size, "51-200");
        assert_eq!(lead.revenue, "1M-5M");
        assert_eq!(lead.website, "https://acmewidgets.com");
        assert_eq!(lead.linkedin, "https://linkedin.com/company/acme-widgets");
    }
}

#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn test_mixed_case_email() {
        let check = validate_email("JOHN@Example.COM");
        assert_eq!(check.value, "john@example.com");
        assert!(check.is_valid);
        assert_eq!(check.deliverability, Some(Deliverability::Medium));
    }

    #[test]
    fn test_invalid_email_is_reported_not_rejected() {
        let lead = Lead {
            email: "not an email".to_string(),
            ..Lead::default()
        };
        let validated = validate(&lead);

        assert_eq!(validated.lead.email, "not an email");
        assert!(!validated.validation_details.email.is_valid);
        assert_eq!(
            validated.validation_details.email.deliverability,
            Some(Deliverability::Invalid)
        );
        // The cheap flag only checks for presence of '@'
        assert!(!validated.validation_flags.has_valid_email);
    }
}

#[cfg(test)]
mod quality_tests {
    use super::*;

    #[test]
    fn test_complete_lead_scores_100() {
        let validated = validate(&raw_lead());
        assert_eq!(validated.data_quality_score, 100.0);
    }

    #[test]
    fn test_empty_lead_keeps_only_industry_flag() {
        let validated = validate(&Lead::default());

        // Empty industry normalizes to "Other", which counts as present
        assert_eq!(validated.lead.industry, "Other");
        assert!(validated.validation_flags.has_industry);
        assert_eq!(validated.data_quality_score, 10.0);
    }

    #[test]
    fn test_partial_lead_weighted_sum() {
        let lead = Lead {
            company_name: "Acme".to_string(),
            email: "sales@acme.com".to_string(),
            ..Lead::default()
        };
        let validated = validate(&lead);

        // email 25 + company 15 + industry ("Other") 10
        assert_eq!(validated.data_quality_score, 50.0);
    }

    #[test]
    fn test_cheap_phone_flag_diverges_from_validator() {
        let lead = Lead {
            phone: "12345abcde".to_string(),
            ..Lead::default()
        };
        let validated = validate(&lead);

        assert!(validated.validation_flags.has_valid_phone);
        assert!(!validated.validation_details.phone.is_valid);
    }
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    #[test]
    fn test_revalidating_is_a_fixed_point() {
        let once = validate(&raw_lead());
        let twice = validate(&once.lead);

        assert_eq!(once.lead, twice.lead);
        assert_eq!(once.validation_flags, twice.validation_flags);
        assert_eq!(once.data_quality_score, twice.data_quality_score);
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let mut lead = raw_lead();
        lead.extra
            .insert("crm_id".to_string(), serde_json::json!("L-1042"));

        let validated = validate(&lead);
        assert_eq!(validated.lead.extra["crm_id"], "L-1042");
    }
}
