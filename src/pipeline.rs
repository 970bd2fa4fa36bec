//! Shared batch workflow for the HTTP handlers and library callers
//!
//! Combines the two core components the way batch callers need them:
//! 1. Validate each raw lead
//! 2. Score each validated lead
//! 3. Sort by descending lead score (stable: ties keep input order)
//! 4. Tally leads per priority tier
use crate::models::{BatchScoreResult, Lead, PrioritySummary, ScoredLead, ValidatedLead};
use crate::scorer::score;
use crate::validator::validate;

/// Validates every lead, preserving input order.
pub fn validate_batch(leads: &[Lead]) -> Vec<ValidatedLead> {
    leads.iter().map(validate).collect()
}

/// Validates and scores every lead, returning them best-first with tier counts.
pub fn score_batch(leads: &[Lead]) -> BatchScoreResult {
    tracing::info!("Step 1: Validating {} lead(s)", leads.len());
    let validated = validate_batch(leads);

    tracing::info!("Step 2: Scoring {} validated lead(s)", validated.len());
    let mut scored: Vec<ScoredLead> = validated.iter().map(score).collect();

    // `sort_by` is stable, so equal scores keep their input order.
    scored.sort_by(|a, b| b.lead_score.total_cmp(&a.lead_score));

    let summary = PrioritySummary::from_leads(&scored);
    tracing::info!(
        "Step 3: Scored {} lead(s): {} high, {} medium, {} low",
        summary.total_leads,
        summary.high_priority,
        summary.medium_priority,
        summary.low_priority
    );

    BatchScoreResult {
        leads: scored,
        summary,
    }
}

/// Built-in demo leads.
pub fn sample_leads() -> Vec<Lead> {
    vec![
        Lead {
            company_name: "TechCorp Solutions".to_string(),
            contact_name: "John Smith".to_string(),
            email: "john.smith@techcorp.com".to_string(),
            phone: "+1-555-123-4567".to_string(),
            industry: "Technology".to_string(),
            company_size: "50-200".to_string(),
            revenue: "10M-50M".to_string(),
            website: "https://techcorp.com".to_string(),
            linkedin: "https://linkedin.com/company/techcorp".to_string(),
            ..Lead::default()
        },
        Lead {
            company_name: "Global Manufacturing Inc".to_string(),
            contact_name: "Sarah Johnson".to_string(),
            email: "sarah.j@globalmfg.com".to_string(),
            phone: "555-987-6543".to_string(),
            industry: "Manufacturing".to_string(),
            company_size: "500+".to_string(),
            revenue: "100M+".to_string(),
            website: "https://globalmfg.com".to_string(),
            linkedin: "https://linkedin.com/company/global-manufacturing".to_string(),
            ..Lead::default()
        },
        Lead {
            company_name: "StartupXYZ".to_string(),
            contact_name: "Mike Chen".to_string(),
            email: "mike@startupxyz.io".to_string(),
            phone: "+1-555-456-7890".to_string(),
            industry: "SaaS".to_string(),
            company_size: "1-10".to_string(),
            revenue: "1M-5M".to_string(),
            website: "https://startupxyz.io".to_string(),
            linkedin: "https://linkedin.com/company/startupxyz".to_string(),
            ..Lead::default()
        },
    ]
}
