/// Lead value scoring
///
/// Scores an already-validated lead on four weighted dimensions:
/// - Company attractiveness (industry, size, revenue) - 40%
/// - Contact quality (email, phone, LinkedIn, name, website) - 30%
/// - Data completeness - 20%
/// - Engagement potential - 10%
///
/// The total maps onto a priority tier, and a fixed list of independent
/// rules turns weak (or strong) sub-scores into recommendations.
use crate::models::{
    Lead, LeadField, LeadScore, PriorityLevel, ScoreBreakdown, ScoredLead, ValidatedLead,
};
use crate::validator::{is_valid_url, round2};
use once_cell::sync::Lazy;
use regex::Regex;

/// Industry value for B2B sales, matched as substrings of the lower-cased
/// industry. The first match wins.
pub static INDUSTRY_WEIGHTS: &[(&str, f64)] = &[
    ("Technology", 0.9),
    ("SaaS", 0.95),
    ("Software", 0.9),
    ("Fintech", 0.85),
    ("Healthcare", 0.8),
    ("Manufacturing", 0.7),
    ("Retail", 0.6),
    ("Real Estate", 0.5),
    ("Education", 0.6),
    ("Consulting", 0.7),
    ("Other", 0.5),
];

/// Revenue potential by employee bucket (exact match).
pub static SIZE_WEIGHTS: &[(&str, f64)] = &[
    ("1-10", 0.3),
    ("11-50", 0.5),
    ("51-200", 0.7),
    ("201-500", 0.8),
    ("500+", 0.9),
];

/// Value by revenue bucket (exact match).
pub static REVENUE_WEIGHTS: &[(&str, f64)] = &[
    ("0-1M", 0.2),
    ("1M-5M", 0.4),
    ("5M-10M", 0.6),
    ("10M-50M", 0.8),
    ("50M-100M", 0.9),
    ("100M+", 1.0),
];

/// Weight used when a table has no entry for the lead's value.
pub const DEFAULT_TABLE_WEIGHT: f64 = 0.5;

const INDUSTRY_POINTS: f64 = 40.0;
const SIZE_POINTS: f64 = 30.0;
const REVENUE_POINTS: f64 = 30.0;

pub const COMPANY_WEIGHT: f64 = 0.4;
pub const CONTACT_WEIGHT: f64 = 0.3;
pub const COMPLETENESS_WEIGHT: f64 = 0.2;
pub const ENGAGEMENT_WEIGHT: f64 = 0.1;

static PERSONAL_EMAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com"];

static REQUIRED_FIELDS: &[LeadField] = &[
    LeadField::CompanyName,
    LeadField::ContactName,
    LeadField::Email,
    LeadField::Phone,
    LeadField::Industry,
];

static OPTIONAL_FIELDS: &[LeadField] = &[
    LeadField::Website,
    LeadField::Linkedin,
    LeadField::CompanySize,
    LeadField::Revenue,
];

const OPTIONAL_FIELD_WEIGHT: f64 = 0.5;

/// Tokens that make a company name sound established.
static PROFESSIONAL_INDICATORS: &[&str] = &[
    "inc",
    "corp",
    "llc",
    "ltd",
    "solutions",
    "systems",
    "technologies",
    "group",
];

static HIGH_GROWTH_INDUSTRIES: &[&str] = &[
    "technology",
    "saas",
    "software",
    "fintech",
    "ai",
    "machine learning",
];

/// Employee buckets in the B2B sales sweet spot.
static GROWTH_STAGE_SIZES: &[&str] = &["51-200", "201-500"];

static STRICT_EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("strict email regex is valid")
});

fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL_REGEX.is_match(email)
}

/// 10 to 15 digits once every non-digit is dropped.
fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=15).contains(&digits)
}

fn table_weight(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_TABLE_WEIGHT)
}

/// Company attractiveness, 0-100.
pub fn company_score(lead: &Lead) -> f64 {
    let industry = lead.industry.to_lowercase();
    let industry_weight = INDUSTRY_WEIGHTS
        .iter()
        .find(|(key, _)| industry.contains(&key.to_lowercase()))
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_TABLE_WEIGHT);

    let size_weight = table_weight(SIZE_WEIGHTS, &lead.company_size);
    let revenue_weight = table_weight(REVENUE_WEIGHTS, &lead.revenue);

    let score = industry_weight * INDUSTRY_POINTS
        + size_weight * SIZE_POINTS
        + revenue_weight * REVENUE_POINTS;

    score.min(100.0)
}

/// Contact quality, 0-100.
pub fn contact_score(lead: &Lead) -> f64 {
    let mut score = 0.0;

    if !lead.email.is_empty() {
        if is_valid_email(&lead.email) {
            score += 30.0;
            let email = lead.email.to_lowercase();
            if PERSONAL_EMAIL_DOMAINS
                .iter()
                .any(|domain| email.contains(domain))
            {
                score += 5.0;
            } else {
                score += 15.0;
            }
        } else {
            score += 5.0;
        }
    }

    if !lead.phone.is_empty() && is_valid_phone(&lead.phone) {
        score += 20.0;
    }

    if !lead.linkedin.is_empty() && lead.linkedin.to_lowercase().contains("linkedin.com") {
        score += 20.0;
    }

    if lead.contact_name.split_whitespace().count() >= 2 {
        score += 15.0;
    } else if !lead.contact_name.is_empty() {
        score += 10.0;
    }

    if !lead.website.is_empty() && is_valid_url(&lead.website) {
        score += 15.0;
    }

    f64::min(score, 100.0)
}

/// Share of populated fields, 0-100. Optional fields count half.
pub fn completeness_score(lead: &Lead) -> f64 {
    let total_fields = (REQUIRED_FIELDS.len() + OPTIONAL_FIELDS.len()) as f64;

    let required = REQUIRED_FIELDS
        .iter()
        .filter(|field| lead.has(**field))
        .count() as f64;
    let optional = OPTIONAL_FIELDS
        .iter()
        .filter(|field| lead.has(**field))
        .count() as f64
        * OPTIONAL_FIELD_WEIGHT;

    (required + optional) / total_fields * 100.0
}

/// Engagement potential, 0-100.
pub fn engagement_score(lead: &Lead) -> f64 {
    let mut score = 0.0;

    let company_name = lead.company_name.to_lowercase();
    if PROFESSIONAL_INDICATORS
        .iter()
        .any(|indicator| company_name.contains(indicator))
    {
        score += 30.0;
    }

    let industry = lead.industry.to_lowercase();
    if HIGH_GROWTH_INDUSTRIES
        .iter()
        .any(|keyword| industry.contains(keyword))
    {
        score += 40.0;
    }

    if GROWTH_STAGE_SIZES.contains(&lead.company_size.as_str()) {
        score += 30.0;
    }

    f64::min(score, 100.0)
}

/// Weighted total of the four sub-scores, rounded to two decimals.
pub fn total_score(breakdown: &ScoreBreakdown) -> f64 {
    round2(
        breakdown.company * COMPANY_WEIGHT
            + breakdown.contact * CONTACT_WEIGHT
            + breakdown.completeness * COMPLETENESS_WEIGHT
            + breakdown.engagement * ENGAGEMENT_WEIGHT,
    )
}

pub fn score_breakdown(lead: &Lead) -> ScoreBreakdown {
    ScoreBreakdown {
        company: company_score(lead),
        contact: contact_score(lead),
        completeness: completeness_score(lead),
        engagement: engagement_score(lead),
    }
}

// ============ Recommendations ============

/// One independent recommendation rule.
///
/// `applies` gates the rule on the score breakdown; `messages` produces its
/// text from the lead (zero or more lines).
pub struct RecommendationRule {
    pub name: &'static str,
    pub applies: fn(&ScoreBreakdown) -> bool,
    pub messages: fn(&Lead) -> Vec<String>,
}

/// Rules in evaluation order. Several may fire for the same lead.
pub static RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        name: "weak_company",
        applies: weak_company,
        messages: industry_recommendations,
    },
    RecommendationRule {
        name: "weak_contact",
        applies: weak_contact,
        messages: contact_recommendations,
    },
    RecommendationRule {
        name: "incomplete",
        applies: incomplete,
        messages: completeness_recommendations,
    },
    RecommendationRule {
        name: "low_engagement",
        applies: low_engagement,
        messages: nurture_recommendations,
    },
    RecommendationRule {
        name: "high_value",
        applies: high_value,
        messages: outreach_recommendations,
    },
];

fn weak_company(scores: &ScoreBreakdown) -> bool {
    scores.company < 60.0
}

fn weak_contact(scores: &ScoreBreakdown) -> bool {
    scores.contact < 50.0
}

fn incomplete(scores: &ScoreBreakdown) -> bool {
    scores.completeness < 70.0
}

fn low_engagement(scores: &ScoreBreakdown) -> bool {
    scores.engagement < 50.0
}

// Can fire for leads outside the High tier.
fn high_value(scores: &ScoreBreakdown) -> bool {
    scores.company >= 80.0 && scores.contact >= 70.0
}

fn industry_recommendations(_: &Lead) -> Vec<String> {
    vec!["Consider targeting companies in high-growth industries like Technology or SaaS".to_string()]
}

fn nurture_recommendations(_: &Lead) -> Vec<String> {
    vec!["This lead may require more nurturing before direct outreach".to_string()]
}

fn outreach_recommendations(_: &Lead) -> Vec<String> {
    vec!["High-value lead - prioritize for immediate outreach".to_string()]
}

fn contact_recommendations(lead: &Lead) -> Vec<String> {
    let mut messages = Vec::new();

    if lead.email.is_empty() || !is_valid_email(&lead.email) {
        messages.push("Verify and update email address for better contact quality".to_string());
    }
    if lead.phone.is_empty() || !is_valid_phone(&lead.phone) {
        messages.push("Add valid phone number to improve contact score".to_string());
    }
    if lead.linkedin.is_empty() {
        messages.push("Find and add LinkedIn profile for better engagement".to_string());
    }

    messages
}

// Only these three are named, even when other fields drag completeness down.
static COMPLETION_HINT_FIELDS: &[LeadField] = &[
    LeadField::CompanySize,
    LeadField::Revenue,
    LeadField::Website,
];

fn completeness_recommendations(lead: &Lead) -> Vec<String> {
    let missing: Vec<String> = COMPLETION_HINT_FIELDS
        .iter()
        .filter(|field| lead.get(**field).is_empty())
        .map(|field| field.label())
        .collect();

    if missing.is_empty() {
        Vec::new()
    } else {
        vec![format!(
            "Complete missing information: {}",
            missing.join(", ")
        )]
    }
}

/// Runs every rule in order and concatenates the messages of those that fire.
pub fn generate_recommendations(lead: &Lead, breakdown: &ScoreBreakdown) -> Vec<String> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(breakdown))
        .flat_map(|rule| {
            tracing::trace!("Recommendation rule '{}' fired", rule.name);
            (rule.messages)(lead)
        })
        .collect()
}

// ============ Entry Points ============

/// Scores the fields of a (normalized) lead.
pub fn calculate_score(lead: &Lead) -> LeadScore {
    let breakdown = score_breakdown(lead);
    let total_score = total_score(&breakdown);
    let priority_level = PriorityLevel::from_score(total_score);
    let recommendations = generate_recommendations(lead, &breakdown);

    tracing::debug!(
        "Scored lead '{}': total={} ({}) company={:.1} contact={:.1} completeness={:.1} engagement={:.1}",
        lead.company_name,
        total_score,
        priority_level,
        breakdown.company,
        breakdown.contact,
        breakdown.completeness,
        breakdown.engagement
    );

    LeadScore {
        total_score,
        breakdown,
        priority_level,
        recommendations,
    }
}

/// Scores a validated lead and merges the result onto a copy of it.
///
/// Never fails: missing fields fall back to the tables' default weights.
pub fn score(validated: &ValidatedLead) -> ScoredLead {
    let LeadScore {
        total_score,
        breakdown,
        priority_level,
        recommendations,
    } = calculate_score(&validated.lead);

    let mut validated = validated.clone();
    validated.lead.extra = validated.lead.pass_through_fields();

    ScoredLead {
        validated,
        lead_score: total_score,
        score_breakdown: breakdown,
        priority_level,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_lead() -> Lead {
        Lead {
            company_name: "Acme Systems".to_string(),
            contact_name: "Jane Doe".to_string(),
            email: "jane@acme.com".to_string(),
            phone: "+1 415 555 0100".to_string(),
            industry: "SaaS".to_string(),
            company_size: "201-500".to_string(),
            revenue: "100M+".to_string(),
            website: "https://acme.com".to_string(),
            linkedin: "https://linkedin.com/company/acme".to_string(),
            ..Lead::default()
        }
    }

    #[test]
    fn test_company_score_tables() {
        let lead = full_lead();
        // 0.95*40 + 0.8*30 + 1.0*30
        assert!((company_score(&lead) - 92.0).abs() < 1e-9);

        // Unknown values default to 0.5 everywhere.
        assert!((company_score(&Lead::default()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_industry_first_match_wins() {
        let lead = Lead {
            industry: "Technology Consulting".to_string(),
            ..Lead::default()
        };
        // Technology (0.9) is checked before Consulting (0.7).
        assert!((company_score(&lead) - (36.0 + 15.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn test_contact_score_components() {
        assert_eq!(contact_score(&full_lead()), 100.0);

        let personal = Lead {
            email: "jane@gmail.com".to_string(),
            ..Lead::default()
        };
        assert_eq!(contact_score(&personal), 35.0);

        let invalid = Lead {
            email: "jane-at-acme".to_string(),
            contact_name: "Jane".to_string(),
            ..Lead::default()
        };
        assert_eq!(contact_score(&invalid), 15.0);

        assert_eq!(contact_score(&Lead::default()), 0.0);
    }

    #[test]
    fn test_completeness_weights_optional_fields_half() {
        assert!((completeness_score(&full_lead()) - 100.0).abs() < 1e-9);

        let required_only = Lead {
            website: String::new(),
            linkedin: String::new(),
            company_size: String::new(),
            revenue: String::new(),
            ..full_lead()
        };
        assert!((completeness_score(&required_only) - 500.0 / 9.0).abs() < 1e-9);

        let blank = Lead {
            company_name: "   ".to_string(),
            ..Lead::default()
        };
        assert_eq!(completeness_score(&blank), 0.0);
    }

    #[test]
    fn test_engagement_max_is_100() {
        assert_eq!(engagement_score(&full_lead()), 100.0);
        assert_eq!(engagement_score(&Lead::default()), 0.0);
    }

    #[test]
    fn test_missing_fields_message() {
        let lead = Lead {
            company_name: "Acme".to_string(),
            ..Lead::default()
        };
        let breakdown = score_breakdown(&lead);
        let recommendations = generate_recommendations(&lead, &breakdown);

        assert!(recommendations
            .contains(&"Complete missing information: Company Size, Revenue, Website".to_string()));
    }

    #[test]
    fn test_high_value_rule_fires_below_high_tier() {
        let breakdown = ScoreBreakdown {
            company: 80.0,
            contact: 70.0,
            completeness: 40.0,
            engagement: 0.0,
        };
        let total = total_score(&breakdown);
        assert_eq!(total, 61.0);
        assert_eq!(PriorityLevel::from_score(total), PriorityLevel::Medium);

        let recommendations = generate_recommendations(&full_lead(), &breakdown);
        assert_eq!(
            recommendations.last().map(String::as_str),
            Some("High-value lead - prioritize for immediate outreach")
        );
    }

    #[test]
    fn test_rules_evaluated_in_order() {
        let names: Vec<&str> = RECOMMENDATION_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec![
                "weak_company",
                "weak_contact",
                "incomplete",
                "low_engagement",
                "high_value"
            ]
        );
    }
}
