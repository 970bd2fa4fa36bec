use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============ Lead Records ============

/// Named fields of a lead record.
///
/// Used wherever a rule needs to address a field by name (completeness
/// accounting, recommendation messages, flag derivation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    CompanyName,
    ContactName,
    Email,
    Phone,
    Industry,
    CompanySize,
    Revenue,
    Website,
    Linkedin,
}

impl LeadField {
    /// Wire name of the field (`company_size`, `linkedin`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::CompanyName => "company_name",
            LeadField::ContactName => "contact_name",
            LeadField::Email => "email",
            LeadField::Phone => "phone",
            LeadField::Industry => "industry",
            LeadField::CompanySize => "company_size",
            LeadField::Revenue => "revenue",
            LeadField::Website => "website",
            LeadField::Linkedin => "linkedin",
        }
    }

    /// Human-readable label: underscores become spaces, each word capitalized.
    ///
    /// `company_size` → `Company Size`.
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Keys the pipeline computes itself. Never carried through from input.
pub const DERIVED_FIELDS: &[&str] = &[
    "validation_flags",
    "data_quality_score",
    "validation_details",
    "lead_score",
    "score_breakdown",
    "priority_level",
    "recommendations",
];

/// A sales lead as a flat set of string fields.
///
/// Used both for raw input and for the normalized form produced by the
/// validator. Absent fields are empty strings; non-string JSON values are
/// coerced to their textual form (`null` and nested values become empty).
/// Any field outside the known nine is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_size: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub revenue: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin: String,
    /// Fields the pipeline does not interpret, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    /// Reads a known field by name.
    pub fn get(&self, field: LeadField) -> &str {
        match field {
            LeadField::CompanyName => &self.company_name,
            LeadField::ContactName => &self.contact_name,
            LeadField::Email => &self.email,
            LeadField::Phone => &self.phone,
            LeadField::Industry => &self.industry,
            LeadField::CompanySize => &self.company_size,
            LeadField::Revenue => &self.revenue,
            LeadField::Website => &self.website,
            LeadField::Linkedin => &self.linkedin,
        }
    }

    /// True when the field holds something other than whitespace.
    pub fn has(&self, field: LeadField) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Pass-through fields without any of the [`DERIVED_FIELDS`].
    ///
    /// Re-submitted validated or scored records carry stale derived values;
    /// those are recomputed, not copied.
    pub fn pass_through_fields(&self) -> Map<String, Value> {
        self.extra
            .iter()
            .filter(|(key, _)| !DERIVED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Accepts strings, numbers and booleans; anything else degrades to "".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

// ============ Validation ============

/// Cheap per-field presence/format gates used for the data-quality score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFlags {
    pub has_valid_email: bool,
    pub has_valid_phone: bool,
    pub has_company_name: bool,
    pub has_contact_name: bool,
    pub has_industry: bool,
    pub has_website: bool,
    pub has_linkedin: bool,
    pub has_company_size: bool,
    pub has_revenue: bool,
}

impl ValidationFlags {
    /// Looks a flag up by its serialized name. Unknown names read as unset.
    pub fn get(&self, name: &str) -> bool {
        match name {
            "has_valid_email" => self.has_valid_email,
            "has_valid_phone" => self.has_valid_phone,
            "has_company_name" => self.has_company_name,
            "has_contact_name" => self.has_contact_name,
            "has_industry" => self.has_industry,
            "has_website" => self.has_website,
            "has_linkedin" => self.has_linkedin,
            "has_company_size" => self.has_company_size,
            "has_revenue" => self.has_revenue,
            _ => false,
        }
    }
}

/// Heuristic estimate of whether an email domain receives mail reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deliverability {
    High,
    Medium,
    Low,
    Invalid,
    Unknown,
}

/// Outcome of validating a single contact field.
///
/// `value` is what gets stored on the validated record; validity is tracked
/// alongside it rather than enforced by rejecting the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub value: String,
    pub is_valid: bool,
    pub suggestions: Vec<String>,
    /// Email only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverability: Option<Deliverability>,
    /// Phone only: international rendering (or the digit-stripped fallback).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    /// Phone only: numeric country calling code, empty when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl FieldCheck {
    pub fn valid(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_valid: true,
            ..Self::default()
        }
    }

    pub fn invalid(value: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            value: value.into(),
            is_valid: false,
            suggestions,
            ..Self::default()
        }
    }
}

/// Full verdicts for the contact fields of a validated lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationDetails {
    pub email: FieldCheck,
    pub phone: FieldCheck,
    pub website: FieldCheck,
    pub linkedin: FieldCheck,
}

/// A lead after normalization and quality flagging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedLead {
    #[serde(flatten)]
    pub lead: Lead,
    pub validation_flags: ValidationFlags,
    /// Weighted sum of `validation_flags`, 0-100, two decimals.
    pub data_quality_score: f64,
    pub validation_details: ValidationDetails,
}

// ============ Scoring ============

/// Per-dimension sub-scores, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub company: f64,
    pub contact: f64,
    pub completeness: f64,
    pub engagement: f64,
}

/// Coarse outreach priority derived from the total lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// `High` from 80, `Medium` from 60, `Low` below. Lower bounds inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            PriorityLevel::High
        } else if score >= 60.0 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scorer output before it is merged onto the validated record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadScore {
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub priority_level: PriorityLevel,
    pub recommendations: Vec<String>,
}

/// A validated lead with its value score, tier and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub validated: ValidatedLead,
    pub lead_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub priority_level: PriorityLevel,
    pub recommendations: Vec<String>,
}

// ============ Batch Results ============

/// Leads judged to represent the same company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// Members in input order; the first is the lead that opened the group.
    pub group: Vec<Lead>,
    /// Similarity of the last comparison made while scanning for this group.
    pub similarity_score: f64,
    pub recommended_lead: Lead,
}

/// Lead counts per priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrioritySummary {
    pub total_leads: usize,
    pub high_priority: usize,
    pub medium_priority: usize,
    pub low_priority: usize,
}

impl PrioritySummary {
    pub fn from_leads(leads: &[ScoredLead]) -> Self {
        let count = |level: PriorityLevel| {
            leads
                .iter()
                .filter(|lead| lead.priority_level == level)
                .count()
        };

        Self {
            total_leads: leads.len(),
            high_priority: count(PriorityLevel::High),
            medium_priority: count(PriorityLevel::Medium),
            low_priority: count(PriorityLevel::Low),
        }
    }
}

/// Scored leads sorted by descending score, with tier counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchScoreResult {
    pub leads: Vec<ScoredLead>,
    pub summary: PrioritySummary,
}

// ============ API Request/Response Models ============

/// Request body carrying a list of raw leads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadsRequest {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

/// Request body for duplicate detection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicatesRequest {
    #[serde(default)]
    pub leads: Vec<Lead>,
    /// Overrides the configured similarity threshold.
    pub threshold: Option<f64>,
}

/// Response for `POST /api/v1/leads/score`.
#[derive(Debug, Serialize)]
pub struct ScoreLeadsResponse {
    pub success: bool,
    pub leads: Vec<ScoredLead>,
    pub summary: PrioritySummary,
    pub generated_at: DateTime<Utc>,
}

/// Response for `POST /api/v1/leads/validate`.
#[derive(Debug, Serialize)]
pub struct ValidateLeadsResponse {
    pub success: bool,
    pub leads: Vec<ValidatedLead>,
}

/// Response for `POST /api/v1/leads/duplicates`.
#[derive(Debug, Serialize)]
pub struct DuplicatesResponse {
    pub success: bool,
    pub threshold: f64,
    pub duplicates: Vec<DuplicateGroup>,
}

/// Response for `GET /api/v1/leads/sample`.
#[derive(Debug, Serialize)]
pub struct SampleLeadsResponse {
    pub leads: Vec<Lead>,
}
