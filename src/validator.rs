/// Lead validation and normalization
///
/// Every function here is total: any input string, including an empty one,
/// yields a best-effort normalized value. Contact fields additionally report
/// a validity verdict and suggestions instead of rejecting bad data.
///
/// Entry point is [`validate`], which:
/// 1. Validates email, phone, website and LinkedIn (keeping the full verdicts)
/// 2. Normalizes names and categorical fields
/// 3. Derives the cheap validation flags from the normalized values
/// 4. Computes the weighted data-quality score
use crate::models::{
    Deliverability, FieldCheck, Lead, LeadField, ValidatedLead, ValidationDetails, ValidationFlags,
};
use once_cell::sync::Lazy;
use phonenumber::Mode;
use regex::Regex;

/// Industry aliases, matched as substrings of the lower-cased input.
///
/// Order matters: the first key found wins, so keys that contain other keys
/// (`fintech` contains `tech`) are listed first.
pub static INDUSTRY_ALIASES: &[(&str, &str)] = &[
    ("fintech", "Fintech"),
    ("tech", "Technology"),
    ("software", "Software"),
    ("saas", "SaaS"),
    ("healthcare", "Healthcare"),
    ("manufacturing", "Manufacturing"),
    ("retail", "Retail"),
    ("real estate", "Real Estate"),
    ("education", "Education"),
    ("consulting", "Consulting"),
];

/// Fallback industry label for empty input.
pub const DEFAULT_INDUSTRY: &str = "Other";

/// Minimum normalized Levenshtein similarity for a fuzzy industry match.
pub const INDUSTRY_FUZZY_THRESHOLD: f64 = 0.80;

/// Company-size aliases, matched as substrings of the lower-cased input.
pub static SIZE_ALIASES: &[(&str, &str)] = &[
    ("startup", "1-10"),
    ("small", "11-50"),
    ("medium", "51-200"),
    ("large", "201-500"),
    ("enterprise", "500+"),
];

/// Canonical employee-count buckets.
pub static SIZE_BUCKETS: &[&str] = &["1-10", "11-50", "51-200", "201-500", "500+"];

/// Canonical revenue buckets.
pub static REVENUE_BUCKETS: &[&str] = &["0-1M", "1M-5M", "5M-10M", "10M-50M", "50M-100M", "100M+"];

/// Legal-entity suffixes stripped from company names. Only one is removed.
static COMPANY_SUFFIXES: &[&str] = &[
    " inc", " inc.", " llc", " llc.", " corp", " corp.", " ltd", " ltd.",
];

/// Name suffixes kept upper-case.
static NAME_SUFFIXES: &[&str] = &["JR", "SR", "III", "IV", "V"];

/// Consumer webmail providers.
static WEBMAIL_DOMAINS: &[&str] = &["gmail.com", "outlook.com", "yahoo.com", "hotmail.com"];

/// Generic TLDs typical of organizations with managed mail.
static CORPORATE_TLDS: &[&str] = &[".com", ".org", ".net", ".edu", ".gov"];

/// Flag weights for the data-quality score. Sums to 1.0.
pub static QUALITY_WEIGHTS: &[(&str, f64)] = &[
    ("has_valid_email", 0.25),
    ("has_valid_phone", 0.20),
    ("has_company_name", 0.15),
    ("has_contact_name", 0.15),
    ("has_industry", 0.10),
    ("has_website", 0.05),
    ("has_linkedin", 0.05),
    ("has_company_size", 0.03),
    ("has_revenue", 0.02),
];

// Dot-atom local part, dot-separated domain labels, alphabetic TLD.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$",
    )
    .expect("email regex is valid")
});

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url regex is valid"));

static INTEGER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("integer regex is valid"));

static SIZE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+\s*(?:-|–|to)\s*([0-9]+)").expect("size range regex is valid")
});

static DECIMAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9.]+").expect("decimal regex is valid"));

/// Validates and normalizes a single lead.
///
/// Never fails. The input is not modified; a new record is built with every
/// known field replaced by its normalized form and unknown fields copied over
/// (derived keys from an earlier run are dropped and recomputed).
pub fn validate(lead: &Lead) -> ValidatedLead {
    let email = validate_email(&lead.email);
    let phone = validate_phone(&lead.phone);
    let website = validate_url(&lead.website);
    let linkedin = validate_linkedin(&lead.linkedin);

    let normalized = Lead {
        company_name: clean_company_name(&lead.company_name),
        contact_name: clean_contact_name(&lead.contact_name),
        email: email.value.clone(),
        phone: phone.value.clone(),
        industry: standardize_industry(&lead.industry),
        company_size: standardize_company_size(&lead.company_size),
        revenue: standardize_revenue(&lead.revenue),
        website: website.value.clone(),
        linkedin: linkedin.value.clone(),
        extra: lead.pass_through_fields(),
    };

    let validation_flags = validation_flags(&normalized);
    let data_quality_score = data_quality_score(&validation_flags);

    tracing::debug!(
        "Validated lead '{}': quality={} email_valid={} phone_valid={}",
        normalized.company_name,
        data_quality_score,
        email.is_valid,
        phone.is_valid
    );

    ValidatedLead {
        lead: normalized,
        validation_flags,
        data_quality_score,
        validation_details: ValidationDetails {
            email,
            phone,
            website,
            linkedin,
        },
    }
}

/// True when `email` is a syntactically valid address.
///
/// Case-insensitive; the address is checked in lower case.
pub fn is_valid_email_format(email: &str) -> bool {
    EMAIL_REGEX.is_match(&email.trim().to_lowercase())
}

/// Validates and normalizes an email address.
///
/// The stored value is the trimmed, lower-cased input whether or not it is
/// valid. Valid addresses get a deliverability estimate.
pub fn validate_email(raw: &str) -> FieldCheck {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return FieldCheck {
            deliverability: Some(Deliverability::Unknown),
            ..FieldCheck::invalid("", vec!["Email address is required".to_string()])
        };
    }

    if EMAIL_REGEX.is_match(&email) {
        let deliverability = assess_email_deliverability(&email);
        return FieldCheck {
            deliverability: Some(deliverability),
            ..FieldCheck::valid(email)
        };
    }

    let mut suggestions = Vec::new();
    let domain_has_dot = match email.rsplit_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => {
            suggestions.push("Email must contain @ symbol".to_string());
            false
        }
    };
    if !domain_has_dot {
        suggestions.push("Email must have valid domain".to_string());
    }

    tracing::debug!("❌ Invalid email format: {}", email);
    FieldCheck {
        deliverability: Some(Deliverability::Invalid),
        ..FieldCheck::invalid(email, suggestions)
    }
}

/// Classifies a (valid, lower-case) address by its domain.
///
/// Consumer webmail is `High`, domains ending in a generic organizational
/// TLD are `Medium`, everything else is `Low`.
pub fn assess_email_deliverability(email: &str) -> Deliverability {
    let domain = email.rsplit('@').next().unwrap_or_default().to_lowercase();

    if WEBMAIL_DOMAINS.contains(&domain.as_str()) {
        Deliverability::High
    } else if CORPORATE_TLDS.iter().any(|tld| domain.ends_with(tld)) {
        Deliverability::Medium
    } else {
        Deliverability::Low
    }
}

/// Validates a phone number without assuming a home region.
///
/// Numbers written in international form are parsed with the phonenumber
/// library (port of Google's libphonenumber). Anything the parser cannot
/// handle falls back to a digit count: 10 or more digits is accepted with a
/// hint that a country code may be missing.
///
/// The stored value is always the trimmed input.
pub fn validate_phone(raw: &str) -> FieldCheck {
    let phone = raw.trim();
    if phone.is_empty() {
        return FieldCheck {
            formatted: Some(String::new()),
            country_code: Some(String::new()),
            ..FieldCheck::invalid("", vec!["Phone number is required".to_string()])
        };
    }

    match phonenumber::parse(None, phone) {
        Ok(number) => {
            if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::International).to_string();
                let country_code = number.code().value().to_string();
                tracing::debug!("✓ Valid phone: {} → {}", phone, formatted);
                FieldCheck {
                    formatted: Some(formatted),
                    country_code: Some(country_code),
                    ..FieldCheck::valid(phone)
                }
            } else {
                tracing::debug!("❌ Invalid phone number: {}", phone);
                FieldCheck {
                    formatted: Some(String::new()),
                    country_code: Some(String::new()),
                    ..FieldCheck::invalid(phone, vec!["Invalid phone number format".to_string()])
                }
            }
        }
        Err(e) => {
            tracing::debug!("Failed to parse phone '{}': {:?}", phone, e);
            let cleaned: String = phone
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();

            if cleaned.len() >= 10 {
                FieldCheck {
                    suggestions: vec!["Phone number may need country code".to_string()],
                    formatted: Some(cleaned),
                    country_code: Some(String::new()),
                    ..FieldCheck::valid(phone)
                }
            } else {
                FieldCheck {
                    formatted: Some(String::new()),
                    country_code: Some(String::new()),
                    ..FieldCheck::invalid(
                        phone,
                        vec!["Phone number too short or invalid format".to_string()],
                    )
                }
            }
        }
    }
}

/// Prepends `https://` unless the value already carries an http(s) scheme.
fn with_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// True when `url` has the shape `http(s)://host/rest` with no whitespace.
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Validates a website URL, adding a scheme when missing.
pub fn validate_url(raw: &str) -> FieldCheck {
    let url = raw.trim();
    if url.is_empty() {
        return FieldCheck::invalid("", vec!["Website URL is recommended".to_string()]);
    }

    let url = with_scheme(url);
    if is_valid_url(&url) {
        FieldCheck::valid(url)
    } else {
        FieldCheck::invalid(url, vec!["Invalid URL format".to_string()])
    }
}

/// Validates a LinkedIn profile URL.
///
/// Same normalization as [`validate_url`]; the value must also point at
/// `linkedin.com`.
pub fn validate_linkedin(raw: &str) -> FieldCheck {
    let url = raw.trim();
    if url.is_empty() {
        return FieldCheck::invalid("", vec!["LinkedIn profile is recommended".to_string()]);
    }

    let url = with_scheme(url);
    if is_valid_url(&url) && url.to_lowercase().contains("linkedin.com") {
        FieldCheck::valid(url)
    } else {
        FieldCheck::invalid(url, vec!["Must be a valid LinkedIn URL".to_string()])
    }
}

/// Collapses whitespace and drops one trailing legal-entity suffix.
///
/// `"Acme   Widgets Inc."` → `"Acme Widgets"`.
pub fn clean_company_name(raw: &str) -> String {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = name.to_lowercase();

    for suffix in COMPANY_SUFFIXES {
        if lower.ends_with(suffix) {
            // Suffixes are ASCII, so the byte offset is valid in `name` too.
            let cut = name.len() - suffix.len();
            if name.is_char_boundary(cut) {
                return name[..cut].trim().to_string();
            }
            break;
        }
    }

    name
}

/// Collapses whitespace and capitalizes each name token.
///
/// Generational suffixes (`Jr`, `III`, ...) are upper-cased instead.
pub fn clean_contact_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| {
            let upper = part.to_uppercase();
            if NAME_SUFFIXES.contains(&upper.as_str()) {
                upper
            } else {
                capitalize(part)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First character upper-case, the rest lower-case.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Upper-cases the first letter of every run of letters, lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Maps free-text industry descriptions onto canonical labels.
///
/// Tries substring aliases, then a fuzzy match against the alias keys, then
/// falls back to title-casing the input.
pub fn standardize_industry(raw: &str) -> String {
    let industry = raw.trim();
    if industry.is_empty() {
        return DEFAULT_INDUSTRY.to_string();
    }

    let lower = industry.to_lowercase();
    if let Some((_, canonical)) = INDUSTRY_ALIASES
        .iter()
        .find(|(key, _)| lower.contains(key))
    {
        return canonical.to_string();
    }

    // Fuzzy match for typos; the first key wins ties.
    let best = INDUSTRY_ALIASES.iter().fold(None, |best, &(key, canonical)| {
        let similarity = strsim::normalized_levenshtein(&lower, key);
        match best {
            Some((_, best_similarity)) if best_similarity >= similarity => best,
            _ => Some((canonical, similarity)),
        }
    });

    if let Some((canonical, similarity)) = best {
        if similarity >= INDUSTRY_FUZZY_THRESHOLD {
            tracing::debug!(
                "Fuzzy matched industry '{}' to '{}' ({:.2})",
                industry,
                canonical,
                similarity
            );
            return canonical.to_string();
        }
    }

    title_case(industry)
}

/// Buckets an employee count into the canonical size ranges.
fn size_bucket(employees: u64) -> &'static str {
    match employees {
        0..=10 => "1-10",
        11..=50 => "11-50",
        51..=200 => "51-200",
        201..=500 => "201-500",
        _ => "500+",
    }
}

fn parse_count(digits: &str) -> u64 {
    // Only overflow can fail here; an absurd count is still "large".
    digits.parse().unwrap_or(u64::MAX)
}

/// Maps a company-size description onto a canonical employee bucket.
///
/// Order of attempts: size aliases (`startup`, `enterprise`, ...), an
/// already-canonical bucket, a numeric range bucketed by its upper bound,
/// and finally the first integer in the text. Unrecognized input is
/// returned unchanged.
pub fn standardize_company_size(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return String::new();
    }

    if let Some((_, bucket)) = SIZE_ALIASES.iter().find(|(key, _)| lower.contains(key)) {
        return bucket.to_string();
    }

    if let Some(bucket) = SIZE_BUCKETS.iter().find(|bucket| **bucket == lower) {
        return bucket.to_string();
    }

    if let Some(upper) = SIZE_RANGE_REGEX
        .captures(&lower)
        .and_then(|caps| caps.get(1))
    {
        return size_bucket(parse_count(upper.as_str())).to_string();
    }

    if let Some(first) = INTEGER_REGEX.find(&lower) {
        return size_bucket(parse_count(first.as_str())).to_string();
    }

    raw.to_string()
}

/// Buckets an annual revenue figure. Upper bounds are exclusive.
fn revenue_bucket(value: f64) -> &'static str {
    if value < 1_000_000.0 {
        "0-1M"
    } else if value < 5_000_000.0 {
        "1M-5M"
    } else if value < 10_000_000.0 {
        "5M-10M"
    } else if value < 50_000_000.0 {
        "10M-50M"
    } else if value < 100_000_000.0 {
        "50M-100M"
    } else {
        "100M+"
    }
}

/// Maps a revenue description onto a canonical revenue bucket.
///
/// The first numeric token is scaled by a single multiplier (checked in the
/// order k/thousand, m/million, b/billion) and bucketed. Text without a
/// parseable number is returned unchanged.
pub fn standardize_revenue(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return String::new();
    }

    let Some(token) = DECIMAL_REGEX.find(&lower) else {
        return raw.to_string();
    };
    let Ok(mut value) = token.as_str().parse::<f64>() else {
        return raw.to_string();
    };

    if lower.contains('k') || lower.contains("thousand") {
        value *= 1_000.0;
    } else if lower.contains('m') || lower.contains("million") {
        value *= 1_000_000.0;
    } else if lower.contains('b') || lower.contains("billion") {
        value *= 1_000_000_000.0;
    }

    revenue_bucket(value).to_string()
}

/// Derives the cheap per-field flags from a normalized lead.
///
/// These are deliberately looser than the field validators: an email only
/// needs an `@`, and a phone only needs 10 characters once spaces, hyphens
/// and parentheses are removed.
pub fn validation_flags(lead: &Lead) -> ValidationFlags {
    let phone_len = lead
        .phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .count();

    ValidationFlags {
        has_valid_email: !lead.email.is_empty() && lead.email.contains('@'),
        has_valid_phone: !lead.phone.is_empty() && phone_len >= 10,
        has_company_name: !lead.get(LeadField::CompanyName).is_empty(),
        has_contact_name: !lead.get(LeadField::ContactName).is_empty(),
        has_industry: !lead.get(LeadField::Industry).is_empty(),
        has_website: !lead.get(LeadField::Website).is_empty(),
        has_linkedin: !lead.get(LeadField::Linkedin).is_empty(),
        has_company_size: !lead.get(LeadField::CompanySize).is_empty(),
        has_revenue: !lead.get(LeadField::Revenue).is_empty(),
    }
}

/// Weighted sum of set flags, scaled to 0-100 and rounded to two decimals.
pub fn data_quality_score(flags: &ValidationFlags) -> f64 {
    let score: f64 = QUALITY_WEIGHTS
        .iter()
        .filter(|(name, _)| flags.get(name))
        .map(|(_, weight)| weight)
        .sum();

    round2(score * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
