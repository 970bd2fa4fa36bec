//! Duplicate lead detection.
//!
//! Single-pass greedy clustering by company-name similarity. Results depend
//! on input order and are not transitive: a lead joins the group of the
//! first earlier unassigned lead it resembles, and group members are never
//! compared with each other.

use crate::models::{DuplicateGroup, Lead, LeadField};
use crate::validator::is_valid_email_format;

/// Similarity at or above which two company names count as the same company.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.85;

/// Fields counted when picking the representative of a duplicate group.
const REPRESENTATIVE_FIELDS: [LeadField; 6] = [
    LeadField::Email,
    LeadField::Phone,
    LeadField::Website,
    LeadField::Linkedin,
    LeadField::CompanySize,
    LeadField::Revenue,
];

/// Bonus for a representative candidate whose email is well-formed.
const VALID_EMAIL_BONUS: u32 = 2;

/// Case-insensitive company-name similarity in `[0, 1]`.
///
/// Indel ratio: `2 * lcs / (len_a + len_b)` over characters, where `lcs` is
/// the longest common subsequence. Two empty names are identical.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Groups leads whose company names are at least `threshold` similar.
///
/// Leads are visited in input order. Each unassigned lead is compared with
/// every later unassigned lead; matches join its group and are not visited
/// again. Leads with an empty company name are never compared. Only groups
/// with more than one member are returned.
pub fn detect_duplicates(leads: &[Lead], threshold: f64) -> Vec<DuplicateGroup> {
    let mut assigned = vec![false; leads.len()];
    let mut groups = Vec::new();

    for i in 0..leads.len() {
        if assigned[i] {
            continue;
        }

        let mut members = vec![i];
        let mut last_similarity = 0.0;

        for j in (i + 1)..leads.len() {
            if assigned[j]
                || leads[i].company_name.is_empty()
                || leads[j].company_name.is_empty()
            {
                continue;
            }

            let similarity = name_similarity(&leads[i].company_name, &leads[j].company_name);
            last_similarity = similarity;

            if similarity >= threshold {
                members.push(j);
                assigned[j] = true;
            }
        }

        if members.len() > 1 {
            assigned[i] = true;
            let group: Vec<Lead> = members.iter().map(|&idx| leads[idx].clone()).collect();
            let recommended_lead = select_best_lead(&group).clone();

            tracing::debug!(
                "Duplicate group for '{}': {} leads (last similarity {:.3})",
                leads[i].company_name,
                group.len(),
                last_similarity
            );

            groups.push(DuplicateGroup {
                group,
                similarity_score: last_similarity,
                recommended_lead,
            });
        }
    }

    tracing::info!(
        "Duplicate detection: {} leads, {} groups (threshold {})",
        leads.len(),
        groups.len(),
        threshold
    );

    groups
}

/// Completeness score used to choose a group representative.
fn representative_score(lead: &Lead) -> u32 {
    let filled = REPRESENTATIVE_FIELDS
        .iter()
        .filter(|field| !lead.get(**field).is_empty())
        .count() as u32;

    if is_valid_email_format(&lead.email) {
        filled + VALID_EMAIL_BONUS
    } else {
        filled
    }
}

/// Picks the most complete lead; the earliest one wins ties.
///
/// `group` must be non-empty.
fn select_best_lead(group: &[Lead]) -> &Lead {
    let mut best = &group[0];
    let mut best_score = 0;

    for lead in group {
        let score = representative_score(lead);
        if score > best_score {
            best_score = score;
            best = lead;
        }
    }

    best
}
