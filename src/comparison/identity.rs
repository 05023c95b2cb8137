//! Identity matching between the two canonical record sets.
//!
//! Three passes, in order of precedence: exact identifier, exact
//! normalized name, then greedy fuzzy name similarity. Each record lands
//! in at most one pair, and every fuzzy pair scores at or above the
//! configured threshold.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use crate::config::AuditConfig;
use crate::models::{EmployeeRecord, FieldValue, MatchMethod, MatchedPair};

/// Matched pairs plus the records left over on each side.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// Committed pairs, in pass order then input order.
    pub pairs: Vec<MatchedPair>,
    /// Indices of dataset-A records with no counterpart.
    pub unmatched_a: Vec<usize>,
    /// Indices of dataset-B records with no counterpart.
    pub unmatched_b: Vec<usize>,
}

/// Pairs records between the two datasets.
pub fn match_records(
    records_a: &[EmployeeRecord],
    records_b: &[EmployeeRecord],
    config: &AuditConfig,
) -> MatchOutcome {
    let mut used_a = vec![false; records_a.len()];
    let mut used_b = vec![false; records_b.len()];
    let mut pairs = Vec::new();

    exact_id_pass(records_a, records_b, &mut used_a, &mut used_b, &mut pairs);
    exact_name_pass(records_a, records_b, &mut used_a, &mut used_b, &mut pairs);
    if config.fuzzy_matching {
        fuzzy_name_pass(
            records_a,
            records_b,
            &mut used_a,
            &mut used_b,
            &mut pairs,
            config.name_threshold,
        );
    }

    let unmatched_a = (0..records_a.len()).filter(|&i| !used_a[i]).collect();
    let unmatched_b = (0..records_b.len()).filter(|&i| !used_b[i]).collect();

    MatchOutcome {
        pairs,
        unmatched_a,
        unmatched_b,
    }
}

/// Pairs records sharing a non-empty identifier. Each identifier value is
/// consumed at most once per side (first occurrence wins).
fn exact_id_pass(
    records_a: &[EmployeeRecord],
    records_b: &[EmployeeRecord],
    used_a: &mut [bool],
    used_b: &mut [bool],
    pairs: &mut Vec<MatchedPair>,
) {
    let mut b_by_id: BTreeMap<&str, usize> = BTreeMap::new();
    for (j, record) in records_b.iter().enumerate() {
        if let Some(id) = non_empty_id(record) {
            b_by_id.entry(id).or_insert(j);
        }
    }

    let mut a_ids_seen: BTreeMap<&str, ()> = BTreeMap::new();
    for (i, record) in records_a.iter().enumerate() {
        let Some(id) = non_empty_id(record) else {
            continue;
        };
        if a_ids_seen.insert(id, ()).is_some() {
            continue;
        }
        if let Some(&j) = b_by_id.get(id) {
            used_a[i] = true;
            used_b[j] = true;
            pairs.push(MatchedPair {
                record_a: i,
                record_b: j,
                match_method: MatchMethod::ExactId,
                match_score: 1.0,
            });
        }
    }
}

/// Pairs remaining records whose normalized names are byte-equal.
fn exact_name_pass(
    records_a: &[EmployeeRecord],
    records_b: &[EmployeeRecord],
    used_a: &mut [bool],
    used_b: &mut [bool],
    pairs: &mut Vec<MatchedPair>,
) {
    let mut b_by_name: BTreeMap<&str, VecDeque<usize>> = BTreeMap::new();
    for (j, record) in records_b.iter().enumerate() {
        if !used_b[j] {
            b_by_name
                .entry(record.full_name.as_str())
                .or_default()
                .push_back(j);
        }
    }

    for (i, record) in records_a.iter().enumerate() {
        if used_a[i] {
            continue;
        }
        let Some(queue) = b_by_name.get_mut(record.full_name.as_str()) else {
            continue;
        };
        let Some(j) = queue.pop_front() else {
            continue;
        };
        used_a[i] = true;
        used_b[j] = true;
        pairs.push(MatchedPair {
            record_a: i,
            record_b: j,
            match_method: MatchMethod::ExactName,
            match_score: 1.0,
        });
    }
}

/// Greedy bipartite assignment by descending similarity.
///
/// Every remaining A×B pair is scored; candidates at or above the
/// threshold are committed best-first, removing both members from further
/// consideration. Ties prefer pairs sharing supplementary field values,
/// then input order, so reruns produce identical output.
fn fuzzy_name_pass(
    records_a: &[EmployeeRecord],
    records_b: &[EmployeeRecord],
    used_a: &mut [bool],
    used_b: &mut [bool],
    pairs: &mut Vec<MatchedPair>,
    threshold: f64,
) {
    struct Candidate {
        a: usize,
        b: usize,
        score: f64,
        supplementary: usize,
    }

    let mut candidates = Vec::new();
    for (i, a) in records_a.iter().enumerate() {
        if used_a[i] {
            continue;
        }
        for (j, b) in records_b.iter().enumerate() {
            if used_b[j] {
                continue;
            }
            let score = super::similarity::name_similarity(&a.full_name, &b.full_name);
            if score >= threshold {
                candidates.push(Candidate {
                    a: i,
                    b: j,
                    score,
                    supplementary: supplementary_agreement(a, b),
                });
            }
        }
    }

    candidates.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then(y.supplementary.cmp(&x.supplementary))
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });

    for candidate in candidates {
        if used_a[candidate.a] || used_b[candidate.b] {
            continue;
        }
        used_a[candidate.a] = true;
        used_b[candidate.b] = true;
        pairs.push(MatchedPair {
            record_a: candidate.a,
            record_b: candidate.b,
            match_method: MatchMethod::FuzzyName,
            match_score: candidate.score,
        });
    }
}

fn non_empty_id(record: &EmployeeRecord) -> Option<&str> {
    record
        .identifier
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Count of supplementary identifiers two records agree on: equal
/// identifiers plus equal non-empty text/integer field values
/// (department and the like). Used only to break fuzzy-score ties.
fn supplementary_agreement(a: &EmployeeRecord, b: &EmployeeRecord) -> usize {
    let mut count = 0;
    if let (Some(id_a), Some(id_b)) = (non_empty_id(a), non_empty_id(b)) {
        if id_a == id_b {
            count += 1;
        }
    }
    for (name, value_a) in &a.fields {
        let comparable = matches!(value_a, FieldValue::Text(_) | FieldValue::Integer(_));
        if comparable && b.fields.get(name) == Some(value_a) {
            count += 1;
        }
    }
    count
}
