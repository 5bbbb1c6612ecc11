//! Substring filters over loaded records.
//!
//! Matching is case-insensitive using Unicode lowercase folding. All filters
//! keep the input order and never fail: no match is an empty list. Blank
//! terms are rejected by the caller, not here.

use super::types::Pokemon;

fn contains_folded(haystack: &str, folded_term: &str) -> bool {
    haystack.to_lowercase().contains(folded_term)
}

/// Records whose name contains `term`.
pub fn by_name_substring<'a, I>(term: &str, records: I) -> Vec<&'a Pokemon>
where
    I: IntoIterator<Item = &'a Pokemon>,
{
    let term = term.to_lowercase();
    records
        .into_iter()
        .filter(|p| contains_folded(&p.name, &term))
        .collect()
}

/// Records with at least one type containing `term`.
pub fn by_category_substring<'a, I>(term: &str, records: I) -> Vec<&'a Pokemon>
where
    I: IntoIterator<Item = &'a Pokemon>,
{
    let term = term.to_lowercase();
    records
        .into_iter()
        .filter(|p| p.types.iter().any(|t| contains_folded(t, &term)))
        .collect()
}

/// AND-combination of the two filters. With both terms present the category
/// filter runs first and the name filter narrows its result. A `None` term
/// places no constraint.
pub fn search<'a, I>(name: Option<&str>, category: Option<&str>, records: I) -> Vec<&'a Pokemon>
where
    I: IntoIterator<Item = &'a Pokemon>,
{
    match (name, category) {
        (Some(name), Some(category)) => {
            by_name_substring(name, by_category_substring(category, records))
        }
        (Some(name), None) => by_name_substring(name, records),
        (None, Some(category)) => by_category_substring(category, records),
        (None, None) => records.into_iter().collect(),
    }
}
