// ============================================================================
// Suggestions
// Levenshtein ranking of known spellings for unknown unit tokens
// ============================================================================

/// Edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Rank `candidates` by distance to `token` (case-insensitive), ties
/// alphabetical, at most `limit` results within `max_distance`.
///
/// A candidate is skipped when the whole of it would have to be rewritten
/// (distance not below its length), so one-letter symbols do not match
/// everything.
pub fn rank<'a>(
    token: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
    max_distance: usize,
) -> Vec<String> {
    let needle = token.to_lowercase();
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = levenshtein(&needle, &candidate.to_lowercase());
            let usable = distance <= max_distance && distance < candidate.chars().count();
            usable.then_some((distance, candidate))
        })
        .collect();

    scored.sort_unstable();
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("metr", "meter"), 1);
        assert_eq!(levenshtein("µm", "um"), 1);
    }

    #[test]
    fn test_rank_orders_by_distance_then_name() {
        let candidates = ["meter", "metre", "meters", "liter", "m", "mile"];
        let ranked = rank("metr", candidates, 5, 3);
        assert_eq!(ranked, vec!["meter", "metre", "meters", "liter", "mile"]);
    }

    #[test]
    fn test_rank_respects_limits() {
        let candidates = ["meter", "metre", "meters"];
        assert_eq!(rank("metr", candidates, 1, 3), vec!["meter"]);
        assert!(rank("metr", candidates, 5, 0).is_empty());
    }

    #[test]
    fn test_rank_is_case_insensitive() {
        assert_eq!(rank("METER", ["meter"], 5, 3), vec!["meter"]);
    }

    #[test]
    fn test_rank_skips_total_rewrites() {
        assert!(rank("xyz", ["m", "s"], 5, 3).is_empty());
    }
}
