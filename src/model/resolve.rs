// Player name resolution against a season population.
//
// Lineup feeds and betting boards spell names their own way ("J.P. France",
// "Luis Garcia Jr.", "Jacob deGrom Over 6.5"). Resolution maps that free
// text onto the canonical stat records: an exact first+last index lookup
// first, then a token-sort similarity search over every display name in the
// population.

use std::collections::HashMap;

use strsim::normalized_levenshtein;

// ---------------------------------------------------------------------------
// Identities and resolution outcomes
// ---------------------------------------------------------------------------

/// A canonical player key: numeric source ID plus display name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerIdentity {
    pub id: i64,
    pub name: String,
}

/// Outcome of resolving one free-text name.
///
/// Callers choose policy: lineup aggregation treats `Exact` and
/// `Approximate` alike, while logging distinguishes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Case-insensitive first+last hit in the identity index.
    Exact(PlayerIdentity),
    /// Best fuzzy candidate at or above the threshold. `score` is the
    /// token-sort similarity in [0, 100].
    Approximate { identity: PlayerIdentity, score: f64 },
    /// No candidate met the threshold (or the input was unusable).
    Unresolved,
}

impl Resolution {
    pub fn identity(&self) -> Option<&PlayerIdentity> {
        match self {
            Resolution::Exact(identity) => Some(identity),
            Resolution::Approximate { identity, .. } => Some(identity),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.identity().is_some()
    }
}

/// Minimum fuzzy score by entity kind.
///
/// The asymmetry is deliberate: betting boards mangle pitcher names harder
/// than lineup feeds mangle batter names, so pitchers get a slightly looser
/// gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchThreshold {
    Batter,
    Pitcher,
}

impl MatchThreshold {
    pub fn min_score(self) -> f64 {
        match self {
            MatchThreshold::Batter => 90.0,
            MatchThreshold::Pitcher => 88.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Input cleaning
// ---------------------------------------------------------------------------

const GENERATIONAL_SUFFIXES: [&str; 5] = ["jr.", "sr.", "ii", "iii", "iv"];

/// Clean a raw feed name before matching.
///
/// Strips one trailing odds artifact ("Over 6.5" / "Under 7"), then one
/// trailing generational suffix ("Jr.", "III", ...), then collapses interior
/// whitespace. Case is preserved; matching lowercases on its own.
pub fn clean_name(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();

    if tokens.len() >= 2 {
        let last_is_number = tokens[tokens.len() - 1].parse::<f64>().is_ok();
        let prev = tokens[tokens.len() - 2];
        if last_is_number
            && (prev.eq_ignore_ascii_case("over") || prev.eq_ignore_ascii_case("under"))
        {
            tokens.truncate(tokens.len() - 2);
        }
    }

    if let Some(last) = tokens.last() {
        if GENERATIONAL_SUFFIXES
            .iter()
            .any(|s| last.eq_ignore_ascii_case(s))
        {
            tokens.pop();
        }
    }

    tokens.join(" ")
}

// ---------------------------------------------------------------------------
// Similarity
// ---------------------------------------------------------------------------

/// Token-sort similarity between two names, in [0, 100].
///
/// Tokens are lowercased, sorted, and rejoined before a normalized
/// edit-distance comparison, making the score symmetric and independent of
/// token order ("deGrom Jacob" scores 100 against "Jacob deGrom").
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&sorted_tokens(a), &sorted_tokens(b)) * 100.0
}

fn sorted_tokens(name: &str) -> String {
    let mut tokens: Vec<String> = name
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    tokens.sort();
    tokens.join(" ")
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves free-text names against one population's display names.
///
/// Results are cached for the resolver's lifetime keyed on the raw input, so
/// a name that appears in several lineups (or both a lineup and a betting
/// board) resolves once and resolves consistently.
pub struct NameResolver {
    entries: Vec<PlayerIdentity>,
    /// (lowercased first token, lowercased last token) -> entries index.
    /// First insertion wins when two players collide on first+last.
    exact: HashMap<(String, String), usize>,
    cache: HashMap<(String, MatchThreshold), Resolution>,
}

impl NameResolver {
    pub fn new(entries: Vec<PlayerIdentity>) -> Self {
        let mut exact = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(key) = first_last_key(&entry.name) {
                exact.entry(key).or_insert(i);
            }
        }
        NameResolver {
            entries,
            exact,
            cache: HashMap::new(),
        }
    }

    /// Resolve a raw feed name.
    ///
    /// A cleaned name with fewer than two tokens is `Unresolved` outright;
    /// single tokens carry too little signal to fuzzy-match safely.
    pub fn resolve(&mut self, raw: &str, threshold: MatchThreshold) -> Resolution {
        let key = (raw.to_string(), threshold);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let resolution = self.resolve_uncached(raw, threshold);
        self.cache.insert(key, resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, raw: &str, threshold: MatchThreshold) -> Resolution {
        let cleaned = clean_name(raw);
        let Some(exact_key) = first_last_key(&cleaned) else {
            return Resolution::Unresolved;
        };

        if let Some(&i) = self.exact.get(&exact_key) {
            return Resolution::Exact(self.entries[i].clone());
        }

        let mut best: Option<(usize, f64)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let score = token_sort_ratio(&cleaned, &entry.name);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) if score >= threshold.min_score() => Resolution::Approximate {
                identity: self.entries[i].clone(),
                score,
            },
            _ => Resolution::Unresolved,
        }
    }
}

/// First and last token of a name, lowercased. `None` when the name has
/// fewer than two tokens.
fn first_last_key(name: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    Some((
        tokens[0].to_lowercase(),
        tokens[tokens.len() - 1].to_lowercase(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: i64, name: &str) -> PlayerIdentity {
        PlayerIdentity {
            id,
            name: name.into(),
        }
    }

    fn sample_resolver() -> NameResolver {
        NameResolver::new(vec![
            identity(1, "Jacob deGrom"),
            identity(2, "Logan Webb"),
            identity(3, "Joe Smith"),
            identity(4, "Framber Valdez"),
        ])
    }

    // ---- cleaning ----

    #[test]
    fn clean_strips_odds_artifact() {
        assert_eq!(clean_name("Jacob deGrom Over 6.5"), "Jacob deGrom");
        assert_eq!(clean_name("Logan Webb Under 7"), "Logan Webb");
    }

    #[test]
    fn clean_strips_generational_suffix() {
        assert_eq!(clean_name("Luis Garcia Jr."), "Luis Garcia");
        assert_eq!(clean_name("Cal Ripken III"), "Cal Ripken");
    }

    #[test]
    fn clean_strips_artifact_then_suffix() {
        assert_eq!(clean_name("Luis Garcia Jr. Over 5.5"), "Luis Garcia");
    }

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean_name("  Logan   Webb "), "Logan Webb");
    }

    #[test]
    fn clean_leaves_ordinary_names_alone() {
        assert_eq!(clean_name("Framber Valdez"), "Framber Valdez");
    }

    // ---- similarity ----

    #[test]
    fn token_sort_is_order_independent() {
        assert_eq!(token_sort_ratio("deGrom Jacob", "Jacob deGrom"), 100.0);
    }

    #[test]
    fn token_sort_is_symmetric() {
        let ab = token_sort_ratio("Logan Webb", "Logan Web");
        let ba = token_sort_ratio("Logan Web", "Logan Webb");
        assert_eq!(ab, ba);
        assert!(ab > 0.0 && ab < 100.0);
    }

    #[test]
    fn token_sort_identical_names_score_100() {
        assert_eq!(token_sort_ratio("Joe Smith", "joe smith"), 100.0);
    }

    // ---- resolution ----

    #[test]
    fn exact_match_is_case_insensitive() {
        let mut resolver = sample_resolver();
        let resolution = resolver.resolve("jacob degrom", MatchThreshold::Pitcher);
        assert_eq!(resolution, Resolution::Exact(identity(1, "Jacob deGrom")));
    }

    #[test]
    fn exact_match_survives_odds_artifact() {
        let mut resolver = sample_resolver();
        let resolution = resolver.resolve("Jacob deGrom Over 6.5", MatchThreshold::Pitcher);
        assert_eq!(resolution, Resolution::Exact(identity(1, "Jacob deGrom")));
    }

    #[test]
    fn single_token_is_rejected() {
        let mut resolver = sample_resolver();
        assert_eq!(
            resolver.resolve("deGrom", MatchThreshold::Pitcher),
            Resolution::Unresolved
        );
        assert_eq!(
            resolver.resolve("", MatchThreshold::Batter),
            Resolution::Unresolved
        );
    }

    #[test]
    fn fuzzy_match_picks_best_candidate() {
        let mut resolver = sample_resolver();
        // "Framber Valdes" misses the exact index but sits one edit from
        // "Framber Valdez": (1 - 1/14) * 100 = 92.86, above both gates.
        let resolution = resolver.resolve("Framber Valdes", MatchThreshold::Batter);
        match resolution {
            Resolution::Approximate { identity, score } => {
                assert_eq!(identity.name, "Framber Valdez");
                assert!(score >= 90.0 && score < 100.0);
            }
            other => panic!("expected approximate match, got {other:?}"),
        }
    }

    #[test]
    fn threshold_gate_differs_by_entity_kind() {
        let mut resolver = sample_resolver();
        // "Joe Smyth" vs "Joe Smith": one edit over 9 characters of sorted
        // tokens = (1 - 1/9) * 100 = 88.9: inside the pitcher gate (88),
        // outside the batter gate (90).
        assert_eq!(
            resolver.resolve("Joe Smyth", MatchThreshold::Batter),
            Resolution::Unresolved
        );
        match resolver.resolve("Joe Smyth", MatchThreshold::Pitcher) {
            Resolution::Approximate { identity, score } => {
                assert_eq!(identity.name, "Joe Smith");
                assert!(score >= 88.0 && score < 90.0);
            }
            other => panic!("expected approximate match, got {other:?}"),
        }
    }

    #[test]
    fn hopeless_name_is_unresolved() {
        let mut resolver = sample_resolver();
        assert_eq!(
            resolver.resolve("Zebulon Quackenbush", MatchThreshold::Pitcher),
            Resolution::Unresolved
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut resolver = sample_resolver();
        let first = resolver.resolve("Framber Valdes", MatchThreshold::Batter);
        let second = resolver.resolve("Framber Valdes", MatchThreshold::Batter);
        let third = resolver.resolve("Framber Valdes", MatchThreshold::Batter);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn suffix_only_difference_still_resolves_exactly() {
        let mut resolver = sample_resolver();
        let resolution = resolver.resolve("Logan Webb Jr.", MatchThreshold::Pitcher);
        assert_eq!(resolution, Resolution::Exact(identity(2, "Logan Webb")));
    }
}
