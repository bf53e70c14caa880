// Lineup resolution and aggregation against one pitcher's pitch mix.

use tracing::{debug, warn};

use crate::model::pitch::{matchup_score, PitchMix};
use crate::model::resolve::{MatchThreshold, NameResolver, Resolution};
use crate::model::snapshot::BatterPopulation;

/// A lineup card has nine slots; `resolved_fraction` is always measured
/// against nine even when the feed delivers fewer names.
pub const LINEUP_SLOTS: usize = 9;

/// Aggregate read on an opposing lineup: the means over every batter that
/// resolved, plus how much of the card those batters cover.
#[derive(Debug, Clone, Copy)]
pub struct LineupAggregate {
    /// Mean pitch-mix matchup score over resolved batters.
    pub matchup_score: f64,
    /// Mean susceptibility z-score over resolved batters.
    pub susceptibility_z: f64,
    /// Mean (imputed) wOBA over resolved batters.
    pub avg_woba: f64,
    pub resolved_count: usize,
    /// `resolved_count / 9`. A coverage signal for the report; it scales no
    /// model term.
    pub resolved_fraction: f64,
}

/// Resolve and score up to nine batters.
///
/// Unresolved names are warned and skipped; approximate resolutions are
/// logged at debug level and treated as resolved. Returns `None` when not a
/// single batter resolved; callers surface that as an explicit per-pitcher
/// failure rather than projecting against a phantom neutral lineup.
pub fn assess_lineup(
    batter_names: &[String],
    mix: &PitchMix,
    batters: &BatterPopulation,
    resolver: &mut NameResolver,
) -> Option<LineupAggregate> {
    let mut matchup_total = 0.0;
    let mut susceptibility_total = 0.0;
    let mut woba_total = 0.0;
    let mut resolved_count = 0usize;

    for name in batter_names.iter().take(LINEUP_SLOTS) {
        let identity = match resolver.resolve(name, MatchThreshold::Batter) {
            Resolution::Exact(identity) => identity,
            Resolution::Approximate { identity, score } => {
                debug!(
                    "fuzzy-resolved batter '{}' -> '{}' (score {:.1})",
                    name, identity.name, score
                );
                identity
            }
            Resolution::Unresolved => {
                warn!("could not resolve batter '{}', skipping", name);
                continue;
            }
        };

        // Resolver identities come from this population, so the lookups
        // only miss if caller wires a resolver from a different snapshot.
        let (Some(susceptibility), Some(woba), Some(profile)) = (
            batters.susceptibility_z(identity.id),
            batters.woba(identity.id),
            batters.matchup_profile(identity.id),
        ) else {
            warn!(
                "batter '{}' (id {}) missing from population, skipping",
                identity.name, identity.id
            );
            continue;
        };

        matchup_total += matchup_score(mix, profile);
        susceptibility_total += susceptibility;
        woba_total += woba;
        resolved_count += 1;
    }

    if resolved_count == 0 {
        return None;
    }

    let n = resolved_count as f64;
    Some(LineupAggregate {
        matchup_score: matchup_total / n,
        susceptibility_z: susceptibility_total / n,
        avg_woba: woba_total / n,
        resolved_count,
        resolved_fraction: resolved_count as f64 / LINEUP_SLOTS as f64,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pitch::{BatterPitchProfile, PitchExposure, PitchType};
    use crate::model::snapshot::BatterSeason;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn make_batter(id: i64, name: &str, pa: u32, so: u32, woba: f64, iso: f64) -> BatterSeason {
        let mut profile = BatterPitchProfile::default();
        profile.swinging_strike_rate = Some(0.10 + id as f64 * 0.01);
        profile.contact_rate = Some(0.80 - id as f64 * 0.01);
        profile.per_pitch.insert(
            PitchType::Fastball,
            PitchExposure {
                weighted_value: Some(id as f64),
                pct_seen: Some(0.55),
            },
        );
        BatterSeason {
            id,
            name: name.into(),
            team: "TST".into(),
            plate_appearances: pa,
            strikeouts: so,
            woba: Some(woba),
            iso: Some(iso),
            profile,
        }
    }

    fn sample_population() -> BatterPopulation {
        BatterPopulation::new(
            2025,
            vec![
                make_batter(1, "Aaron Alpha", 600, 180, 0.300, 0.170),
                make_batter(2, "Brett Bravo", 600, 120, 0.330, 0.150),
                make_batter(3, "Casey Charlie", 600, 90, 0.350, 0.130),
            ],
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aggregate_means_over_resolved_batters() {
        let pop = sample_population();
        let mut resolver = pop.resolver();
        let mix = PitchMix::from_raw([(PitchType::Fastball, 1.0)]);

        let lineup = names(&["Aaron Alpha", "Brett Bravo", "Casey Charlie"]);
        let agg = assess_lineup(&lineup, &mix, &pop, &mut resolver).unwrap();

        assert_eq!(agg.resolved_count, 3);
        assert!(approx_eq(agg.resolved_fraction, 3.0 / 9.0, 1e-10));
        assert!(approx_eq(agg.avg_woba, (0.300 + 0.330 + 0.350) / 3.0, 1e-10));
        // Susceptibility z-scores average 0 over the whole population.
        assert!(approx_eq(agg.susceptibility_z, 0.0, 1e-10));
    }

    #[test]
    fn unresolved_batters_are_skipped_not_fatal() {
        let pop = sample_population();
        let mut resolver = pop.resolver();
        let mix = PitchMix::from_raw([(PitchType::Fastball, 1.0)]);

        let lineup = names(&["Aaron Alpha", "Nonexistent Player", "Brett Bravo"]);
        let agg = assess_lineup(&lineup, &mix, &pop, &mut resolver).unwrap();

        assert_eq!(agg.resolved_count, 2);
        assert!(approx_eq(agg.resolved_fraction, 2.0 / 9.0, 1e-10));
        assert!(approx_eq(agg.avg_woba, (0.300 + 0.330) / 2.0, 1e-10));
    }

    #[test]
    fn zero_resolved_is_explicit_failure() {
        let pop = sample_population();
        let mut resolver = pop.resolver();
        let mix = PitchMix::from_raw([(PitchType::Fastball, 1.0)]);

        let lineup = names(&["Nobody Home", "Empty Chair"]);
        assert!(assess_lineup(&lineup, &mix, &pop, &mut resolver).is_none());
        assert!(assess_lineup(&[], &mix, &pop, &mut resolver).is_none());
    }

    #[test]
    fn overlong_feed_caps_at_nine_slots() {
        let mut seasons: Vec<BatterSeason> = (1..=9)
            .map(|id| make_batter(id, &format!("Starter Number{id}"), 600, 150, 0.300, 0.150))
            .collect();
        // Distinctive tail wOBA: any leakage past the ninth slot shifts the mean.
        seasons.extend(
            (10..=12).map(|id| make_batter(id, &format!("Bench Number{id}"), 200, 50, 0.400, 0.200)),
        );
        let pop = BatterPopulation::new(2025, seasons);
        let mut resolver = pop.resolver();
        let mix = PitchMix::from_raw([(PitchType::Fastball, 1.0)]);

        let mut feed: Vec<String> = (1..=9).map(|id| format!("Starter Number{id}")).collect();
        feed.extend((10..=12).map(|id| format!("Bench Number{id}")));

        let agg = assess_lineup(&feed, &mix, &pop, &mut resolver).unwrap();
        assert_eq!(agg.resolved_count, 9);
        assert!(approx_eq(agg.resolved_fraction, 1.0, 1e-10));
        assert!(approx_eq(agg.avg_woba, 0.300, 1e-10));
    }

    #[test]
    fn fraction_counts_against_nine_slots() {
        let pop = sample_population();
        let mut resolver = pop.resolver();
        let mix = PitchMix::empty();

        let lineup = names(&["Aaron Alpha"]);
        let agg = assess_lineup(&lineup, &mix, &pop, &mut resolver).unwrap();
        assert_eq!(agg.resolved_count, 1);
        assert!(approx_eq(agg.resolved_fraction, 1.0 / 9.0, 1e-10));
        // Empty mix scores neutral for every batter.
        assert_eq!(agg.matchup_score, 0.0);
    }
}
