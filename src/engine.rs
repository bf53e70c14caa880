// Slate engine: scores every probable starter with a posted strikeout line.
//
// Drives the full per-pitcher pipeline (resolve, line join, lineup
// aggregation, projection, park adjustment, edge) and collects one row per
// scoreable start. A pitcher that cannot be scored becomes a skip record
// with the reason attached; one bad start never takes down the slate.

use crate::model::edge::{assess_edge, EdgeAssessment};
use crate::model::lineup::assess_lineup;
use crate::model::park::contextual_adjustment;
use crate::model::projection::{project_strikeouts, ModelParams, ProjectionInputs};
use crate::model::resolve::{MatchThreshold, NameResolver, PlayerIdentity, Resolution};
use crate::model::snapshot::{BatterPopulation, PitcherPopulation};
use crate::providers::{
    BettingLine, BettingLineProvider, LineupProvider, ProbableStart, ProviderError, StatsProvider,
};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SlateError {
    #[error("could not resolve pitcher '{name}' against the season population")]
    UnresolvedPitcher { name: String },

    #[error("no posted strikeout line for {name}")]
    NoPostedLine { name: String },

    #[error("no resolvable batters in the {team} lineup")]
    InsufficientLineup { team: String },

    #[error("required season stats unavailable for {name}")]
    MissingPitcherStats { name: String },

    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One scored start: the park-adjusted projection joined with its line and
/// the edge assessment derived from the pair.
#[derive(Debug, Clone)]
pub struct SlateProjection {
    pub pitcher: String,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub game_time: Option<String>,
    /// Final projection after the contextual (park) multiplier.
    pub projected_strikeouts: f64,
    pub line: BettingLine,
    pub edge: EdgeAssessment,
    /// Fraction of the nine lineup slots that resolved; data-quality signal
    /// only, never a model input.
    pub lineup_coverage: f64,
}

/// Why one start produced no row.
#[derive(Debug)]
pub struct SlateSkip {
    pub pitcher: String,
    pub team: String,
    pub reason: SlateError,
}

/// Everything one run produced: scored rows plus per-pitcher skips.
#[derive(Debug)]
pub struct SlateReport {
    pub date: NaiveDate,
    pub rows: Vec<SlateProjection>,
    pub skips: Vec<SlateSkip>,
}

impl SlateReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Score a day's probable starts.
///
/// Populations and the lines file are fetched once up front; failure there
/// is fatal for the run since nothing can be scored without them. Inside the
/// loop every failure is per-pitcher: recorded, logged, and the batch moves
/// on. Starts are processed sequentially; the populations are read-only
/// snapshots, so nothing here precludes parallelism later.
pub async fn run_slate(
    starts: &[ProbableStart],
    stats: &dyn StatsProvider,
    lineups: &dyn LineupProvider,
    lines: &dyn BettingLineProvider,
    params: &ModelParams,
    date: NaiveDate,
) -> Result<SlateReport, SlateError> {
    let season = date.year();
    let pitchers = stats.pitcher_population(season).await?;
    let batters = stats.batter_population(season).await?;
    let posted_lines = lines.lines(date).await?;
    info!(
        "scoring slate for {}: {} probable starts, {} posted lines, populations {}P/{}B",
        date,
        starts.len(),
        posted_lines.len(),
        pitchers.len(),
        batters.len()
    );

    let mut ctx = SlateContext {
        pitcher_resolver: pitchers.resolver(),
        batter_resolver: batters.resolver(),
        pitchers: &*pitchers,
        batters: &*batters,
        posted_lines: &posted_lines,
        params,
        date,
    };
    let mut rows = Vec::new();
    let mut skips = Vec::new();

    for start in starts {
        match score_start(&mut ctx, start, lineups).await {
            Ok(row) => {
                debug!(
                    "{} ({} vs {}): projected {:.2} against line {:.1} -> {}",
                    row.pitcher,
                    row.team,
                    row.opponent,
                    row.projected_strikeouts,
                    row.line.line,
                    row.edge.recommendation.label()
                );
                rows.push(row);
            }
            Err(reason) => {
                match &reason {
                    SlateError::NoPostedLine { .. } => debug!("{}", reason),
                    other => warn!("skipping {}: {}", start.pitcher_name, other),
                }
                skips.push(SlateSkip {
                    pitcher: start.pitcher_name.clone(),
                    team: start.team.clone(),
                    reason,
                });
            }
        }
    }

    let flagged = rows
        .iter()
        .filter(|r| r.edge.recommendation.is_bet())
        .count();
    info!(
        "slate complete: {} scored ({} bet-flagged), {} skipped",
        rows.len(),
        flagged,
        skips.len()
    );
    Ok(SlateReport { date, rows, skips })
}

/// Everything score_start needs besides the start itself. Resolvers are
/// owned here so their caches persist across the whole slate.
struct SlateContext<'a> {
    pitchers: &'a PitcherPopulation,
    batters: &'a BatterPopulation,
    posted_lines: &'a [BettingLine],
    params: &'a ModelParams,
    date: NaiveDate,
    pitcher_resolver: NameResolver,
    batter_resolver: NameResolver,
}

/// Run the pipeline for a single probable start.
async fn score_start(
    ctx: &mut SlateContext<'_>,
    start: &ProbableStart,
    lineups: &dyn LineupProvider,
) -> Result<SlateProjection, SlateError> {
    // 1. Resolve the probable pitcher against the season population.
    let identity = resolve_pitcher(start, &mut ctx.pitcher_resolver)?;
    let pitcher = ctx
        .pitchers
        .get(identity.id)
        .ok_or_else(|| SlateError::UnresolvedPitcher {
            name: start.pitcher_name.clone(),
        })?;

    // 2. Join the posted line on canonical name + team.
    let line = ctx
        .posted_lines
        .iter()
        .find(|l| l.pitcher == identity.name && l.team == start.team)
        .ok_or_else(|| SlateError::NoPostedLine {
            name: identity.name.clone(),
        })?;

    // 3. Opposing lineup; a provider failure here is scoped to this start.
    let batter_names = lineups.lineup(&start.opponent, ctx.date).await?;
    let aggregate = assess_lineup(
        &batter_names,
        &pitcher.pitch_mix,
        ctx.batters,
        &mut ctx.batter_resolver,
    )
    .ok_or_else(|| SlateError::InsufficientLineup {
        team: start.opponent.clone(),
    })?;

    // 4. Derived pitcher stats; any gap is a hard failure for this start.
    let missing = || SlateError::MissingPitcherStats {
        name: identity.name.clone(),
    };
    let k_per_9 = pitcher.k_per_9().ok_or_else(missing)?;
    let base_innings = pitcher.base_innings_per_start().ok_or_else(missing)?;
    let pitcher_k_z = ctx.pitchers.k_rate_z(identity.id).ok_or_else(missing)?;

    // 5. Project, then apply the contextual multiplier before edge math.
    let inputs = ProjectionInputs {
        k_per_9,
        base_innings_per_start: base_innings,
        pitcher_k_z,
        pitch_quality_score: pitcher.pitch_quality_score(),
        pitch_mix_score: aggregate.matchup_score,
        lineup_susceptibility_z: aggregate.susceptibility_z,
        lineup_woba: aggregate.avg_woba,
    };
    let projection = project_strikeouts(&inputs, ctx.params);
    let context = contextual_adjustment(&start.team, &start.opponent, start.is_home);
    let adjusted = projection.projected_strikeouts * context.factor();

    let edge = assess_edge(adjusted, line.line);

    Ok(SlateProjection {
        pitcher: identity.name,
        team: start.team.clone(),
        opponent: start.opponent.clone(),
        is_home: start.is_home,
        game_time: start.game_time.clone(),
        projected_strikeouts: adjusted,
        line: line.clone(),
        edge,
        lineup_coverage: aggregate.resolved_fraction,
    })
}

fn resolve_pitcher(
    start: &ProbableStart,
    resolver: &mut NameResolver,
) -> Result<PlayerIdentity, SlateError> {
    match resolver.resolve(&start.pitcher_name, MatchThreshold::Pitcher) {
        Resolution::Exact(identity) => Ok(identity),
        Resolution::Approximate { identity, score } => {
            debug!(
                "fuzzy-resolved pitcher '{}' -> '{}' ({:.1})",
                start.pitcher_name, identity.name, score
            );
            Ok(identity)
        }
        Resolution::Unresolved => Err(SlateError::UnresolvedPitcher {
            name: start.pitcher_name.clone(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
