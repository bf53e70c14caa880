// Contextual adjustment: ballpark strikeout factors.

/// Ballpark strikeout factor by home-team abbreviation, 2023-25 averages.
/// Parks without an entry adjust by 1.00.
pub fn park_k_factor(home_team: &str) -> f64 {
    match home_team {
        "COL" => 0.92, // Coors Field
        "BOS" => 0.98, // Fenway Park
        "CIN" => 1.02, // Great American Ball Park
        "ARI" => 0.94, // Chase Field
        "KC" => 0.88,  // Kauffman Stadium
        "MIN" => 1.07, // Target Field
        "MIA" => 0.99, // loanDepot Park
        "HOU" => 1.00, // Minute Maid Park
        "WSH" => 0.88, // Nationals Park
        "LAD" => 0.98, // Dodger Stadium
        "BAL" => 0.98, // Camden Yards
        "LAA" => 1.06, // Angel Stadium
        "STL" => 0.91, // Busch Stadium
        "PIT" => 0.95, // PNC Park
        "ATL" => 1.07, // Truist Park
        "NYY" => 1.01, // Yankee Stadium
        "PHI" => 1.02, // Citizens Bank Park
        "TOR" => 0.99, // Rogers Centre
        "TEX" => 1.00, // Globe Life Field
        "DET" => 0.99, // Comerica Park
        "CWS" => 1.01, // Guaranteed Rate Field
        "SD" => 1.02,  // Petco Park
        "NYM" => 1.04, // Citi Field
        "CHC" => 1.02, // Wrigley Field
        "CLE" => 1.01, // Progressive Field
        "SF" => 0.97,  // Oracle Park
        "MIL" => 1.11, // American Family Field
        "SEA" => 1.17, // T-Mobile Park
        _ => 1.00,
    }
}

/// Weather multiplier. Not incorporated yet; always 1.0 so the contextual
/// pipeline keeps its slot.
pub fn weather_factor() -> f64 {
    1.0
}

/// Umpire multiplier. Not incorporated yet; always 1.0 so the contextual
/// pipeline keeps its slot.
pub fn umpire_factor() -> f64 {
    1.0
}

/// The full contextual adjustment applied to one start's projection.
#[derive(Debug, Clone)]
pub struct ContextualAdjustment {
    /// Whose park the game is in (the pitcher's team at home, otherwise the
    /// opponent's).
    pub park_team: String,
    pub park_factor: f64,
    pub weather: f64,
    pub umpire: f64,
}

/// Determine the contextual multiplier for a start.
pub fn contextual_adjustment(team: &str, opponent: &str, is_home: bool) -> ContextualAdjustment {
    let park_team = if is_home { team } else { opponent };
    ContextualAdjustment {
        park_team: park_team.to_string(),
        park_factor: park_k_factor(park_team),
        weather: weather_factor(),
        umpire: umpire_factor(),
    }
}

impl ContextualAdjustment {
    /// Combined multiplier for the projection.
    pub fn factor(&self) -> f64 {
        self.park_factor * self.weather * self.umpire
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn home_start_uses_own_park() {
        let adj = contextual_adjustment("SEA", "HOU", true);
        assert_eq!(adj.park_team, "SEA");
        assert!(approx_eq(adj.park_factor, 1.17, 1e-10));
    }

    #[test]
    fn road_start_uses_opponent_park() {
        let adj = contextual_adjustment("SEA", "KC", false);
        assert_eq!(adj.park_team, "KC");
        assert!(approx_eq(adj.park_factor, 0.88, 1e-10));
    }

    #[test]
    fn unknown_park_is_neutral() {
        assert!(approx_eq(park_k_factor("TB"), 1.00, 1e-10));
        assert!(approx_eq(park_k_factor(""), 1.00, 1e-10));
    }

    #[test]
    fn weather_and_umpire_are_inert() {
        let adj = contextual_adjustment("MIL", "CHC", true);
        assert_eq!(adj.weather, 1.0);
        assert_eq!(adj.umpire, 1.0);
        assert!(approx_eq(adj.factor(), adj.park_factor, 1e-12));
    }
}
