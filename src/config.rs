/// Configuration for a new life.
pub struct GameConfig {
    /// RNG seed for deterministic play.
    pub seed: u64,
    pub start_year: i32,
    pub player_name: String,
    pub starting_cash: i64,
    /// Whether to generate parents (and maybe a sibling) at birth.
    pub generate_family: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 2000,
            player_name: "Alex Doe".to_string(),
            starting_cash: 0,
            generate_family: true,
        }
    }
}

impl GameConfig {
    pub fn new(player_name: &str, start_year: i32, seed: u64) -> Self {
        Self {
            player_name: player_name.to_string(),
            start_year,
            seed,
            ..Self::default()
        }
    }
}
