/// Game configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Display name for the first player.
    pub player_one: String,
    /// Display name for the second player.
    pub player_two: String,
}

impl GameConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        GameConfig {
            player_one: std::env::var("CHESS_PLAYER_ONE")
                .unwrap_or_else(|_| "Player 1".to_string()),
            player_two: std::env::var("CHESS_PLAYER_TWO")
                .unwrap_or_else(|_| "Player 2".to_string()),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_one: "Player 1".to_string(),
            player_two: "Player 2".to_string(),
        }
    }
}
