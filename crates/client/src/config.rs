//! Client configuration read from `WASTELAND_*` environment variables.
use std::env;
use std::path::PathBuf;

use game_content::{Background, CharacterClass, CharacterTrait};

/// Settings for one headless session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub world_seed: u64,
    pub class: CharacterClass,
    pub player_name: String,
    pub background: Option<Background>,
    pub traits: Vec<CharacterTrait>,
    /// Directory with `config.toml` and `maps/*.ron`.
    pub data_dir: Option<PathBuf>,
    /// Where snapshots are written; saving is skipped when unset.
    pub save_dir: Option<PathBuf>,
    /// Virtual milliseconds per scripted frame.
    pub frame_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            world_seed: 1,
            class: CharacterClass::Warrior,
            player_name: "Lone Wanderer".to_owned(),
            background: None,
            traits: Vec::new(),
            data_dir: None,
            save_dir: None,
            frame_ms: 50,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WASTELAND_SEED` - World seed (default: 1)
    /// - `WASTELAND_CLASS` - warrior, ranger, medic or engineer (default: warrior)
    /// - `WASTELAND_PLAYER` - Character name
    /// - `WASTELAND_BACKGROUND` - vault_dweller, wasteland_wanderer, tribal or raider
    /// - `WASTELAND_TRAITS` - Comma-separated: heavy_handed, small_frame
    /// - `WASTELAND_DATA_DIR` - Content directory (default: built-in content only)
    /// - `WASTELAND_SAVE_DIR` - Snapshot directory (default: no saves)
    /// - `WASTELAND_FRAME_MS` - Frame length of the scripted demo (default: 50)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("WASTELAND_SEED") {
            config.world_seed = seed;
        }
        if let Some(class) = read_env::<CharacterClass>("WASTELAND_CLASS") {
            config.class = class;
        }
        if let Ok(name) = env::var("WASTELAND_PLAYER")
            && !name.trim().is_empty()
        {
            config.player_name = name.trim().to_owned();
        }
        config.background = read_env::<Background>("WASTELAND_BACKGROUND");
        if let Ok(traits) = env::var("WASTELAND_TRAITS") {
            config.traits = traits
                .split(',')
                .filter_map(|t| t.trim().parse().ok())
                .collect();
        }
        config.data_dir = env::var("WASTELAND_DATA_DIR").ok().map(PathBuf::from);
        config.save_dir = env::var("WASTELAND_SAVE_DIR").ok().map(PathBuf::from);
        if let Some(frame_ms) = read_env::<u64>("WASTELAND_FRAME_MS") {
            config.frame_ms = frame_ms.clamp(1, 1_000);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
