use config::Config;
use serde::Deserialize;

use crate::error::Result;

const CONFIG_FILE: &str = "hakka";
const ENV_PREFIX: &str = "HAKKA";

/// Runtime settings: optional `hakka.toml`, then `HAKKA_*` environment
/// variables, then built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `id` of the element holding the dictionary body.
    pub text_section_id: String,
    /// Runs at or above this size (pt) can open a headword.
    pub large_font_pt: f32,
    /// Runs at or below this size (pt) carry classical notes.
    pub small_font_pt: f32,
    /// Entries per conversion batch.
    pub chunk_size: usize,
    pub output: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            text_section_id: "TextSection".to_string(),
            large_font_pt: 14.0,
            small_font_pt: 8.0,
            chunk_size: 500,
            output: "hakka_dict.json".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
