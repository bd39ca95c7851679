use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, MAX_MAX_TOKENS, MAX_TEMPERATURE,
    MIN_MAX_TOKENS, MIN_TEMPERATURE,
};

/// Assistant and feature configuration. `max_tokens` and `temperature`
/// are kept inside their bounds by every write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_save: bool,
    pub voice_enabled: bool,
    pub code_execution: bool,
    pub web_search: bool,
    pub image_generation: bool,
    pub max_tokens: u32,
    pub temperature: f64,
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save: true,
            voice_enabled: true,
            code_execution: true,
            web_search: true,
            image_generation: true,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

pub fn clamp_max_tokens(value: u32) -> u32 {
    value.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS)
}

/// NaN has no place in the range, so it yields `None` and the caller keeps
/// its previous value.
pub fn clamp_temperature(value: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE))
}

impl Settings {
    /// Pull out-of-range numbers back inside their bounds (used after loading
    /// snapshots written by other tools or hand-edited files)
    pub fn normalize(&mut self) {
        self.max_tokens = clamp_max_tokens(self.max_tokens);
        self.temperature = clamp_temperature(self.temperature).unwrap_or(DEFAULT_TEMPERATURE);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub auto_save: Option<bool>,
    pub voice_enabled: Option<bool>,
    pub code_execution: Option<bool>,
    pub web_search: Option<bool>,
    pub image_generation: Option<bool>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_save(mut self, value: bool) -> Self {
        self.auto_save = Some(value);
        self
    }

    pub fn voice_enabled(mut self, value: bool) -> Self {
        self.voice_enabled = Some(value);
        self
    }

    pub fn code_execution(mut self, value: bool) -> Self {
        self.code_execution = Some(value);
        self
    }

    pub fn web_search(mut self, value: bool) -> Self {
        self.web_search = Some(value);
        self
    }

    pub fn image_generation(mut self, value: bool) -> Self {
        self.image_generation = Some(value);
        self
    }

    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }

    pub fn temperature(mut self, value: f64) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.auto_save {
            settings.auto_save = v;
        }
        if let Some(v) = self.voice_enabled {
            settings.voice_enabled = v;
        }
        if let Some(v) = self.code_execution {
            settings.code_execution = v;
        }
        if let Some(v) = self.web_search {
            settings.web_search = v;
        }
        if let Some(v) = self.image_generation {
            settings.image_generation = v;
        }
        if let Some(v) = self.max_tokens {
            let clamped = clamp_max_tokens(v);
            if clamped != v {
                tracing::debug!("max_tokens {} clamped to {}", v, clamped);
            }
            settings.max_tokens = clamped;
        }
        if let Some(v) = self.temperature {
            match clamp_temperature(v) {
                Some(clamped) => settings.temperature = clamped,
                None => tracing::debug!("ignoring NaN temperature"),
            }
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
    }
}
