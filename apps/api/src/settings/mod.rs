//! User settings: API key, base resume and onboarding state.

pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::llm_client::classify::ClassifiedError;
use crate::store::{load, modify, StateStore, StoreError, SETTINGS_KEY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    pub api_key: String,
    pub base_resume_text: String,
    pub onboarding_done: bool,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub api_key: Option<String>,
    pub base_resume_text: Option<String>,
    pub onboarding_done: Option<bool>,
}

/// Inputs every generation call needs.
#[derive(Debug, Clone)]
pub struct GenerationInputs {
    pub api_key: String,
    pub resume_text: String,
}

impl Settings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = api_key.trim().to_string();
        }
        if let Some(text) = patch.base_resume_text {
            self.base_resume_text = text;
        }
        if let Some(done) = patch.onboarding_done {
            self.onboarding_done = done;
        }
    }

    /// Checked before any external call: key first, then resume.
    pub fn require_generation_inputs(&self) -> Result<GenerationInputs, ClassifiedError> {
        if self.api_key.trim().is_empty() {
            return Err(ClassifiedError::no_key());
        }
        if self.base_resume_text.trim().is_empty() {
            return Err(ClassifiedError::no_resume());
        }
        Ok(GenerationInputs {
            api_key: self.api_key.trim().to_string(),
            resume_text: self.base_resume_text.clone(),
        })
    }

    /// Copy safe to return to the client: the key reduced to its last 4 chars.
    pub fn masked(&self) -> Settings {
        let chars: Vec<char> = self.api_key.chars().collect();
        let api_key = if chars.len() <= 4 {
            "*".repeat(chars.len())
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}{tail}", "*".repeat(chars.len() - 4))
        };
        Settings {
            api_key,
            ..self.clone()
        }
    }
}

pub async fn load_settings(store: &dyn StateStore) -> Result<Settings, StoreError> {
    load(store, SETTINGS_KEY).await
}

pub async fn update_settings(
    store: &dyn StateStore,
    patch: SettingsPatch,
) -> Result<Settings, StoreError> {
    let (settings, ()) = modify(store, SETTINGS_KEY, move |s: &mut Settings| s.apply(patch)).await?;
    Ok(settings)
}
