//! Optional model-backed generation of configuration for apps without a
//! native rewriter.
//!
//! The orchestrator only sees the [`PatchGenerator`] capability. The result
//! replaces the whole file, so it is only ever written after a backup.
//! [`UnavailableGenerator`] is the default; [`OllamaGenerator`] talks to a
//! local `ollama` installation.

use crate::apps::{AppId, ConfigFormat};
use crate::common::errors::ErrorContext;
use crate::palette::ColorPalette;
use crate::utils::process::{run_checked, run_with_timeout};
use std::time::Duration;

/// Coding models tried in order; a name without tag matches any tag.
pub const DEFAULT_MODELS: &[&str] = &["wizardcoder:15b", "codegemma", "codellama", "deepseek-coder"];

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(45);

const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Complete replacement content for the file.
    Patch(String),
    /// No patch could be produced, with the reason.
    Unavailable(String),
}

pub trait PatchGenerator {
    fn generate_patch(
        &self,
        app: AppId,
        format: ConfigFormat,
        palette: &ColorPalette,
        current: &str,
    ) -> Generated;
}

/// Generator used when generation is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGenerator;

impl PatchGenerator for UnavailableGenerator {
    fn generate_patch(
        &self,
        app: AppId,
        _format: ConfigFormat,
        _palette: &ColorPalette,
        _current: &str,
    ) -> Generated {
        Generated::Unavailable(format!("No rewriter for {app} and generation is disabled"))
    }
}

/// Runs a local coding model through the `ollama` command line.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    program: String,
    models: Vec<String>,
    timeout: Duration,
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            DEFAULT_GENERATION_TIMEOUT,
        )
    }
}

impl OllamaGenerator {
    pub fn new(models: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: "ollama".to_string(),
            models,
            timeout,
        }
    }

    /// Use another executable than `ollama` from `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn installed_models(&self) -> Result<Vec<String>, String> {
        let listing = run_checked(&self.program, &["list"], None, LIST_TIMEOUT)
            .with_context(|| format!("`{} list` failed", self.program))?;
        Ok(parse_model_list(&listing))
    }

    fn run_model(&self, model: &str, prompt: &str) -> Result<String, String> {
        let output = run_with_timeout(&self.program, &["run", model], Some(prompt), self.timeout)
            .with_context(|| format!("Model {model} failed"))?;
        if !output.status.success() {
            return Err(format!(
                "Model {model} exited with {}: {}",
                output.status,
                output.stderr.trim()
            ));
        }
        Ok(output.stdout)
    }
}

impl PatchGenerator for OllamaGenerator {
    fn generate_patch(
        &self,
        app: AppId,
        format: ConfigFormat,
        palette: &ColorPalette,
        current: &str,
    ) -> Generated {
        let installed = match self.installed_models() {
            Ok(installed) => installed,
            Err(reason) => {
                log::warn!("Generation unavailable: {reason}");
                return Generated::Unavailable(reason);
            }
        };

        let Some(model) = choose_model(&self.models, &installed) else {
            return Generated::Unavailable("No coding model installed".to_string());
        };

        log::info!("Generating {app} configuration with {model}");
        let prompt = build_prompt(app, format, palette, current);
        match self.run_model(&model, &prompt) {
            Ok(response) => {
                let patch = strip_code_fence(&response);
                if patch.trim().is_empty() {
                    Generated::Unavailable(format!("Model {model} returned nothing"))
                } else {
                    Generated::Patch(patch)
                }
            }
            Err(reason) => {
                log::warn!("{reason}");
                Generated::Unavailable(reason)
            }
        }
    }
}

/// Model names from `ollama list` output (first column, header skipped).
fn parse_model_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn choose_model(preferred: &[String], installed: &[String]) -> Option<String> {
    preferred
        .iter()
        .find(|model| installed.contains(model))
        .or_else(|| {
            installed.iter().find(|name| {
                preferred.iter().any(|model| {
                    let family = model.split(':').next().unwrap_or(model);
                    name.contains(family)
                })
            })
        })
        .cloned()
}

fn build_prompt(app: AppId, format: ConfigFormat, palette: &ColorPalette, current: &str) -> String {
    let colors = serde_json::to_string_pretty(palette).unwrap_or_default();
    let format = format.as_str();
    let mut prompt = format!(
        "System: You are an expert in {app} configuration and theming. Apply the given color \
         palette while preserving every setting unrelated to theming.\n\n\
         User: Rewrite this {format} configuration for {app} so it uses this color palette:\n\
         {colors}\n\n\
         Only change color settings. Keep every other line as it is. Use valid {format} syntax.\n"
    );
    if !current.is_empty() {
        prompt.push_str("\nCurrent configuration:\n");
        prompt.push_str(current);
        prompt.push('\n');
    }
    prompt.push_str("\nReturn only the complete configuration file, no explanations.\n");
    prompt
}

/// Drop a surrounding markdown code fence, if the model added one.
fn strip_code_fence(response: &str) -> String {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return format!("{trimmed}\n");
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    let body = body.trim_end().strip_suffix("```").unwrap_or(body);
    format!("{}\n", body.trim_end())
}
