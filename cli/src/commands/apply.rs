use super::Context;
use crate::error::{AppError, AppResult};
use crate::palette::{AppNameValidator, PaletteSource, ThemeNameValidator, load_palette};
use crate::validation::Validator;
use engine::apps::AppId;
use engine::classifier::Classifier;
use engine::orchestrator::{ApplyReport, ApplyRequest, Detection};
use engine::palette::{PaletteReport, PaletteValidator, ValidationMode};
use serde::Serialize;

/// Arguments shared by `apply` and `preview`.
#[derive(Debug, Clone)]
pub struct ApplyArgs {
    pub palette: PaletteSource,
    /// App names from the command line; `None` falls back to `apply.apps`.
    pub apps: Option<Vec<String>>,
    pub theme_name: Option<String>,
    pub lenient: bool,
    pub preview: bool,
}

pub fn run_apply(ctx: &Context, args: &ApplyArgs) -> AppResult<ApplyReport> {
    let palette = load_palette(&args.palette)?;
    let request = build_request(ctx, args)?;

    let mut store = ctx.open_store()?;
    let report = ctx.applicator(&mut store).apply_theme(&palette, &request);

    log::info!(
        "{} finished: {} applied, {} failed, {} skipped",
        if report.preview { "Preview" } else { "Apply" },
        report.applied.len(),
        report.failed.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn build_request(ctx: &Context, args: &ApplyArgs) -> AppResult<ApplyRequest> {
    let defaults = ctx.config().apply();

    let mut request = ApplyRequest {
        preview: args.preview,
        ..ApplyRequest::default()
    };

    request.apps = match &args.apps {
        Some(names) => Some(parse_apps(names)?),
        None => defaults.apps(),
    };

    if let Some(name) = args.theme_name.as_deref().or(defaults.theme_name()) {
        ThemeNameValidator.validate(name)?;
        request.theme_name = Some(name.to_string());
    }

    request.validation = if args.lenient {
        ValidationMode::Lenient
    } else {
        defaults.validation_mode()
    };

    Ok(request)
}

/// Parse app names, rejecting unknown ones and dropping duplicates.
pub fn parse_apps(names: &[String]) -> AppResult<Vec<AppId>> {
    let mut apps = Vec::new();
    for name in names {
        AppNameValidator.validate(name.as_str())?;
        let app: AppId = name
            .parse()
            .map_err(|e: engine::apps::UnknownApp| AppError::Input(e.to_string()))?;
        if !apps.contains(&app) {
            apps.push(app);
        }
    }
    if apps.is_empty() {
        return Err(AppError::Input("No applications selected".into()));
    }
    Ok(apps)
}

/// Result of probing one app for `detect`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectResult {
    Found(Detection),
    NotFound { app: AppId, reason: String },
}

pub fn run_detect(ctx: &Context, apps: Option<&[String]>) -> AppResult<Vec<DetectResult>> {
    let apps = match apps {
        Some(names) => parse_apps(names)?,
        None => AppId::ALL.to_vec(),
    };

    let locator = ctx.locator();
    let results = apps
        .into_iter()
        .map(
            |app| match Detection::probe(&locator, Classifier::default(), app) {
                Ok(detection) => DetectResult::Found(detection),
                Err(e) => DetectResult::NotFound {
                    app,
                    reason: e.to_string(),
                },
            },
        )
        .collect();
    Ok(results)
}

pub fn run_validate(palette: &PaletteSource, lenient: bool) -> AppResult<PaletteReport> {
    let palette = load_palette(palette)?;
    let mode = if lenient {
        ValidationMode::Lenient
    } else {
        ValidationMode::Strict
    };
    Ok(PaletteValidator::new(mode).validate(&palette))
}
