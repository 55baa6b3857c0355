use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::module::model::Module;

/// Keys a usable module is expected to carry. Lenient loads record the
/// missing ones as warnings; strict loads reject.
pub const REQUIRED_KEYS: &[&str] = &[
    "title",
    "control_objective",
    "evaluation_criteria",
    "required_evidence",
];

/// Load one module YAML file.
///
/// `module_id` defaults to the filename stem when the record omits it.
pub fn load_module_file(path: &Path, strict: bool) -> CoreResult<Module> {
    let raw = fs::read_to_string(path)?;
    let mut module: Module = serde_yaml::from_str(&raw)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    if module.module_id.is_empty() {
        module.module_id = stem.to_string();
    }

    let missing = missing_required_keys(&module);
    if !missing.is_empty() {
        if strict {
            return Err(CoreError::ModuleValidation(format!(
                "{}.yaml missing required keys: {}",
                stem,
                missing.join(", ")
            )));
        }
        for key in missing {
            module
                .meta
                .warnings
                .push(format!("missing required key: {}", key));
        }
    }

    module.meta.source_path = Some(path.display().to_string());
    Ok(module)
}

/// Load a module by filename stem from a modules directory.
/// A missing file is `None`, not an error.
pub fn load_module(dir: &Path, stem: &str, strict: bool) -> CoreResult<Option<Module>> {
    let path = dir.join(format!("{}.yaml", stem));
    if !path.exists() {
        return Ok(None);
    }
    load_module_file(&path, strict).map(Some)
}

/// Serialize a module record to YAML at `path`, struct field order
/// preserved so the files stay human-editable.
pub fn save_module(module: &Module, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(module)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// Sorted `(stem, display_title)` pairs for every module YAML in `dir`,
/// skipping underscore-prefixed draft files.
pub fn list_modules(dir: &Path) -> CoreResult<Vec<(String, String)>> {
    let mut modules = Vec::new();
    if !dir.exists() {
        return Ok(modules);
    }

    let mut stems: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(s) => s.to_string(),
            None => continue,
        };
        if stem.starts_with('_') {
            continue;
        }
        stems.push(stem);
    }
    stems.sort();

    for stem in stems {
        if let Some(module) = load_module(dir, &stem, false)? {
            let title = module.title.clone().unwrap_or_else(|| stem.clone());
            modules.push((stem, title));
        }
    }
    Ok(modules)
}

fn missing_required_keys(module: &Module) -> Vec<&'static str> {
    let mut missing = Vec::new();
    for key in REQUIRED_KEYS {
        let absent = match *key {
            "title" => module.title.is_none(),
            "control_objective" => module.control_objective.is_none(),
            "evaluation_criteria" => module.evaluation_criteria.is_empty(),
            "required_evidence" => module.required_evidence.is_empty(),
            _ => false,
        };
        if absent {
            missing.push(*key);
        }
    }
    missing
}
