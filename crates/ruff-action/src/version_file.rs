//! Reading the ruff version from a project's own dependency declarations.
//!
//! `INPUT_VERSION_FILE` may name a `pyproject.toml`, a requirements file, or
//! a directory from which `pyproject.toml` is searched upward.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ActionError, VersionFileError};

const PYPROJECT: &str = "pyproject.toml";
const PACKAGE: &str = "ruff";

#[derive(Debug, Default, Deserialize)]
struct Pyproject {
    #[serde(default)]
    project: Project,
    #[serde(default, rename = "dependency-groups")]
    dependency_groups: DependencyGroups,
}

#[derive(Debug, Default, Deserialize)]
struct Project {
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DependencyGroups {
    // Entries may also be `{ include-group = "..." }` tables.
    #[serde(default)]
    dev: Vec<toml::Value>,
}

/// Resolve the ruff specifier declared by `path`.
///
/// Returns `Ok(None)` when the file exists but does not mention ruff, or
/// when `path` is a directory with no `pyproject.toml` up to the workspace
/// root.
///
/// # Errors
///
/// Returns [`ActionError::VersionFile`] if the file cannot be read or a
/// `.toml` file cannot be parsed.
pub fn resolve(path: &Path, workspace: Option<&Path>) -> Result<Option<String>, ActionError> {
    let file = if path.is_dir() {
        let Some(found) = find_pyproject_toml(path, workspace.unwrap_or(path)) else {
            tracing::warn!(start = %path.display(), "no pyproject.toml found, using latest ruff");
            return Ok(None);
        };
        found
    } else {
        path.to_path_buf()
    };

    let wrap = |source: VersionFileError| ActionError::VersionFile {
        path: file.clone(),
        source,
    };
    let content = std::fs::read_to_string(&file).map_err(|e| wrap(e.into()))?;
    let spec = if file.extension().is_some_and(|ext| ext == "toml") {
        spec_from_pyproject(&content).map_err(|e| wrap(e.into()))?
    } else {
        spec_from_requirements(&content)
    };

    if spec.is_none() {
        tracing::warn!(path = %file.display(), "no ruff requirement found, using latest ruff");
    }
    Ok(spec)
}

/// Search for `pyproject.toml` from `start` upward, never leaving
/// `workspace_root`.
pub fn find_pyproject_toml(start: &Path, workspace_root: &Path) -> Option<PathBuf> {
    let start = absolute(start);
    let root = absolute(workspace_root);

    let mut dir = start.as_path();
    loop {
        let candidate = dir.join(PYPROJECT);
        tracing::debug!(path = %candidate.display(), "checking for pyproject.toml");
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "found pyproject.toml");
            return Some(candidate);
        }
        if dir == root {
            return None;
        }
        let parent = dir.parent()?;
        if !parent.starts_with(&root) {
            return None;
        }
        dir = parent;
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn spec_from_pyproject(content: &str) -> Result<Option<String>, toml::de::Error> {
    let pyproject: Pyproject = toml::from_str(content)?;
    let dev = pyproject
        .dependency_groups
        .dev
        .iter()
        .filter_map(toml::Value::as_str);
    Ok(pyproject
        .project
        .dependencies
        .iter()
        .map(String::as_str)
        .chain(dev)
        .find_map(ruff_spec_from_requirement))
}

fn spec_from_requirements(content: &str) -> Option<String> {
    content
        .lines()
        .map(|line| line.split_once(" #").map_or(line, |(req, _)| req))
        .filter(|line| {
            let line = line.trim_start();
            !line.starts_with('#') && !line.starts_with('-')
        })
        .find_map(ruff_spec_from_requirement)
}

/// Extract the version specifier from a single requirement naming ruff.
///
/// Environment markers are dropped and an exact `==` pin is reduced to the
/// bare version.
pub fn ruff_spec_from_requirement(requirement: &str) -> Option<String> {
    let requirement = requirement.trim();
    let requirement = requirement
        .strip_suffix('\\')
        .unwrap_or(requirement)
        .trim_end();
    let (requirement, has_markers) = match requirement.split_once(';') {
        Some((req, _)) => (req.trim(), true),
        None => (requirement, false),
    };

    let rest = requirement.strip_prefix(PACKAGE)?;
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
        return None;
    }
    let spec = rest.trim();
    if spec.is_empty() {
        return None;
    }

    if has_markers {
        tracing::warn!(
            "Environment markers are ignored. ruff is a standalone tool that works independently of Python version."
        );
    }
    let spec = spec.strip_prefix("==").map_or(spec, str::trim);
    tracing::info!(spec, "found ruff version requirement");
    Some(spec.to_string())
}
