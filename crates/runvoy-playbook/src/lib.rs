//! The Playbook Compiler (§4.D): loads a named YAML execution template and
//! folds it together with CLI overrides and user-supplied env/secrets into
//! a canonical [`ExecutionRequest`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use runvoy_core::ExecutionRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybookError {
    #[error("playbook not found: {0}")]
    NotFound(String),

    #[error("failed to parse playbook {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("playbook {0} is invalid: {1}")]
    Invalid(String, String),

    #[error("failed to read playbook directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PlaybookError>;

/// A declarative execution template, identified by its base filename
/// (without extension) inside the playbook directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Playbook {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub git_repo: Option<String>,
    #[serde(default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub git_path: Option<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

/// CLI/flag-level overrides applied before the playbook's own fields. An
/// empty string leaves the playbook value intact; a non-empty override
/// replaces it.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub image: String,
    pub git_repo: String,
    pub git_ref: String,
    pub git_path: String,
}

/// Enumerates files with a YAML extension (`.yaml` or `.yml`) in the
/// playbook directory, returning basenames sorted lexicographically.
pub fn list_playbooks(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(PlaybookError::Io { path: dir.to_path_buf(), source }),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PlaybookError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if !is_yaml {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Loads and validates a playbook by name, trying `<name>.yaml` then
/// `<name>.yml`.
#[tracing::instrument(skip(dir))]
pub fn load_playbook(dir: &Path, name: &str) -> Result<Playbook> {
    let candidates = [dir.join(format!("{name}.yaml")), dir.join(format!("{name}.yml"))];
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .ok_or_else(|| PlaybookError::NotFound(name.to_string()))?;

    let contents = std::fs::read_to_string(path)
        .map_err(|source| PlaybookError::Io { path: path.clone(), source })?;
    let playbook: Playbook = serde_yaml::from_str(&contents)
        .map_err(|source| PlaybookError::Parse { name: name.to_string(), source })?;

    if playbook.commands.is_empty() {
        return Err(PlaybookError::Invalid(
            name.to_string(),
            "commands must not be empty".to_string(),
        ));
    }

    Ok(playbook)
}

/// Deterministic compilation: overrides, then env merge (user wins), then
/// secrets concatenation (playbook then user, no dedup), then command
/// folding (`" && "`-joined, source order).
pub fn compile(
    playbook: &Playbook,
    overrides: &Overrides,
    user_env: &HashMap<String, String>,
    user_secrets: &[String],
) -> ExecutionRequest {
    let image = if overrides.image.is_empty() { playbook.image.clone() } else { Some(overrides.image.clone()) };
    let git_repo = if overrides.git_repo.is_empty() { playbook.git_repo.clone() } else { Some(overrides.git_repo.clone()) };
    let git_ref = if overrides.git_ref.is_empty() { playbook.git_ref.clone() } else { Some(overrides.git_ref.clone()) };
    let git_path = if overrides.git_path.is_empty() { playbook.git_path.clone() } else { Some(overrides.git_path.clone()) };

    let mut env = playbook.env.clone();
    for (k, v) in user_env {
        env.insert(k.clone(), v.clone());
    }

    let mut secrets = playbook.secrets.clone();
    secrets.extend(user_secrets.iter().cloned());

    let command = playbook.commands.join(" && ");

    ExecutionRequest {
        command,
        image,
        git_repo,
        git_ref,
        git_path,
        env,
        secrets,
        timeout_seconds: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_playbook() -> Playbook {
        Playbook {
            description: None,
            image: Some("a:1".to_string()),
            git_repo: None,
            git_ref: None,
            git_path: None,
            secrets: vec!["s1".to_string()],
            env: HashMap::from([("K".to_string(), "p".to_string())]),
            commands: vec!["echo hi".to_string(), "ls".to_string()],
        }
    }

    #[test]
    fn empty_override_preserves_playbook_value() {
        let pb = sample_playbook();
        let overrides = Overrides::default();
        let req = compile(&pb, &overrides, &HashMap::new(), &[]);
        assert_eq!(req.image.as_deref(), Some("a:1"));
    }

    #[test]
    fn non_empty_override_replaces_playbook_value() {
        let pb = sample_playbook();
        let overrides = Overrides { image: "b:2".to_string(), ..Default::default() };
        let req = compile(&pb, &overrides, &HashMap::new(), &[]);
        assert_eq!(req.image.as_deref(), Some("b:2"));
    }

    #[test]
    fn user_env_overwrites_shared_keys_others_pass_through() {
        let pb = sample_playbook();
        let overrides = Overrides::default();
        let user_env = HashMap::from([("K".to_string(), "u".to_string()), ("Z".to_string(), "z".to_string())]);
        let req = compile(&pb, &overrides, &user_env, &["s2".to_string()]);
        assert_eq!(req.env.get("K"), Some(&"u".to_string()));
        assert_eq!(req.env.get("Z"), Some(&"z".to_string()));
        assert_eq!(req.secrets, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn commands_fold_in_source_order() {
        let pb = sample_playbook();
        let req = compile(&pb, &Overrides::default(), &HashMap::new(), &[]);
        assert_eq!(req.command, "echo hi && ls");
    }

    #[test]
    fn concrete_scenario_from_spec() {
        let pb = sample_playbook();
        let overrides = Overrides { image: String::new(), ..Default::default() };
        let user_env = HashMap::from([("K".to_string(), "u".to_string()), ("Z".to_string(), "z".to_string())]);
        let req = compile(&pb, &overrides, &user_env, &["s2".to_string()]);
        assert_eq!(req.command, "echo hi && ls");
        assert_eq!(req.image.as_deref(), Some("a:1"));
        assert_eq!(req.env.get("K"), Some(&"u".to_string()));
        assert_eq!(req.env.get("Z"), Some(&"z".to_string()));
        assert_eq!(req.secrets, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn load_missing_playbook_errors_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_playbook(dir.path(), "does-not-exist").unwrap_err();
        assert!(matches!(err, PlaybookError::NotFound(_)));
    }

    #[test]
    fn load_rejects_empty_commands() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.yaml"), "commands: []\n").unwrap();
        let err = load_playbook(dir.path(), "empty").unwrap_err();
        assert!(matches!(err, PlaybookError::Invalid(_, _)));
    }

    #[test]
    fn load_rejects_unparsable_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "commands: [\n").unwrap();
        let err = load_playbook(dir.path(), "bad").unwrap_err();
        assert!(matches!(err, PlaybookError::Parse { .. }));
    }

    #[test]
    fn list_playbooks_sorted_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.yaml", "alpha.yml", "mid.yaml"] {
            std::fs::write(dir.path().join(name), "commands: [echo hi]\n").unwrap();
        }
        std::fs::write(dir.path().join("ignore.txt"), "not yaml").unwrap();
        let names = list_playbooks(dir.path()).unwrap();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn list_playbooks_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(list_playbooks(&missing).unwrap(), Vec::<String>::new());
    }
}
