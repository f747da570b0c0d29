use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_MOVES_PER_GAME: u32 = 2_000;

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub games: GamesConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate a simulation config from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) => return Err(ConfigError::Read { source, path }),
        };
        let mut cfg: SimulationConfig = match serde_yaml::from_reader(BufReader::new(file)) {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        if let Err(source) = cfg.validate() {
            return Err(ConfigError::Invalid { source, path });
        }
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.engine.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    /// Rank Person by their previous finish instead of dealing random ranks.
    #[serde(default)]
    pub continue_ranks: bool,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(invalid("games.count", "play at least one game"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub autoplay_person_when_alone: bool,
    /// Delay applied to presentation steps; zero runs headless.
    #[serde(default)]
    pub pacing_ms: u64,
    #[serde(default = "default_max_moves_per_game")]
    pub max_moves_per_game: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            autoplay_person_when_alone: false,
            pacing_ms: 0,
            max_moves_per_game: DEFAULT_MAX_MOVES_PER_GAME,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_moves_per_game == 0 {
            return Err(invalid("engine.max_moves_per_game", "a game needs at least one move"));
        }
        Ok(())
    }
}

fn default_max_moves_per_game() -> u32 {
    DEFAULT_MAX_MOVES_PER_GAME
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if resolve_template(run_id, value.trim()).file_name().is_none() {
                return Err(invalid(label, "must name a file"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// The run id names an output directory, so it must be one plain path component.
fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    let mut components = Path::new(run_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !run_id.contains(char::is_whitespace) => Ok(()),
        _ => Err(invalid("run_id", "must be a single directory name without spaces")),
    }
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open simulation config {}: {source}", .path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("simulation config {} is not valid YAML: {source}", .path.display())]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("simulation config {} failed validation: {source}", .path.display())]
    Invalid {
        #[source]
        source: ValidationError,
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

fn invalid(field: &str, message: &str) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "nightly"
games:
  seed: 42
  count: 10
  continue_ranks: true
engine:
  pacing_ms: 0
outputs:
  jsonl: "sim/out/{run_id}/games.jsonl"
  summary_md: "sim/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: SimulationConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.engine.max_moves_per_game, DEFAULT_MAX_MOVES_PER_GAME);
        assert!(!cfg.engine.autoplay_person_when_alone);
        assert!(cfg.games.continue_ranks);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(outputs.jsonl, PathBuf::from("sim/out/nightly/games.jsonl"));
        assert_eq!(outputs.summary_md, PathBuf::from("sim/out/nightly/summary.md"));
    }

    #[test]
    fn rejects_zero_games() {
        let yaml = BASIC_YAML.replace("count: 10", "count: 0");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "games.count"
        ));
    }

    #[test]
    fn run_id_must_be_one_directory_name() {
        for bad in ["\"night ly\"", "\"a/b\"", "\"..\"", "\"\""] {
            let yaml = BASIC_YAML.replace("\"nightly\"", bad);
            let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
            assert!(cfg.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn output_templates_must_name_files() {
        let yaml = BASIC_YAML.replace("\"sim/out/{run_id}/summary.md\"", "\"  \"");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidField { field, .. }) if field == "outputs.summary_md"
        ));
    }

    #[test]
    fn blank_level_falls_back_to_info() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"\"");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.tracing_level, "info");
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = SimulationConfig::from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::Read { path, .. } if path == Path::new("does/not/exist.yaml")
        ));
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
