//! Transformation options.
//!
//! [`ContractOptions`] is the user-facing shape, deserialized from JSON with
//! every field optional. [`Settings::resolve`] combines it with the active
//! environment into the immutable value the passes read; nothing consults
//! the process environment after that point.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::ContractKind;

/// Process variable naming the active environment.
pub const ENVIRONMENT_VARIABLE: &str = "NODE_ENV";

/// Environment assumed when [`ENVIRONMENT_VARIABLE`] is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Label tokens for the contract keywords, the postcondition return-value
/// placeholder and the `old` capture marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractNames {
    pub assert: String,
    #[serde(alias = "pre")]
    pub precondition: String,
    #[serde(alias = "post")]
    pub postcondition: String,
    pub invariant: String,
    /// Parameter name under which postconditions see the return value.
    #[serde(rename = "return")]
    pub return_value: String,
    pub old: String,
}

impl Default for ContractNames {
    fn default() -> Self {
        ContractNames {
            assert: "assert".into(),
            precondition: "pre".into(),
            postcondition: "post".into(),
            invariant: "invariant".into(),
            return_value: "it".into(),
            old: "old".into(),
        }
    }
}

impl ContractNames {
    /// The contract kind a label denotes, if any.
    pub fn kind_of(&self, label: &str) -> Option<ContractKind> {
        if label == self.precondition {
            Some(ContractKind::Precondition)
        } else if label == self.postcondition {
            Some(ContractKind::Postcondition)
        } else if label == self.invariant {
            Some(ContractKind::Invariant)
        } else if label == self.assert {
            Some(ContractKind::Assertion)
        } else {
            None
        }
    }
}

/// The built-in environment-name to label-token mapping.
pub fn default_env_labels() -> IndexMap<String, String> {
    [("development", "dev"), ("test", "test"), ("production", "prod")]
        .into_iter()
        .map(|(env, label)| (env.to_string(), label.to_string()))
        .collect()
}

/// Per-environment override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvOverride {
    /// Remove every contract label while this environment is active.
    pub strip: bool,
}

/// User-supplied options. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractOptions {
    pub names: ContractNames,
    /// Overrides of the environment-name to label-token mapping, merged
    /// over [`default_env_labels`].
    pub env_names: IndexMap<String, String>,
    /// Label retained under `envStrip`, taking precedence over the active
    /// environment's own label.
    pub strip_unless: Option<String>,
    /// Remove every contract label unconditionally.
    pub strip: bool,
    pub env: IndexMap<String, EnvOverride>,
    /// Remove every environment-labeled block except the retained one.
    pub env_strip: bool,
}

impl ContractOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Name of the active environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnvironment(String);

impl ActiveEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        ActiveEnvironment(name.into())
    }

    /// Reads [`ENVIRONMENT_VARIABLE`], falling back to
    /// [`DEFAULT_ENVIRONMENT`] when it is unset or empty.
    pub fn from_process() -> Self {
        std::env::var(ENVIRONMENT_VARIABLE)
            .ok()
            .filter(|value| !value.is_empty())
            .map(ActiveEnvironment)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ActiveEnvironment {
    fn default() -> Self {
        ActiveEnvironment(DEFAULT_ENVIRONMENT.to_string())
    }
}

/// How a label is treated by the passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Contract(ContractKind),
    Environment,
    Other,
}

/// Options resolved against an active environment.
#[derive(Debug, Clone)]
pub struct Settings {
    names: ContractNames,
    env_label_set: IndexSet<String>,
    environment: ActiveEnvironment,
    retained_label: Option<String>,
    strip_contracts: bool,
    env_strip: bool,
}

impl Settings {
    pub fn resolve(options: &ContractOptions, environment: ActiveEnvironment) -> Self {
        let mut env_labels = default_env_labels();
        for (env, label) in &options.env_names {
            env_labels.insert(env.clone(), label.clone());
        }
        let env_label_set = env_labels.values().cloned().collect();

        let retained_label = options
            .strip_unless
            .clone()
            .or_else(|| env_labels.get(environment.name()).cloned());

        let strip_contracts = options.strip
            || options
                .env
                .get(environment.name())
                .is_some_and(|over| over.strip);

        Settings {
            names: options.names.clone(),
            env_label_set,
            environment,
            retained_label,
            strip_contracts,
            env_strip: options.env_strip,
        }
    }

    pub fn names(&self) -> &ContractNames {
        &self.names
    }

    pub fn environment(&self) -> &str {
        self.environment.name()
    }

    /// The one environment label kept under extraction mode.
    pub fn retained_label(&self) -> Option<&str> {
        self.retained_label.as_deref()
    }

    /// Whether contract labels are removed instead of materialized.
    pub fn strips_contracts(&self) -> bool {
        self.strip_contracts
    }

    /// Whether environment extraction mode is on.
    pub fn extracts_environment(&self) -> bool {
        self.env_strip
    }

    /// Contract keywords win over environment tokens when both match.
    pub fn classify(&self, label: &str) -> LabelRole {
        if let Some(kind) = self.names.kind_of(label) {
            LabelRole::Contract(kind)
        } else if self.env_label_set.contains(label) {
            LabelRole::Environment
        } else {
            LabelRole::Other
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::resolve(&ContractOptions::default(), ActiveEnvironment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.environment(), "development");
        assert_eq!(settings.retained_label(), Some("dev"));
        assert!(!settings.strips_contracts());
        assert!(!settings.extracts_environment());
        assert_eq!(settings.names().return_value, "it");
        assert_eq!(
            settings.classify("pre"),
            LabelRole::Contract(ContractKind::Precondition)
        );
        assert_eq!(settings.classify("prod"), LabelRole::Environment);
        assert_eq!(settings.classify("loop"), LabelRole::Other);
    }

    #[test]
    fn partial_options_from_json() {
        let options = ContractOptions::from_json(
            r#"{"names": {"return": "result", "pre": "requires"}, "envStrip": true}"#,
        )
        .unwrap();
        assert_eq!(options.names.return_value, "result");
        assert_eq!(options.names.precondition, "requires");
        assert_eq!(options.names.postcondition, "post");
        assert!(options.env_strip);
        assert!(!options.strip);
    }

    #[test]
    fn environment_override_strips_contracts() {
        let options = ContractOptions::from_json(r#"{"env": {"production": {"strip": true}}}"#).unwrap();
        let prod = Settings::resolve(&options, ActiveEnvironment::new("production"));
        assert!(prod.strips_contracts());
        let dev = Settings::resolve(&options, ActiveEnvironment::new("development"));
        assert!(!dev.strips_contracts());
    }

    #[test]
    fn strip_unless_beats_environment_label() {
        let options = ContractOptions {
            strip_unless: Some("test".into()),
            ..ContractOptions::default()
        };
        let settings = Settings::resolve(&options, ActiveEnvironment::new("production"));
        assert_eq!(settings.retained_label(), Some("test"));
    }

    #[test]
    fn custom_env_names_merge_over_defaults() {
        let mut options = ContractOptions::default();
        options.env_names.insert("staging".into(), "stage".into());
        options.env_names.insert("production".into(), "live".into());
        let settings = Settings::resolve(&options, ActiveEnvironment::new("staging"));
        assert_eq!(settings.retained_label(), Some("stage"));
        assert_eq!(settings.classify("live"), LabelRole::Environment);
        assert_eq!(settings.classify("prod"), LabelRole::Other);
        assert_eq!(settings.classify("dev"), LabelRole::Environment);
    }

    #[test]
    fn unknown_environment_has_no_retained_label() {
        let settings = Settings::resolve(&ContractOptions::default(), ActiveEnvironment::new("qa"));
        assert_eq!(settings.retained_label(), None);
    }

    #[test]
    fn contract_keyword_wins_over_environment_token() {
        let mut options = ContractOptions::default();
        options.env_names.insert("test".into(), "assert".into());
        let settings = Settings::resolve(&options, ActiveEnvironment::new("test"));
        assert_eq!(
            settings.classify("assert"),
            LabelRole::Contract(ContractKind::Assertion)
        );
    }
}
