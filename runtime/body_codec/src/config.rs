//! Configuration for [`CodecAdapter`](crate::CodecAdapter) and the hierarchical
//! loader used to build it.
use std::path::PathBuf;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// The knobs of a [`CodecAdapter`](crate::CodecAdapter).
///
/// Every field has a default, so an empty configuration source is valid.
pub struct CodecConfig {
    /// The message returned, under the `body` field, when the request body is malformed.
    pub invalid_format_message: String,
    /// What to log about successfully decoded request bodies.
    pub body_logging: BodyLogging,
    /// Settings for the default validator.
    pub validation: ValidationConfig,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            invalid_format_message: "invalid format".into(),
            body_logging: BodyLogging::default(),
            validation: ValidationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What gets logged, at `DEBUG` level, after a request body has been decoded.
///
/// Request bodies may contain credentials or personal data: logging them in
/// full is opt-in.
pub enum BodyLogging {
    /// The `Debug` representation of the decoded value.
    Full,
    /// The name of the type the body was decoded into.
    #[default]
    TypeName,
    /// Nothing.
    Off,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// Settings for [`RuleValidator`](crate::validation::RuleValidator).
pub struct ValidationConfig {
    /// Stop at the first violation instead of reporting all of them.
    pub fail_fast: bool,
}

static PROFILE_ENV_VAR: &str = "CODEC_PROFILE";

#[derive(Clone, Debug, Default)]
/// Load configuration by merging YAML files and environment variables.
///
/// Check out [`ConfigLoader::load`] for the details.
///
/// # Example
///
/// ```rust,no_run
/// use body_codec::config::{CodecConfig, ConfigLoader};
///
/// # fn main() -> anyhow::Result<()> {
/// let config: CodecConfig = ConfigLoader::new()
///     .configuration_dir("configuration")
///     .profile("prod")
///     .load()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    configuration_dir: Option<PathBuf>,
    profile: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the profile manually, rather than loading it
    /// from the `CODEC_PROFILE` environment variable.
    pub fn profile<P>(mut self, profile: P) -> Self
    where
        P: Into<String>,
    {
        self.profile = Some(profile.into());
        self
    }

    /// Specify the directory where configuration files are stored.
    ///
    /// Defaults to `configuration/`, relative to the current working directory.
    pub fn configuration_dir<Dir>(mut self, dir: Dir) -> Self
    where
        Dir: Into<PathBuf>,
    {
        self.configuration_dir = Some(dir.into());
        self
    }

    /// Load the configuration by merging together three sources:
    ///
    /// 1. Environment variables (`CODEC_*`, with `__` as the nesting separator)
    /// 2. Profile-specific configuration file (`{configuration_dir}/{profile}.yml`),
    ///    if a profile was specified or `CODEC_PROFILE` is set
    /// 3. Base configuration file (`{configuration_dir}/base.yml`)
    ///
    /// The list above is ordered by precedence. Missing files are skipped.
    pub fn load<Config>(self) -> Result<Config, errors::ConfigLoadError>
    where
        Config: DeserializeOwned,
    {
        let profile = self
            .profile
            .or_else(|| std::env::var(PROFILE_ENV_VAR).ok());
        let configuration_dir = self
            .configuration_dir
            .unwrap_or_else(|| PathBuf::from("configuration"));
        let span = tracing::info_span!(
            "Loading codec configuration",
            configuration.directory = %configuration_dir.display(),
            configuration.profile = profile.as_deref().unwrap_or("<none>"),
        );
        let _guard = span.enter();

        let mut figment = Figment::new().merge(Yaml::file(configuration_dir.join("base.yml")));
        if let Some(profile) = &profile {
            figment = figment.merge(Yaml::file(
                configuration_dir.join(format!("{profile}.yml")),
            ));
        }
        // `CODEC_PROFILE` selects a file, it isn't a setting.
        let env_source = Env::prefixed("CODEC_").split("__").ignore(&["PROFILE"]);
        let configuration: Config = figment
            .merge(env_source)
            .extract()
            .context("Failed to load hierarchical configuration")
            .map_err(errors::ConfigLoadError)?;
        Ok(configuration)
    }
}

/// Errors that can occur when loading configuration.
pub mod errors {
    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load configuration")]
    /// The error returned by [`ConfigLoader::load`](super::ConfigLoader::load).
    pub struct ConfigLoadError(#[source] pub(super) anyhow::Error);
}
