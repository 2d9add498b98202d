//! Configuration management for the idpack command line tool
use std::num::NonZeroU16;
use std::path::Path;

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use idpack::Alphabet;
use serde::Deserialize;

/// Top-level configuration for the idpack command line tool
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Codec specific configuration
    pub codec: CodecSettings,
}

/// Codec configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CodecSettings {
    /// Threshold at which clusters of short runs are folded into a bitmap,
    /// between 1 and 65535.
    pub window_size: NonZeroU16,
    /// Symbols used for the numerals of an id pack.
    pub alphabet: Alphabet,
    /// Whether object entries with a falsy value are left out.
    pub exclude_null: bool,
    /// Upper bound on the number of identifiers a decode may yield. Unset
    /// means unbounded.
    pub value_limit: Option<u64>,
}

impl From<&CodecSettings> for idpack::Config {
    fn from(settings: &CodecSettings) -> Self {
        idpack::Config {
            window_size: settings.window_size,
            alphabet: settings.alphabet.clone(),
            exclude_null: settings.exclude_null,
            value_limit: settings.value_limit,
        }
    }
}

impl Settings {
    /// Initializing the global config first with default values and then
    /// with provided/overwritten environment variables. The explicit
    /// separator with double underscores is needed to correctly parse the
    /// nested config structure.
    ///
    /// The environment variables are prefixed with `IDPACK_` and the nested
    /// fields are separated with double underscores (`__`). For example:
    ///
    /// ```text
    /// IDPACK_CODEC__WINDOW_SIZE
    /// ^^^^^^ ^^^^^  ^^^^^^^^^^^
    ///    │  ^  │  ^^    │
    ///    │  │  │  │     └ The `window_size` field of the `codec` object
    ///    │  │  │  └ separator("__")
    ///    │  │  └ The `codec` field of the root object (`Settings`)
    ///    │  └ prefix_separator("_")
    ///    └ with_prefix("IDPACK")
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let mut cfg_builder = Self::builder_with_defaults()?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(Self::environment());

        Self::finish(cfg_builder)
    }

    /// The environment source. Values are left as strings: parsing them
    /// eagerly would turn an alphabet such as `0123456789` into a number.
    fn environment() -> Environment {
        Environment::with_prefix("IDPACK")
            .separator("__")
            .prefix_separator("_")
    }

    /// A builder holding the library defaults for every setting.
    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = idpack::Config::default();

        Config::builder()
            .set_default("codec.window_size", u64::from(defaults.window_size.get()))?
            .set_default("codec.alphabet", defaults.alphabet.to_string())?
            .set_default("codec.exclude_null", defaults.exclude_null)
    }

    /// Builds and validates the settings.
    fn finish(cfg_builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = cfg_builder.build()?.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.codec.value_limit == Some(0) {
            return Err(ConfigError::Message(
                "[codec] value_limit must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
