//! Run configuration, readable from TOML.
//!
//! Every field has a default, so an empty document is a valid configuration:
//! ```toml
//! samples = 1000
//!
//! [params]
//! w = 1.0
//! a = 0.1
//! hbar = 1.0
//! tau0 = 10.0
//!
//! [solver]
//! atol = 1e-8
//! rtol = 1e-8
//! method = "step-doubling"
//! ```

use std::{ fs, path::Path };
use serde::{ Deserialize, Serialize };
use tracing::info;
use crate::{
    DEF_SAMPLES,
    error::{ ConfigError, LZResult, ParamError },
    params::Params,
    timedep::IvpConfig,
};

/// Physical parameters, solver settings, and sampling density for a run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Physical constants.
    pub params: Params,
    /// Integration settings.
    pub solver: IvpConfig,
    /// Number of evenly spaced sample times across the integration window.
    pub samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: Params::default(),
            solver: IvpConfig::default(),
            samples: DEF_SAMPLES,
        }
    }
}

impl Config {
    /// Parse from a TOML document and validate.
    pub fn from_toml_str(s: &str) -> LZResult<Self> {
        let config: Self = toml::from_str(s).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load<P>(path: P) -> LZResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(ConfigError::from)?;
        let config = Self::from_toml_str(&s)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check solver settings and sampling density.
    ///
    /// Physical parameters are validated on construction and need no further
    /// checks.
    pub fn validate(&self) -> LZResult<()> {
        self.solver.validate()?;
        (self.samples >= 2).then_some(())
            .ok_or(ParamError::BadSamples(self.samples))?;
        Ok(())
    }
}
