//! Settings for the demonstration driver.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Built-in defaults (the sample inventory below)
//! 2. An optional `cloudkeep.{json,toml,yaml}` in the working directory
//! 3. `CLOUDKEEP_*` environment variables, e.g. `CLOUDKEEP_STRICT=true`

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const SAMPLE_INSTANCES: &str = "id:1100,name:micro,state:running,region:oregon%\
id:1200,name:large1,state:terminated,region:n.virginia%\
id:1300,name:xlarge3,state:stopped,region:pasific%\
id:1400,name:large1,state:running,region:oregon";

pub const SAMPLE_VOLUMES: &str = "\
id:2100,name:data1,state:available,region:ohio,attached_instance_id:%\
id:2200,name:data1,state:in-use,region:ohio,attached_instance_id:1100%\
id:2300,name:data2,state:available,region:london,attached_instance_id:%\
id:2400,name:data2,state:in-use,region:oregon,attached_instance_id:1300";

pub const SAMPLE_SNAPSHOTS: &str = "id:3100,name:data1_backup,region:oregon,source_volume_id:2100%\
id:3200,name:data2_backup,region:virginia,source_volume_id:2400%";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Filter directive for the log subscriber, `RUST_LOG` syntax.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Fail on fields without a colon instead of skipping them.
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_format")]
    pub format: OutputFormat,

    #[serde(default = "default_instances")]
    pub instances: String,

    #[serde(default = "default_volumes")]
    pub volumes: String,

    #[serde(default = "default_snapshots")]
    pub snapshots: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_instances() -> String {
    SAMPLE_INSTANCES.to_string()
}

fn default_volumes() -> String {
    SAMPLE_VOLUMES.to_string()
}

fn default_snapshots() -> String {
    SAMPLE_SNAPSHOTS.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            strict: false,
            format: default_format(),
            instances: default_instances(),
            volumes: default_volumes(),
            snapshots: default_snapshots(),
        }
    }
}

impl Settings {
    /// Load settings from `cloudkeep.*` and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from("cloudkeep")
    }

    /// Load settings from the named file (extension optional) and the environment.
    pub fn load_from(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("CLOUDKEEP"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
