use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::records::PositiveBoundPolicy;

pub const DEFAULT_ADMIN_PASSCODE: &str = "2030";
pub const DEFAULT_SCHOOL_NAME: &str = "School administration";
pub const DEFAULT_OBSERVER: &str = "Student counselor";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Student/record store; defaults to ~/.config/conduct-board/data.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    /// Violation and commendation catalog; the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default = "default_admin_passcode")]
    pub admin_passcode: String,

    /// Signature line on parent notifications
    #[serde(default = "default_school_name")]
    pub school_name: String,

    #[serde(default = "default_observer")]
    pub default_observer: String,

    #[serde(default)]
    pub positive_bound: PositiveBoundPolicy,
}

fn default_admin_passcode() -> String {
    DEFAULT_ADMIN_PASSCODE.to_string()
}

fn default_school_name() -> String {
    DEFAULT_SCHOOL_NAME.to_string()
}

fn default_observer() -> String {
    DEFAULT_OBSERVER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            catalog_path: None,
            admin_passcode: default_admin_passcode(),
            school_name: default_school_name(),
            default_observer: default_observer(),
            positive_bound: PositiveBoundPolicy::default(),
        }
    }
}
