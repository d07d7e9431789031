//! Rewrite modes offered to the user.
//!
//! The mode is sent to the backend as the `mode` form field and selects
//! the system prompt used for the LLM rewrite. Labels and result titles
//! are the Norwegian strings shown in the UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Result title used when no mode-specific title applies.
pub const DEFAULT_CLEAN_TITLE: &str = "Omskrevet versjon";

/// Rewrite style selected for a job. Immutable once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteMode {
    #[default]
    Summary,
    Email,
    Document,
    TalkingPoints,
    Polish,
    Workflow,
}

impl RewriteMode {
    /// Every mode, in the order the UI lists them.
    pub const ALL: [RewriteMode; 6] = [
        RewriteMode::Summary,
        RewriteMode::Email,
        RewriteMode::Document,
        RewriteMode::TalkingPoints,
        RewriteMode::Polish,
        RewriteMode::Workflow,
    ];

    /// Wire value used in the `mode` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            RewriteMode::Summary => "summary",
            RewriteMode::Email => "email",
            RewriteMode::Document => "document",
            RewriteMode::TalkingPoints => "talking_points",
            RewriteMode::Polish => "polish",
            RewriteMode::Workflow => "workflow",
        }
    }

    /// Display label for the mode picker.
    pub fn label(self) -> &'static str {
        match self {
            RewriteMode::Summary => "Sammendrag",
            RewriteMode::Email => "E-post",
            RewriteMode::Document => "Avsnitt til dokument",
            RewriteMode::TalkingPoints => "Talepunkter",
            RewriteMode::Polish => "Renskriving",
            RewriteMode::Workflow => "Arbeidsflyt",
        }
    }

    /// Title of the rewritten-text surface for a finished job.
    pub fn clean_title(self) -> &'static str {
        match self {
            RewriteMode::Summary => DEFAULT_CLEAN_TITLE,
            RewriteMode::Email => "E-postutkast",
            RewriteMode::Document => "Dokumentavsnitt",
            RewriteMode::TalkingPoints => "Talepunkter",
            RewriteMode::Polish => "Renskrevet versjon",
            RewriteMode::Workflow => "Arbeidsflyt og LLM-promptforslag",
        }
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewriteMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RewriteMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown rewrite mode '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip_through_from_str() {
        for mode in RewriteMode::ALL {
            assert_eq!(mode.as_str().parse::<RewriteMode>(), Ok(mode));
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "haiku".parse::<RewriteMode>().unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("unknown rewrite mode 'haiku'".into())
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&RewriteMode::TalkingPoints).unwrap();
        assert_eq!(json, "\"talking_points\"");
    }

    #[test]
    fn summary_is_the_default_and_uses_default_title() {
        assert_eq!(RewriteMode::default(), RewriteMode::Summary);
        assert_eq!(RewriteMode::Summary.clean_title(), DEFAULT_CLEAN_TITLE);
        assert_eq!(RewriteMode::Workflow.label(), "Arbeidsflyt");
    }
}
