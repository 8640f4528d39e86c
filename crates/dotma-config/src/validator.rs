//! Validation on top of the schema's own checks.
//!
//! Schema validation rejects configurations that cannot work at all;
//! the advisory pass surfaces configurations that will work but almost
//! certainly not the way the operator intended.

use std::collections::HashSet;

use tracing::warn;

use crate::schema::Config;
use dotma_common::Result;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Runs the fatal checks, then logs every advisory finding.
    pub fn validate(config: &Config) -> Result<()> {
        config.validate()?;
        for finding in Self::advisories(config) {
            warn!("{finding}");
        }
        Ok(())
    }

    /// Non-fatal oddities worth surfacing at startup.
    pub fn advisories(config: &Config) -> Vec<String> {
        let mut findings = Vec::new();

        let mut seen = HashSet::new();
        for prefix in &config.commands.prefixes {
            if !seen.insert(prefix.as_str()) {
                findings.push(format!(
                    "Prefix \"{prefix}\" is listed more than once; later entries never match"
                ));
            }
        }

        if config.flows.response_timeout_secs < 10 {
            findings.push(format!(
                "Confirmation window of {}s gives users almost no time to reply",
                config.flows.response_timeout_secs
            ));
        }

        let mut channels = HashSet::new();
        for channel in &config.discord.debug_channels {
            if !channels.insert(channel) {
                findings.push(format!(
                    "Debug channel {channel} is listed more than once and would receive \
                     every relayed line twice"
                ));
            }
        }

        findings
    }
}
