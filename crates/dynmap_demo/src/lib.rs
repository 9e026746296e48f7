//! Evaluates the reference models once each and reports their right-hand sides.
//!
//! Diagnostics go through the `log` facade only. The `dynmap-demo` binary
//! installs no logger, so they stay silent unless an embedding program sets
//! one up.

use anyhow::{Context, Result};
use dynmap_core::models::{Henon, Pendulum, PendulumWithTorque};
use dynmap_core::{MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::f64::consts::FRAC_PI_2;
use std::path::Path;

/// Model parameters and evaluation points for one demo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub pendulum: Pendulum,
    pub torque_pendulum: PendulumWithTorque,
    pub henon: Henon,
    /// Pendulum state `[theta, omega]`.
    pub pendulum_state: [f64; 2],
    pub torque: [f64; 1],
    pub henon_state: [f64; 2],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            pendulum: Pendulum::new(1.0, 1.0),
            torque_pendulum: PendulumWithTorque::new(1.0, 1.0, 1.0),
            henon: Henon::default(),
            pendulum_state: [FRAC_PI_2, 0.0],
            torque: [2.0],
            henon_state: [0.0, 0.0],
        }
    }
}

/// Reads a JSON configuration; absent fields keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        log::debug!("no configuration given, using defaults");
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub name: &'static str,
    pub kind: MappingKind,
    pub rhs: [f64; 2],
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let autonomy = if self.kind.is_autonomous() {
            "autonomous"
        } else {
            "non-autonomous"
        };
        let inputs = if self.kind.is_exogenous() {
            "exogenous"
        } else {
            "endogenous"
        };
        writeln!(f, "{} ({autonomy}, {inputs})", self.name)?;
        writeln!(f, "{}", self.rhs[0])?;
        write!(f, "{}", self.rhs[1])
    }
}

/// Evaluates each model on the configured state, reusing one output buffer.
pub fn run(config: &DemoConfig) -> Vec<Report> {
    let mut dxdt = [0.0; 2];
    let mut reports = Vec::with_capacity(3);

    config
        .pendulum
        .compute_rhs(&config.pendulum_state, &mut dxdt);
    reports.push(Report {
        name: "Pendulum",
        kind: MappingKind::AutonomousEndogenous,
        rhs: dxdt,
    });

    dxdt = [-2.0; 2];
    config
        .torque_pendulum
        .compute_rhs(&config.pendulum_state, &config.torque, &mut dxdt);
    reports.push(Report {
        name: "Pendulum",
        kind: MappingKind::AutonomousExogenous,
        rhs: dxdt,
    });

    config.henon.compute_rhs(&config.henon_state, &mut dxdt);
    reports.push(Report {
        name: "Henon",
        kind: MappingKind::AutonomousEndogenous,
        rhs: dxdt,
    });

    log::debug!("evaluated {} models", reports.len());
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_prints_variant_and_components() {
        let report = Report {
            name: "Henon",
            kind: MappingKind::AutonomousEndogenous,
            rhs: [1.0, 0.0],
        };
        assert_eq!(report.to_string(), "Henon (autonomous, endogenous)\n1\n0");

        let report = Report {
            name: "Driven",
            kind: MappingKind::NonAutonomousExogenous,
            rhs: [0.5, -1.0],
        };
        assert!(report
            .to_string()
            .starts_with("Driven (non-autonomous, exogenous)"));
    }

    #[test]
    fn missing_config_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: DemoConfig =
            serde_json::from_str(r#"{ "torque": [0.0], "henon": { "a": 1.0 } }"#).unwrap();
        assert_eq!(config.torque, [0.0]);
        assert_eq!(config.henon, Henon::new(1.0, 0.3));
        assert_eq!(config.pendulum, Pendulum::new(1.0, 1.0));
    }
}
