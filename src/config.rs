//! Solver configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first (if present);
//! variables already set in the process environment take precedence over it.
//! CLI flags are applied on top of the result by `app`.

use std::str::FromStr;

use crate::domain::SolverConfig;
use crate::error::AppError;

pub const ENV_SIGMA_LOW: &str = "SIGMA_FIT_SIGMA_LOW";
pub const ENV_SIGMA_HIGH: &str = "SIGMA_FIT_SIGMA_HIGH";
pub const ENV_BISECT_ITERATIONS: &str = "SIGMA_FIT_BISECT_ITERATIONS";
pub const ENV_NEWTON_ITERATIONS: &str = "SIGMA_FIT_NEWTON_ITERATIONS";
pub const ENV_STEP_TOLERANCE: &str = "SIGMA_FIT_STEP_TOLERANCE";
pub const ENV_RATIO_TOLERANCE: &str = "SIGMA_FIT_RATIO_TOLERANCE";

/// Read solver settings from `.env` and the process environment.
pub fn solver_config_from_env() -> Result<SolverConfig, AppError> {
    dotenvy::dotenv().ok();
    solver_config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from an arbitrary key lookup, starting from the defaults.
pub fn solver_config_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SolverConfig, AppError> {
    let mut config = SolverConfig::default();

    if let Some(v) = parse_var(&lookup, ENV_SIGMA_LOW)? {
        config.sigma_low = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_SIGMA_HIGH)? {
        config.sigma_high = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_BISECT_ITERATIONS)? {
        config.bisect_iterations = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_NEWTON_ITERATIONS)? {
        config.newton_iterations = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_STEP_TOLERANCE)? {
        config.step_tolerance = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_RATIO_TOLERANCE)? {
        config.ratio_tolerance = v;
    }

    config.validate()?;
    Ok(config)
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| AppError::config(format!("Invalid {key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::EXIT_CONFIG;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = solver_config_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = solver_config_from_lookup(lookup_from(&[
            (ENV_SIGMA_LOW, "0.5"),
            (ENV_SIGMA_HIGH, " 5000 "),
            (ENV_BISECT_ITERATIONS, "30"),
            (ENV_NEWTON_ITERATIONS, "10"),
            (ENV_RATIO_TOLERANCE, ""),
        ]))
        .unwrap();
        assert_eq!(config.sigma_low, 0.5);
        assert_eq!(config.sigma_high, 5000.0);
        assert_eq!(config.bisect_iterations, 30);
        assert_eq!(config.newton_iterations, 10);
        assert_eq!(config.ratio_tolerance, SolverConfig::default().ratio_tolerance);
    }

    #[test]
    fn unparseable_value_is_a_config_error() {
        let err = solver_config_from_lookup(lookup_from(&[(ENV_NEWTON_ITERATIONS, "many")])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(err.message().contains(ENV_NEWTON_ITERATIONS));
    }

    #[test]
    fn inconsistent_interval_is_rejected() {
        let err = solver_config_from_lookup(lookup_from(&[
            (ENV_SIGMA_LOW, "10"),
            (ENV_SIGMA_HIGH, "1"),
        ]))
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }
}
