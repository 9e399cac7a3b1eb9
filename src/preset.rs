//! Named modes that derive a full request from `[min, max]`.
//!
//! With `average = (min + max) / 2` and `delta = (max - min) / 4`:
//!
//! | mode       | mean            | from            | to              | ratio |
//! |------------|-----------------|-----------------|-----------------|-------|
//! | super_low  | min             | min             | min + delta     | 95%   |
//! | low        | average - delta | min             | average         | 80%   |
//! | medium     | average         | average - delta | average + delta | 70%   |
//! | high       | average + delta | average         | max             | 80%   |
//! | super_high | max             | average + delta | max             | 95%   |
//!
//! Integer bounds truncate toward zero.

use crate::domain::{FitRequest, Preset, RequestError};

const DELTA: &str = "[(max-min)/4]";

/// A derived request plus the formulas that produced each field.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDerivation {
    pub preset: Preset,
    pub min: i64,
    pub max: i64,
    pub average: f64,
    pub delta: f64,
    pub mean: f64,
    pub mean_formula: String,
    pub from: i64,
    pub from_formula: String,
    pub to: i64,
    pub to_formula: String,
    pub ratio_percent: f64,
}

impl PresetDerivation {
    pub fn to_request(&self) -> Result<FitRequest, RequestError> {
        FitRequest::from_percent(self.min, self.max, self.mean, self.from, self.to, self.ratio_percent)
    }
}

fn truncate(x: f64) -> i64 {
    x.trunc() as i64
}

/// Derive mean, window and target ratio for `preset` over `[min, max]`.
pub fn derive(preset: Preset, min: i64, max: i64) -> PresetDerivation {
    let min_f = min as f64;
    let max_f = max as f64;
    let average = (min_f + max_f) / 2.0;
    let delta = (max_f - min_f) / 4.0;

    let (mean, mean_formula, from, from_formula, to, to_formula, ratio_percent) = match preset {
        Preset::SuperLow => (
            min_f,
            "min".to_string(),
            min,
            "min".to_string(),
            truncate(min_f + delta),
            format!("min + {DELTA}"),
            95.0,
        ),
        Preset::Low => (
            average - delta,
            format!("average - {DELTA}"),
            min,
            "min".to_string(),
            truncate(average),
            "average".to_string(),
            80.0,
        ),
        Preset::Medium => (
            average,
            "average".to_string(),
            truncate(average - delta),
            format!("average - {DELTA}"),
            truncate(average + delta),
            format!("average + {DELTA}"),
            70.0,
        ),
        Preset::High => (
            average + delta,
            format!("average + {DELTA}"),
            truncate(average),
            "average".to_string(),
            max,
            "max".to_string(),
            80.0,
        ),
        Preset::SuperHigh => (
            max_f,
            "max".to_string(),
            truncate(average + delta),
            format!("average + {DELTA}"),
            max,
            "max".to_string(),
            95.0,
        ),
    };

    PresetDerivation {
        preset,
        min,
        max,
        average,
        delta,
        mean,
        mean_formula,
        from,
        from_formula,
        to,
        to_formula,
        ratio_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_on_default_range() {
        let d = derive(Preset::Medium, 10, 30);
        assert_eq!(d.average, 20.0);
        assert_eq!(d.delta, 5.0);
        assert_eq!(d.mean, 20.0);
        assert_eq!((d.from, d.to), (15, 25));
        assert_eq!(d.ratio_percent, 70.0);
        assert_eq!(d.from_formula, "average - [(max-min)/4]");

        let req = d.to_request().unwrap();
        assert!((req.target_ratio() - 0.7).abs() < 1e-15);
    }

    #[test]
    fn all_presets_on_default_range() {
        let rows: Vec<_> = Preset::ALL
            .into_iter()
            .map(|p| {
                let d = derive(p, 10, 30);
                (p, d.mean, d.from, d.to, d.ratio_percent)
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                (Preset::SuperLow, 10.0, 10, 15, 95.0),
                (Preset::Low, 15.0, 10, 20, 80.0),
                (Preset::Medium, 20.0, 15, 25, 70.0),
                (Preset::High, 25.0, 20, 30, 80.0),
                (Preset::SuperHigh, 30.0, 25, 30, 95.0),
            ]
        );
    }

    #[test]
    fn fractional_bounds_truncate() {
        // average = 5.5, delta = 2.75: 2.75 -> 2, 8.25 -> 8
        let d = derive(Preset::Medium, 0, 11);
        assert_eq!(d.delta, 2.75);
        assert_eq!((d.from, d.to), (2, 8));
        assert_eq!(d.mean, 5.5);

        let d = derive(Preset::SuperLow, 0, 11);
        assert_eq!(d.to, 2);
    }

    #[test]
    fn negative_bounds_truncate_toward_zero() {
        // average = -5.5, delta = 2.75: -8.25 -> -8, -2.75 -> -2
        let d = derive(Preset::Medium, -11, 0);
        assert_eq!((d.from, d.to), (-8, -2));
    }
}
