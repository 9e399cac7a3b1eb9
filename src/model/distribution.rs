//! Discretized Gaussian mass model.
//!
//! The solver relies on two primitive operations:
//! - the fraction of mass inside the window, `ratio(σ) = A / S`
//! - its analytic derivative with respect to σ (for Newton steps)
//!
//! where `S` sums the kernel over the support `[min, max]` and `A` over the
//! window `[from, to]`. Sums run over consecutive integers, endpoints
//! inclusive. The kernel is unnormalized (peak 1 at the mean); the Gaussian
//! normalization constant cancels in every quotient computed here.

use crate::domain::FitRequest;

/// Unnormalized Gaussian kernel `exp(-(x-μ)² / (2σ²))`.
pub fn density(x: f64, mean: f64, sigma: f64) -> f64 {
    let dx = x - mean;
    (-dx * dx / (2.0 * sigma * sigma)).exp()
}

/// `∂ density / ∂σ = density · (x-μ)² / σ³`.
pub fn density_sigma_derivative(x: f64, mean: f64, sigma: f64) -> f64 {
    let dx = x - mean;
    density(x, mean, sigma) * dx * dx / (sigma * sigma * sigma)
}

/// Kernel and kernel-derivative sums over one integer range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RangeSums {
    mass: f64,
    mass_derivative: f64,
}

/// Scaled kernel evaluator shared by the support and window sums.
///
/// Both sums are divided by the kernel value at the lattice point nearest the
/// mean (over the union of support and window). The factor cancels in `A / S`
/// and in the quotient rule, and keeps every term `<= 1` without letting the
/// dominant term underflow when σ is small and μ is far from the lattice.
#[derive(Debug, Clone, Copy)]
struct Kernel {
    mean: f64,
    sigma: f64,
    offset_sq: f64,
}

impl Kernel {
    fn new(req: &FitRequest, sigma: f64) -> Self {
        let lo = req.min().min(req.from()) as f64;
        let hi = req.max().max(req.to()) as f64;
        let nearest = req.mean().clamp(lo, hi).round();
        let d = nearest - req.mean();
        Self {
            mean: req.mean(),
            sigma,
            offset_sq: d * d,
        }
    }

    fn value(&self, x: f64) -> f64 {
        let dx = x - self.mean;
        (-(dx * dx - self.offset_sq) / (2.0 * self.sigma * self.sigma)).exp()
    }

    fn derivative(&self, x: f64) -> f64 {
        let dx = x - self.mean;
        self.value(x) * dx * dx / (self.sigma * self.sigma * self.sigma)
    }

    fn mass(&self, lo: i64, hi: i64) -> f64 {
        (lo..=hi).map(|x| self.value(x as f64)).sum()
    }

    fn sums(&self, lo: i64, hi: i64) -> RangeSums {
        (lo..=hi).fold(RangeSums::default(), |acc, x| {
            let x = x as f64;
            RangeSums {
                mass: acc.mass + self.value(x),
                mass_derivative: acc.mass_derivative + self.derivative(x),
            }
        })
    }
}

/// Fraction of the support's mass that falls inside the window.
///
/// `sigma` must be `> 0`; the result is NaN otherwise.
pub fn ratio(req: &FitRequest, sigma: f64) -> f64 {
    let kernel = Kernel::new(req, sigma);
    let total = kernel.mass(req.min(), req.max());
    let window = kernel.mass(req.from(), req.to());
    window / total
}

/// Derivative of [`ratio`] with respect to sigma (quotient rule).
pub fn ratio_derivative(req: &FitRequest, sigma: f64) -> f64 {
    let kernel = Kernel::new(req, sigma);
    let total = kernel.sums(req.min(), req.max());
    let window = kernel.sums(req.from(), req.to());
    (window.mass_derivative * total.mass - window.mass * total.mass_derivative)
        / (total.mass * total.mass)
}

/// Normalized probability of every integer in the support.
pub fn mass_table(req: &FitRequest, sigma: f64) -> Vec<(i64, f64)> {
    let kernel = Kernel::new(req, sigma);
    let total = kernel.mass(req.min(), req.max());
    (req.min()..=req.max())
        .map(|x| (x, kernel.value(x as f64) / total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(min: i64, max: i64, mean: f64, from: i64, to: i64) -> FitRequest {
        FitRequest::new(min, max, mean, from, to, 0.5).unwrap()
    }

    /// Literal `A / S` with the unscaled kernel.
    fn naive_ratio(req: &FitRequest, sigma: f64) -> f64 {
        let s: f64 = (req.min()..=req.max()).map(|x| density(x as f64, req.mean(), sigma)).sum();
        let a: f64 = (req.from()..=req.to()).map(|x| density(x as f64, req.mean(), sigma)).sum();
        a / s
    }

    #[test]
    fn density_peaks_at_mean() {
        assert_eq!(density(5.0, 5.0, 2.0), 1.0);
        assert!(density(7.0, 5.0, 2.0) < 1.0);
        assert!((density(7.0, 5.0, 2.0) - density(3.0, 5.0, 2.0)).abs() < 1e-15);
    }

    #[test]
    fn density_derivative_matches_finite_difference() {
        let (x, mean, sigma, h) = (13.0, 10.0, 4.0, 1e-6);
        let numeric = (density(x, mean, sigma + h) - density(x, mean, sigma - h)) / (2.0 * h);
        assert!((density_sigma_derivative(x, mean, sigma) - numeric).abs() < 1e-8);
    }

    #[test]
    fn scaled_ratio_matches_literal_sums() {
        let req = request(10, 30, 10.0, 10, 20);
        for sigma in [0.5, 3.0, 18.33, 250.0] {
            let diff = (ratio(&req, sigma) - naive_ratio(&req, sigma)).abs();
            assert!(diff < 1e-12, "sigma={sigma} diff={diff}");
        }
    }

    #[test]
    fn ratio_is_one_when_window_equals_support() {
        let req = request(10, 30, 10.0, 10, 30);
        for sigma in [0.01, 0.7, 5.0, 1e3, 1e6] {
            assert!((ratio(&req, sigma) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ratio_is_symmetric_under_reflection() {
        // Reflect x -> (min + max) - x: the mean and window mirror around 20.
        let left = request(10, 30, 17.0, 12, 18);
        let right = request(10, 30, 23.0, 22, 28);
        for sigma in [1.0, 4.0, 9.5] {
            assert!((ratio(&left, sigma) - ratio(&right, sigma)).abs() < 1e-12);
        }
    }

    #[test]
    fn ratio_decreases_in_sigma_for_centered_narrow_window() {
        let req = request(10, 30, 20.0, 15, 25);
        let mut prev = ratio(&req, 2.0);
        for step in 1..40 {
            let sigma = 2.0 * 1.25_f64.powi(step);
            let r = ratio(&req, sigma);
            assert!(r < prev, "ratio not decreasing at sigma={sigma}");
            prev = r;
        }
        // Flat limit: 11 of 21 points.
        assert!((ratio(&req, 1e6) - 11.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_derivative_matches_finite_difference() {
        let req = request(10, 30, 12.5, 10, 18);
        for sigma in [1.5, 6.0, 20.0] {
            let h = 1e-5 * sigma;
            let numeric = (ratio(&req, sigma + h) - ratio(&req, sigma - h)) / (2.0 * h);
            let analytic = ratio_derivative(&req, sigma);
            assert!((analytic - numeric).abs() < 1e-7, "sigma={sigma}");
        }
    }

    #[test]
    fn narrow_kernel_far_from_support_stays_finite() {
        // exp(-(10-0)^2 / 2e-4) underflows to 0 without scaling.
        let req = request(10, 30, 0.0, 10, 20);
        let r = ratio(&req, 0.01);
        assert!(r.is_finite());
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mass_table_is_normalized() {
        let req = request(-5, 5, 1.0, -1, 3);
        let table = mass_table(&req, 2.0);
        assert_eq!(table.len(), 11);
        assert_eq!(table.first().map(|p| p.0), Some(-5));
        let total: f64 = table.iter().map(|p| p.1).sum();
        assert!((total - 1.0).abs() < 1e-12);
        let window: f64 = table.iter().filter(|p| (-1..=3).contains(&p.0)).map(|p| p.1).sum();
        assert!((window - ratio(&req, 2.0)).abs() < 1e-12);
    }
}
