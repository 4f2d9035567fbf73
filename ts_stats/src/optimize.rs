//! Derivative-free minimisation
//!
//! A plain Nelder-Mead simplex search with the standard coefficients
//! (reflection 1, expansion 2, contraction 0.5, shrink 0.5). It is used to
//! fit the handful of ARMA coefficients, so dimensions are tiny.

use crate::{MathError, Result};

/// Result of a minimisation run
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub x: Vec<f64>,
    /// Objective value at `x`
    pub fx: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerances were met before the iteration budget ran out
    pub converged: bool,
}

/// Nelder-Mead simplex minimiser
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    x_tolerance: f64,
    f_tolerance: f64,
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            x_tolerance: 1e-6,
            f_tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

impl NelderMead {
    /// Create a minimiser with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn has_converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = &simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .flat_map(|vertex| vertex.iter().zip(best).map(|(a, b)| (a - b).abs()))
            .fold(0.0f64, f64::max);
        let f_spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0f64, f64::max);

        x_spread <= self.x_tolerance && f_spread <= self.f_tolerance * (1.0 + values[0].abs())
    }

    /// Minimise `objective` starting from `x0`.
    ///
    /// Fails only when the objective is not finite at the starting point;
    /// running out of iterations is reported through [`Minimum::converged`].
    pub fn minimize<F>(&self, objective: F, x0: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let dim = x0.len();
        let start_value = objective(x0);
        if !start_value.is_finite() {
            return Err(MathError::CalculationError(
                "Objective is not finite at the starting point".to_string(),
            ));
        }
        if dim == 0 {
            return Ok(Minimum {
                x: Vec::new(),
                fx: start_value,
                iterations: 0,
                converged: true,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(x0.to_vec());
        for i in 0..dim {
            let mut vertex = x0.to_vec();
            vertex[i] += if vertex[i] == 0.0 {
                self.initial_step
            } else {
                self.initial_step * vertex[i].abs().max(1.0)
            };
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| sanitize(objective(v))).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            sort_simplex(&mut simplex, &mut values);
            if self.has_converged(&simplex, &values) {
                converged = true;
                break;
            }
            iterations += 1;

            let worst = dim;
            let centroid: Vec<f64> = (0..dim)
                .map(|j| simplex[..worst].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
                .collect();
            let towards = |coefficient: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&simplex[worst])
                    .map(|(c, w)| c + coefficient * (c - w))
                    .collect()
            };

            let reflected = towards(1.0);
            let f_reflected = sanitize(objective(&reflected));

            if f_reflected < values[0] {
                let expanded = towards(2.0);
                let f_expanded = sanitize(objective(&expanded));
                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[worst - 1] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < values[worst] {
                let point = towards(0.5);
                let value = sanitize(objective(&point));
                (point, value)
            } else {
                let point = towards(-0.5);
                let value = sanitize(objective(&point));
                (point, value)
            };

            if f_contracted < values[worst].min(f_reflected) {
                simplex[worst] = contracted;
                values[worst] = f_contracted;
                continue;
            }

            // Shrink towards the best vertex
            let best = simplex[0].clone();
            for i in 1..=dim {
                for (x, b) in simplex[i].iter_mut().zip(&best) {
                    *x = b + 0.5 * (*x - b);
                }
                values[i] = sanitize(objective(&simplex[i]));
            }
        }

        sort_simplex(&mut simplex, &mut values);
        if !converged {
            converged = self.has_converged(&simplex, &values);
        }

        Ok(Minimum {
            x: simplex.swap_remove(0),
            fx: values[0],
            iterations,
            converged,
        })
    }
}

/// Treat NaN as +inf so comparisons push the simplex away from it
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_bowl() {
        let objective = |x: &[f64]| (x[0] - 1.5).powi(2) + 3.0 * (x[1] + 0.5).powi(2);
        let result = NelderMead::new().minimize(objective, &[0.0, 0.0]).unwrap();

        assert!(result.converged);
        assert_abs_diff_eq!(result.x[0], 1.5, epsilon = 1e-4);
        assert_abs_diff_eq!(result.x[1], -0.5, epsilon = 1e-4);
        assert!(result.fx < 1e-8);
    }

    #[test]
    fn test_rosenbrock() {
        let objective = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let result = NelderMead::new()
            .with_max_iterations(5000)
            .minimize(objective, &[-1.2, 1.0])
            .unwrap();

        assert_abs_diff_eq!(result.x[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.x[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_flat_objective_converges() {
        let result = NelderMead::new().minimize(|_| 4.0, &[0.0, 0.0]).unwrap();
        assert!(result.converged);
        assert_eq!(result.fx, 4.0);
    }

    #[test]
    fn test_iteration_budget() {
        let objective = |x: &[f64]| (x[0] - 100.0).powi(2);
        let result = NelderMead::new()
            .with_max_iterations(3)
            .minimize(objective, &[0.0])
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn test_non_finite_start() {
        assert!(NelderMead::new().minimize(|_| f64::NAN, &[0.0]).is_err());
    }
}
