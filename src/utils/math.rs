pub fn normal_probability(a: f64) -> f64 {
    0.5 * (1.0 + libm::erf(a / (2.0f64).sqrt()))
}

/// Probability of a standard normal draw landing at least `|z|` away from 0.
pub fn two_sided_tail(z: f64) -> f64 {
    (2.0 * (1.0 - normal_probability(z.abs()))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_probability_is_half_at_zero() {
        assert!((normal_probability(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn tail_at_two_sigma_is_about_five_percent() {
        let p = two_sided_tail(1.959_963_985);
        assert!((p - 0.05).abs() < 1e-6, "p={p}");
        assert_eq!(two_sided_tail(-1.959_963_985), p);
    }

    #[test]
    fn tail_is_one_at_zero_and_vanishes_far_out() {
        assert!((two_sided_tail(0.0) - 1.0).abs() < 1e-15);
        assert!(two_sided_tail(12.0) < 1e-20);
    }
}
