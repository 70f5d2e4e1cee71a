use rand::Rng;

/// Rolls against `rate + boost`, clamped to a probability.
pub fn luck_roll<R: Rng + ?Sized>(rng: &mut R, rate: f64, boost: f64) -> bool {
    let chance = (rate + boost).clamp(0.0, 1.0);
    rng.random::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn when_chance_is_certain_or_impossible_then_roll_is_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(luck_roll(&mut rng, 0.9, 0.2));
            assert!(!luck_roll(&mut rng, 0.1, -0.2));
        }
    }
}
