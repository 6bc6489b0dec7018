use draw_model::{
    adjust, normalize, pick, AdjustPolicy, DrawError, SampleSource, MAX_WEIGHT, MIN_WEIGHT,
};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {a} ~= {b} within {tol}");
}

#[test]
fn even_pool_splits_probability_evenly() -> Result<(), DrawError> {
    let weights = [("Ana", 1.0), ("Bob", 1.0)];
    let probabilities = normalize(&weights)?;
    approx_eq(probabilities[0].1, 0.5, 1e-9);
    approx_eq(probabilities[1].1, 0.5, 1e-9);

    let winner = pick(&probabilities, 0.3)?;
    assert_eq!(winner, "Ana");

    let updated = adjust(&weights, winner, &AdjustPolicy::default());
    approx_eq(updated[0].1, 0.5, 1e-9);
    approx_eq(updated[1].1, 1.1, 1e-9);
    Ok(())
}

#[test]
fn probabilities_sum_to_one_for_uneven_pools() -> Result<(), DrawError> {
    let weights = [
        ("a", 0.1),
        ("b", 0.37),
        ("c", 1.0),
        ("d", 2.25),
        ("e", 3.0),
    ];
    let probabilities = normalize(&weights)?;
    let total: f64 = probabilities.iter().map(|(_, p)| p).sum();
    approx_eq(total, 1.0, 1e-9);
    Ok(())
}

#[test]
fn pick_always_lands_on_a_pool_member() -> Result<(), DrawError> {
    let weights = [("a", 0.3), ("b", 1.7), ("c", 0.9)];
    let probabilities = normalize(&weights)?;
    let mut source = SampleSource::seeded(7);
    for _ in 0..1_000 {
        let winner = pick(&probabilities, source.next_sample())?;
        assert!(weights.iter().any(|&(key, _)| key == winner));
    }
    Ok(())
}

#[test]
fn adjusted_weights_stay_within_bounds() -> Result<(), DrawError> {
    let policy = AdjustPolicy::default();
    let mut weights = vec![("a", 1.0), ("b", 1.0), ("c", 1.0)];
    let mut source = SampleSource::seeded(99);

    for _ in 0..200 {
        let probabilities = normalize(&weights)?;
        let winner = pick(&probabilities, source.next_sample())?;
        weights = adjust(&weights, winner, &policy);
        for &(_, weight) in &weights {
            assert!(weight >= MIN_WEIGHT && weight <= MAX_WEIGHT);
        }
    }
    Ok(())
}

#[test]
fn repeated_wins_decay_until_the_floor() {
    let policy = AdjustPolicy::default();
    let mut weights = vec![("hot", 1.0), ("cold", 1.0)];
    let mut previous = 1.0;

    for _ in 0..20 {
        weights = adjust(&weights, "hot", &policy);
        let current = weights[0].1;
        assert!(current <= previous);
        previous = current;
    }
    approx_eq(weights[0].1, MIN_WEIGHT, 1e-9);
    approx_eq(weights[1].1, MAX_WEIGHT, 1e-9);
}
