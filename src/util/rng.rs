use rand::RngCore;

/// picks a uniform value in `0..=bound` by masked rejection sampling
pub fn next_bound(bound: usize, mut rng: impl RngCore, max_tries: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    let mask = (1usize << (bound.ilog2() + 1)) - 1;
    for _ in 0..max_tries {
        let pick = rng.next_u64() as usize & mask;
        if pick <= bound {
            return pick;
        }
    }
    // the mask keeps the acceptance chance above one half per try
    bound
}

#[cfg(test)]
pub fn seeded_rng() -> ([u8; 32], rand::rngs::StdRng) {
    let mut seed = [0; 32];
    rand::rngs::OsRng
        .try_fill_bytes(&mut seed)
        .expect("failed to generate a seed");
    let rng = <rand::rngs::StdRng as rand::SeedableRng>::from_seed(seed);
    (seed, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_is_respected() {
        let (seed, mut rng) = seeded_rng();
        for bound in [0, 1, 5, 100, 1 << 20] {
            for _ in 0..100 {
                let pick = next_bound(bound, &mut rng, 20);
                assert!(pick <= bound, "{pick} > {bound} with seed {seed:?}");
            }
        }
    }
}
