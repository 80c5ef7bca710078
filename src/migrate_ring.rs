use ndarray::{Array1, Array2};

use crate::argmin;

/// Ring migration between sub-populations: the best candidate of population
/// `m` replaces the worst candidate of population `(m + 1) % M`, fitness
/// carried with the migrant. Donors are snapshotted first so all exchanges
/// happen simultaneously. A replacement only occurs when the migrant is
/// strictly better than the receiver's worst, so the receiving population's
/// best fitness never worsens.
pub(crate) fn migrate_ring(populations: &mut [Array2<f64>], fitness: &mut [Array1<f64>]) {
    let m = populations.len();
    if m < 2 {
        return;
    }

    let donors: Vec<(Array1<f64>, f64)> = populations
        .iter()
        .zip(fitness.iter())
        .map(|(pop, fit)| {
            let (best_i, best_f) = argmin(fit);
            (pop.row(best_i).to_owned(), best_f)
        })
        .collect();

    for k in 0..m {
        let recv = (k + 1) % m;
        let mut worst_i = 0;
        let mut worst_f = fitness[recv][0];
        for (i, &f) in fitness[recv].iter().enumerate() {
            if f > worst_f {
                worst_f = f;
                worst_i = i;
            }
        }
        let (ref migrant, migrant_f) = donors[k];
        if migrant_f < worst_f {
            populations[recv].row_mut(worst_i).assign(migrant);
            fitness[recv][worst_i] = migrant_f;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_best_of_donor_replaces_worst_of_receiver() {
        let mut populations = vec![
            array![[1.0, 1.0, 1.0, 1.0], [2.0, 2.0, 2.0, 2.0]],
            array![[3.0, 3.0, 3.0, 3.0], [4.0, 4.0, 4.0, 4.0]],
        ];
        let mut fitness = vec![array![0.5, 5.0], array![2.0, 9.0]];

        migrate_ring(&mut populations, &mut fitness);

        // Population 0's best (fitness 0.5) lands on population 1's worst slot.
        assert_eq!(fitness[1], array![2.0, 0.5]);
        assert_eq!(populations[1].row(1).to_owned(), array![1.0, 1.0, 1.0, 1.0]);
        // Population 1's best (fitness 2.0) lands on population 0's worst slot.
        assert_eq!(fitness[0], array![0.5, 2.0]);
        assert_eq!(populations[0].row(1).to_owned(), array![3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_receiving_best_never_worsens() {
        let mut populations = vec![
            array![[1.0, 0.0, 0.0, 0.0], [2.0, 0.0, 0.0, 0.0]],
            array![[3.0, 0.0, 0.0, 0.0], [4.0, 0.0, 0.0, 0.0]],
            array![[5.0, 0.0, 0.0, 0.0], [6.0, 0.0, 0.0, 0.0]],
        ];
        let mut fitness = vec![array![3.0, 7.0], array![1.0, 2.0], array![4.0, 8.0]];
        let bests_before: Vec<f64> = fitness.iter().map(|f| argmin(f).1).collect();

        migrate_ring(&mut populations, &mut fitness);

        for (fit, &before) in fitness.iter().zip(bests_before.iter()) {
            assert!(argmin(fit).1 <= before);
        }
    }

    #[test]
    fn test_worse_migrant_is_rejected() {
        // Donor best (5.0) is worse than everything in the receiver.
        let mut populations = vec![
            array![[9.0, 0.0, 0.0, 0.0], [8.0, 0.0, 0.0, 0.0]],
            array![[1.0, 0.0, 0.0, 0.0], [2.0, 0.0, 0.0, 0.0]],
        ];
        let mut fitness = vec![array![5.0, 6.0], array![0.1, 0.2]];
        let receiver_before = fitness[1].clone();

        migrate_ring(&mut populations, &mut fitness);

        assert_eq!(fitness[1], receiver_before);
    }
}
