use crate::domain::model::{ModelParams, StepOutcome};
use crate::domain::ports::RivalSource;

/// Discrete Lotka-Volterra competition step for the golem population.
///
/// `N(t+1) = N * (1 + r * (1 - (N + alpha * N_rival) / K))`, never below zero.
/// A zero carrying capacity means nothing can survive.
pub fn next_population(
    current_size: f64,
    vampire_size: f64,
    growth_rate: f64,
    carrying_capacity: f64,
    alpha: f64,
) -> f64 {
    if carrying_capacity == 0.0 {
        return 0.0;
    }

    let competition = (current_size + alpha * vampire_size) / carrying_capacity;
    let next_size = current_size * (1.0 + growth_rate * (1.0 - competition));

    next_size.max(0.0)
}

/// Shifted cosine in `[0, capacity]`, stands in for the rival while it is offline.
pub fn simulated_vampire(t: f64, capacity: f64) -> f64 {
    0.5 * capacity * (1.0 + (t * 0.1).cos())
}

/// Wall-clock time in fractional seconds since the Unix epoch.
pub fn unix_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// One full model step at time `now`: read the rival (falling back to the
/// simulated curve) and grow the golems against it.
pub async fn simulation_step(
    current_size: f64,
    params: &ModelParams,
    rival: &dyn RivalSource,
    now: f64,
) -> StepOutcome {
    let fallback = simulated_vampire(now, params.vampire_sim_capacity);
    let reading = rival.vampire_size(fallback).await;

    let next_size = next_population(
        current_size,
        reading.value,
        params.growth_rate,
        params.carrying_capacity,
        params.alpha,
    );

    tracing::debug!(
        "🧮 Step at t={:.1}: golem {:.2} -> {:.2}, vampire {:.2} ({})",
        now,
        current_size,
        next_size,
        reading.value,
        if reading.connected { "online" } else { "simulated" }
    );

    StepOutcome {
        temps: now,
        taille: next_size,
        vampire: reading.value,
        status_vampire: reading.connected,
        taux_de_croissance: params.growth_rate,
        taux_de_competition: params.alpha,
        capacite_biotique: params.carrying_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RivalReading;
    use async_trait::async_trait;

    struct FixedRival(Option<f64>);

    #[async_trait]
    impl RivalSource for FixedRival {
        async fn vampire_size(&self, fallback: f64) -> RivalReading {
            match self.0 {
                Some(value) => RivalReading::online(value),
                None => RivalReading::offline(fallback),
            }
        }
    }

    #[test]
    fn test_single_species_growth() {
        let next = next_population(100.0, 0.0, 0.5, 1000.0, 0.2);
        // 100 * (1 + 0.5 * 0.9)
        assert!((next - 145.0).abs() < 1e-9);
    }

    #[test]
    fn test_competition_slows_growth() {
        let alone = next_population(100.0, 0.0, 0.5, 1000.0, 0.2);
        let contested = next_population(100.0, 1000.0, 0.5, 1000.0, 0.2);
        assert!(contested < alone);
        // 100 * (1 + 0.5 * (1 - 0.3))
        assert!((contested - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_carrying_capacity_is_extinction() {
        assert_eq!(next_population(500.0, 10.0, 0.5, 0.0, 0.2), 0.0);
    }

    #[test]
    fn test_population_stays_positive() {
        let mut size = 0.1;
        for _ in 0..100 {
            size = next_population(size, 5000.0, -0.9, 1000.0, 0.2);
            assert!(size >= 0.0);
        }

        // 壓力過大時直接歸零，而不是變成負數
        assert_eq!(next_population(900.0, 20_000.0, 0.5, 1000.0, 0.2), 0.0);
    }

    #[test]
    fn test_equilibrium_without_rival() {
        let next = next_population(1000.0, 0.0, 0.5, 1000.0, 0.2);
        assert!((next - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulated_vampire_bounds() {
        assert!((simulated_vampire(0.0, 1500.0) - 1500.0).abs() < 1e-9);
        for i in 0..1000 {
            let value = simulated_vampire(i as f64 * 0.37, 1500.0);
            assert!((0.0..=1500.0).contains(&value));
        }
    }

    #[tokio::test]
    async fn test_step_uses_rival_when_online() {
        let params = ModelParams::default();
        let outcome = simulation_step(100.0, &params, &FixedRival(Some(250.0)), 42.0).await;

        assert!(outcome.status_vampire);
        assert_eq!(outcome.vampire, 250.0);
        assert_eq!(outcome.temps, 42.0);
        assert_eq!(outcome.taux_de_croissance, 0.5);
        assert_eq!(outcome.taux_de_competition, 0.2);
        assert_eq!(outcome.capacite_biotique, 1000.0);
        assert_eq!(outcome.taille, next_population(100.0, 250.0, 0.5, 1000.0, 0.2));
    }

    #[tokio::test]
    async fn test_step_falls_back_to_simulation_when_offline() {
        let params = ModelParams::default();
        let outcome = simulation_step(100.0, &params, &FixedRival(None), 0.0).await;

        assert!(!outcome.status_vampire);
        assert!((outcome.vampire - 1500.0).abs() < 1e-9);
    }
}
