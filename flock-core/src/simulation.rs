use crate::boid::{Boid, Bounds};
use crate::config::{FlockConfig, UpdatePolicy};
use crate::error::{ConfigurationError, FlockError, FlockResult};
use crate::rules;
use crate::vector::Vector2D;

#[cfg(feature = "std")]
use rand::Rng;

/// Advances every boid in slot order, moving each one before the forces of
/// the next are evaluated.
pub fn tick_sequential(boids: &mut [Boid], bounds: &Bounds, config: &FlockConfig, delta_time: f32) {
    for index in 0..boids.len() {
        let steering = rules::steering(boids, index, bounds, config);
        boids[index].update(steering, config.speed_limit, delta_time);
    }
}

/// Advances every boid using forces evaluated against `frozen`, the state of
/// the flock before the tick. `frozen` and `boids` must have the same length.
pub fn tick_snapshot(
    frozen: &[Boid],
    boids: &mut [Boid],
    bounds: &Bounds,
    config: &FlockConfig,
    delta_time: f32,
) {
    debug_assert_eq!(frozen.len(), boids.len());

    for (index, boid) in boids.iter_mut().enumerate() {
        let steering = rules::steering(frozen, index, bounds, config);
        boid.update(steering, config.speed_limit, delta_time);
    }
}

/// A fixed population of boids inside soft bounds, advanced one tick at a
/// time.
///
/// `S` is the backing storage; use [`FlockSimulation`] when a heap is
/// available and [`FixedFlockSimulation`] otherwise.
#[derive(Debug, Clone)]
pub struct Simulation<S> {
    boids: S,
    bounds: Bounds,
    config: FlockConfig,
    ticks: u64,
}

/// Heap-backed flock, sized at construction.
#[cfg(feature = "std")]
pub type FlockSimulation = Simulation<Vec<Boid>>;

/// Flock stored inline with room for at most `N` boids.
pub type FixedFlockSimulation<const N: usize> = Simulation<heapless::Vec<Boid, N>>;

impl<S> Simulation<S>
where
    S: AsRef<[Boid]> + AsMut<[Boid]> + Clone,
{
    fn from_boids(boids: S, bounds: Bounds, config: FlockConfig) -> FlockResult<Self> {
        let count = boids.as_ref().len();
        if count < 2 {
            return Err(ConfigurationError::TooFewBoids { count }.into());
        }
        if bounds.is_degenerate() {
            log::warn!(
                "Bounds have zero extent ({}, {}); bounds avoidance will fire on that axis",
                bounds.half_extent.x,
                bounds.half_extent.y
            );
        }

        log::debug!(
            "Initialized flock with {} boids, bounds center ({}, {}) extent ({}, {}), {:?} updates",
            count,
            bounds.center.x,
            bounds.center.y,
            bounds.half_extent.x,
            bounds.half_extent.y,
            config.update_policy
        );

        Ok(Self {
            boids,
            bounds,
            config,
            ticks: 0,
        })
    }

    /// Advances the simulation by `delta_time`.
    ///
    /// A negative or non-finite time step is rejected before any boid is
    /// touched.
    pub fn tick(&mut self, delta_time: f32) -> FlockResult<()> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(FlockError::InvalidTimeStep(delta_time));
        }

        match self.config.update_policy {
            UpdatePolicy::Sequential => {
                tick_sequential(self.boids.as_mut(), &self.bounds, &self.config, delta_time)
            }
            UpdatePolicy::Snapshot => {
                let frozen = self.boids.clone();
                tick_snapshot(
                    frozen.as_ref(),
                    self.boids.as_mut(),
                    &self.bounds,
                    &self.config,
                    delta_time,
                )
            }
        }
        self.ticks += 1;

        log::trace!("Tick {} done (dt = {})", self.ticks, delta_time);
        Ok(())
    }

    pub fn boids(&self) -> &[Boid] {
        self.boids.as_ref()
    }

    /// Current positions in slot order.
    pub fn positions(&self) -> impl Iterator<Item = Vector2D> + '_ {
        self.boids().iter().map(|boid| boid.position)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.boids().len()
    }

    /// Always false; flocks hold at least two boids.
    pub fn is_empty(&self) -> bool {
        self.boids().is_empty()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Mean position of the whole flock.
    pub fn centroid(&self) -> Vector2D {
        let mut sum = Vector2D::zero();
        for position in self.positions() {
            sum += position;
        }
        sum / self.len() as f32
    }

    /// Largest velocity magnitude in the flock.
    pub fn max_speed(&self) -> f32 {
        self.boids()
            .iter()
            .map(|boid| boid.velocity.magnitude())
            .fold(0.0, f32::max)
    }
}

fn check_position(index: usize, position: Vector2D) -> FlockResult<Boid> {
    if position.is_finite() {
        Ok(Boid::at(position))
    } else {
        Err(ConfigurationError::NonFinitePosition { index }.into())
    }
}

#[cfg(feature = "std")]
impl Simulation<Vec<Boid>> {
    /// Creates a flock with one boid at rest per initial position.
    pub fn new<I>(bounds: Bounds, positions: I, config: FlockConfig) -> FlockResult<Self>
    where
        I: IntoIterator<Item = Vector2D>,
    {
        bounds.validate()?;
        config.validate()?;

        let boids = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| check_position(index, position))
            .collect::<FlockResult<Vec<_>>>()?;

        Self::from_boids(boids, bounds, config)
    }

    /// Creates `count` boids at rest, uniformly placed inside `bounds`.
    pub fn random<R: Rng + ?Sized>(
        bounds: Bounds,
        count: usize,
        config: FlockConfig,
        rng: &mut R,
    ) -> FlockResult<Self> {
        if count < 2 {
            return Err(ConfigurationError::TooFewBoids { count }.into());
        }
        bounds.validate()?;

        let positions: Vec<_> = (0..count).map(|_| bounds.random_point(rng)).collect();
        Self::new(bounds, positions, config)
    }
}

impl<const N: usize> Simulation<heapless::Vec<Boid, N>> {
    /// Creates a flock with one boid at rest per initial position. Fails if
    /// more than `N` positions are supplied.
    pub fn new<I>(bounds: Bounds, positions: I, config: FlockConfig) -> FlockResult<Self>
    where
        I: IntoIterator<Item = Vector2D>,
    {
        bounds.validate()?;
        config.validate()?;

        let mut boids = heapless::Vec::new();
        for (index, position) in positions.into_iter().enumerate() {
            boids
                .push(check_position(index, position)?)
                .map_err(|_| ConfigurationError::CapacityExceeded { capacity: N })?;
        }

        Self::from_boids(boids, bounds, config)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wide_bounds() -> Bounds {
        Bounds::new(Vector2D::zero(), Vector2D::new(1000.0, 1000.0))
    }

    fn line_of_three(policy: UpdatePolicy) -> FlockSimulation {
        FlockSimulation::new(
            wide_bounds(),
            [
                Vector2D::new(0.0, 0.0),
                Vector2D::new(1.0, 0.0),
                Vector2D::new(2.0, 0.0),
            ],
            FlockConfig::default().with_update_policy(policy),
        )
        .unwrap()
    }

    #[test]
    fn test_flock_creation() {
        let flock = line_of_three(UpdatePolicy::Sequential);

        assert_eq!(flock.len(), 3);
        assert_eq!(flock.ticks(), 0);
        assert!(flock.boids().iter().all(|b| b.velocity == Vector2D::zero()));
        assert_eq!(flock.bounds(), wide_bounds());
    }

    #[test]
    fn test_sequential_tick_sees_moved_boids() {
        let mut flock = line_of_three(UpdatePolicy::Sequential);

        flock.tick(1.0).unwrap();

        let boids = flock.boids();
        assert_relative_eq!(boids[0].velocity.x, 0.03, epsilon = 1e-6);
        assert_relative_eq!(boids[0].position.x, 0.03, epsilon = 1e-6);
        assert_relative_eq!(boids[1].velocity.x, 0.0012375, epsilon = 1e-6);
        assert_relative_eq!(boids[1].position.x, 1.0012375, epsilon = 1e-6);
        assert_relative_eq!(boids[2].velocity.x, -0.028711453, epsilon = 1e-6);
        assert_relative_eq!(boids[2].position.x, 1.971288547, epsilon = 1e-6);
        assert!(boids.iter().all(|b| b.position.y == 0.0));
        assert_eq!(flock.ticks(), 1);
    }

    #[test]
    fn test_snapshot_tick_sees_pre_tick_state() {
        let mut flock = line_of_three(UpdatePolicy::Snapshot);

        flock.tick(1.0).unwrap();

        let boids = flock.boids();
        assert_relative_eq!(boids[0].velocity.x, 0.03, epsilon = 1e-6);
        assert_relative_eq!(boids[0].position.x, 0.03, epsilon = 1e-6);
        assert_eq!(boids[1].velocity.x, 0.0);
        assert_eq!(boids[1].position.x, 1.0);
        assert_relative_eq!(boids[2].velocity.x, -0.03, epsilon = 1e-6);
        assert_relative_eq!(boids[2].position.x, 1.97, epsilon = 1e-6);
    }

    #[test]
    fn test_slot_order_matters_only_for_sequential() {
        let forward = [
            Vector2D::new(0.0, 0.0),
            Vector2D::new(1.0, 0.0),
            Vector2D::new(2.0, 0.0),
        ];
        let mut reversed = forward;
        reversed.reverse();

        let run = |positions: [Vector2D; 3], policy| {
            let config = FlockConfig::default().with_update_policy(policy);
            let mut flock = FlockSimulation::new(wide_bounds(), positions, config).unwrap();
            flock.tick(1.0).unwrap();
            flock.positions().collect::<Vec<_>>()
        };

        let snapshot_forward = run(forward, UpdatePolicy::Snapshot);
        let mut snapshot_reversed = run(reversed, UpdatePolicy::Snapshot);
        snapshot_reversed.reverse();
        assert_eq!(snapshot_forward, snapshot_reversed);

        let sequential_forward = run(forward, UpdatePolicy::Sequential);
        let mut sequential_reversed = run(reversed, UpdatePolicy::Sequential);
        sequential_reversed.reverse();
        assert_ne!(sequential_forward[1], sequential_reversed[1]);
    }

    #[test]
    fn test_zero_delta_time_keeps_positions() {
        let mut flock = line_of_three(UpdatePolicy::Sequential);
        let before: Vec<_> = flock.positions().collect();

        flock.tick(0.0).unwrap();

        assert_eq!(flock.positions().collect::<Vec<_>>(), before);
        assert_eq!(flock.ticks(), 1);
    }

    #[test]
    fn test_invalid_time_step_leaves_flock_untouched() {
        let mut flock = line_of_three(UpdatePolicy::Sequential);
        let before = flock.boids().to_vec();

        assert_eq!(flock.tick(-0.5), Err(FlockError::InvalidTimeStep(-0.5)));
        assert!(matches!(
            flock.tick(f32::NAN),
            Err(FlockError::InvalidTimeStep(_))
        ));

        assert_eq!(flock.boids(), before.as_slice());
        assert_eq!(flock.ticks(), 0);
    }

    #[test]
    fn test_too_few_boids_is_rejected() {
        let result = FlockSimulation::new(
            wide_bounds(),
            [Vector2D::zero()],
            FlockConfig::default(),
        );

        assert_eq!(
            result.unwrap_err(),
            FlockError::InvalidConfiguration(ConfigurationError::TooFewBoids { count: 1 })
        );

        let empty = FlockSimulation::new(wide_bounds(), Vec::new(), FlockConfig::default());
        assert!(empty.is_err());
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let result = FlockSimulation::new(
            wide_bounds(),
            [Vector2D::zero(), Vector2D::new(f32::INFINITY, 0.0)],
            FlockConfig::default(),
        );

        assert_eq!(
            result.unwrap_err(),
            FlockError::InvalidConfiguration(ConfigurationError::NonFinitePosition { index: 1 })
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = FlockSimulation::new(
            wide_bounds(),
            [Vector2D::zero(), Vector2D::new(1.0, 0.0)],
            FlockConfig::default().with_alignment_divisor(-16.0),
        );

        assert!(matches!(
            result,
            Err(FlockError::InvalidConfiguration(
                ConfigurationError::OutOfRange {
                    field: "alignment_divisor",
                    ..
                }
            ))
        ));
    }

    #[test]
    fn test_random_flock_starts_inside_bounds_at_rest() {
        use rand::{rngs::StdRng, SeedableRng};

        let bounds = Bounds::new(Vector2D::new(3.0, 3.0), Vector2D::new(8.0, 5.0));
        let mut rng = StdRng::seed_from_u64(42);
        let flock =
            FlockSimulation::random(bounds, 25, FlockConfig::default(), &mut rng).unwrap();

        assert_eq!(flock.len(), 25);
        assert!(flock.positions().all(|p| bounds.contains(p)));
        assert_eq!(flock.max_speed(), 0.0);
    }

    #[test]
    fn test_random_flock_rejects_single_boid() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let result = FlockSimulation::random(wide_bounds(), 1, FlockConfig::default(), &mut rng);

        assert!(matches!(
            result,
            Err(FlockError::InvalidConfiguration(
                ConfigurationError::TooFewBoids { count: 1 }
            ))
        ));
    }

    #[test]
    fn test_random_flock_rejects_overflowing_bounds() {
        use rand::{rngs::StdRng, SeedableRng};

        let bounds = Bounds::new(Vector2D::zero(), Vector2D::new(3.0e38, 1.0));
        let mut rng = StdRng::seed_from_u64(42);
        let result = FlockSimulation::random(bounds, 10, FlockConfig::default(), &mut rng);

        assert_eq!(
            result.unwrap_err(),
            FlockError::InvalidConfiguration(ConfigurationError::NonFiniteBounds)
        );
    }

    #[test]
    fn test_outside_boid_is_steered_back() {
        let bounds = Bounds::new(Vector2D::zero(), Vector2D::new(5.0, 5.0));
        let mut flock = FlockSimulation::new(
            bounds,
            [Vector2D::new(20.0, 0.0), Vector2D::new(22.0, 0.0)],
            FlockConfig::default(),
        )
        .unwrap();

        for _ in 0..200 {
            flock.tick(0.1).unwrap();
        }

        assert!(flock.centroid().x < 20.0);
    }

    #[test]
    fn test_centroid_and_max_speed() {
        let mut flock = FlockSimulation::new(
            wide_bounds(),
            [Vector2D::new(0.0, 0.0), Vector2D::new(4.0, 2.0)],
            FlockConfig::default(),
        )
        .unwrap();

        assert_eq!(flock.centroid(), Vector2D::new(2.0, 1.0));

        flock.tick(1.0).unwrap();
        assert!(flock.max_speed() > 0.0);
        assert!(flock.max_speed() <= 5.0);
    }

    #[test]
    fn test_fixed_flock_matches_heap_flock() {
        let positions = [
            Vector2D::new(0.0, 0.0),
            Vector2D::new(0.3, 0.1),
            Vector2D::new(2.0, -1.0),
            Vector2D::new(-4.0, 3.0),
        ];
        let bounds = Bounds::new(Vector2D::zero(), Vector2D::new(3.0, 3.0));

        for policy in [UpdatePolicy::Sequential, UpdatePolicy::Snapshot] {
            let config = FlockConfig::default().with_update_policy(policy);
            let mut heap = FlockSimulation::new(bounds, positions, config).unwrap();
            let mut fixed = FixedFlockSimulation::<8>::new(bounds, positions, config).unwrap();

            for _ in 0..50 {
                heap.tick(1.0 / 60.0).unwrap();
                fixed.tick(1.0 / 60.0).unwrap();
            }

            assert_eq!(heap.boids(), fixed.boids());
        }
    }

    #[test]
    fn test_fixed_flock_capacity() {
        let result = FixedFlockSimulation::<2>::new(
            wide_bounds(),
            [Vector2D::zero(), Vector2D::new(1.0, 0.0), Vector2D::new(2.0, 0.0)],
            FlockConfig::default(),
        );

        assert_eq!(
            result.unwrap_err(),
            FlockError::InvalidConfiguration(ConfigurationError::CapacityExceeded { capacity: 2 })
        );
    }
}
