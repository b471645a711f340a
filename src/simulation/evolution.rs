//! Generational selection and breeding.
//!
//! Selection is pure elitism: the car that got furthest up the road is the
//! single parent of the next generation. Slot 0 inherits its controller
//! verbatim, every other slot gets an independently mutated copy.

use log::debug;
use rand::Rng;

use super::brain::Controller;
use super::error::SimError;
use super::vehicle::Vehicle;

/// Outcome of ranking a finished generation.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Index of the winning car.
    pub index: usize,
    /// How far it got: `-y` of its final position.
    pub progress: f32,
    /// Whether it beat the best distance seen so far.
    pub improved: bool,
}

/// Evolution bookkeeping that survives across generations.
#[derive(Debug, Clone, Default)]
pub struct EvolutionState {
    generation: u32,
    best_distance: f32,
    parent: Option<Controller>,
}

impl EvolutionState {
    /// Fresh state: no generations run, no parent yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the most recently started generation (0 before the first).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Furthest progress ever recorded. Never decreases.
    pub fn best_distance(&self) -> f32 {
        self.best_distance
    }

    /// Controller the next generation will be bred from.
    pub fn parent(&self) -> Option<&Controller> {
        self.parent.as_ref()
    }

    /// Replaces (or forgets) the breeding parent.
    pub fn set_parent(&mut self, parent: Option<Controller>) {
        self.parent = parent;
    }

    /// Bumps and returns the generation counter.
    pub fn begin_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }

    /// Restarts numbering so the next generation is number 1.
    pub fn reset_generation(&mut self) {
        self.generation = 0;
    }

    /// Picks the winner of a finished generation, ratchets the best distance
    /// and adopts the winner's controller as the next parent.
    pub fn record(&mut self, cars: &[Vehicle]) -> Option<Selection> {
        let index = select_best(cars)?;
        let winner = &cars[index];
        let progress = -winner.y;

        let improved = progress > self.best_distance;
        if improved {
            self.best_distance = progress;
        }
        if let Some(controller) = winner.controller() {
            self.parent = Some(controller.clone());
        }

        debug!(
            "generation {} winner: car {} at progress {:.1} (best {:.1})",
            self.generation, winner.id, progress, self.best_distance
        );

        Some(Selection {
            index,
            progress,
            improved,
        })
    }

    /// Controllers for a population of `population` cars bred from the
    /// current parent, or fresh random ones if there is no parent.
    pub fn breed<R: Rng + ?Sized>(
        &self,
        population: usize,
        mutation_rate: f32,
        layer_sizes: &[usize],
        rng: &mut R,
    ) -> Result<Vec<Controller>, SimError> {
        breed(self.parent.as_ref(), population, mutation_rate, layer_sizes, rng)
    }
}

/// Index of the car with the smallest y (furthest forward). Ties go to the
/// earliest car.
pub fn select_best(cars: &[Vehicle]) -> Option<usize> {
    cars.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
        .map(|(i, _)| i)
}

/// Clones `parent` into `population` controllers. Slot 0 is an exact copy;
/// the rest are each mutated by `mutation_rate` with independent draws.
///
/// # Arguments
///
/// * `parent` - Controller to clone, or `None` for a random population
/// * `population` - Number of controllers to produce
/// * `mutation_rate` - Blend factor towards fresh noise for slots 1 and up
/// * `layer_sizes` - Shape of random controllers when there is no parent
/// * `rng` - Random source for mutation and initialisation
///
/// # Returns
///
/// The controllers in slot order, or an error if `layer_sizes` is not a
/// valid controller shape.
pub fn breed<R: Rng + ?Sized>(
    parent: Option<&Controller>,
    population: usize,
    mutation_rate: f32,
    layer_sizes: &[usize],
    rng: &mut R,
) -> Result<Vec<Controller>, SimError> {
    let Some(parent) = parent else {
        return (0..population)
            .map(|_| Controller::random(layer_sizes, rng))
            .collect();
    };

    Ok((0..population)
        .map(|slot| {
            if slot == 0 {
                parent.clone()
            } else {
                parent.mutated(mutation_rate, rng)
            }
        })
        .collect())
}
