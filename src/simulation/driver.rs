//! Simulation driver: owns the road, the running generation and the
//! evolution state, and exposes the controls an outer loop or UI needs.
//!
//! All randomness flows through one seedable [`Pcg32`], so a run with a fixed
//! seed is reproducible tick for tick.

use log::{info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::brain::{self, Controller};
use super::error::SimError;
use super::event_log::{EventKind, EventLog};
use super::evolution::EvolutionState;
use super::generation::{Generation, TickReport};
use super::params::Params;
use super::road::Road;
use super::storage::BrainStore;
use super::vehicle::Vehicle;

/// Snapshot of the headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Current generation number.
    pub generation: u32,
    /// Best progress ever recorded.
    pub best_distance: f32,
    /// Undamaged AI cars.
    pub alive: usize,
    /// Ticks run in the current generation.
    pub ticks: u64,
}

/// Summary of a generation run to completion by [`Simulation::run_generation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Number of the finished generation.
    pub generation: u32,
    /// Ticks it ran for.
    pub ticks: u64,
    /// Progress of its best car.
    pub progress: f32,
    /// Best progress ever, including this generation.
    pub best_distance: f32,
    /// Cars still undamaged when it ended.
    pub survivors: usize,
}

/// The whole simulation.
pub struct Simulation {
    params: Params,
    road: Road,
    rng: Pcg32,
    evolution: EvolutionState,
    generation: Generation,
    log: EventLog,
}

impl Simulation {
    /// Builds the road and starts generation 1 with random controllers.
    ///
    /// Uses `params.seed` when set, OS entropy otherwise.
    pub fn new(params: Params) -> Result<Self, SimError> {
        let rng = match params.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        Self::with_rng(params, rng)
    }

    /// Like [`Simulation::new`] but with an explicit random source.
    pub fn with_rng(params: Params, mut rng: Pcg32) -> Result<Self, SimError> {
        params.validate()?;
        let road = Road::new(params.road_center_x, params.road_width, params.lane_count)?;

        let mut evolution = EvolutionState::new();
        let number = evolution.begin_generation();
        let controllers =
            evolution.breed(params.population, params.mutation_rate, &params.layer_sizes(), &mut rng)?;
        let generation = Generation::new(number, controllers, &params, &road)?;

        let mut log = EventLog::default();
        log.log(number, 0, "simulation started", EventKind::Generation);
        info!(
            "simulation started: {} cars, {} traffic, {} lanes",
            params.population,
            params.traffic.len(),
            params.lane_count
        );

        Ok(Self {
            params,
            road,
            rng,
            evolution,
            generation,
            log,
        })
    }

    /// Parameters in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The road.
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// The running generation.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Cross-generation state.
    pub fn evolution(&self) -> &EvolutionState {
        &self.evolution
    }

    /// Recent notable events, newest first.
    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Headline numbers.
    pub fn stats(&self) -> Stats {
        Stats {
            generation: self.generation.number(),
            best_distance: self.evolution.best_distance(),
            alive: self.generation.alive_count(),
            ticks: self.generation.ticks(),
        }
    }

    /// The car currently furthest up the road.
    pub fn best_vehicle(&self) -> Option<&Vehicle> {
        self.generation.best_car()
    }

    /// Controller of the current leader, e.g. for saving.
    pub fn best_controller(&self) -> Option<&Controller> {
        self.best_vehicle().and_then(Vehicle::controller)
    }

    /// Replaces the running population with `population` cars bred from the
    /// current parent (or random ones if there is none).
    pub fn start_generation(&mut self, population: usize, mutation_rate: f32) -> Result<(), SimError> {
        if population == 0 {
            return Err(SimError::InvalidParams("population must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(SimError::InvalidParams(format!(
                "mutation rate {} outside [0, 1]",
                mutation_rate
            )));
        }

        let controllers = self.evolution.breed(
            population,
            mutation_rate,
            &self.params.layer_sizes(),
            &mut self.rng,
        )?;
        let number = self.evolution.begin_generation();
        self.generation = Generation::new(number, controllers, &self.params, &self.road)?;

        self.log.log(
            number,
            0,
            format!("generation {} started", number),
            EventKind::Generation,
        );
        info!("generation {} started with {} cars", number, population);
        Ok(())
    }

    /// Ranks the running generation and returns the winner's controller,
    /// which becomes the parent of the next generation.
    pub fn end_generation(&mut self) -> Option<Controller> {
        let number = self.generation.number();
        let ticks = self.generation.ticks();
        let selection = self.evolution.record(self.generation.cars())?;

        if selection.improved {
            self.log.log(
                number,
                ticks,
                format!("new best distance {:.0}", selection.progress),
                EventKind::Record,
            );
            info!(
                "generation {}: new best distance {:.1}",
                number, selection.progress
            );
        }

        self.evolution.parent().cloned()
    }

    /// Ends the running generation and starts the next one with the
    /// configured population and mutation rate.
    pub fn advance(&mut self) -> Result<Option<Controller>, SimError> {
        let best = self.end_generation();
        self.start_generation(self.params.population, self.params.mutation_rate)?;
        Ok(best)
    }

    /// Runs one tick. With `auto_reset` on, a tick that leaves no car
    /// undamaged also ends the generation and starts the next.
    pub fn tick(&mut self) -> Result<TickReport, SimError> {
        let mut report = self.generation.tick(&self.road)?;
        if !report.failures.is_empty() {
            self.log.log(
                self.generation.number(),
                self.generation.ticks(),
                format!("{} cars skipped a tick", report.failures.len()),
                EventKind::Warning,
            );
        }

        if self.params.auto_reset && report.alive == 0 {
            self.advance()?;
            report.generation_ended = true;
        }
        Ok(report)
    }

    /// Ticks until every car is damaged or the tick limit is hit, then
    /// starts the next generation.
    pub fn run_generation(&mut self) -> Result<GenerationSummary, SimError> {
        let number = self.generation.number();
        let mut alive = self.generation.alive_count();
        while alive > 0 && self.generation.ticks() < self.params.tick_limit {
            alive = self.generation.tick(&self.road)?.alive;
        }

        let ticks = self.generation.ticks();
        let progress = self.generation.best_car().map_or(0.0, |car| -car.y);
        self.advance()?;

        Ok(GenerationSummary {
            generation: number,
            ticks,
            progress,
            best_distance: self.evolution.best_distance(),
            survivors: alive,
        })
    }

    /// Adopts `controller` as the parent and re-seeds the running
    /// population from it: slot 0 exact, the rest mutated.
    pub fn load_controller(&mut self, controller: Controller) -> Result<(), SimError> {
        if controller.input_count() != self.params.ray_count {
            warn!(
                "rejected controller with {} inputs, sensors have {} rays",
                controller.input_count(),
                self.params.ray_count
            );
            return Err(SimError::ControllerShapeMismatch {
                level: 0,
                field: "inputs",
                expected: self.params.ray_count,
                actual: controller.input_count(),
            });
        }

        self.evolution.set_parent(Some(controller));
        self.restart_generation()?;

        let number = self.generation.number();
        self.log
            .log(number, 0, "controller loaded", EventKind::Controller);
        info!("controller loaded into generation {}", number);
        Ok(())
    }

    /// Parses a controller from its JSON record form and loads it.
    pub fn load_controller_json(&mut self, json: &str) -> Result<(), SimError> {
        let controller = Controller::from_json(json)?;
        self.load_controller(controller)
    }

    /// Loads the built-in pretrained controller into the running generation.
    pub fn use_pretrained(&mut self) -> Result<(), SimError> {
        self.load_controller(brain::pretrained()?)
    }

    /// Saves the controller of the car currently furthest up the road.
    ///
    /// Falls back to the parent when the running generation has no cars.
    /// Returns whether anything was saved.
    pub fn save_controller(&mut self, store: &BrainStore) -> Result<bool, SimError> {
        let Some(controller) = self.best_controller().or_else(|| self.evolution.parent()) else {
            return Ok(false);
        };
        store.save(controller)?;
        self.log.log(
            self.generation.number(),
            self.generation.ticks(),
            "controller saved",
            EventKind::Controller,
        );
        Ok(true)
    }

    /// Forgets the parent controller and starts over from generation 1 with
    /// random controllers. The best distance is kept.
    pub fn delete_controller(&mut self) -> Result<(), SimError> {
        self.evolution.set_parent(None);
        self.evolution.reset_generation();
        self.start_generation(self.params.population, self.params.mutation_rate)?;
        self.log.log(
            self.generation.number(),
            0,
            "controller deleted",
            EventKind::Controller,
        );
        info!("controller deleted, restarting from random controllers");
        Ok(())
    }

    /// Rebuilds the running generation from the current parent without
    /// bumping the generation number.
    fn restart_generation(&mut self) -> Result<(), SimError> {
        let population = self.generation.cars().len().max(1);
        let controllers = self.evolution.breed(
            population,
            self.params.mutation_rate,
            &self.params.layer_sizes(),
            &mut self.rng,
        )?;
        self.generation =
            Generation::new(self.generation.number(), controllers, &self.params, &self.road)?;
        Ok(())
    }
}
