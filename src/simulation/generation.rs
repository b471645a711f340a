//! One generation: the AI population, its traffic, and the per-tick update.
//!
//! A tick freezes the traffic outlines into an [`ObstacleField`] first, moves
//! the traffic against the bare road, then updates every AI car in parallel
//! against the frozen snapshot.

use log::warn;
use rayon::prelude::*;

use super::brain::Controller;
use super::error::SimError;
use super::evolution::select_best;
use super::params::Params;
use super::road::Road;
use super::spatial::ObstacleField;
use super::vehicle::Vehicle;

/// What happened during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Undamaged AI cars after the tick.
    pub alive: usize,
    /// AI cars whose update failed, by index. They did not move.
    pub failures: Vec<(usize, SimError)>,
    /// Whether the driver ended the generation after this tick.
    pub generation_ended: bool,
}

/// A population of AI cars sharing one road and one traffic layout.
#[derive(Debug, Clone)]
pub struct Generation {
    number: u32,
    cars: Vec<Vehicle>,
    traffic: Vec<Vehicle>,
    ticks: u64,
}

impl Generation {
    /// Puts one AI car per controller at the start line and lays out traffic.
    ///
    /// Traffic ids come first, AI car ids follow.
    pub fn new(
        number: u32,
        controllers: Vec<Controller>,
        params: &Params,
        road: &Road,
    ) -> Result<Self, SimError> {
        let traffic: Vec<Vehicle> = params
            .traffic
            .iter()
            .enumerate()
            .map(|(id, &slot)| Vehicle::traffic(id, params, road, slot))
            .collect();

        let first_id = traffic.len();
        let cars = controllers
            .into_iter()
            .enumerate()
            .map(|(i, controller)| Vehicle::ai(first_id + i, params, road, controller))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(number, cars, traffic))
    }

    /// Wraps hand-built vehicles, e.g. for scripted scenarios.
    pub fn from_parts(number: u32, cars: Vec<Vehicle>, traffic: Vec<Vehicle>) -> Self {
        Self {
            number,
            cars,
            traffic,
            ticks: 0,
        }
    }

    /// Generation number, starting at 1.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// AI cars.
    pub fn cars(&self) -> &[Vehicle] {
        &self.cars
    }

    /// Traffic cars.
    pub fn traffic(&self) -> &[Vehicle] {
        &self.traffic
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Undamaged AI cars.
    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|car| !car.is_damaged()).count()
    }

    /// Index of the car furthest up the road.
    pub fn best_index(&self) -> Option<usize> {
        select_best(&self.cars)
    }

    /// The car furthest up the road.
    pub fn best_car(&self) -> Option<&Vehicle> {
        self.best_index().map(|i| &self.cars[i])
    }

    /// Advances every vehicle once.
    ///
    /// # Arguments
    ///
    /// * `road` - Road shared by every vehicle
    ///
    /// # Returns
    ///
    /// A report with the surviving car count and any per-car failures.
    /// Only a failure to snapshot the traffic aborts the tick; individual
    /// car failures are reported and the rest of the population still moves.
    pub fn tick(&mut self, road: &Road) -> Result<TickReport, SimError> {
        let snapshot = ObstacleField::build(&self.traffic)?;

        let open_road = ObstacleField::empty();
        for vehicle in &mut self.traffic {
            if let Err(e) = vehicle.step(road, &open_road) {
                warn!("traffic car {} skipped a tick: {}", vehicle.id, e);
            }
        }

        let failures: Vec<(usize, SimError)> = self
            .cars
            .par_iter_mut()
            .enumerate()
            .filter_map(|(i, car)| car.step(road, &snapshot).err().map(|e| (i, e)))
            .collect();

        for (i, e) in &failures {
            warn!("car {} skipped a tick: {}", self.cars[*i].id, e);
        }

        self.ticks += 1;
        Ok(TickReport {
            alive: self.alive_count(),
            failures,
            generation_ended: false,
        })
    }
}
