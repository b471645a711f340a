#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::fs;
use std::path::PathBuf;

use evo_drive::simulation::storage::BrainStore;
use evo_drive::{Controller, Params, SimError, Simulation};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("evo_drive_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_save_load_delete() {
    let path = temp_path("brain");
    let store = BrainStore::new(&path);
    let mut rng = Pcg32::seed_from_u64(8);
    let controller = Controller::random(&[5, 6, 4], &mut rng).expect("valid controller");

    assert!(!store.exists());
    assert!(store.load().expect("missing file is fine").is_none());

    store.save(&controller).expect("save succeeds");
    assert!(store.exists());

    let loaded = store
        .load()
        .expect("load succeeds")
        .expect("controller was saved");
    assert_eq!(loaded.layer_sizes(), controller.layer_sizes());
    for (a, b) in loaded.levels().iter().zip(controller.levels()) {
        for (x, y) in a.weights().iter().zip(b.weights()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    assert!(store.delete().expect("delete succeeds"));
    assert!(!store.exists());
    assert!(!store.delete().expect("second delete is a no-op"));
}

#[test]
fn test_corrupt_file_is_an_error() {
    let path = temp_path("corrupt");
    fs::write(&path, "{ this is not a controller").expect("write test file");

    let result = BrainStore::new(&path).load();
    assert!(matches!(result, Err(SimError::Json(_))));

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn test_simulation_saves_parent() {
    let path = temp_path("sim_brain");
    let store = BrainStore::new(&path);
    let params = Params {
        population: 4,
        tick_limit: 10,
        seed: Some(1),
        ..Params::default()
    };
    let mut sim = Simulation::new(params).expect("valid params");
    sim.run_generation().expect("generation runs");

    assert!(sim.save_controller(&store).expect("save succeeds"));
    let saved = store.load().expect("load succeeds").expect("saved");
    assert_eq!(saved.layer_sizes(), vec![5, 6, 4]);

    store.delete().expect("cleanup");
}

fn assert_same_controller(a: &Controller, b: &Controller) {
    assert_eq!(a.layer_sizes(), b.layer_sizes());
    for (la, lb) in a.levels().iter().zip(b.levels()) {
        for (x, y) in la.biases().iter().zip(lb.biases()) {
            assert!((x - y).abs() < 1e-6);
        }
        for (x, y) in la.weights().iter().zip(lb.weights()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}

#[test]
fn test_simulation_saves_current_leader() {
    let path = temp_path("leader_brain");
    let store = BrainStore::new(&path);
    let params = Params {
        population: 30,
        mutation_rate: 0.5,
        tick_limit: 20,
        auto_reset: false,
        seed: Some(21),
        ..Params::default()
    };
    let mut sim = Simulation::new(params).expect("valid params");
    sim.run_generation().expect("generation runs");
    assert_eq!(sim.stats().generation, 2);

    for _ in 0..300 {
        if sim.generation().best_index() != Some(0) {
            break;
        }
        sim.tick().expect("tick succeeds");
    }

    let leader = sim.best_controller().cloned().expect("cars exist");
    assert!(sim.save_controller(&store).expect("save succeeds"));
    let saved = store.load().expect("load succeeds").expect("saved");
    assert_same_controller(&saved, &leader);

    if sim.generation().best_index() != Some(0) {
        let parent = sim.evolution().parent().expect("first generation ended");
        assert_ne!(&leader, parent);
    }

    store.delete().expect("cleanup");
}

#[test]
fn test_params_reject_degenerate_sizes() {
    let defaults = Params::default();
    assert!(defaults.validate().is_ok());

    let cases = [
        Params {
            ray_length: 0.0,
            ..Params::default()
        },
        Params {
            car_width: f32::NAN,
            ..Params::default()
        },
        Params {
            car_height: -5.0,
            ..Params::default()
        },
        Params {
            ai_max_speed: f32::INFINITY,
            ..Params::default()
        },
        Params {
            traffic_max_speed: 0.0,
            ..Params::default()
        },
        Params {
            friction: f32::NAN,
            ..Params::default()
        },
    ];
    for params in cases {
        assert!(matches!(params.validate(), Err(SimError::InvalidParams(_))));
        assert!(matches!(
            Simulation::new(params),
            Err(SimError::InvalidParams(_))
        ));
    }

    let nan_road = Params {
        road_width: f32::NAN,
        ..Params::default()
    };
    assert!(matches!(
        nan_road.validate(),
        Err(SimError::InvalidRoad { .. })
    ));
}

#[test]
fn test_params_file_round_trip() {
    let path = temp_path("params");
    let params = Params {
        population: 33,
        hidden_layers: vec![8, 5],
        seed: Some(99),
        ..Params::default()
    };

    params.save_to_file(&path).expect("save succeeds");
    let loaded = Params::from_file(&path).expect("load succeeds");

    assert_eq!(loaded.population, 33);
    assert_eq!(loaded.layer_sizes(), vec![5, 8, 5, 4]);
    assert_eq!(loaded.seed, Some(99));
    assert_eq!(loaded.traffic, params.traffic);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn test_params_missing_fields_use_defaults() {
    let path = temp_path("partial_params");
    fs::write(&path, r#"{ "population": 7, "lane_count": 4 }"#).expect("write test file");

    let loaded = Params::from_file(&path).expect("load succeeds");
    let defaults = Params::default();

    assert_eq!(loaded.population, 7);
    assert_eq!(loaded.lane_count, 4);
    assert_eq!(loaded.ray_count, defaults.ray_count);
    assert_eq!(loaded.traffic.len(), defaults.traffic.len());
    assert!(loaded.auto_reset);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn test_params_file_is_validated() {
    let path = temp_path("bad_params");
    fs::write(&path, r#"{ "mutation_rate": 3.0 }"#).expect("write test file");

    assert!(matches!(
        Params::from_file(&path),
        Err(SimError::InvalidParams(_))
    ));

    fs::remove_file(&path).expect("cleanup");
}
