#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::{Controller, Params};
use evo_drive::simulation::road::Road;
use evo_drive::simulation::spatial::ObstacleField;
use evo_drive::simulation::vehicle::{ControlSource, Controls, Handling, Vehicle};
use geo::Coord;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn create_test_params() -> Params {
    Params::default()
}

fn create_test_road(params: &Params) -> Road {
    Road::new(params.road_center_x, params.road_width, params.lane_count).expect("valid road")
}

fn scripted_car(id: usize, x: f32, y: f32, controls: Controls, params: &Params) -> Vehicle {
    Vehicle::new(
        id,
        Coord { x, y },
        (params.car_width, params.car_height),
        Handling::from_params(params, params.ai_max_speed),
        ControlSource::Fixed(controls),
        None,
    )
}

#[test]
fn test_straight_drive() {
    let params = create_test_params();
    let road = create_test_road(&params);
    let mut car = scripted_car(0, 150.0, 100.0, Controls::cruise(), &params);
    let open_road = ObstacleField::empty();

    let mut last_y = car.y;
    for _ in 0..100 {
        car.step(&road, &open_road).expect("step should succeed");
        assert!(car.y < last_y, "car should keep moving up the road");
        assert_eq!(car.x, 150.0);
        assert_eq!(car.angle, 0.0);
        last_y = car.y;
    }

    assert!(!car.is_damaged());
    assert!((car.speed - 3.95).abs() < 1e-4);

    // 0.15 per tick up to 3.9 over 26 ticks, then capped at 4.0 - friction
    let expected: f32 = (1..=26).map(|n| 0.15 * n as f32).sum::<f32>() + 74.0 * 3.95;
    assert!((100.0 - car.y - expected).abs() < 0.05);
}

#[test]
fn test_speed_limits() {
    let params = create_test_params();
    let mut car = scripted_car(0, 150.0, 100.0, Controls::default(), &params);

    let reverse = Controls {
        reverse: true,
        ..Controls::default()
    };
    for _ in 0..100 {
        car.apply(reverse);
    }
    assert!(car.speed < 0.0);
    assert!(car.speed >= -params.ai_max_speed / 2.0);

    for _ in 0..100 {
        car.apply(Controls::cruise());
    }
    assert!(car.speed <= params.ai_max_speed);
}

#[test]
fn test_friction_stops_car() {
    let params = create_test_params();
    let mut car = scripted_car(0, 150.0, 100.0, Controls::default(), &params);

    car.speed = 0.04;
    car.apply(Controls::default());
    assert_eq!(car.speed, 0.0);

    car.speed = 1.0;
    car.apply(Controls::default());
    assert!((car.speed - 0.95).abs() < 1e-6);
}

#[test]
fn test_no_steering_at_rest() {
    let params = create_test_params();
    let mut car = scripted_car(0, 150.0, 100.0, Controls::default(), &params);

    car.apply(Controls {
        left: true,
        ..Controls::default()
    });

    assert_eq!(car.angle, 0.0);
    assert_eq!(car.position(), Coord { x: 150.0, y: 100.0 });
}

#[test]
fn test_steering_direction() {
    let params = create_test_params();

    let mut forward_left = scripted_car(0, 150.0, 100.0, Controls::default(), &params);
    forward_left.apply(Controls {
        forward: true,
        left: true,
        ..Controls::default()
    });
    assert!(forward_left.angle > 0.0);
    assert!(forward_left.x < 150.0, "turning left drifts towards -x");

    let mut reverse_left = scripted_car(1, 150.0, 100.0, Controls::default(), &params);
    reverse_left.apply(Controls {
        reverse: true,
        left: true,
        ..Controls::default()
    });
    assert!(reverse_left.angle < 0.0, "steering flips while reversing");
    assert!(reverse_left.y > 100.0);
}

#[test]
fn test_overlap_damages_and_freezes() {
    let params = create_test_params();
    let road = create_test_road(&params);
    let blocker = scripted_car(1, 160.0, 110.0, Controls::default(), &params);
    let field = ObstacleField::build(std::slice::from_ref(&blocker)).expect("snapshot");

    let mut car = scripted_car(0, 150.0, 100.0, Controls::cruise(), &params);
    car.step(&road, &field).expect("step should succeed");
    assert!(car.is_damaged());

    let position = car.position();
    let angle = car.angle;
    let speed = car.speed;
    for _ in 0..10 {
        car.step(&road, &field).expect("step should succeed");
    }

    assert!(car.is_damaged());
    assert_eq!(car.position(), position);
    assert_eq!(car.angle, angle);
    assert_eq!(car.speed, speed);
}

#[test]
fn test_own_outline_is_ignored() {
    let params = create_test_params();
    let road = create_test_road(&params);
    let mut car = scripted_car(7, 150.0, 100.0, Controls::cruise(), &params);
    let field = ObstacleField::build(std::slice::from_ref(&car)).expect("snapshot");

    car.step(&road, &field).expect("step should succeed");
    assert!(!car.is_damaged());
}

#[test]
fn test_border_damage() {
    let params = create_test_params();
    let road = create_test_road(&params);

    // Left border sits at x = 15 and the body is 30 wide
    let mut car = scripted_car(0, 20.0, 100.0, Controls::default(), &params);
    car.step(&road, &ObstacleField::empty()).expect("step should succeed");

    assert!(car.is_damaged());
}

#[test]
fn test_lane_lines_are_not_solid() {
    let params = create_test_params();
    let road = create_test_road(&params);

    // Straddling the line between lanes 0 and 1 at x = 105
    let mut car = scripted_car(0, 105.0, 100.0, Controls::cruise(), &params);
    for _ in 0..10 {
        car.step(&road, &ObstacleField::empty()).expect("step should succeed");
    }

    assert!(!car.is_damaged());
}

#[test]
fn test_traffic_and_ai_constructors() {
    let params = create_test_params();
    let road = create_test_road(&params);
    let slot = params.traffic[0];

    let traffic = Vehicle::traffic(0, &params, &road, slot);
    assert!(traffic.sensor().is_none());
    assert!(traffic.controller().is_none());
    assert!(traffic.sensor_readings().is_empty());
    assert_eq!(traffic.handling().max_speed, params.traffic_max_speed);
    assert_eq!(traffic.y, slot.y);
    assert_eq!(traffic.size(), (params.car_width, params.car_height));
    assert!(matches!(traffic.control_source(), ControlSource::Fixed(_)));

    let mut rng = Pcg32::seed_from_u64(1);
    let controller = Controller::random(&params.layer_sizes(), &mut rng).expect("controller");
    let car = Vehicle::ai(7, &params, &road, controller).expect("ai car");
    assert_eq!(car.sensor().map(|s| s.ray_count()), Some(params.ray_count));
    assert!((car.x - road.lane_center(params.start_lane)).abs() < 1e-4);
    assert_eq!(car.y, params.start_y);
    assert_eq!(car.handling().max_speed, params.ai_max_speed);
    assert!(matches!(car.control_source(), ControlSource::Ai(_)));

    let field = ObstacleField::build(&[traffic, car]).expect("field builds");
    let ids: Vec<usize> = field.obstacles().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![0, 7]);
}
