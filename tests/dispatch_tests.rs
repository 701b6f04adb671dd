//! Dispatch behavior validation tests
//!
//! These exercise the assignment tiers, the pending-request queue, and the
//! end-to-end call lifecycle through the public `SimBuilding` API.

use elevator_sim::simulation::{CarId, Direction, Phase, SimBuilding, SimConfig, SimEvent};

/// A building with instant doors and one tick per floor, for easy timelines
fn building(floors: usize, cars: usize) -> SimBuilding {
    SimBuilding::new(SimConfig {
        total_floors: floors,
        car_count: cars,
        ticks_per_floor: 1,
        door_hold_ticks: 0,
    })
    .expect("test config should be valid")
}

#[test]
fn test_config_validation() {
    assert!(SimBuilding::new(SimConfig {
        total_floors: 1,
        ..SimConfig::default()
    })
    .is_err());
    assert!(SimBuilding::new(SimConfig {
        car_count: 0,
        ..SimConfig::default()
    })
    .is_err());
    assert!(SimBuilding::new(SimConfig {
        ticks_per_floor: 0,
        ..SimConfig::default()
    })
    .is_err());
    assert!(SimBuilding::new(SimConfig::default()).is_ok());
}

#[test]
fn test_invalid_floor_rejected_without_state_change() {
    let mut b = building(10, 1);

    assert!(b.request_pickup(10, Direction::Up).is_err());
    assert!(b.request_from_car(CarId(0), 99).is_err());
    assert!(b.request_from_car(CarId(5), 3).is_err());

    assert_eq!(b.pending_len(), 0);
    assert_eq!(b.stats.calls_received, 0);
    assert_eq!(b.stats.cab_requests, 0);
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::Idle);
}

#[test]
fn test_duplicate_press_collapses() {
    let mut b = building(10, 1);

    // Send the only car up so the down call has no eligible car
    b.request_from_car(CarId(0), 5).unwrap();
    b.request_pickup(3, Direction::Down).unwrap();
    assert_eq!(b.pending_len(), 1);
    assert!(b.is_call_pending(3, Direction::Down));

    // Second press changes nothing
    b.request_pickup(3, Direction::Down).unwrap();
    assert_eq!(b.pending_len(), 1);
    assert_eq!(b.stats.calls_received, 1);
}

#[test]
fn test_pickup_assigns_closest_idle_car() {
    let mut b = building(10, 2);

    // Both idle at floor 0: tie breaks to the lowest id
    b.request_pickup(4, Direction::Up).unwrap();
    assert!(b.car(CarId(0)).unwrap().destinations().contains(&4));
    assert!(b.car(CarId(1)).unwrap().destinations().is_empty());
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::Moving);
    assert_eq!(b.car(CarId(0)).unwrap().direction, Some(Direction::Up));
    assert_eq!(b.pending_len(), 0);

    // Flag stays set until the car actually stops there
    assert!(b.is_call_pending(4, Direction::Up));
    for _ in 0..4 {
        b.tick();
    }
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.current_floor, 4);
    assert_eq!(car.phase, Phase::DoorsOpen);
    assert!(!b.is_call_pending(4, Direction::Up));

    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::Idle);
    assert_eq!(b.car(CarId(0)).unwrap().direction, None);
}

#[test]
fn test_pickup_at_idle_cars_floor_served_on_spot() {
    let mut b = building(10, 1);
    b.drain_events();

    b.request_pickup(0, Direction::Up).unwrap();
    assert!(!b.is_call_pending(0, Direction::Up));
    assert_eq!(b.pending_len(), 0);
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::DoorsOpen);

    let events = b.drain_events();
    assert!(events.contains(&SimEvent::CallCleared {
        floor: 0,
        direction: Direction::Up
    }));
    assert_eq!(b.stats.calls_served, 1);

    b.tick();
    assert!(b.is_quiescent());
}

#[test]
fn test_idle_car_preferred_over_moving_car_already_past() {
    let mut b = building(10, 2);

    // Car1 heads for the top; car0 parks at floor 3
    b.request_from_car(CarId(1), 9).unwrap();
    b.request_from_car(CarId(0), 3).unwrap();
    for _ in 0..7 {
        b.tick();
    }
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::Idle);
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 3);
    assert_eq!(b.car(CarId(1)).unwrap().phase, Phase::Moving);
    assert_eq!(b.car(CarId(1)).unwrap().current_floor, 7);

    // Car1 is moving up but already past floor 5; the idle car gets the call
    b.request_pickup(5, Direction::Up).unwrap();
    assert!(b.car(CarId(0)).unwrap().destinations().contains(&5));
    assert!(!b.car(CarId(1)).unwrap().destinations().contains(&5));
}

#[test]
fn test_moving_car_recruited_when_stop_is_ahead() {
    let mut b = building(10, 1);

    b.request_from_car(CarId(0), 8).unwrap();
    b.tick();
    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 2);

    // Same direction and still ahead: the sweep picks it up en route
    b.request_pickup(5, Direction::Up).unwrap();
    assert_eq!(b.pending_len(), 0);
    assert!(b.car(CarId(0)).unwrap().destinations().contains(&5));

    for _ in 0..3 {
        b.tick();
    }
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.current_floor, 5);
    assert_eq!(car.phase, Phase::DoorsOpen);
    assert!(!b.is_call_pending(5, Direction::Up));
    assert!(car.destinations().contains(&8));
}

#[test]
fn test_moving_car_not_recruited_when_stop_is_behind() {
    let mut b = building(10, 1);

    b.request_from_car(CarId(0), 8).unwrap();
    for _ in 0..4 {
        b.tick();
    }
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 4);

    // Floor 2 is behind the upward sweep; the call must wait
    b.request_pickup(2, Direction::Up).unwrap();
    assert_eq!(b.pending_len(), 1);
    assert!(!b.car(CarId(0)).unwrap().destinations().contains(&2));

    // Once the car finishes and idles, the sweep picks the call up
    for _ in 0..20 {
        b.tick();
    }
    assert!(b.is_quiescent());
    assert!(!b.is_call_pending(2, Direction::Up));
}

#[test]
fn test_direction_monotonic_until_leg_exhausted() {
    let mut b = building(10, 1);

    b.request_from_car(CarId(0), 3).unwrap();
    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 1);

    // A destination behind the car does not flip the sweep
    b.request_from_car(CarId(0), 0).unwrap();
    assert_eq!(b.car(CarId(0)).unwrap().direction, Some(Direction::Up));
    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 2);
    assert_eq!(b.car(CarId(0)).unwrap().direction, Some(Direction::Up));

    b.tick();
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.current_floor, 3);
    assert_eq!(car.phase, Phase::DoorsOpen);

    // Leg exhausted: doors close and the car reverses
    b.tick();
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.phase, Phase::Moving);
    assert_eq!(car.direction, Some(Direction::Down));

    b.tick();
    b.tick();
    b.tick();
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.current_floor, 0);
    assert_eq!(car.phase, Phase::DoorsOpen);
    assert!(car.destinations().is_empty());
}

#[test]
fn test_end_to_end_two_cars() {
    let mut b = building(10, 2);

    // Park car1 at the top
    b.request_from_car(CarId(1), 9).unwrap();
    for _ in 0..10 {
        b.tick();
    }
    assert_eq!(b.car(CarId(1)).unwrap().phase, Phase::Idle);
    assert_eq!(b.car(CarId(1)).unwrap().current_floor, 9);
    b.drain_events();

    // Car0 is closer to 4, car1 is closer to 8
    b.request_pickup(4, Direction::Up).unwrap();
    b.request_pickup(8, Direction::Down).unwrap();
    assert!(b.car(CarId(0)).unwrap().destinations().contains(&4));
    assert!(b.car(CarId(1)).unwrap().destinations().contains(&8));

    b.tick();
    assert_eq!(b.car(CarId(1)).unwrap().current_floor, 8);
    assert_eq!(b.car(CarId(1)).unwrap().phase, Phase::DoorsOpen);
    assert!(!b.is_call_pending(8, Direction::Down));

    for _ in 0..3 {
        b.tick();
    }
    assert_eq!(b.car(CarId(0)).unwrap().current_floor, 4);
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::DoorsOpen);
    assert!(!b.is_call_pending(4, Direction::Up));

    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::Idle);
    assert_eq!(b.car(CarId(1)).unwrap().phase, Phase::Idle);

    let events = b.drain_events();
    assert!(events.contains(&SimEvent::CallCleared {
        floor: 4,
        direction: Direction::Up
    }));
    assert!(events.contains(&SimEvent::CallCleared {
        floor: 8,
        direction: Direction::Down
    }));
    assert!(b.is_quiescent());
}

#[test]
fn test_pending_call_assigned_in_same_sweep_as_idle() {
    let mut b = building(10, 2);

    // Both cars busy; the down call matches neither tier
    b.request_from_car(CarId(0), 2).unwrap();
    b.request_from_car(CarId(1), 9).unwrap();
    b.request_pickup(0, Direction::Down).unwrap();
    assert_eq!(b.pending_len(), 1);

    b.tick();
    b.tick();
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::DoorsOpen);
    assert_eq!(b.pending_len(), 1);

    // Car0 closes its doors and idles; the sweep runs within this same tick
    b.tick();
    assert_eq!(b.pending_len(), 0);
    let car = b.car(CarId(0)).unwrap();
    assert_eq!(car.phase, Phase::Moving);
    assert_eq!(car.direction, Some(Direction::Down));
    assert!(car.destinations().contains(&0));
}

#[test]
fn test_call_while_doors_open_reopens_after_close() {
    let mut b = building(10, 1);

    b.request_pickup(0, Direction::Up).unwrap();
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::DoorsOpen);

    // Opposite-direction call at the same floor while the doors are open:
    // no tier matches, so it queues, then the idle sweep reopens the doors
    b.request_pickup(0, Direction::Down).unwrap();
    assert_eq!(b.pending_len(), 1);

    b.tick();
    assert_eq!(b.pending_len(), 0);
    assert_eq!(b.car(CarId(0)).unwrap().phase, Phase::DoorsOpen);
    assert!(!b.is_call_pending(0, Direction::Down));
}

#[test]
fn test_no_call_is_lost() {
    let mut b = building(10, 2);

    let calls = [
        (5, Direction::Up),
        (1, Direction::Down),
        (9, Direction::Down),
        (3, Direction::Up),
        (7, Direction::Down),
    ];
    for (floor, direction) in calls {
        b.request_pickup(floor, direction).unwrap();
    }
    assert_eq!(b.stats.calls_received, 5);

    for _ in 0..200 {
        b.tick();
    }

    assert!(b.is_quiescent());
    for floor in 0..10 {
        assert!(!b.is_call_pending(floor, Direction::Up));
        assert!(!b.is_call_pending(floor, Direction::Down));
    }
    assert_eq!(b.stats.calls_served, 5);
}

#[test]
fn test_position_events_track_movement() {
    let mut b = building(10, 1);
    b.drain_events();

    b.request_pickup(2, Direction::Up).unwrap();
    b.tick();
    b.tick();

    let events = b.drain_events();
    let positions: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::PositionChanged { floor, .. } => Some(*floor),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![1, 2]);
}
