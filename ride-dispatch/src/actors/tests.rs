// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::time::Duration;

use futures::executor::block_on;

use super::*;

#[test]
fn test_sampled_delays_stay_within_bound() {
    let profile = ActorProfile::new("bounded", 15);
    for _ in 0..500 {
        assert!(profile.sample_delay() <= Duration::from_millis(15));
    }
}

#[test]
fn test_zero_max_delay_is_instant() {
    let passenger = Passenger::new("P0", 0);
    assert_eq!(passenger.trip_duration(), Duration::ZERO);
}

#[test]
fn test_driver_holds_passenger_only_during_trip() {
    let mut driver = Driver::new("D1", 0);
    let passenger = Passenger::new("P1", 0);
    assert!(driver.current_passenger().is_none());

    block_on(driver.pick_up_passenger(passenger.clone()));
    assert_eq!(driver.current_passenger(), Some(&passenger));

    let dropped_off = block_on(driver.drive_to_destination(Duration::ZERO));
    assert_eq!(dropped_off, Some(passenger));
    assert!(driver.current_passenger().is_none());
}

#[test]
fn test_clear_passenger() {
    let mut driver = Driver::new("D1", 0);
    block_on(driver.pick_up_passenger(Passenger::new("P1", 0)));
    driver.clear_passenger();
    assert!(driver.current_passenger().is_none());
}

#[test]
fn test_display_uses_name() {
    assert_eq!(Driver::new("Alex", 5).to_string(), "Alex");
    assert_eq!(Passenger::new("Sam", 5).to_string(), "Sam");
}
