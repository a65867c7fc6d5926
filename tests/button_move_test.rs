use cgmath::Vector3;
use flow_cubes::demo::DemoConfig;

use crate::common::test_utils::DemoDriver;

mod common;

#[test]
fn blue_button_moves_actor_straight_down() {
    let mut driver = DemoDriver::new();
    assert!(driver.press("blue"));
    assert!(!driver.demo.buttons().all_enabled());

    let took = driver
        .run_until(12.0, |demo| !demo.is_animating())
        .expect("actor never stopped");
    // the sphere touches the cube once its centre is one unit above it
    assert!((took - 5.0).abs() < 0.1, "stopped after {}s", took);
    assert!(driver.is_highlighted("blue"));
    assert!(!driver.is_highlighted("red"));
    assert!(!driver.is_highlighted("green"));
    assert!(driver.demo.buttons().all_enabled());
    assert_eq!(driver.actor().x, 0.0);
}

#[test]
fn side_cubes_are_reached_diagonally() {
    for key in ["red", "green"] {
        let mut driver = DemoDriver::new();
        driver.press(key);
        let took = driver
            .run_until(12.0, |demo| !demo.is_animating())
            .expect("actor never stopped");
        assert!((took - 6.0).abs() < 0.1, "{} stopped after {}s", key, took);
        assert!(driver.is_highlighted(key));
        assert!(!driver.is_highlighted("blue"), "passed through blue on the way to {}", key);
    }
}

#[test]
fn actor_stays_put_after_the_hit() {
    let mut driver = DemoDriver::new();
    driver.press("red");
    driver.run_until(12.0, |demo| !demo.is_animating());
    let resting = driver.actor();
    driver.run_for(3.0);
    assert_eq!(driver.actor(), resting);
    assert!(driver.is_highlighted("red"));
}

#[test]
fn next_move_restarts_from_the_top_and_clears_highlight() {
    let mut driver = DemoDriver::new();
    driver.press("red");
    driver.run_until(12.0, |demo| !demo.is_animating());
    assert!(driver.is_highlighted("red"));

    assert!(driver.press("green"));
    driver.frame();
    let actor = driver.actor();
    assert!(actor.y > 1.9 && actor.x > 0.0, "actor at {:?}", actor);
    assert!(!driver.is_highlighted("red"));

    driver.run_until(12.0, |demo| !demo.is_animating());
    assert!(driver.is_highlighted("green"));
    assert!(!driver.is_highlighted("red"));
}

#[test]
fn buttons_stay_locked_while_moving() {
    let mut driver = DemoDriver::new();
    driver.press("blue");
    driver.run_for(1.0);
    assert!(!driver.press("red"));
    assert!(!driver.press("blue"));
    driver.run_until(12.0, |demo| !demo.is_animating());
    assert!(driver.is_highlighted("blue"));
    assert!(!driver.is_highlighted("red"));
}

#[test]
fn faster_frame_rate_arrives_sooner() {
    let mut driver = DemoDriver::with_config(DemoConfig {
        frame_rate: 2.0,
        ..Default::default()
    });
    driver.press("blue");
    let took = driver
        .run_until(12.0, |demo| !demo.is_animating())
        .expect("actor never stopped");
    assert!((took - 2.5).abs() < 0.1, "stopped after {}s", took);
}

#[test]
fn move_without_new_contact_unlocks_buttons_at_the_end() {
    // the actor already rests on the blue cube, so the move never enters it
    let mut driver = DemoDriver::with_config(DemoConfig {
        actor_start: Vector3::new(0.0, 0.5, 0.0),
        ..Default::default()
    });
    driver.frame();
    assert!(driver.is_highlighted("blue"));

    assert!(driver.press("blue"));
    driver.run_for(5.0);
    assert!(driver.demo.is_animating());
    assert!(!driver.demo.buttons().all_enabled());

    let took = driver
        .run_until(12.0, |demo| !demo.is_animating())
        .expect("move never ended");
    assert!((took - 5.0).abs() < 0.1, "ended {}s after the halfway mark", took);
    assert!(driver.demo.buttons().all_enabled());
    assert!(driver.is_highlighted("blue"));
    let actor = driver.actor();
    assert!(actor.y.abs() < 1e-4, "actor at {:?}", actor);
}
