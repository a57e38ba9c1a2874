use approx::assert_relative_eq;
use kinetrace::{
    integrator, EngineConfig, ObjectConfig, ObjectId, ObjectState, PlaybackStatus, Sample,
    SimulationController,
};

const STEP: f64 = 0.05;

/// Controller with the default 0.05 s step and the given objects.
fn controller_with(configs: &[ObjectConfig]) -> SimulationController {
    let mut sim = SimulationController::manual(EngineConfig::default()).unwrap();
    for c in configs {
        sim.add_configured(c.clone());
    }
    sim
}

fn run(sim: &mut SimulationController) -> Vec<Vec<Sample>> {
    sim.play();
    sim.run_pending();
    assert_eq!(sim.status(), PlaybackStatus::Finished);
    sim.objects().iter().map(|o| o.trace().to_vec()).collect()
}

fn mixed_plans() -> Vec<ObjectConfig> {
    vec![
        ObjectConfig::new(0.0, 0.0).with_event(2.0, 1.0),
        ObjectConfig::new(3.0, -2.0)
            .with_event(1.5, 0.35)
            .with_event(-4.0, 1.2)
            .with_event(0.0, 0.8),
        ObjectConfig::new(-1.0, 0.5),
    ]
}

// ==================================================================================
// Single object
// ==================================================================================

#[test]
fn uniform_acceleration_example() {
    let mut sim = controller_with(&[ObjectConfig::new(0.0, 0.0).with_event(2.0, 1.0)]);
    let traces = run(&mut sim);
    let trace = &traces[0];

    assert_eq!(trace.len(), 20);
    assert_relative_eq!(trace[0].velocity, 0.1, epsilon = 1e-12);
    assert_relative_eq!(trace[0].position, 0.005, epsilon = 1e-12);

    let obj = &sim.objects()[0];
    assert_eq!(obj.event_index(), 1);
    assert!(obj.is_finished());
    assert_relative_eq!(obj.velocity(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(obj.position(), 1.05, epsilon = 1e-9);
}

#[test]
fn event_index_never_decreases_and_stays_at_end() {
    let mut obj = ObjectState::with_config(ObjectId(0), mixed_plans()[1].clone());
    let len = obj.sequence().len();
    let mut last = 0;
    for k in 0..200 {
        integrator::step(&mut obj, k as f64 * STEP, STEP);
        assert!(obj.event_index() >= last);
        assert!(obj.event_index() <= len);
        last = obj.event_index();
    }
    assert_eq!(last, len);
}

#[test]
fn completes_within_step_bound() {
    for config in mixed_plans() {
        let mut obj = ObjectState::with_config(ObjectId(0), config);
        let bound = (obj.sequence().total_duration() / STEP).ceil() as usize + 1;
        let mut steps = 0;
        while !obj.is_finished() {
            integrator::step(&mut obj, steps as f64 * STEP, STEP);
            steps += 1;
            assert!(steps <= bound, "exceeded {bound} steps");
        }
    }
}

#[test]
fn only_invalid_events_behave_as_empty() {
    let mut sim = controller_with(&[ObjectConfig::new(4.0, 1.0).with_event(1.0, -3.0)]);
    let traces = run(&mut sim);
    let obj = &sim.objects()[0];
    assert!(traces[0].is_empty());
    assert!(obj.sequence().is_empty());
    assert_eq!(obj.event_index(), 0);
    assert_eq!(obj.position(), 4.0);
}

// ==================================================================================
// Runs
// ==================================================================================

#[test]
fn runs_are_bit_identical() {
    let first = run(&mut controller_with(&mixed_plans()));
    let second = run(&mut controller_with(&mixed_plans()));
    assert_eq!(first, second);
}

#[test]
fn reset_then_play_reproduces_the_run() {
    let mut sim = controller_with(&mixed_plans());
    let first = run(&mut sim);
    sim.reset();
    assert!(sim.objects().iter().all(|o| o.trace().is_empty()));
    let second = run(&mut sim);
    assert_eq!(first, second);
}

#[test]
fn pausing_does_not_change_results() {
    let reference = run(&mut controller_with(&mixed_plans()));

    let mut sim = controller_with(&mixed_plans());
    sim.set_playback_speed(4.0);
    sim.play();
    let mut frames = 0;
    while sim.driver_mut().take_pending() {
        sim.on_frame();
        frames += 1;
        if frames % 7 == 0 && sim.status() == PlaybackStatus::Running {
            sim.pause();
            sim.play();
        }
    }
    let traces: Vec<_> = sim.objects().iter().map(|o| o.trace().to_vec()).collect();
    assert_eq!(traces, reference);
}

#[test]
fn samples_start_at_zero_without_gaps() {
    let mut sim = controller_with(&mixed_plans());
    for trace in run(&mut sim) {
        for (k, s) in trace.iter().enumerate() {
            assert_eq!(s.time, k as f64 * STEP);
        }
    }
}

#[test]
fn completion_waits_for_longest_object() {
    let mut sim = controller_with(&[
        ObjectConfig::new(0.0, 0.0).with_event(1.0, 1.0).with_event(-1.0, 1.0),
        ObjectConfig::new(0.0, 0.0).with_event(0.5, 2.5).with_event(0.0, 2.5),
    ]);
    sim.play();
    assert_relative_eq!(sim.range_estimate().unwrap().max_duration, 5.0);
    assert_relative_eq!(sim.axis_bounds().unwrap().max_time, 5.5, epsilon = 1e-12);

    while sim.driver_mut().take_pending() {
        sim.on_frame();
        if !sim.objects()[1].is_finished() {
            assert_ne!(sim.status(), PlaybackStatus::Finished);
        }
    }
    assert_eq!(sim.status(), PlaybackStatus::Finished);
    assert!(sim.objects().iter().all(ObjectState::is_finished));
    let short = sim.objects()[0].trace().len();
    let long = sim.objects()[1].trace().len();
    assert!(long > short);
}

#[test]
fn estimate_bounds_the_real_run() {
    let mut sim = controller_with(&mixed_plans());
    let traces = run(&mut sim);
    let axes = sim.axis_bounds().unwrap();
    for s in traces.iter().flatten() {
        assert!(s.position >= axes.min_position && s.position <= axes.max_position);
        assert!(s.velocity >= axes.min_velocity && s.velocity <= axes.max_velocity);
    }
}

#[test]
fn objects_added_mid_run_wait_for_next_start() {
    let mut sim = controller_with(&[ObjectConfig::new(0.0, 0.0).with_event(1.0, 0.5)]);
    sim.play();
    sim.driver_mut().take_pending();
    sim.on_frame();

    let late = sim.add_configured(ObjectConfig::new(0.0, 0.0).with_event(1.0, 10.0));
    sim.run_pending();
    assert_eq!(sim.status(), PlaybackStatus::Finished);
    assert!(sim.object(late).unwrap().trace().is_empty());

    sim.play();
    sim.run_pending();
    assert!(!sim.object(late).unwrap().trace().is_empty());
}
