use kinetrace::{EngineConfig, ObjectConfig, PlaybackStatus, SimulationController};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut sim = match SimulationController::manual(EngineConfig::default()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("bad config: {e}");
            std::process::exit(1);
        }
    };

    // Пример: разгон, движение накатом и торможение до остановки.
    sim.add_configured(
        ObjectConfig::new(0.0, 0.0)
            .with_event(2.0, 1.0)
            .with_event(0.0, 2.0)
            .with_event(-1.0, 2.0),
    );
    // Второе тело стартует с начальной скоростью, одно событие отбрасывается (dur <= 0).
    sim.add_configured(
        ObjectConfig::new(5.0, -1.0)
            .with_event(0.5, 3.0)
            .with_event(4.0, -1.0),
    );

    sim.play();
    let frames = sim.run_pending();
    debug_assert_eq!(sim.status(), PlaybackStatus::Finished);

    println!("frames = {}, t = {:.3} s", frames, sim.sim_time());
    if let Some(axes) = sim.axis_bounds() {
        println!("axes = {:?}", axes);
    }
    for obj in sim.objects() {
        let s = obj.snapshot();
        println!(
            "object {}: x = {:.4}, v = {:.4}, samples = {}",
            s.id, s.position, s.velocity, s.samples
        );
        if let Some(last) = obj.trace().last() {
            println!("  last sample (t, x, v) = ({:.3}, {:.4}, {:.4})", last.time, last.position, last.velocity);
        }
    }
}
