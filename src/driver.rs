//! Frame driver
//!
//! Once per display frame: take the current controls, step the simulation,
//! publish events and hand a snapshot to the renderer.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{ControlState, GameEvent, RenderSnapshot, Simulation};

/// Receiver for everything the core produces each frame
pub trait FrameSink {
    /// Draw the frame
    fn render(&mut self, snapshot: &RenderSnapshot);

    /// Score/lives/game-over notifications and feedback cues
    fn present(&mut self, event: &GameEvent);
}

/// Sink that drops everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn render(&mut self, _snapshot: &RenderSnapshot) {}

    fn present(&mut self, _event: &GameEvent) {}
}

/// Owns the simulation and feeds it one tick per frame
#[derive(Debug, Clone)]
pub struct FrameDriver {
    sim: Simulation,
    accumulator: f32,
    frames: u64,
    /// Fire/reset edges seen on frames that ran no tick yet
    pending_fire: bool,
    pending_reset: bool,
}

impl FrameDriver {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            accumulator: 0.0,
            frames: 0,
            pending_fire: false,
            pending_reset: false,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One display tick = one simulation tick, then events and a render
    pub fn frame(&mut self, controls: &ControlState, sink: &mut impl FrameSink) {
        self.latch(controls);
        let input = self.take_input(controls);
        self.sim.tick(&input);
        self.publish(sink);
    }

    /// Fixed-timestep variant for hosts whose refresh rate is not 60 Hz.
    /// Edge events wait for the next tick that runs and go to that tick
    /// only. Returns ticks run.
    pub fn advance(
        &mut self,
        elapsed_secs: f32,
        controls: &ControlState,
        sink: &mut impl FrameSink,
    ) -> u32 {
        self.accumulator += elapsed_secs.clamp(0.0, 0.1);
        self.latch(controls);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.take_input(controls);
            self.sim.tick(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }

        self.publish(sink);
        substeps
    }

    fn latch(&mut self, controls: &ControlState) {
        self.pending_fire |= controls.fire_requested;
        self.pending_reset |= controls.reset_requested;
    }

    /// Held state from this frame plus any pending edges, which are consumed
    fn take_input(&mut self, controls: &ControlState) -> ControlState {
        let input = ControlState {
            fire_requested: self.pending_fire,
            reset_requested: self.pending_reset,
            ..controls.held_only()
        };
        self.pending_fire = false;
        self.pending_reset = false;
        input
    }

    fn publish(&mut self, sink: &mut impl FrameSink) {
        for event in self.sim.drain_events() {
            sink.present(&event);
        }
        sink.render(&self.sim.snapshot());
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Archetype, GamePhase};
    use crate::tuning::Tuning;
    use glam::Vec3;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<RenderSnapshot>,
        events: Vec<GameEvent>,
    }

    impl FrameSink for RecordingSink {
        fn render(&mut self, snapshot: &RenderSnapshot) {
            self.frames.push(snapshot.clone());
        }

        fn present(&mut self, event: &GameEvent) {
            self.events.push(*event);
        }
    }

    fn driver() -> FrameDriver {
        FrameDriver::new(Simulation::new(Tuning::default(), 5).unwrap())
    }

    #[test]
    fn test_frame_renders_once_per_call() {
        let mut driver = driver();
        let mut sink = RecordingSink::default();
        for _ in 0..3 {
            driver.frame(&ControlState::default(), &mut sink);
        }
        assert_eq!(sink.frames.len(), 3);
        assert_eq!(sink.frames[2].time_ticks, 3);
        assert_eq!(driver.frames(), 3);
    }

    #[test]
    fn test_events_reach_sink_before_render() {
        let mut driver = driver();
        let mut sink = RecordingSink::default();
        let fire = ControlState {
            fire_requested: true,
            ..Default::default()
        };
        driver.frame(&fire, &mut sink);
        assert!(matches!(sink.events[0], GameEvent::ProjectileFired { .. }));
        assert_eq!(sink.frames[0].projectiles.len(), 1);
    }

    #[test]
    fn test_game_over_still_renders_but_does_not_step() {
        let mut driver = driver();
        let mut sink = RecordingSink::default();
        while driver.sim().state().is_playing() {
            let player = driver.sim().player().clone();
            let z = player.position.z - player.half_extents.z - 0.2;
            let at = Vec3::new(player.position.x, player.position.y, z);
            driver.sim_mut().spawn_enemy_at(Archetype::Light, at);
            driver.frame(&ControlState::default(), &mut sink);
        }
        assert!(sink.events.contains(&GameEvent::GameEnded));

        let ticks = driver.sim().time_ticks();
        driver.frame(&ControlState::default(), &mut sink);
        let last = sink.frames.last().unwrap();
        assert_eq!(last.phase, GamePhase::GameOver);
        assert_eq!(last.time_ticks, ticks);
    }

    #[test]
    fn test_advance_runs_fixed_substeps() {
        let mut driver = driver();
        let mut sink = RecordingSink::default();
        let fire = ControlState {
            fire_requested: true,
            ..Default::default()
        };

        // Three ticks' worth of time, one render
        let ran = driver.advance(SIM_DT * 3.0 + SIM_DT * 0.5, &fire, &mut sink);
        assert_eq!(ran, 3);
        assert_eq!(sink.frames.len(), 1);
        // Fire edge consumed once even though three ticks ran
        assert_eq!(driver.sim().registry().projectiles().len(), 1);
    }

    #[test]
    fn test_advance_keeps_edges_across_short_frames() {
        let mut driver = driver();
        let fire = ControlState {
            fire_requested: true,
            ..Default::default()
        };
        let short = 1.0 / 144.0;

        // 144 Hz host: the press lands on a frame that runs no tick
        assert_eq!(driver.advance(short, &fire, &mut NullSink), 0);
        assert_eq!(driver.advance(short, &ControlState::default(), &mut NullSink), 0);
        assert_eq!(driver.advance(short, &ControlState::default(), &mut NullSink), 1);
        assert_eq!(driver.sim().registry().projectiles().len(), 1);

        // Consumed: later ticks do not fire again
        for _ in 0..(driver.sim().tuning().fire_cooldown_ticks * 3) {
            driver.advance(SIM_DT, &ControlState::default(), &mut NullSink);
        }
        assert_eq!(driver.sim().registry().projectiles().len(), 1);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut driver = driver();
        let ran = driver.advance(5.0, &ControlState::default(), &mut NullSink);
        assert!(ran <= MAX_SUBSTEPS);
        assert!(driver.sim().time_ticks() <= u64::from(MAX_SUBSTEPS));
    }
}
