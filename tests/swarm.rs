//! Multi-tick swarm runs against a static world.

mod common;

use jhund::behavior::{BehaviorConfig, FlowConfig, GauciConfig};
use jhund::{
    Category, FanSensorConfig, JhundConfig, LandmarkSensorConfig, MotionCommand, NullSink, Point2D,
    Pose2D, StaticWorld, Swarm,
};

fn flow_config(seed: u64) -> JhundConfig {
    let fan = FanSensorConfig::new(
        Category::WALL | Category::AGENT | Category::ANY_PUCK,
        Category::all(),
    );
    let mut config = JhundConfig::new(fan, BehaviorConfig::Flow(FlowConfig::new(Category::ANY_PUCK)));
    config.landmark_sensor = Some(LandmarkSensorConfig::default());
    config.seed = seed;
    config
}

fn landmark_arena() -> StaticWorld {
    let mut world = common::arena(400.0);
    world.add_circle(Point2D::ZERO, 20.0, Category::ARC_LANDMARK);
    world.add_circle(Point2D::new(100.0, 50.0), 5.0, Category::RED_PUCK);
    world
}

/// Run `ticks` ticks, integrating every command, and return the pose trail.
fn run(swarm: &mut Swarm, world: &StaticWorld, ticks: usize) -> Vec<Vec<Pose2D>> {
    let mut trail = Vec::new();
    for _ in 0..ticks {
        let mut commands: Vec<(usize, MotionCommand)> = Vec::new();
        swarm.tick(world, &mut commands, &mut NullSink);
        for (id, command) in commands {
            let pose = swarm.agent(id).unwrap().pose();
            let (next, velocity) = common::integrate(pose, command, 0.5);
            swarm.set_kinematics(id, next, velocity).unwrap();
        }
        trail.push(swarm.agents().iter().map(|a| a.pose()).collect());
    }
    trail
}

// ============================================================================
// Ticking
// ============================================================================

#[test]
fn test_seeded_runs_repeat() {
    common::init_logger();
    let world = landmark_arena();
    let config = flow_config(17);

    let spawn = |swarm: &mut Swarm| {
        for i in 0..4 {
            let pose = Pose2D::new(-150.0 + 60.0 * i as f32, -100.0, 0.5 * i as f32);
            swarm.spawn(&config, pose, 10.0).unwrap();
        }
    };
    let mut a = Swarm::new();
    let mut b = Swarm::new();
    spawn(&mut a);
    spawn(&mut b);

    let trail_a = run(&mut a, &world, 50);
    let trail_b = run(&mut b, &world, 50);
    assert_eq!(trail_a, trail_b);
    assert_eq!(a.ticks(), 50);
    for agent in a.agents() {
        assert!(matches!(agent.state_label(), Some("FLOW" | "WANDER" | "POKE")));
    }
}

#[test]
fn test_every_command_within_limits() {
    let world = landmark_arena();
    let mut config = flow_config(3);
    config.limits.max_linear = 3.0;
    config.limits.max_angular = 1.5;

    let mut swarm = Swarm::new();
    for i in 0..3 {
        swarm
            .spawn(&config, Pose2D::new(50.0 * i as f32, 120.0, 0.0), 10.0)
            .unwrap();
    }

    for _ in 0..20 {
        let mut commands: Vec<(usize, MotionCommand)> = Vec::new();
        swarm.tick(&world, &mut commands, &mut NullSink);
        assert_eq!(commands.len(), 3);
        for (_, command) in commands {
            assert!(command.linear.abs() <= 3.0);
            assert!(command.angular.abs() <= 1.5);
        }
    }
}

#[test]
fn test_agents_see_each_other() {
    let fan = FanSensorConfig::new(Category::WALL | Category::AGENT, Category::all());
    let config = JhundConfig::new(fan, BehaviorConfig::Gauci(GauciConfig::new(Category::RED_PUCK)));

    let mut swarm = Swarm::new();
    swarm.spawn(&config, Pose2D::identity(), 10.0).unwrap();
    let ahead = swarm.spawn(&config, Pose2D::new(60.0, 0.0, 0.0), 10.0).unwrap();

    // The world stands in for the physics engine: each body is a circle
    let mut world = StaticWorld::new();
    world.add_circle(Point2D::ZERO, 10.0, Category::AGENT);
    world.add_circle(Point2D::new(60.0, 0.0), 10.0, Category::AGENT);

    let mut commands: Vec<(usize, MotionCommand)> = Vec::new();
    swarm.tick(&world, &mut commands, &mut NullSink);

    // Agent 0 has agent 1 dead ahead; agent 1 faces open space
    assert_eq!(commands[0].1, MotionCommand::new(1.0, 2.0));
    assert_eq!(commands[ahead].1, MotionCommand::new(4.0, -2.0));
}
