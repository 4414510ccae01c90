//! Headless Collision Demo
//!
//! Runs the collision pipeline over a random scene without a window:
//! - Dynamic ships (circles) drifting around the world
//! - Static asteroids (boxes) the ships bounce off
//! - A trigger zone in the middle reporting who passes through
//! - Every collision event is logged as it is dispatched
//!
//! Usage: `collision_demo [config.json] [frames]`

use collision_engine::prelude::*;
use rand::Rng;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// Entity counts
const NUM_SHIPS: usize = 40;
const NUM_ASTEROIDS: usize = 15;

// Movement and sizes
const SHIP_SPEED: f32 = 120.0;
const SHIP_SIZE: f32 = 30.0;
const ASTEROID_MIN_SIZE: f32 = 60.0;
const ASTEROID_MAX_SIZE: f32 = 180.0;
const TRIGGER_ZONE_SIZE: f32 = 300.0;

// Layers
const SHIP_LAYER: usize = 0;
const ASTEROID_LAYER: usize = 1;
const ZONE_LAYER: usize = 2;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: usize = 600;
const DEFAULT_CONFIG_PATH: &str = "collision_config.json";

type EventCounts = Rc<RefCell<HashMap<CollisionEventKind, usize>>>;

struct CollisionDemo {
    world: World,
    manager: CollisionManager,
    events: EventSystem,
    counts: EventCounts,
    ships: Vec<Entity>,
    half_extent: Vec2,
}

impl CollisionDemo {
    fn new(config: &CollisionConfig) -> Self {
        let mut manager = CollisionManager::from_config(config);
        // Asteroids never hit each other
        manager.layers_mut().set_collides(ASTEROID_LAYER, ASTEROID_LAYER, false);

        let counts: EventCounts = Rc::new(RefCell::new(HashMap::new()));
        let mut events = EventSystem::new();
        for kind in [
            CollisionEventKind::CollisionEnter,
            CollisionEventKind::CollisionStay,
            CollisionEventKind::CollisionExit,
            CollisionEventKind::TriggerEnter,
            CollisionEventKind::TriggerStay,
            CollisionEventKind::TriggerExit,
        ] {
            let counts = Rc::clone(&counts);
            events.register_handler(
                kind,
                Box::new(move |event: &CollisionEvent| {
                    *counts.borrow_mut().entry(event.kind).or_insert(0) += 1;
                    match event.kind {
                        CollisionEventKind::CollisionStay | CollisionEventKind::TriggerStay => log::debug!("{}", event),
                        _ => log::info!("{}", event),
                    }
                    true
                }),
            );
        }

        let half_extent = manager.settings().grid_size * 0.5;
        Self {
            world: World::new(),
            manager,
            events,
            counts,
            ships: Vec::new(),
            half_extent,
        }
    }

    fn populate(&mut self) {
        let mut rng = rand::thread_rng();
        let bounds = self.half_extent * 0.9;

        for i in 0..NUM_ASTEROIDS {
            let entity = self.world.create_entity();
            let size = rng.gen_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE);
            let position = Vec2::new(rng.gen_range(-bounds.x..bounds.x), rng.gen_range(-bounds.y..bounds.y));
            self.world.add_component(entity, EntityDescriptor::new(format!("Asteroid {i}")));
            self.world
                .add_component(entity, Transform::from_position_scale(position, Vec2::new(size, size)));
            self.world
                .add_component(entity, Collider::boxed().with_layer(ASTEROID_LAYER));
            self.world.add_component(entity, RigidBody::fixed());
        }

        for i in 0..NUM_SHIPS {
            let entity = self.world.create_entity();
            let position = Vec2::new(rng.gen_range(-bounds.x..bounds.x), rng.gen_range(-bounds.y..bounds.y));
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            let velocity = Vec2::new(heading.cos(), heading.sin()) * SHIP_SPEED;
            self.world.add_component(entity, EntityDescriptor::new(format!("Ship {i}")));
            self.world
                .add_component(entity, Transform::from_position_scale(position, Vec2::new(SHIP_SIZE, SHIP_SIZE)));
            self.world
                .add_component(entity, Collider::circle().with_layer(SHIP_LAYER));
            self.world
                .add_component(entity, RigidBody::dynamic(rng.gen_range(1.0..5.0)).with_velocity(velocity));
            self.ships.push(entity);
        }

        let zone = self.world.create_entity();
        self.world.add_component(zone, EntityDescriptor::new("Trigger Zone"));
        self.world.add_component(
            zone,
            Transform::from_position_scale(Vec2::zeros(), Vec2::new(TRIGGER_ZONE_SIZE, TRIGGER_ZONE_SIZE)),
        );
        self.world
            .add_component(zone, Collider::boxed().with_layer(ZONE_LAYER).as_trigger());

        log::info!(
            "Spawned {} ships, {} asteroids and a trigger zone",
            NUM_SHIPS,
            NUM_ASTEROIDS
        );
    }

    /// Move ships by their velocity and bounce them off the world edges
    fn integrate(&mut self, delta_time: f32) {
        for &ship in &self.ships {
            let Some(velocity) = self.world.get_component::<RigidBody>(ship).map(|body| body.velocity) else {
                continue;
            };
            let Some(transform) = self.world.get_component_mut::<Transform>(ship) else {
                continue;
            };
            transform.position += velocity * delta_time;

            let mut bounced = velocity;
            if transform.position.x.abs() > self.half_extent.x {
                transform.position.x = transform.position.x.clamp(-self.half_extent.x, self.half_extent.x);
                bounced.x = -bounced.x;
            }
            if transform.position.y.abs() > self.half_extent.y {
                transform.position.y = transform.position.y.clamp(-self.half_extent.y, self.half_extent.y);
                bounced.y = -bounced.y;
            }
            if let Some(body) = self.world.get_component_mut::<RigidBody>(ship) {
                body.velocity = bounced;
            }
        }
    }

    fn run(&mut self, frames: usize) {
        for frame in 0..frames {
            // Exercise the brute-force path and the paused editor mode for a while
            if frame == frames / 3 {
                log::info!("Frame {}: disabling spatial grid", frame);
                self.manager.set_grid_active(false);
            } else if frame == frames / 2 {
                log::info!("Frame {}: enabling spatial grid, pausing simulation", frame);
                self.manager.set_grid_active(true);
                self.manager.set_simulation_running(false);
            } else if frame == frames / 2 + 30 {
                log::info!("Frame {}: resuming simulation", frame);
                self.manager.set_simulation_running(true);
            }

            if self.manager.settings().simulation_running {
                self.integrate(FRAME_TIME);
            }
            self.manager.update(&mut self.world, &mut self.events);
            self.events.dispatch();
        }
    }

    fn report(&self) {
        let counts = self.counts.borrow();
        let mut kinds: Vec<_> = counts.iter().collect();
        kinds.sort_by_key(|(kind, _)| kind.to_string());
        for (kind, count) in kinds {
            log::info!("{:>15}: {}", kind.to_string(), count);
        }
        log::info!("{} pairs still touching", self.manager.pair_tracker().len());
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let frames = args
        .next()
        .and_then(|frames| frames.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    log::info!("=== Headless Collision Demo ===");
    let config = CollisionConfig::load_or_default(&config_path);
    let mut demo = CollisionDemo::new(&config);
    demo.populate();
    demo.run(frames);
    demo.report();

    if let Err(e) = demo.manager.save_config(&config_path) {
        log::error!("Failed to save collision config: {}", e);
    }
}
