//! Headless world: food, sensing queries, and the per-tick update loop.
//!
//! The world is deliberately thin - no physics, no rendering. It integrates
//! creature movement from plain position data, answers "what can this
//! creature sense" via k-d tree lookups, and resolves food consumption.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};
use ndarray::Array1;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::creature::{Creature, EntityKind, SensedEntity};
use super::params::Params;

/// A food item creatures can consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Position in the world plane.
    pub pos: Array1<f32>,
    /// Energy granted when consumed.
    pub energy: f32,
}

impl Food {
    /// Spawns a food item at a random position.
    pub fn new_random(params: &Params, rng: &mut impl Rng) -> Self {
        Self {
            pos: Array1::from_vec(vec![
                rng.random_range(0.0..params.world_extent),
                rng.random_range(0.0..params.world_extent),
            ]),
            energy: params.food_energy,
        }
    }
}

/// The world creatures act in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Food currently on the ground.
    pub food: Vec<Food>,
}

type Tree2D = KdTree<f32, usize, Vec<f32>>;

fn build_tree<T>(items: &[T], get_pos: impl Fn(&T) -> Vec<f32>) -> Result<Tree2D, KdTreeError> {
    let mut tree = KdTree::with_capacity(2, items.len().max(1));
    for (i, item) in items.iter().enumerate() {
        tree.add(get_pos(item), i)?;
    }
    Ok(tree)
}

/// Snapshot of a creature another creature may sense. Only public spatial
/// data crosses this boundary - never another brain's neuron state.
#[derive(Debug, Clone)]
struct CreatureSnapshot {
    id: usize,
    pos: Array1<f32>,
    size: f32,
    alive: bool,
}

impl World {
    /// Creates a world with the configured amount of food.
    pub fn new(params: &Params) -> Self {
        let mut rng = rand::rng();
        let food = (0..params.food_count)
            .map(|_| Food::new_random(params, &mut rng))
            .collect();
        Self { food }
    }

    /// Advances the world by one tick.
    ///
    /// Creature updates fan out in parallel against read-only snapshots;
    /// consumption and respawn run sequentially afterwards so no two
    /// creatures race for the same food item.
    pub fn step(&mut self, creatures: &mut [Creature], params: &Params, dt: f32) {
        let food_tree =
            build_tree(&self.food, |f| f.pos.to_vec()).expect("Failed to build food kd-tree");
        let snapshots: Vec<CreatureSnapshot> = creatures
            .iter()
            .map(|c| CreatureSnapshot {
                id: c.id,
                pos: c.pos.clone(),
                size: c.size,
                alive: c.alive,
            })
            .collect();
        let creature_tree = build_tree(&snapshots, |s| s.pos.to_vec())
            .expect("Failed to build creature kd-tree");

        let food = &self.food;
        creatures.par_iter_mut().for_each(|creature| {
            if !creature.alive {
                return;
            }
            let view = sense_surroundings(
                creature,
                food,
                &food_tree,
                &snapshots,
                &creature_tree,
            );
            let reach: Vec<bool> = creature
                .mouths
                .iter()
                .map(|mouth| {
                    food_within(&food_tree, &creature.pos, mouth.descriptor.reach).count() > 0
                })
                .collect();
            creature.tick(&view, &reach, params, dt);
        });

        self.resolve_consumption(creatures);
        self.respawn_food(params);
    }

    /// Sequential consumption pass: gates were set by the parallel phase;
    /// each open gate eats the nearest food still on the ground.
    fn resolve_consumption(&mut self, creatures: &mut [Creature]) {
        let mut eaten = vec![false; self.food.len()];
        for creature in creatures.iter_mut() {
            if !creature.alive {
                continue;
            }
            for slot in 0..creature.mouths.len() {
                if !creature.mouth_gate_open(slot) {
                    continue;
                }
                let reach = creature.mouths[slot].descriptor.reach;
                let target = self
                    .food
                    .iter()
                    .enumerate()
                    .filter(|(i, food)| {
                        !eaten[*i] && distance(&food.pos, &creature.pos) <= reach
                    })
                    .min_by(|(_, a), (_, b)| {
                        distance(&a.pos, &creature.pos).total_cmp(&distance(&b.pos, &creature.pos))
                    })
                    .map(|(i, _)| i);
                if let Some(i) = target {
                    eaten[i] = true;
                    creature.consume(self.food[i].energy);
                }
            }
        }
        let mut keep = eaten.iter().map(|e| !e);
        self.food.retain(|_| keep.next().unwrap_or(true));
    }

    /// Tops the food supply back up to the configured count.
    fn respawn_food(&mut self, params: &Params) {
        let mut rng = rand::rng();
        while self.food.len() < params.food_count {
            self.food.push(Food::new_random(params, &mut rng));
        }
    }
}

fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Signed bearing from the creature's heading to a point, in degrees.
fn bearing_degrees(creature: &Creature, target: &Array1<f32>) -> f32 {
    let dx = target[0] - creature.pos[0];
    let dy = target[1] - creature.pos[1];
    let mut angle = dy.atan2(dx) - creature.heading;
    // Normalize into (-pi, pi] so left/right stays symmetric.
    while angle > std::f32::consts::PI {
        angle -= std::f32::consts::TAU;
    }
    while angle <= -std::f32::consts::PI {
        angle += std::f32::consts::TAU;
    }
    angle.to_degrees()
}

fn food_within<'a>(
    tree: &'a Tree2D,
    pos: &Array1<f32>,
    radius: f32,
) -> impl Iterator<Item = usize> + 'a {
    tree.within(&pos.to_vec(), radius.powi(2), &squared_euclidean)
        .unwrap_or_default()
        .into_iter()
        .map(|(_, &i)| i)
}

/// Collects everything within the creature's widest sensing radius,
/// expressed relative to the creature.
fn sense_surroundings(
    creature: &Creature,
    food: &[Food],
    food_tree: &Tree2D,
    snapshots: &[CreatureSnapshot],
    creature_tree: &Tree2D,
) -> Vec<SensedEntity> {
    let range = creature
        .eyes
        .iter()
        .map(|e| e.descriptor.view_distance)
        .fold(0.0_f32, f32::max);
    if range <= 0.0 {
        return Vec::new();
    }

    let mut view = Vec::new();
    for i in food_within(food_tree, &creature.pos, range) {
        let item = &food[i];
        view.push(SensedEntity {
            kind: EntityKind::Food,
            bearing_degrees: bearing_degrees(creature, &item.pos),
            distance: distance(&item.pos, &creature.pos),
            size: 1.0,
        });
    }
    for i in food_within(creature_tree, &creature.pos, range) {
        let other = &snapshots[i];
        if other.id == creature.id || !other.alive {
            continue;
        }
        view.push(SensedEntity {
            kind: EntityKind::Creature,
            bearing_degrees: bearing_degrees(creature, &other.pos),
            distance: distance(&other.pos, &creature.pos),
            size: other.size,
        });
    }
    view
}
