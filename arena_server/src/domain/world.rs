// The simulated arena: ships, projectiles and the id counter, advanced one tick at a time.

use crate::domain::state::{Entity, PlayerInput, Ship};
use crate::domain::systems::{collision, kinematics, ship_control};
use crate::domain::tuning::Tuning;
use rand::Rng;
use std::collections::BTreeMap;

pub struct World {
    tuning: Tuning,
    // Keyed by player id; the ordered map gives a stable per-tick iteration order.
    ships: BTreeMap<u64, Ship>,
    projectiles: Vec<Entity>,
    next_id: u64,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            ships: BTreeMap::new(),
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Allocates the next player id and places a resting ship uniformly inside the
    /// region where it fits without touching a wall.
    pub fn spawn_player<R: Rng>(&mut self, rng: &mut R) -> u64 {
        let r = self.tuning.player.radius;
        let x = rng.random_range(r..=self.tuning.arena.width - r);
        let y = rng.random_range(r..=self.tuning.arena.height - r);
        self.insert_player_at(x, y)
    }

    /// Places a ship at an explicit position. Ids are still allocated from the counter.
    pub fn insert_player_at(&mut self, x: f32, y: f32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.ships.insert(
            id,
            Ship {
                body: Entity::player(id, x, y, self.tuning.player.radius),
                input: PlayerInput::default(),
            },
        );
        id
    }

    /// Removes a ship. Its projectiles stay in flight. Returns false if it was absent.
    pub fn remove_player(&mut self, id: u64) -> bool {
        self.ships.remove(&id).is_some()
    }

    /// Replaces the held keys for a ship. Returns false if the ship is gone.
    pub fn set_input(&mut self, id: u64, input: PlayerInput) -> bool {
        match self.ships.get_mut(&id) {
            Some(ship) => {
                ship.input = input;
                true
            }
            None => false,
        }
    }

    pub fn player(&self, id: u64) -> Option<&Entity> {
        self.ships.get(&id).map(|ship| &ship.body)
    }

    pub fn player_mut(&mut self, id: u64) -> Option<&mut Entity> {
        self.ships.get_mut(&id).map(|ship| &mut ship.body)
    }

    pub fn player_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.ships.keys().copied()
    }

    pub fn player_count(&self) -> usize {
        self.ships.len()
    }

    pub fn projectiles(&self) -> &[Entity] {
        &self.projectiles
    }

    /// Advances the world by `dt` seconds. Returns the number of collision contacts.
    pub fn step(&mut self, dt: f32) -> usize {
        let arena = self.tuning.arena;
        let player_tuning = self.tuning.player;
        let projectile_tuning = self.tuning.projectile;

        // Projectiles fly first, then leave once fully outside the field.
        for p in &mut self.projectiles {
            kinematics::integrate_linear(p, arena.friction, dt);
        }
        self.projectiles
            .retain(|p| !kinematics::is_out_of_field(p, &arena));

        for (&id, ship) in &mut self.ships {
            let body = &mut ship.body;
            ship_control::steer(body, &ship.input, &player_tuning, dt);
            if ship.input.thrust {
                ship_control::thrust(body, &player_tuning, dt);
            }
            if ship.input.fire {
                let projectile = ship_control::fire(body, id, &projectile_tuning);
                self.projectiles.push(projectile);
            }
            kinematics::integrate_linear(body, arena.friction, dt);
            kinematics::bounce_off_walls(body, &arena);
        }

        let contacts = {
            let mut bodies: Vec<&mut Entity> = self
                .projectiles
                .iter_mut()
                .chain(self.ships.values_mut().map(|ship| &mut ship.body))
                .collect();
            collision::resolve_all(&mut bodies, arena.restitution)
        };

        // Separation can push a ship through a wall; snap it back so ships never leave.
        if contacts > 0 {
            for ship in self.ships.values_mut() {
                kinematics::bounce_off_walls(&mut ship.body, &arena);
            }
        }

        contacts
    }

    /// Every visible body for this tick: projectiles first, then ships.
    pub fn entities(&self) -> Vec<Entity> {
        self.projectiles
            .iter()
            .cloned()
            .chain(self.ships.values().map(|ship| ship.body.clone()))
            .collect()
    }
}
