//! Obstacles: spawned on a speed-scaled timer, scrolled left, and knocked
//! off screen when destroyed by an attacking player

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::{Bounded, Rect};
use crate::tuning::{GameTuning, ObstacleTuning};

/// Slack for the spawn timer, so 90 ticks of 1000/60 ms reach 1500 ms
const SPAWN_EPSILON_MS: f32 = 1e-3;

/// Knock-off animation state of a destroyed obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destruction {
    /// Radians
    pub rotation: f32,
    /// Radians per tick
    pub spin: f32,
    /// Pixels per tick
    pub vel: Vec2,
    pub alpha: f32,
    pub elapsed_ms: f32,
    pub duration_ms: f32,
}

impl Destruction {
    fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub destruction: Option<Destruction>,
}

impl Obstacle {
    pub fn is_destroyed(&self) -> bool {
        self.destruction.is_some()
    }

    /// Draw opacity
    pub fn alpha(&self) -> f32 {
        self.destruction.map_or(1.0, |d| d.alpha)
    }

    pub fn rotation(&self) -> f32 {
        self.destruction.map_or(0.0, |d| d.rotation)
    }

    fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

impl Bounded for Obstacle {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn is_active(&self) -> bool {
        !self.is_destroyed()
    }
}

#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    destroyed: Vec<Obstacle>,
    timer_ms: f32,
    next_id: u32,
    tuning: ObstacleTuning,
    spawn_x: f32,
    ground_top: f32,
}

impl ObstacleManager {
    pub fn new(tuning: &ObstacleTuning, game: &GameTuning) -> Self {
        assert!(tuning.min_width <= tuning.max_width, "obstacle width bounds inverted");
        assert!(tuning.min_height <= tuning.max_height, "obstacle height bounds inverted");
        assert!(tuning.spawn_interval_ms > 0.0, "spawn interval must be positive");
        Self {
            obstacles: Vec::new(),
            destroyed: Vec::new(),
            timer_ms: 0.0,
            next_id: 1,
            tuning: tuning.clone(),
            spawn_x: game.canvas_width,
            ground_top: game.ground_top(),
        }
    }

    /// Live obstacles, oldest first
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Obstacles playing their destruction animation
    pub fn destroyed(&self) -> &[Obstacle] {
        &self.destroyed
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.destroyed.clear();
        self.timer_ms = 0.0;
    }

    pub fn update(&mut self, dt_ms: f32, game_speed: f32, rng: &mut impl Rng) {
        self.timer_ms += dt_ms;
        let interval = self.tuning.spawn_interval_ms / game_speed.max(f32::EPSILON);
        if self.timer_ms + SPAWN_EPSILON_MS >= interval {
            self.spawn(rng);
            self.timer_ms = 0.0;
        }

        let scroll = self.tuning.base_speed * game_speed;
        for o in &mut self.obstacles {
            o.pos.x -= scroll;
        }

        let gravity = self.tuning.destroy_gravity;
        for o in &mut self.destroyed {
            if let Some(d) = o.destruction.as_mut() {
                d.elapsed_ms += dt_ms;
                d.rotation += d.spin;
                d.vel.y += gravity;
                d.alpha = (1.0 - d.elapsed_ms / d.duration_ms).max(0.0);
                o.pos += d.vel;
            }
        }

        self.obstacles.retain(|o| !o.is_off_screen());
        self.destroyed.retain(|o| {
            !o.is_off_screen() && o.destruction.is_some_and(|d| !d.is_finished())
        });
    }

    fn spawn(&mut self, rng: &mut impl Rng) {
        let t = &self.tuning;
        let width = rng.random_range(t.min_width..=t.max_width);
        let height = rng.random_range(t.min_height..=t.max_height);
        let obstacle = Obstacle {
            id: self.next_id,
            pos: Vec2::new(self.spawn_x, self.ground_top - height),
            size: Vec2::new(width, height),
            destruction: None,
        };
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!("Spawned obstacle {} ({width:.0}x{height:.0})", obstacle.id);
        self.obstacles.push(obstacle);
    }

    /// Move a live obstacle into the destruction animation. Faster games
    /// kick harder, spin faster and fade sooner.
    pub fn destroy_obstacle(&mut self, id: u32, game_speed: f32) -> bool {
        let Some(index) = self.obstacles.iter().position(|o| o.id == id) else {
            return false;
        };
        let mut obstacle = self.obstacles.remove(index);
        let t = &self.tuning;
        let factor = game_speed.max(1.0);
        obstacle.destruction = Some(Destruction {
            rotation: 0.0,
            spin: t.destroy_spin * factor,
            vel: Vec2::new(
                -t.base_speed * t.destroy_drift_factor * factor,
                -t.destroy_launch_speed * factor,
            ),
            alpha: 1.0,
            elapsed_ms: 0.0,
            duration_ms: (t.destroy_duration_ms / factor).max(t.destroy_min_duration_ms),
        });
        log::debug!("Destroyed obstacle {id}");
        self.destroyed.push(obstacle);
        true
    }

    /// First live obstacle overlapping `hitbox`
    pub fn check_collision(&self, hitbox: &Rect) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.hitbox().overlaps(hitbox))
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, pos: Vec2, size: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            pos,
            size,
            destruction: None,
        });
        id
    }
}
