//! Collision queries
//!
//! Pure functions over anything [`Bounded`]; the only state consulted is the
//! entities' own hitboxes and active flags.

use super::obstacle::{Obstacle, ObstacleManager};
use super::player::Player;
use super::rect::{Bounded, overlaps};

/// First live obstacle touching the player's hitbox
pub fn player_vs_obstacles<'a>(player: &Player, obstacles: &'a ObstacleManager) -> Option<&'a Obstacle> {
    if !player.is_active() {
        return None;
    }
    obstacles.check_collision(&player.hitbox())
}

/// Hitbox overlap between two active entities
pub fn check<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> bool {
    a.is_active() && b.is_active() && overlaps(&a.hitbox(), &b.hitbox())
}

/// Every entity in `others` whose hitbox overlaps `entity`'s.
/// `entity` itself is skipped if it appears in the list.
pub fn check_against_many<'a, A, B>(entity: &A, others: &'a [B]) -> Vec<&'a B>
where
    A: Bounded,
    B: Bounded,
{
    others
        .iter()
        .filter(|o| !std::ptr::eq(*o as *const B as *const (), entity as *const A as *const ()))
        .filter(|o| check(entity, *o))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::consts::{CANVAS_HEIGHT, GROUND_HEIGHT};
    use crate::sim::rect::Rect;
    use crate::tuning::{GameTuning, ObstacleTuning, PlayerTuning};

    #[test]
    fn test_pairwise_uses_hitboxes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!check(&a, &Rect::new(20.0, 0.0, 10.0, 10.0)));
        assert!(check(&a, &Rect::new(9.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_one_vs_many_skips_self() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Rect::new(50.0, 50.0, 10.0, 10.0),
        ];
        let hits = check_against_many(&rects[0], &rects);
        assert_eq!(hits, vec![&rects[1]]);

        let outsider = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(check_against_many(&outsider, &rects).len(), 2);
    }

    #[test]
    fn test_player_hits_obstacle_inside_hitbox_only() {
        let game = GameTuning::default();
        let player = Player::new(&PlayerTuning::default(), CANVAS_HEIGHT - GROUND_HEIGHT);
        let mut obstacles = ObstacleManager::new(&ObstacleTuning::default(), &game);
        assert!(player_vs_obstacles(&player, &obstacles).is_none());

        // Short enough to overlap the sprite but pass under the hitbox
        let low = obstacles.push(Vec2::new(100.0, game.ground_top() - 30.0), Vec2::new(40.0, 30.0));
        assert!(obstacles.obstacles()[0].bounds().overlaps(&player.bounds()));
        assert!(player_vs_obstacles(&player, &obstacles).is_none());

        let tall = obstacles.push(Vec2::new(300.0, game.ground_top() - 80.0), Vec2::new(40.0, 80.0));
        let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(5);
        let mut hit = None;
        for _ in 0..60 {
            obstacles.update(1.0, 1.0, &mut rng);
            if let Some(o) = player_vs_obstacles(&player, &obstacles) {
                hit = Some(o.id);
                break;
            }
        }
        assert_eq!(hit, Some(tall));
        assert_ne!(hit, Some(low));
    }

    #[test]
    fn test_dead_player_collides_with_nothing() {
        let game = GameTuning::default();
        let mut player = Player::new(&PlayerTuning::default(), game.ground_top());
        player.kill();
        let obstacles = ObstacleManager::new(&ObstacleTuning::default(), &game);
        assert!(player_vs_obstacles(&player, &obstacles).is_none());
    }
}
