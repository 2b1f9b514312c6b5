//! Collision sweeps between entity collections
//!
//! Sweeps only read. They return the indices that were hit so the caller
//! can apply consequences after every test for the frame is done, and
//! remove entries from the back so earlier indices stay valid.

use super::hitbox::HasHitBox;

/// Everything the player's shots hit this frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectileHits {
    /// Shots to retire
    pub projectiles: Vec<usize>,
    /// Asteroids that were shot
    pub asteroids: Vec<usize>,
    /// Enemies that were shot
    pub enemies: Vec<usize>,
}

impl ProjectileHits {
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

/// Test every shot against asteroids, then enemies.
///
/// A shot resolves at most one hit per frame. Asteroids are checked first
/// and an enemy is only considered when no asteroid was hit. A target
/// already claimed by an earlier shot this frame is skipped, so two shots
/// can't both be credited for the same kill.
pub fn sweep_projectiles<P, A, E>(
    projectiles: &[P],
    asteroids: &[A],
    enemies: &[E],
) -> ProjectileHits
where
    P: HasHitBox,
    A: HasHitBox,
    E: HasHitBox,
{
    let mut hits = ProjectileHits::default();

    for (pi, shot) in projectiles.iter().enumerate() {
        let asteroid = asteroids
            .iter()
            .enumerate()
            .find(|(ai, a)| !hits.asteroids.contains(ai) && shot.collides_with(*a))
            .map(|(ai, _)| ai);
        if let Some(ai) = asteroid {
            hits.projectiles.push(pi);
            hits.asteroids.push(ai);
            continue;
        }

        let enemy = enemies
            .iter()
            .enumerate()
            .find(|(ei, e)| !hits.enemies.contains(ei) && shot.collides_with(*e))
            .map(|(ei, _)| ei);
        if let Some(ei) = enemy {
            hits.projectiles.push(pi);
            hits.enemies.push(ei);
        }
    }

    hits
}

/// What touched the player this frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerContacts {
    pub asteroids: Vec<usize>,
    pub enemy_projectiles: Vec<usize>,
}

impl PlayerContacts {
    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty() && self.enemy_projectiles.is_empty()
    }
}

/// Test the player against every asteroid and enemy shot
pub fn sweep_player<S, A, P>(
    player: &S,
    asteroids: &[A],
    enemy_projectiles: &[P],
) -> PlayerContacts
where
    S: HasHitBox,
    A: HasHitBox,
    P: HasHitBox,
{
    PlayerContacts {
        asteroids: contacts(player, asteroids),
        enemy_projectiles: contacts(player, enemy_projectiles),
    }
}

fn contacts<S: HasHitBox, T: HasHitBox>(subject: &S, items: &[T]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| subject.collides_with(*item))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hitbox::HitBox;
    use glam::Vec2;

    fn boxed(x: f32, y: f32) -> HitBox {
        HitBox::new(Vec2::splat(20.0), 1.0, Vec2::new(x, y))
    }

    #[test]
    fn test_one_hit_per_shot_asteroids_first() {
        let shots = [boxed(100.0, 100.0)];
        let asteroids = [boxed(105.0, 100.0)];
        let enemies = [boxed(100.0, 105.0)];
        let hits = sweep_projectiles(&shots, &asteroids, &enemies);
        assert_eq!(hits.projectiles, vec![0]);
        assert_eq!(hits.asteroids, vec![0]);
        assert!(hits.enemies.is_empty());
    }

    #[test]
    fn test_shot_falls_through_to_enemy() {
        let shots = [boxed(100.0, 100.0)];
        let asteroids = [boxed(500.0, 500.0)];
        let enemies = [boxed(300.0, 300.0), boxed(100.0, 110.0)];
        let hits = sweep_projectiles(&shots, &asteroids, &enemies);
        assert_eq!(hits.enemies, vec![1]);
    }

    #[test]
    fn test_targets_claimed_once() {
        // Two shots on the same rock: only the first scores, the second
        // stays live
        let shots = [boxed(100.0, 100.0), boxed(102.0, 100.0)];
        let asteroids = [boxed(101.0, 100.0)];
        let hits = sweep_projectiles::<_, _, HitBox>(&shots, &asteroids, &[]);
        assert_eq!(hits.projectiles, vec![0]);
        assert_eq!(hits.asteroids, vec![0]);
    }

    #[test]
    fn test_player_contacts() {
        let player = boxed(400.0, 400.0);
        let asteroids = [boxed(0.0, 0.0), boxed(410.0, 400.0), boxed(400.0, 390.0)];
        let bolts = [boxed(405.0, 405.0)];
        let contacts = sweep_player(&player, &asteroids, &bolts);
        assert_eq!(contacts.asteroids, vec![1, 2]);
        assert_eq!(contacts.enemy_projectiles, vec![0]);
        assert!(!contacts.is_empty());

        let clear = sweep_player::<_, HitBox, HitBox>(&player, &[], &[]);
        assert!(clear.is_empty());
    }
}
