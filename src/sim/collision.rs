//! Axis-aligned collision tests
//!
//! Every overlap in the game goes through [`overlap`]. The composed rules
//! below decide which obstacles matter for a given player sub-state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::scenery::Pumpkin;

/// Above this line the horde stays solid even for a jumping player
pub const HORDE_BARRIER_Y: f32 = 20.0;

/// Axis-aligned box in logical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn at(pos: Vec2, w: f32, h: f32) -> Self {
        Self::new(pos.x, pos.y, w, h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlap(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }
}

/// Strict box overlap; touching edges do not count
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn overlap(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Whether enemies are considered at all for a box, given the jump state.
/// Mid-jump only the top band is checked so the horde keeps its hold.
#[inline]
pub fn enemies_in_reach(player: &Aabb, jumping: bool) -> bool {
    !jumping || player.y < HORDE_BARRIER_Y
}

/// First pumpkin overlapping `player`
pub fn pumpkin_hit<'a>(player: &Aabb, pumpkins: &'a mut [Pumpkin]) -> Option<&'a mut Pumpkin> {
    pumpkins.iter_mut().find(|p| p.hitbox().overlaps(player))
}

/// Index of the first enemy overlapping `box_`, attacking or not
pub fn enemy_hit(box_: &Aabb, enemies: &[Enemy]) -> Option<usize> {
    enemies.iter().position(|e| e.hitbox().overlaps(box_))
}

/// Movement gate for a candidate player box.
///
/// Grounded players are stopped by unsmashed pumpkins. Only horde enemies
/// block; attackers are resolved as damage instead.
pub fn blocks_movement(
    candidate: &Aabb,
    jumping: bool,
    pumpkins: &[Pumpkin],
    enemies: &[Enemy],
) -> bool {
    if !jumping
        && pumpkins
            .iter()
            .any(|p| !p.is_smashed && p.hitbox().overlaps(candidate))
    {
        return true;
    }

    if !enemies_in_reach(candidate, jumping) {
        return false;
    }

    enemies
        .iter()
        .filter(|e| !e.is_attacking())
        .any(|e| e.hitbox().overlaps(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::anim::Facing;

    fn player_box(x: f32, y: f32) -> Aabb {
        Aabb::new(x, y, 6.0, 6.0)
    }

    #[test]
    fn test_overlap_edges_do_not_touch() {
        let a = Aabb::new(0.0, 0.0, 4.0, 4.0);
        assert!(a.overlaps(&Aabb::new(3.9, 3.9, 4.0, 4.0)));
        assert!(!a.overlaps(&Aabb::new(4.0, 0.0, 4.0, 4.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, -4.0, 4.0, 4.0)));
    }

    #[test]
    fn test_horde_blocks_attackers_do_not() {
        let horde = Enemy::new(Vec2::new(50.0, 50.0), EnemyKind::HordeZombie, Facing::Left, 0.0);
        let attacker =
            Enemy::new(Vec2::new(50.0, 50.0), EnemyKind::AttackingZombie, Facing::Left, 0.0);
        let b = player_box(52.0, 52.0);

        assert!(blocks_movement(&b, false, &[], &[horde]));
        assert!(!blocks_movement(&b, false, &[], &[attacker.clone()]));
        // Still registers for damage
        assert_eq!(enemy_hit(&b, &[attacker]), Some(0));
    }

    #[test]
    fn test_jump_bypass_except_near_top() {
        let low = Enemy::new(Vec2::new(50.0, 50.0), EnemyKind::HordeZombie, Facing::Left, 0.0);
        assert!(!blocks_movement(&player_box(52.0, 52.0), true, &[], &[low]));

        let high = Enemy::new(Vec2::new(50.0, 10.0), EnemyKind::HordeZombie, Facing::Left, 0.0);
        assert!(blocks_movement(&player_box(52.0, 12.0), true, &[], &[high]));
    }

    #[test]
    fn test_pumpkins_ignored_mid_jump() {
        let mut pumpkin = Pumpkin::new(Vec2::new(50.0, 50.0));
        let b = player_box(52.0, 52.0);
        assert!(blocks_movement(&b, false, std::slice::from_ref(&pumpkin), &[]));
        assert!(!blocks_movement(&b, true, std::slice::from_ref(&pumpkin), &[]));
        pumpkin.smash();
        assert!(!blocks_movement(&b, false, &[pumpkin], &[]));
    }
}
