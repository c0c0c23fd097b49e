//! Player, invader and projectile entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::tick::TickInput;
use crate::consts::*;

/// Who fired a projectile. Selects the collision pass it takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Invader,
}

/// A projectile travelling straight up or down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative = upward)
    pub vy: f32,
    owner: Owner,
    /// Cleared on impact or when leaving the field; pruned by end of tick
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vy: f32, owner: Owner) -> Self {
        Self {
            pos,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            vy,
            owner,
            active: true,
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Advance vertically; deactivate once outside the extended field
    pub fn update(&mut self, dt: f32, screen_height: f32) {
        self.pos.y += self.vy * dt;
        if self.pos.y < -PROJECTILE_BOUNDS_MARGIN
            || self.pos.y > screen_height + PROJECTILE_BOUNDS_MARGIN
        {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (units/sec)
    pub speed: f32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
}

impl Player {
    /// Spawn centred near the bottom of the field
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(
                (screen_width - size.x) / 2.0,
                screen_height - size.y - PLAYER_BOTTOM_GAP,
            ),
            size,
            speed: PLAYER_SPEED,
            cooldown: 0.0,
        }
    }

    /// Move, recharge and maybe fire. Returns the projectile fired this tick.
    pub fn update(&mut self, dt: f32, input: &TickInput, screen_width: f32) -> Option<Projectile> {
        if input.left {
            self.pos.x -= self.speed * dt;
        }
        if input.right {
            self.pos.x += self.speed * dt;
        }
        self.pos.x = self.pos.x.clamp(0.0, (screen_width - self.size.x).max(0.0));

        self.cooldown = (self.cooldown - dt).max(0.0);
        if input.shoot && self.cooldown <= 0.0 {
            self.cooldown = PLAYER_SHOOT_COOLDOWN;
            let origin = Vec2::new(
                self.pos.x + self.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
                self.pos.y - PLAYER_PROJECTILE_OFFSET,
            );
            return Some(Projectile::new(origin, PLAYER_PROJECTILE_SPEED, Owner::Player));
        }
        None
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// One formation slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Invader {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(INVADER_WIDTH, INVADER_HEIGHT),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(left: bool, right: bool, shoot: bool) -> TickInput {
        TickInput { left, right, shoot }
    }

    #[test]
    fn test_player_spawn_position() {
        let player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        assert_eq!(player.pos.x, (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0);
        assert_eq!(player.pos.y, SCREEN_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_GAP);
    }

    #[test]
    fn test_player_left_clamps_at_zero() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        player.pos.x = 0.0;
        player.update(0.1, &held(true, false, false), SCREEN_WIDTH);
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_player_right_clamps_at_wall() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        player.pos.x = SCREEN_WIDTH - PLAYER_WIDTH - 1.0;
        player.update(0.1, &held(false, true, false), SCREEN_WIDTH);
        assert_eq!(player.pos.x, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_player_moves_by_speed_dt() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let start = player.pos.x;
        player.update(0.1, &held(true, false, false), SCREEN_WIDTH);
        assert!((player.pos.x - (start - 28.0)).abs() < 1e-4);
    }

    #[test]
    fn test_player_shot_and_cooldown() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let shot = player.update(0.016, &held(false, false, true), SCREEN_WIDTH).unwrap();
        assert_eq!(shot.owner(), Owner::Player);
        assert!(shot.vy < 0.0);
        assert_eq!(shot.pos.x, player.pos.x + PLAYER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0);
        assert_eq!(shot.pos.y, player.pos.y - PLAYER_PROJECTILE_OFFSET);
        assert_eq!(player.cooldown, PLAYER_SHOOT_COOLDOWN);

        // Still cooling down
        assert!(player.update(0.1, &held(false, false, true), SCREEN_WIDTH).is_none());
        assert!(player.update(0.1, &held(false, false, true), SCREEN_WIDTH).is_none());
        assert!(player.update(0.11, &held(false, false, true), SCREEN_WIDTH).is_some());
    }

    #[test]
    fn test_cooldown_floors_at_zero() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        player.update(1.0, &TickInput::default(), SCREEN_WIDTH);
        assert_eq!(player.cooldown, 0.0);
    }

    #[test]
    fn test_projectile_deactivates_past_margin() {
        let mut shot = Projectile::new(Vec2::new(10.0, -15.0), -320.0, Owner::Player);
        shot.update(0.01, SCREEN_HEIGHT);
        // y = -18.2, still within the margin
        assert!(shot.active);
        shot.update(0.01, SCREEN_HEIGHT);
        assert!(!shot.active);

        let mut shot = Projectile::new(Vec2::new(10.0, SCREEN_HEIGHT + 19.0), 200.0, Owner::Invader);
        shot.update(0.01, SCREEN_HEIGHT);
        assert!(!shot.active);
    }

    #[test]
    fn test_projectile_zero_dt_is_noop() {
        let mut shot = Projectile::new(Vec2::new(10.0, 100.0), 200.0, Owner::Invader);
        shot.update(0.0, SCREEN_HEIGHT);
        assert_eq!(shot.pos.y, 100.0);
        assert!(shot.active);
    }
}
