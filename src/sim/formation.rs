//! Invader formation: shared horizontal sweep, edge flips and random fire

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Invader, Owner, Projectile};
use crate::consts::*;

/// What happened to the formation during one update
#[derive(Debug, Clone, Default)]
pub struct FormationReport {
    /// Projectile fired by a random invader this tick
    pub shot: Option<Projectile>,
    /// An alive invader's bottom edge reached the loss line
    pub reached_player: bool,
    /// Direction flipped (and the formation dropped) this tick
    pub flipped: bool,
}

/// The full invader grid, dead slots included, moving as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvaderFormation {
    /// Row-major slots. Never resized; dead invaders keep their slot.
    pub invaders: Vec<Invader>,
    /// +1 = rightward, -1 = leftward
    pub direction: f32,
    /// Horizontal speed (units/sec)
    pub speed: f32,
    /// Vertical drop applied on every flip
    pub drop_step: f32,
    /// Number of direction flips so far
    pub flips: u32,
    screen_width: f32,
}

impl InvaderFormation {
    /// Build the standard grid for a field of the given width
    pub fn new(screen_width: f32) -> Self {
        let mut invaders = Vec::with_capacity(INVADER_ROWS * INVADER_COLS);
        for row in 0..INVADER_ROWS {
            for col in 0..INVADER_COLS {
                invaders.push(Invader::new(Vec2::new(
                    FORMATION_MARGIN_X + col as f32 * FORMATION_SPACING_X,
                    FORMATION_MARGIN_Y + row as f32 * FORMATION_SPACING_Y,
                )));
            }
        }
        Self::from_invaders(invaders, screen_width)
    }

    /// Formation over an explicit set of slots, with initial motion state
    pub fn from_invaders(invaders: Vec<Invader>, screen_width: f32) -> Self {
        Self {
            invaders,
            direction: 1.0,
            speed: FORMATION_START_SPEED,
            drop_step: FORMATION_DROP_STEP,
            flips: 0,
            screen_width,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.invaders.iter().filter(|inv| inv.alive).count()
    }

    /// Horizontal extent (min left, max right) over alive invaders
    pub fn alive_extent(&self) -> Option<(f32, f32)> {
        self.invaders
            .iter()
            .filter(|inv| inv.alive)
            .fold(None, |acc, inv| {
                let (min_x, max_x) = acc.unwrap_or((f32::INFINITY, f32::NEG_INFINITY));
                Some((min_x.min(inv.pos.x), max_x.max(inv.pos.x + inv.size.x)))
            })
    }

    /// Advance one tick. `loss_line` is the player's top edge.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R, loss_line: f32) -> FormationReport {
        let mut report = FormationReport::default();

        // Extent is measured before this tick's move
        let Some((min_x, max_x)) = self.alive_extent() else {
            return report;
        };

        let move_x = self.speed * self.direction * dt;
        for inv in self.invaders.iter_mut().filter(|inv| inv.alive) {
            inv.pos.x += move_x;
        }

        if min_x <= FORMATION_EDGE_MARGIN && self.direction < 0.0 {
            self.flip(1.0);
            report.flipped = true;
        } else if max_x >= self.screen_width - FORMATION_EDGE_MARGIN && self.direction > 0.0 {
            self.flip(-1.0);
            report.flipped = true;
        }

        report.reached_player = self
            .invaders
            .iter()
            .any(|inv| inv.alive && inv.pos.y + inv.size.y >= loss_line);

        if rng.random::<f32>() < INVADER_FIRE_CHANCE {
            let alive: Vec<usize> = self
                .invaders
                .iter()
                .enumerate()
                .filter(|(_, inv)| inv.alive)
                .map(|(i, _)| i)
                .collect();
            let shooter = &self.invaders[alive[rng.random_range(0..alive.len())]];
            let origin = Vec2::new(
                shooter.pos.x + shooter.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
                shooter.pos.y + shooter.size.y + INVADER_PROJECTILE_OFFSET,
            );
            report.shot = Some(Projectile::new(origin, INVADER_PROJECTILE_SPEED, Owner::Invader));
        }

        report
    }

    fn flip(&mut self, direction: f32) {
        self.direction = direction;
        self.speed *= FORMATION_SPEED_UP;
        self.flips += 1;
        for inv in self.invaders.iter_mut().filter(|inv| inv.alive) {
            inv.pos.y += self.drop_step;
        }
        log::debug!(
            "Formation flipped (flip {}, speed {:.2})",
            self.flips,
            self.speed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_pcg::Pcg32;

    /// Never passes the fire roll
    fn no_fire() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// Always passes the fire roll and picks the first alive slot
    fn always_fire() -> StepRng {
        StepRng::new(0, 0)
    }

    fn single(x: f32, y: f32) -> InvaderFormation {
        InvaderFormation::from_invaders(vec![Invader::new(Vec2::new(x, y))], SCREEN_WIDTH)
    }

    #[test]
    fn test_grid_layout() {
        let formation = InvaderFormation::new(SCREEN_WIDTH);
        assert_eq!(formation.invaders.len(), INVADER_ROWS * INVADER_COLS);
        assert_eq!(formation.alive_count(), INVADER_ROWS * INVADER_COLS);
        assert_eq!(formation.invaders[0].pos, Vec2::new(40.0, 40.0));
        // Second row, third column
        assert_eq!(formation.invaders[INVADER_COLS + 2].pos, Vec2::new(140.0, 72.0));
        assert_eq!(formation.direction, 1.0);
        assert_eq!(formation.speed, FORMATION_START_SPEED);
    }

    #[test]
    fn test_moves_alive_only() {
        let mut formation = InvaderFormation::new(SCREEN_WIDTH);
        formation.invaders[1].alive = false;
        let dead_before = formation.invaders[1].pos;

        formation.update(0.1, &mut no_fire(), SCREEN_HEIGHT);
        assert!((formation.invaders[0].pos.x - 44.0).abs() < 1e-4);
        assert_eq!(formation.invaders[1].pos, dead_before);
    }

    #[test]
    fn test_right_edge_flip() {
        let w = INVADER_WIDTH;
        let mut formation = single(SCREEN_WIDTH - w - 5.0, 100.0);
        let speed = formation.speed;

        let report = formation.update(0.016, &mut no_fire(), SCREEN_HEIGHT);
        assert!(report.flipped);
        assert_eq!(formation.direction, -1.0);
        assert!((formation.speed - speed * 1.05).abs() < 1e-4);
        assert_eq!(formation.invaders[0].pos.y, 100.0 + FORMATION_DROP_STEP);
    }

    #[test]
    fn test_left_edge_flip() {
        let mut formation = single(8.0, 100.0);
        formation.direction = -1.0;

        let report = formation.update(0.016, &mut no_fire(), SCREEN_HEIGHT);
        assert!(report.flipped);
        assert_eq!(formation.direction, 1.0);
        assert_eq!(formation.flips, 1);
    }

    #[test]
    fn test_no_flip_when_moving_away_from_edge() {
        // At the left wall but already heading right
        let mut formation = single(5.0, 100.0);
        let report = formation.update(0.016, &mut no_fire(), SCREEN_HEIGHT);
        assert!(!report.flipped);
        assert_eq!(formation.direction, 1.0);
        assert_eq!(formation.speed, FORMATION_START_SPEED);
    }

    #[test]
    fn test_speed_escalates_per_flip() {
        // Narrow field so the lone invader bounces often
        let mut formation =
            InvaderFormation::from_invaders(vec![Invader::new(Vec2::new(20.0, 0.0))], 80.0);
        let mut rng = no_fire();
        for _ in 0..300 {
            formation.update(0.033, &mut rng, f32::INFINITY);
        }
        assert!(formation.flips > 2);
        let expected = FORMATION_START_SPEED * FORMATION_SPEED_UP.powi(formation.flips as i32);
        assert!((formation.speed - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_reached_player() {
        let mut formation = single(200.0, 500.0);
        let loss_line = 500.0 + INVADER_HEIGHT;
        let report = formation.update(0.0, &mut no_fire(), loss_line);
        assert!(report.reached_player);

        let report = formation.update(0.0, &mut no_fire(), loss_line + 1.0);
        assert!(!report.reached_player);
    }

    #[test]
    fn test_dead_invader_does_not_reach_player() {
        let mut formation = single(200.0, 500.0);
        formation.invaders[0].alive = false;
        let report = formation.update(0.0, &mut no_fire(), 0.0);
        assert!(!report.reached_player);
    }

    #[test]
    fn test_empty_formation_is_noop() {
        let mut formation = InvaderFormation::new(SCREEN_WIDTH);
        for inv in &mut formation.invaders {
            inv.alive = false;
        }
        let report = formation.update(0.033, &mut always_fire(), 0.0);
        assert!(report.shot.is_none());
        assert!(!report.flipped);
        assert!(!report.reached_player);
    }

    #[test]
    fn test_fire_spawns_below_shooter() {
        let mut formation = single(200.0, 100.0);
        let report = formation.update(0.0, &mut always_fire(), SCREEN_HEIGHT);
        let shot = report.shot.unwrap();
        assert_eq!(shot.owner(), Owner::Invader);
        assert_eq!(shot.vy, INVADER_PROJECTILE_SPEED);
        assert_eq!(
            shot.pos,
            Vec2::new(
                200.0 + INVADER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0,
                100.0 + INVADER_HEIGHT + INVADER_PROJECTILE_OFFSET
            )
        );
    }

    #[test]
    fn test_shooter_is_always_alive() {
        let mut formation = InvaderFormation::new(SCREEN_WIDTH);
        for (i, inv) in formation.invaders.iter_mut().enumerate() {
            inv.alive = i % 3 == 0;
        }
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2_000 {
            if let Some(shot) = formation.update(0.0, &mut rng, SCREEN_HEIGHT).shot {
                let shooter = formation
                    .invaders
                    .iter()
                    .find(|inv| {
                        let muzzle = Vec2::new(
                            inv.pos.x + INVADER_WIDTH / 2.0 - PROJECTILE_WIDTH / 2.0,
                            inv.pos.y + INVADER_HEIGHT + INVADER_PROJECTILE_OFFSET,
                        );
                        muzzle.distance(shot.pos) < 1e-3
                    })
                    .unwrap();
                assert!(shooter.alive);
            }
        }
    }

    #[test]
    fn test_fire_rate_is_roughly_two_percent() {
        let mut formation = InvaderFormation::new(SCREEN_WIDTH);
        let mut rng = Pcg32::seed_from_u64(12345);
        let shots = (0..10_000)
            .filter(|_| formation.update(0.0, &mut rng, SCREEN_HEIGHT).shot.is_some())
            .count();
        assert!((100..=300).contains(&shots), "got {shots} shots");
    }
}
