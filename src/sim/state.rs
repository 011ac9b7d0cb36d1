//! Game state and effect dispatch
//!
//! `GameState` ties the world, the brick registry and the power counters
//! together. Collision callbacks land here and brick effects act on the game
//! through its [`EffectHost`] implementation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bricks::BrickRegistry;
use super::effect::{BrickHit, EffectHost};
use super::physics::Collision;
use super::power::PowerState;
use super::world::{GameObject, Layer, Tag, World};
use crate::config::{ConfigError, GameConfig};
use crate::polar_to_cartesian;

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Victory,
    Defeat,
}

impl GameOutcome {
    /// Dialog prompt shown by the window
    pub fn prompt(&self) -> &'static str {
        match self {
            GameOutcome::Victory => "You win! Play again?",
            GameOutcome::Defeat => "You lose! Play again?",
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game ended; no further updates
    Over(GameOutcome),
}

/// Camera that trails an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowCamera {
    /// Object being followed
    pub target: u32,
    /// View size in world units
    pub view: Vec2,
    /// Window size the view is scaled into
    pub window: Vec2,
}

/// Complete game state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub world: World,
    pub bricks: BrickRegistry,
    pub power: PowerState,
    pub camera: Option<FollowCamera>,
    pub phase: GamePhase,
    /// Frames simulated so far
    pub frame: u64,
    pub main_ball: u32,
    pub main_paddle: u32,
    /// Reserved ID for the extra paddle (only in the world while active)
    pub extra_paddle: u32,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game: walls, brick grid, main ball and paddle
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new();
        spawn_walls(&config, &mut world);
        let bricks = BrickRegistry::build_grid(&config, &mut world, &mut rng);

        let main_ball = world.next_entity_id();
        world.spawn(
            GameObject::new(main_ball, Tag::MainBall, config.center(), config.ball_dims()),
            Layer::Default,
        );

        let main_paddle = world.next_entity_id();
        world.spawn(
            GameObject::new(
                main_paddle,
                Tag::MainPaddle,
                Vec2::new(config.window_width * 0.5, config.paddle_y()),
                config.paddle_dims(),
            ),
            Layer::Default,
        );
        let extra_paddle = world.next_entity_id();

        let mut state = Self {
            power: PowerState::new(config.initial_lives, config.max_lives),
            config,
            seed,
            world,
            bricks,
            camera: None,
            phase: GamePhase::Playing,
            frame: 0,
            main_ball,
            main_paddle,
            extra_paddle,
            rng,
        };
        state.reset_main_ball();

        log::info!(
            "New game (seed {}): {} bricks, {} lives",
            seed,
            state.bricks.live_count(),
            state.power.lives()
        );
        Ok(state)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Over(_))
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            GamePhase::Over(outcome) => Some(outcome),
            GamePhase::Playing => None,
        }
    }

    /// Collision count of the main ball
    pub fn main_ball_collisions(&self) -> u32 {
        self.world
            .get(self.main_ball)
            .map(|b| b.collisions)
            .unwrap_or(0)
    }

    /// Re-center the main ball and give it a random diagonal velocity
    pub fn reset_main_ball(&mut self) {
        let speed = self.config.ball_speed;
        let vx = if self.rng.random_bool(0.5) { -speed } else { speed };
        let vy = if self.rng.random_bool(0.5) { -speed } else { speed };
        let center = self.config.center();
        if let Some(ball) = self.world.get_mut(self.main_ball) {
            ball.center = center;
            ball.vel = Vec2::new(vx, vy);
        }
    }

    /// Engine callback: a mover started touching another object
    pub fn on_collision_enter(&mut self, collision: Collision) {
        let (Some(mover), Some(other)) = (
            self.world.get(collision.mover).map(|o| o.tag),
            self.world.get(collision.other).map(|o| o.tag),
        ) else {
            return;
        };

        if mover.is_ball() {
            if let Some(ball) = self.world.get_mut(collision.mover) {
                ball.collisions += 1;
            }
            match other {
                Tag::Brick => self.on_brick_collision(collision.other, collision.mover),
                Tag::ExtraPaddle => self.on_extra_paddle_hit(),
                _ => {}
            }
        } else if mover == Tag::Heart && other == Tag::MainPaddle {
            if let Some(heart) = self.world.get_mut(collision.mover) {
                heart.caught = true;
            }
        }
    }

    /// A brick was hit by `other`. Fires the brick's effect on the first hit
    /// only; later hits on a destroyed brick are ignored.
    pub fn on_brick_collision(&mut self, brick: u32, other: u32) {
        let Some(center) = self.world.get(brick).map(|b| b.center) else {
            return;
        };
        let Some(effect) = self.bricks.take_effect(brick) else {
            return;
        };
        log::trace!("Brick {} hit by {}: {:?}", brick, other, effect.kinds());
        let hit = BrickHit {
            brick,
            center,
            other,
        };
        effect.on_collision(self, &hit);
    }

    /// A ball hit the extra paddle
    pub fn on_extra_paddle_hit(&mut self) {
        if self.power.register_extra_paddle_hit() {
            log::debug!("Extra paddle budget used up");
        }
    }

    /// Random velocity for a new puck: angle in [0, π) at ball speed
    fn random_puck_velocity(&mut self) -> Vec2 {
        let angle = self.rng.random::<f32>() * std::f32::consts::PI;
        polar_to_cartesian(self.config.ball_speed, angle)
    }
}

impl EffectHost for GameState {
    fn remove_object(&mut self, id: u32, layer: Layer) -> bool {
        self.world.remove(id, layer)
    }

    fn brick_destroyed(&mut self, brick: u32) {
        self.bricks.mark_destroyed(brick);
    }

    fn spawn_pucks(&mut self, center: Vec2) {
        let size = self.config.puck_dims();
        for _ in 0..self.config.pucks_per_hit {
            let vel = self.random_puck_velocity();
            let id = self.world.next_entity_id();
            self.world.spawn(
                GameObject::new(id, Tag::Puck, center, size).with_vel(vel),
                Layer::Default,
            );
        }
        log::debug!("Spawned {} pucks at {:?}", self.config.pucks_per_hit, center);
    }

    fn activate_extra_paddle(&mut self) {
        if !self.power.activate_extra_paddle(self.config.extra_paddle_hits) {
            return;
        }
        let paddle = GameObject::new(
            self.extra_paddle,
            Tag::ExtraPaddle,
            self.config.center(),
            self.config.paddle_dims(),
        );
        self.world.spawn(paddle, Layer::Default);
        log::debug!("Extra paddle active ({} hits)", self.config.extra_paddle_hits);
    }

    fn activate_follow_camera(&mut self, other: u32) {
        if other != self.main_ball {
            log::trace!("Camera brick broken by {}, not the main ball", other);
            return;
        }
        let collisions = self.main_ball_collisions();
        if !self.power.activate_camera(collisions, self.config.camera_collisions) {
            return;
        }
        let window = self.config.window();
        self.camera = Some(FollowCamera {
            target: self.main_ball,
            view: window * self.config.camera_zoom,
            window,
        });
        log::debug!("Follow camera on until collision {:?}", self.power.camera_expiry());
    }

    fn drop_heart(&mut self, center: Vec2) {
        let id = self.world.next_entity_id();
        let size = Vec2::splat(self.config.heart_size);
        self.world.spawn(
            GameObject::new(id, Tag::Heart, center, size)
                .with_vel(Vec2::new(0.0, self.config.heart_speed)),
            Layer::Default,
        );
        log::debug!("Heart dropped at {:?}", center);
    }
}

/// Invisible left, right and top walls (the floor stays open)
fn spawn_walls(config: &GameConfig, world: &mut World) {
    let w = config.window_width;
    let h = config.window_height;
    let t = config.wall_width;
    let walls = [
        (Vec2::ZERO, Vec2::new(t, h)),
        (Vec2::new(w - t, 0.0), Vec2::new(t, h)),
        (Vec2::ZERO, Vec2::new(w, t)),
    ];
    for (top_left, size) in walls {
        let id = world.next_entity_id();
        world.spawn(
            GameObject::from_top_left(id, Tag::Wall, top_left, size),
            Layer::StaticObjects,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effect::{Effect, EffectKind};

    /// Game with a single brick carrying `effect`
    fn single_brick_game(effect: Effect) -> (GameState, u32) {
        let mut state = GameState::new(GameConfig::with_grid(1, 1), 12345).unwrap();
        let brick = state.bricks.iter().next().unwrap().id;
        state.bricks.insert(brick, 0, 0, effect);
        (state, brick)
    }

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(GameConfig::default(), 1).unwrap();
        assert_eq!(state.bricks.live_count(), 56);
        assert_eq!(state.world.count_tag(Tag::Wall), 3);
        assert_eq!(state.world.count_tag(Tag::MainBall), 1);
        assert_eq!(state.world.count_tag(Tag::MainPaddle), 1);
        assert!(!state.world.contains(state.extra_paddle));
        assert_eq!(state.power.lives(), 3);
        assert_eq!(state.phase, GamePhase::Playing);

        let ball = state.world.get(state.main_ball).unwrap();
        assert_eq!(ball.center, Vec2::new(400.0, 350.0));
        assert_eq!(ball.vel.x.abs(), 200.0);
        assert_eq!(ball.vel.y.abs(), 200.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            GameState::new(GameConfig::with_grid(0, 3), 1),
            Err(ConfigError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_basic_brick_destroyed_once() {
        let (mut state, brick) = single_brick_game(Effect::default());
        let ball = state.main_ball;

        state.on_brick_collision(brick, ball);
        assert!(!state.world.contains(brick));
        assert_eq!(state.bricks.live_count(), 0);

        // A late second hit is ignored
        state.on_brick_collision(brick, ball);
        assert_eq!(state.bricks.live_count(), 0);
    }

    #[test]
    fn test_extra_ball_spawns_two_pucks() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::ExtraBall));
        let center = state.world.get(brick).unwrap().center;
        state.on_brick_collision(brick, state.main_ball);

        let pucks: Vec<_> = state.world.iter().filter(|o| o.tag == Tag::Puck).collect();
        assert_eq!(pucks.len(), 2);
        for puck in pucks {
            assert_eq!(puck.center, center);
            assert!((puck.vel.length() - 200.0).abs() < 0.01);
            // Angle in [0, π): y component non-negative
            assert!(puck.vel.y >= 0.0);
            assert!((puck.size.x - 15.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_extra_paddle_twice_keeps_budget() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::ExtraPaddle));
        state.on_brick_collision(brick, state.main_ball);
        state.on_brick_collision(brick, state.main_ball);

        assert_eq!(state.power.paddle_hit_budget(), 4);
        let paddle = state.world.get(state.extra_paddle).unwrap();
        assert_eq!(paddle.center, state.config.center());
        assert_eq!(paddle.tag, Tag::ExtraPaddle);
    }

    #[test]
    fn test_composite_double_paddle_activates_once() {
        let mut rng = Pcg32::seed_from_u64(0);
        // Draws 1 and 1: two ExtraPaddle parts
        let composite = crate::sim::effect::CompositeEffect::from_draws(1, 1, &mut rng);
        let (mut state, brick) = single_brick_game(Effect::Composite(composite));
        state.on_brick_collision(brick, state.main_ball);

        assert_eq!(state.bricks.live_count(), 0);
        assert_eq!(state.power.paddle_hit_budget(), 4);
    }

    #[test]
    fn test_camera_threshold_from_collision_count() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::CameraFollow));
        state.world.get_mut(state.main_ball).unwrap().collisions = 9;
        state.on_brick_collision(brick, state.main_ball);

        assert_eq!(state.power.camera_expiry(), Some(14));
        let camera = state.camera.as_ref().unwrap();
        assert_eq!(camera.target, state.main_ball);
        assert!((camera.view - Vec2::new(960.0, 840.0)).length() < 0.01);
    }

    #[test]
    fn test_puck_breaks_camera_brick_without_camera() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::CameraFollow));
        let puck = state.world.next_entity_id();
        state.world.spawn(
            GameObject::new(puck, Tag::Puck, Vec2::new(300.0, 300.0), state.config.puck_dims()),
            Layer::Default,
        );
        state.on_brick_collision(brick, puck);

        // Brick still destroyed, camera untouched
        assert!(!state.world.contains(brick));
        assert_eq!(state.bricks.live_count(), 0);
        assert!(state.camera.is_none());
        assert_eq!(state.power.camera_expiry(), None);
    }

    #[test]
    fn test_extra_life_drops_heart_without_life() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::ExtraLife));
        state.on_brick_collision(brick, state.main_ball);

        assert_eq!(state.power.lives(), 3);
        let heart = state.world.iter().find(|o| o.tag == Tag::Heart).unwrap();
        assert_eq!(heart.vel, Vec2::new(0.0, 100.0));
        assert!(!heart.caught);
    }

    #[test]
    fn test_collision_callbacks() {
        let (mut state, brick) = single_brick_game(Effect::Single(EffectKind::ExtraPaddle));
        let ball = state.main_ball;
        state.on_collision_enter(Collision {
            mover: ball,
            other: brick,
            normal: Vec2::Y,
        });
        assert_eq!(state.main_ball_collisions(), 1);
        assert_eq!(state.power.paddle_hit_budget(), 4);

        let paddle = state.extra_paddle;
        state.on_collision_enter(Collision {
            mover: ball,
            other: paddle,
            normal: Vec2::NEG_Y,
        });
        assert_eq!(state.main_ball_collisions(), 2);
        assert_eq!(state.power.paddle_hit_budget(), 3);
    }
}
