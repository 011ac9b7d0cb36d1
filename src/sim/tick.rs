//! Per-frame game loop
//!
//! `tick` runs the engine side of a frame (paddle steering, physics,
//! collision callbacks) and then `update`, which enforces the game rules in a
//! fixed order:
//!
//! 1. win/loss check
//! 2. cleanup of objects that fell out of the arena
//! 3. extra paddle expiry
//! 4. caught hearts become lives
//! 5. follow camera expiry

use glam::Vec2;

use super::physics;
use super::state::{GameOutcome, GamePhase, GameState};
use super::world::Tag;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left arrow held
    pub move_left: bool,
    /// Right arrow held
    pub move_right: bool,
    /// Override key held: end the game as a win (debug/skip)
    pub force_win: bool,
    /// Idle/demo mode - AI steers the paddles
    pub idle_mode: bool,
}

/// Advance the game by one frame. Returns the outcome on the frame the game ends.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<GameOutcome> {
    if state.is_over() {
        return None;
    }
    state.frame += 1;

    steer_paddles(state, input);

    let collisions = physics::step(&mut state.world, dt);
    clamp_paddles(state);
    for collision in collisions {
        state.on_collision_enter(collision);
    }

    update(state, input)
}

/// Rule pass run once per frame after physics and collision callbacks
pub fn update(state: &mut GameState, input: &TickInput) -> Option<GameOutcome> {
    if state.is_over() {
        return None;
    }

    if let Some(outcome) = check_game_over(state, input) {
        log::info!("Game over after {} frames: {:?}", state.frame, outcome);
        state.phase = GamePhase::Over(outcome);
        return Some(outcome);
    }

    clear_fallen_objects(state);
    update_extra_paddle(state);
    collect_hearts(state);
    update_camera(state);
    None
}

/// Victory when no bricks are left (or forced), defeat when the main ball
/// falls with no lives to spare
fn check_game_over(state: &mut GameState, input: &TickInput) -> Option<GameOutcome> {
    if state.bricks.all_destroyed() || input.force_win {
        return Some(GameOutcome::Victory);
    }

    let floor = state.config.floor();
    let dropped = state
        .world
        .get(state.main_ball)
        .is_some_and(|ball| ball.center.y > floor);
    if dropped {
        if state.power.lose_life() {
            log::info!("Ball lost, {} lives left", state.power.lives());
            state.reset_main_ball();
        } else {
            return Some(GameOutcome::Defeat);
        }
    }

    None
}

/// Remove everything whose top edge is below the floor
fn clear_fallen_objects(state: &mut GameState) {
    let floor = state.config.floor();
    let fallen: Vec<u32> = state
        .world
        .iter()
        .filter(|o| o.top_left().y > floor)
        .map(|o| o.id)
        .collect();
    for id in fallen {
        state.world.remove_any(id);
    }
}

/// Extra paddle leaves the world once its budget hits zero
fn update_extra_paddle(state: &mut GameState) {
    if !state.power.extra_paddle_active() && state.world.remove_any(state.extra_paddle) {
        log::debug!("Extra paddle removed");
    }
}

/// Caught hearts are consumed and turn into lives (capped)
fn collect_hearts(state: &mut GameState) {
    let caught: Vec<u32> = state
        .world
        .iter()
        .filter(|o| o.tag == Tag::Heart && o.caught)
        .map(|o| o.id)
        .collect();
    for id in caught {
        if state.world.remove_any(id) {
            if state.power.gain_life() {
                log::debug!("Heart caught, {} lives", state.power.lives());
            } else {
                log::debug!("Heart caught at max lives");
            }
        }
    }
}

/// Follow camera turns off when the main ball reaches the expiry count
fn update_camera(state: &mut GameState) {
    let collisions = state.main_ball_collisions();
    if state.power.expire_camera(collisions) {
        state.camera = None;
        log::debug!("Follow camera off at collision {}", collisions);
    }
}

/// Set paddle velocities from input
fn steer_paddles(state: &mut GameState, input: &TickInput) {
    let speed = state.config.paddle_speed;
    let ball_x = state.world.get(state.main_ball).map(|b| b.center.x);

    for id in [state.main_paddle, state.extra_paddle] {
        let Some(paddle) = state.world.get_mut(id) else {
            continue;
        };

        let mut dir = 0.0;
        if input.idle_mode {
            // Track the main ball with a small dead zone
            if let Some(target) = ball_x {
                let delta = target - paddle.center.x;
                if delta.abs() > 4.0 {
                    dir = delta.signum();
                }
            }
        } else {
            if input.move_left {
                dir -= 1.0;
            }
            if input.move_right {
                dir += 1.0;
            }
        }
        paddle.vel = Vec2::new(dir * speed, 0.0);
    }
}

/// Keep paddles inside the window
fn clamp_paddles(state: &mut GameState) {
    let width = state.config.window_width;
    for id in [state.main_paddle, state.extra_paddle] {
        if let Some(paddle) = state.world.get_mut(id) {
            let half = paddle.size.x * 0.5;
            paddle.center.x = paddle.center.x.clamp(half, width - half);
        }
    }
}
