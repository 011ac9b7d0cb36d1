//! Lives and temporary power modes
//!
//! Counters for the extra paddle hit budget, the follow camera expiry and
//! the player's lives. Every operation here is a no-op or a clamp when it
//! would break an invariant.

use serde::{Deserialize, Serialize};

/// Power-up counters shared by effects and the game loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    /// Lives left, in 0..=max_lives
    lives: u32,
    max_lives: u32,
    /// Impacts the extra paddle can still take; 0 means inactive
    paddle_hit_budget: u32,
    /// Main ball collision count at which the follow camera turns off
    camera_expiry: Option<u32>,
}

impl PowerState {
    pub fn new(initial_lives: u32, max_lives: u32) -> Self {
        Self {
            lives: initial_lives.min(max_lives),
            max_lives,
            paddle_hit_budget: 0,
            camera_expiry: None,
        }
    }

    // === Lives ===

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn has_lives(&self) -> bool {
        self.lives > 0
    }

    /// Lose one life (never below zero). Returns whether any lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.has_lives()
    }

    /// Gain one life unless already at the cap. Returns whether it counted.
    pub fn gain_life(&mut self) -> bool {
        if self.lives < self.max_lives {
            self.lives += 1;
            true
        } else {
            false
        }
    }

    // === Extra paddle ===

    pub fn paddle_hit_budget(&self) -> u32 {
        self.paddle_hit_budget
    }

    pub fn extra_paddle_active(&self) -> bool {
        self.paddle_hit_budget > 0
    }

    /// Start extra paddle mode with `hits` impacts. Does nothing (and
    /// returns false) while the mode is already running or for a zero budget.
    pub fn activate_extra_paddle(&mut self, hits: u32) -> bool {
        if self.extra_paddle_active() || hits == 0 {
            return false;
        }
        self.paddle_hit_budget = hits;
        true
    }

    /// A ball hit the extra paddle. Returns true when this hit used up the budget.
    pub fn register_extra_paddle_hit(&mut self) -> bool {
        if self.paddle_hit_budget == 0 {
            return false;
        }
        self.paddle_hit_budget -= 1;
        self.paddle_hit_budget == 0
    }

    // === Follow camera ===

    pub fn camera_expiry(&self) -> Option<u32> {
        self.camera_expiry
    }

    pub fn camera_active(&self) -> bool {
        self.camera_expiry.is_some()
    }

    /// Start camera mode, expiring `duration` collisions after `collisions`.
    /// Does nothing (and returns false) while the camera is already active.
    pub fn activate_camera(&mut self, collisions: u32, duration: u32) -> bool {
        if self.camera_active() {
            return false;
        }
        self.camera_expiry = Some(collisions.saturating_add(duration));
        true
    }

    /// Clear camera mode once the main ball reached the threshold.
    /// Returns true on the frame the camera turns off.
    pub fn expire_camera(&mut self, collisions: u32) -> bool {
        match self.camera_expiry {
            Some(threshold) if collisions >= threshold => {
                self.camera_expiry = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lives_clamped() {
        let mut power = PowerState::new(3, 4);
        assert!(power.gain_life());
        assert!(!power.gain_life(), "gain beyond cap is dropped");
        assert_eq!(power.lives(), 4);

        for _ in 0..3 {
            assert!(power.lose_life());
        }
        assert!(!power.lose_life());
        assert!(!power.lose_life());
        assert_eq!(power.lives(), 0);
    }

    #[test]
    fn test_extra_paddle_no_refresh() {
        let mut power = PowerState::new(3, 4);
        assert!(!power.extra_paddle_active());

        assert!(power.activate_extra_paddle(4));
        assert!(!power.activate_extra_paddle(4));
        assert_eq!(power.paddle_hit_budget(), 4);

        assert!(!power.register_extra_paddle_hit());
        assert!(!power.register_extra_paddle_hit());
        assert!(!power.register_extra_paddle_hit());
        assert!(power.register_extra_paddle_hit());
        assert!(!power.extra_paddle_active());

        // Stray hits after expiry do nothing
        assert!(!power.register_extra_paddle_hit());
        assert_eq!(power.paddle_hit_budget(), 0);

        // Can be re-armed once expired
        assert!(power.activate_extra_paddle(4));
    }

    #[test]
    fn test_zero_budget_never_activates() {
        let mut power = PowerState::new(3, 4);
        assert!(!power.activate_extra_paddle(0));
        assert!(!power.extra_paddle_active());
    }

    #[test]
    fn test_camera_threshold() {
        let mut power = PowerState::new(3, 4);
        assert!(power.activate_camera(7, 5));
        assert_eq!(power.camera_expiry(), Some(12));

        // Second activation keeps the first threshold
        assert!(!power.activate_camera(10, 5));
        assert_eq!(power.camera_expiry(), Some(12));

        assert!(!power.expire_camera(11));
        assert!(power.expire_camera(13));
        assert!(!power.camera_active());
        assert!(!power.expire_camera(20));
    }

    proptest! {
        #[test]
        fn prop_lives_stay_in_bounds(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut power = PowerState::new(3, 4);
            for gain in ops {
                if gain { power.gain_life(); } else { power.lose_life(); }
                prop_assert!(power.lives() <= power.max_lives());
            }
        }

        #[test]
        fn prop_budget_decreases_by_one(hits in 0u32..10) {
            let mut power = PowerState::new(3, 4);
            power.activate_extra_paddle(4);
            let mut expired = 0;
            for _ in 0..hits {
                let before = power.paddle_hit_budget();
                if power.register_extra_paddle_hit() {
                    expired += 1;
                }
                prop_assert_eq!(power.paddle_hit_budget(), before.saturating_sub(1));
            }
            prop_assert_eq!(expired, if hits >= 4 { 1 } else { 0 });
        }
    }
}
