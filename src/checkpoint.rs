//! Named camera bookmarks.
//!
//! A checkpoint records the transform the canvas has undergone since the
//! checkpoint was last set: content at canvas point `p` at set time is now at
//! `zoom * p + offset`. Recalling it applies the inverse, which is why every
//! pan and zoom has to be folded into every checkpoint as it happens.

use crate::constants::{DEFAULT_CHECKPOINTS, RESERVED_CHECKPOINT};

#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub key: char,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Checkpoint {
    fn new(key: char) -> Self {
        Self {
            key,
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }

    fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.zoom = 1.0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckpointStore {
    checks: Vec<Checkpoint>,
}

impl CheckpointStore {
    /// Store pre-populated with `'0'..='5'`. `'0'` and `'1'` both mark home;
    /// each further key sits one screen height lower than the previous one.
    pub fn with_defaults(screen_height: i32) -> Self {
        let mut checks = Vec::with_capacity(DEFAULT_CHECKPOINTS);
        for i in 0..DEFAULT_CHECKPOINTS {
            let key = char::from(b'0' + i as u8);
            let mut cp = Checkpoint::new(key);
            if i > 1 {
                cp.y = f64::from(screen_height) * (i as f64 - 1.0);
            }
            checks.push(cp);
        }
        Self { checks }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn get(&self, key: char) -> Option<&Checkpoint> {
        self.checks.iter().find(|cp| cp.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checks.iter()
    }

    /// Mark the current view as `key`. The reserved home checkpoint can
    /// never be moved.
    pub fn set(&mut self, key: char) {
        if key == RESERVED_CHECKPOINT {
            return;
        }
        match self.checks.iter_mut().find(|cp| cp.key == key) {
            Some(cp) => cp.reset(),
            None => self.checks.push(Checkpoint::new(key)),
        }
        tracing::info!(checkpoint = %key, "checkpoint set");
    }

    /// Fold a canvas transform into every checkpoint. A factor of exactly 1
    /// is a pan by `(x, y)`; any other factor is a zoom centred on `(x, y)`.
    pub fn update(&mut self, x: f64, y: f64, factor: f64) {
        for cp in &mut self.checks {
            if factor != 1.0 {
                cp.zoom *= factor;
                cp.x = (cp.x - x) * factor + x;
                cp.y = (cp.y - y) * factor + y;
            } else {
                cp.x += x;
                cp.y += y;
            }
        }
    }
}
