//! Jitter rejection and moving-average smoothing for raw pointer samples

use std::collections::VecDeque;

use crate::spatial::{Point2D, Vector2D};

/// Holds the pointer still until it moves past a minimum distance
#[derive(Debug, Clone)]
pub struct JitterFilter {
    floor: f32,
    last_accepted: Option<Point2D>,
}

impl JitterFilter {
    pub fn new(floor: f32) -> Self {
        Self {
            floor,
            last_accepted: None,
        }
    }

    /// Returns the raw point if it moved more than the floor from the last
    /// accepted point, otherwise the last accepted point again
    pub fn filter(&mut self, raw: Point2D) -> Point2D {
        match self.last_accepted {
            Some(last) if raw.distance(&last) <= self.floor => last,
            _ => {
                self.last_accepted = Some(raw);
                raw
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Simple moving average over the last `capacity` samples
#[derive(Debug, Clone)]
pub struct MovingAverage {
    capacity: usize,
    samples: VecDeque<Point2D>,
}

impl MovingAverage {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Add a sample, evicting the oldest when full, and return the mean
    pub fn push(&mut self, point: Point2D) -> Point2D {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(point);
        self.mean().unwrap_or(point)
    }

    /// Mean of the buffered samples.
    ///
    /// Offsets are summed relative to the oldest sample, so a buffer of
    /// identical points yields that point bit for bit.
    pub fn mean(&self) -> Option<Point2D> {
        let anchor = *self.samples.front()?;
        let spread = self
            .samples
            .iter()
            .skip(1)
            .fold(Vector2D::ZERO, |acc, p| acc + (*p - anchor));
        Some(anchor + spread / self.samples.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
