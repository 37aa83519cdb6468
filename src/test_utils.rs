//! Shared fixtures for unit tests

use crate::input::landmarks::*;
use crate::input::HandFrame;
use crate::spatial::{Point2D, Vector2D};
use crate::stroke::{Color, Stroke};

/// A synthetic hand with the index fingertip at `at` (normalized image space).
///
/// Fingers sit in columns to the right of the index; an extended finger has
/// its tip above its PIP joint, a curled one below.
pub fn hand_pose(at: Point2D, extended: [bool; 4]) -> HandFrame {
    let mut points = [Point2D::ORIGIN; LANDMARK_COUNT];
    let base_y = at.y + 0.05;

    points[WRIST] = Point2D::new(at.x + 0.05, at.y + 0.25);
    points[THUMB_CMC] = Point2D::new(at.x - 0.05, at.y + 0.2);
    points[THUMB_MCP] = Point2D::new(at.x - 0.1, at.y + 0.15);
    points[THUMB_IP] = Point2D::new(at.x - 0.13, at.y + 0.1);
    points[THUMB_TIP] = Point2D::new(at.x - 0.15, at.y + 0.05);

    for (column, finger) in Finger::ALL.iter().enumerate() {
        let x = at.x + column as f32 * 0.03;
        let tip_y = if extended[column] { base_y - 0.05 } else { base_y + 0.06 };
        points[finger.pip() - 1] = Point2D::new(x, base_y + 0.08);
        points[finger.pip()] = Point2D::new(x, base_y);
        points[finger.pip() + 1] = Point2D::new(x, (base_y + tip_y) / 2.0);
        points[finger.tip()] = Point2D::new(x, tip_y);
    }
    // Keep the pointer exactly on `at` for the drawing finger
    if extended[0] {
        points[INDEX_TIP] = at;
    }

    HandFrame::new(points)
}

pub fn draw_pose(at: Point2D) -> HandFrame {
    hand_pose(at, [true, false, false, false])
}

pub fn palm_pose(at: Point2D) -> HandFrame {
    hand_pose(at, [true, true, true, true])
}

pub fn fist_pose(at: Point2D) -> HandFrame {
    hand_pose(at, [false, false, false, false])
}

/// Draw pose with the thumb tip touching the index tip
pub fn pinch_pose(at: Point2D) -> HandFrame {
    let mut frame = draw_pose(at);
    frame.points[THUMB_TIP] = Point2D::new(at.x + 0.01, at.y);
    frame
}

/// Every landmark shifted by `offset`
pub fn translated(frame: &HandFrame, offset: Vector2D) -> HandFrame {
    let mut moved = frame.clone();
    for p in moved.points.iter_mut() {
        *p = *p + offset;
    }
    moved
}

/// `count` points evenly spaced on a circle
pub fn circle_points(center: Point2D, radius: f32, count: usize) -> Vec<Point2D> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            Point2D::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// A closed stroke tracing a circle
pub fn circle_stroke(center: Point2D, radius: f32, count: usize) -> Stroke {
    Stroke {
        points: circle_points(center, radius, count),
        color: Color::new(255, 107, 157),
        width: 6.0,
        closed: true,
    }
}
