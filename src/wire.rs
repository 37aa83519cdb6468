//! Records exchanged with remote participants
//!
//! Each record is one JSON object tagged by `type`:
//!
//! ```json
//! {"type":"stroke_complete","points":[{"x":1.0,"y":2.0}],"color":"#ff6b9d","width":6.0,"closed":true}
//! {"type":"clear_all"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::spatial::Point2D;
use crate::stroke::{Color, Stroke};

const KNOWN_TYPES: [&str; 2] = ["stroke_complete", "clear_all"];

/// A peer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeerMessage {
    StrokeComplete {
        points: Vec<Point2D>,
        color: Color,
        width: f32,
        closed: bool,
    },
    ClearAll {},
}

impl PeerMessage {
    pub fn stroke_complete(stroke: &Stroke) -> Self {
        PeerMessage::StrokeComplete {
            points: stroke.points.clone(),
            color: stroke.color,
            width: stroke.width,
            closed: stroke.closed,
        }
    }

    /// The carried stroke, for stroke records
    pub fn into_stroke(self) -> Option<Stroke> {
        match self {
            PeerMessage::StrokeComplete {
                points,
                color,
                width,
                closed,
            } => Some(Stroke {
                points,
                color,
                width,
                closed,
            }),
            PeerMessage::ClearAll {} => None,
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse one record. A well-formed object with an unrecognised `type`
    /// is reported as [`SketchError::UnknownMessage`].
    pub fn decode(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        if let Some(kind) = value.get("type").and_then(|t| t.as_str()) {
            if !KNOWN_TYPES.contains(&kind) {
                return Err(SketchError::UnknownMessage(kind.to_string()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}
