//! Per-user pipeline orchestration
//!
//! A `SketchSession` owns one instance of every stage and routes each
//! classified frame to them. Nothing is reported through callbacks: every
//! call returns what happened and the host decides what to do with it.

use serde::Serialize;

use crate::config::SketchConfig;
use crate::geometry::{CurveFitter, MeshInflator};
use crate::input::{GestureClassifier, GestureKind, GestureState, HandFrame};
use crate::layout::{ObjectId, SceneBridge, SpatialLayoutEngine, TargetUpdate};
use crate::stroke::{Color, Stroke, StrokeCapture};
use crate::wire::PeerMessage;

/// How a stroke ended on this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeOutcome {
    /// Closed and turned into an object
    Closed,
    /// Too small to keep; the host should hint "shape too small"
    Rejected,
    /// Thrown away by a fist
    Discarded,
}

/// Everything one frame produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub gesture: GestureState,
    pub stroke: Option<StrokeOutcome>,
    pub created: Option<ObjectId>,
    pub removed: Option<ObjectId>,
    /// Objects dropped by a clear-all
    pub cleared: usize,
    /// Records to broadcast to peers
    pub outgoing: Vec<PeerMessage>,
}

impl FrameReport {
    fn new(gesture: GestureState) -> Self {
        Self {
            gesture,
            stroke: None,
            created: None,
            removed: None,
            cleared: 0,
            outgoing: Vec::new(),
        }
    }
}

/// Result of applying a peer record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    Created(ObjectId),
    Cleared(usize),
    /// Undecodable or unusable payload; local state is untouched
    Ignored,
}

/// One participant's full pipeline
pub struct SketchSession {
    classifier: GestureClassifier,
    capture: StrokeCapture,
    fitter: CurveFitter,
    inflator: MeshInflator,
    layout: SpatialLayoutEngine,
    palette: Vec<Color>,
    next_color: usize,
    clear_hold_secs: f32,
    placement_depth: f32,
    grabbed: Option<ObjectId>,
    /// The current fist hold already discarded a stroke or cleared the scene
    fist_consumed: bool,
    elapsed: f32,
}

impl SketchSession {
    pub fn new(config: SketchConfig) -> Self {
        let mut palette = config.session.colors();
        if palette.is_empty() {
            palette.push(Color::WHITE);
        }
        Self {
            classifier: GestureClassifier::new(config.gesture),
            capture: StrokeCapture::new(config.capture),
            fitter: CurveFitter::new(config.curve),
            inflator: MeshInflator::new(config.mesh),
            placement_depth: config.layout.placement_depth,
            layout: SpatialLayoutEngine::new(config.layout),
            palette,
            next_color: 0,
            clear_hold_secs: config.session.clear_hold_secs,
            grabbed: None,
            fist_consumed: false,
            elapsed: 0.0,
        }
    }

    pub fn layout(&self) -> &SpatialLayoutEngine {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut SpatialLayoutEngine {
        &mut self.layout
    }

    pub fn capture(&self) -> &StrokeCapture {
        &self.capture
    }

    pub fn gesture(&self) -> &GestureState {
        self.classifier.state()
    }

    /// Object currently held by a pinch
    pub fn grabbed(&self) -> Option<ObjectId> {
        self.grabbed
    }

    /// Target updates for the host's tween engine
    pub fn drain_updates(&mut self) -> Vec<TargetUpdate> {
        self.layout.drain_updates()
    }

    /// Process one pose-estimation frame. `None` means no hand was found.
    /// Frames must arrive in capture order.
    pub fn on_frame(
        &mut self,
        frame: Option<&HandFrame>,
        dt: f32,
        bridge: &dyn SceneBridge,
    ) -> FrameReport {
        let gesture = self.classifier.classify(frame, dt);
        let mut report = FrameReport::new(gesture);

        if gesture.current != GestureKind::Pinch {
            if let Some(id) = self.grabbed.take() {
                self.layout.release(id);
            }
        }
        if gesture.current != GestureKind::Fist {
            self.fist_consumed = false;
        }

        match gesture.current {
            GestureKind::Draw => {
                let point = bridge.to_display(gesture.pointer);
                if self.capture.is_active() {
                    self.capture.add_point(point);
                } else {
                    let color = self.cycle_color();
                    self.capture.start(point, color);
                }
            }
            GestureKind::Pinch => {
                self.capture.pause();
                self.handle_pinch(&gesture, bridge);
            }
            GestureKind::Palm => {
                if self.capture.is_active() {
                    self.close_stroke(bridge, &mut report);
                }
            }
            GestureKind::Fist => self.handle_fist(&gesture, &mut report),
            GestureKind::Poke => {
                self.capture.pause();
                if gesture.entered(GestureKind::Poke) {
                    let screen = bridge.to_display(gesture.pointer);
                    if let Some(id) = bridge.pick(screen, self.layout.objects()) {
                        self.layout.poke(id);
                    }
                }
            }
            GestureKind::Swipe => {
                self.capture.pause();
                if gesture.entered(GestureKind::Swipe) {
                    let screen = bridge.to_display(gesture.palm_center);
                    if let Some(id) = bridge.pick(screen, self.layout.objects()) {
                        report.removed = self.layout.remove(id).map(|o| o.id);
                    }
                }
            }
            GestureKind::None => self.capture.pause(),
        }

        report
    }

    /// Advance ambient motion on the render cadence
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.layout.apply_per_frame_motion(dt, self.elapsed);
    }

    /// Apply a record from a remote participant. Strokes skip local capture
    /// and enter at curve fitting, so both sides build the same solid.
    pub fn receive(&mut self, payload: &str, bridge: &dyn SceneBridge) -> Received {
        let message = match PeerMessage::decode(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring peer payload");
                return Received::Ignored;
            }
        };

        match message {
            PeerMessage::ClearAll {} => {
                let cleared = self.clear_scene();
                Received::Cleared(cleared)
            }
            message => match message.into_stroke() {
                Some(stroke) if stroke.closed && !stroke.is_empty() => {
                    Received::Created(self.materialize(stroke, bridge))
                }
                _ => {
                    tracing::warn!("ignoring peer stroke that is open or has no points");
                    Received::Ignored
                }
            },
        }
    }

    fn handle_pinch(&mut self, gesture: &GestureState, bridge: &dyn SceneBridge) {
        let screen = bridge.to_display(gesture.pinch_point);
        match self.grabbed {
            Some(id) => {
                let depth = self
                    .layout
                    .get(id)
                    .map_or(self.placement_depth, |o| o.target_position.z);
                self.layout.drag_to(id, bridge.unproject(screen, depth));
            }
            None if gesture.entered(GestureKind::Pinch) => {
                if let Some(id) = bridge.pick(screen, self.layout.objects()) {
                    if self.layout.grab(id) {
                        self.grabbed = Some(id);
                    }
                }
            }
            None => {}
        }
    }

    fn handle_fist(&mut self, gesture: &GestureState, report: &mut FrameReport) {
        if self.capture.is_active() {
            self.capture.discard();
            self.fist_consumed = true;
            report.stroke = Some(StrokeOutcome::Discarded);
        } else if !self.fist_consumed && gesture.duration >= self.clear_hold_secs {
            self.fist_consumed = true;
            report.cleared = self.clear_scene();
            report.outgoing.push(PeerMessage::ClearAll {});
        }
    }

    fn close_stroke(&mut self, bridge: &dyn SceneBridge, report: &mut FrameReport) {
        match self.capture.close() {
            Some(stroke) => {
                report.outgoing.push(PeerMessage::stroke_complete(&stroke));
                report.created = Some(self.materialize(stroke, bridge));
                report.stroke = Some(StrokeOutcome::Closed);
            }
            None => report.stroke = Some(StrokeOutcome::Rejected),
        }
    }

    /// Curve fit, inflate and place a closed stroke
    fn materialize(&mut self, stroke: Stroke, bridge: &dyn SceneBridge) -> ObjectId {
        let curve = self.fitter.fit(&stroke);
        let solid = self.inflator.inflate_default(&curve);
        let centroid = stroke.centroid().unwrap_or(curve.origin);
        let anchor = bridge.unproject(centroid, self.placement_depth);

        let vertices = solid.vertex_count();
        let id = self.layout.spawn(solid, stroke, anchor);
        tracing::info!(%id, vertices, fallback = curve.fallback, "solid created");
        id
    }

    fn clear_scene(&mut self) -> usize {
        self.grabbed = None;
        let cleared = self.layout.clear();
        tracing::info!(cleared, "scene cleared");
        cleared
    }

    fn cycle_color(&mut self) -> Color {
        let color = self.palette[self.next_color % self.palette.len()];
        self.next_color = (self.next_color + 1) % self.palette.len();
        color
    }
}

impl Default for SketchSession {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::input::landmarks::{INDEX_TIP, LANDMARK_COUNT};
    use crate::layout::{OrthoBridge, TargetProperty, TweenPlayer};
    use crate::spatial::{Point2D, Point3D, Vector2D};
    use crate::stroke::CaptureState;
    use crate::test_utils::{
        circle_points, circle_stroke, draw_pose, fist_pose, palm_pose, pinch_pose, translated,
    };

    const DT: f32 = 1.0 / 30.0;

    fn session() -> SketchSession {
        SketchSession::new(SketchConfig {
            layout: LayoutConfig {
                seed: Some(11),
                ..LayoutConfig::default()
            },
            ..SketchConfig::default()
        })
    }

    /// Trace a circle with the index finger, then open the palm
    fn draw_circle(
        session: &mut SketchSession,
        bridge: &OrthoBridge,
        center: Point2D,
        radius: f32,
    ) -> FrameReport {
        let path = circle_points(center, radius, 40);
        for p in &path {
            session.on_frame(Some(&draw_pose(*p)), DT, bridge);
        }
        session.on_frame(Some(&palm_pose(path[path.len() - 1])), DT, bridge)
    }

    fn settle_tweens(session: &mut SketchSession) {
        let mut player = TweenPlayer::new();
        player.extend(session.drain_updates());
        player.finish(session.layout_mut());
    }

    #[test]
    fn test_draw_then_palm_creates_object() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let report = draw_circle(&mut session, &bridge, Point2D::new(0.5, 0.5), 0.15);

        assert_eq!(report.gesture.current, GestureKind::Palm);
        assert_eq!(report.stroke, Some(StrokeOutcome::Closed));
        let id = report.created.expect("object created");
        assert_eq!(session.layout().len(), 1);
        assert!(matches!(report.outgoing[..], [PeerMessage::StrokeComplete { closed: true, .. }]));

        let object = session.layout().get(id).unwrap();
        assert!(object.position.distance(&Point3D::ORIGIN) < 0.5);
        assert_eq!(session.capture().state(), CaptureState::Idle);
    }

    #[test]
    fn test_remote_stroke_builds_identical_solid() {
        let bridge = OrthoBridge::default();
        let mut local = session();
        let mut remote = session();

        let report = draw_circle(&mut local, &bridge, Point2D::new(0.4, 0.5), 0.12);
        let local_id = report.created.unwrap();
        let payload = report.outgoing[0].encode().unwrap();

        let Received::Created(remote_id) = remote.receive(&payload, &bridge) else {
            panic!("remote stroke was not applied");
        };
        let a = &local.layout().get(local_id).unwrap().solid;
        let b = &remote.layout().get(remote_id).unwrap().solid;
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.indices, b.indices);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_stroke_is_rejected() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let report = draw_circle(&mut session, &bridge, Point2D::new(0.5, 0.5), 0.004);

        assert_eq!(report.stroke, Some(StrokeOutcome::Rejected));
        assert!(report.created.is_none());
        assert!(report.outgoing.is_empty());
        assert!(session.layout().is_empty());
    }

    #[test]
    fn test_hand_lost_pauses_stroke() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        for p in circle_points(Point2D::new(0.5, 0.5), 0.1, 10) {
            session.on_frame(Some(&draw_pose(p)), DT, &bridge);
        }
        let drawn = session.capture().current().unwrap().len();

        let report = session.on_frame(None, DT, &bridge);
        assert_eq!(report.gesture.current, GestureKind::None);
        assert_eq!(session.capture().state(), CaptureState::Paused);
        assert_eq!(session.capture().current().unwrap().len(), drawn);
    }

    #[test]
    fn test_fist_discards_then_clears_on_hold() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        draw_circle(&mut session, &bridge, Point2D::new(0.3, 0.5), 0.1);
        session.on_frame(None, DT, &bridge);

        // A fist while drawing only throws the stroke away
        session.on_frame(Some(&draw_pose(Point2D::new(0.7, 0.5))), DT, &bridge);
        let report = session.on_frame(Some(&fist_pose(Point2D::new(0.7, 0.5))), DT, &bridge);
        assert_eq!(report.stroke, Some(StrokeOutcome::Discarded));
        for _ in 0..60 {
            let report = session.on_frame(Some(&fist_pose(Point2D::new(0.7, 0.5))), DT, &bridge);
            assert_eq!(report.cleared, 0);
        }
        assert_eq!(session.layout().len(), 1);

        // A fresh fist held long enough clears exactly once
        session.on_frame(None, DT, &bridge);
        let mut clears = 0;
        for _ in 0..60 {
            let report = session.on_frame(Some(&fist_pose(Point2D::new(0.7, 0.5))), DT, &bridge);
            if report.cleared > 0 {
                clears += 1;
                assert_eq!(report.outgoing, vec![PeerMessage::ClearAll {}]);
            }
        }
        assert_eq!(clears, 1);
        assert!(session.layout().is_empty());
    }

    #[test]
    fn test_pinch_grabs_drags_and_releases() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let stroke = circle_stroke(Point2D::new(640.0, 360.0), 100.0, 24);
        let payload = PeerMessage::stroke_complete(&stroke).encode().unwrap();
        let Received::Created(id) = session.receive(&payload, &bridge) else {
            panic!("stroke not applied");
        };
        settle_tweens(&mut session);

        // Pinch point sits half a thumb offset right of the index tip
        session.on_frame(Some(&pinch_pose(Point2D::new(0.495, 0.5))), DT, &bridge);
        assert_eq!(session.grabbed(), Some(id));
        assert!(session.layout().get(id).unwrap().is_grabbed);

        session.on_frame(Some(&pinch_pose(Point2D::new(0.745, 0.5))), DT, &bridge);
        let moved = session.layout().get(id).unwrap().position;
        assert!((moved.x - 4.0).abs() < 0.01, "x = {}", moved.x);

        session.on_frame(None, DT, &bridge);
        assert_eq!(session.grabbed(), None);
        assert!(!session.layout().get(id).unwrap().is_grabbed);
    }

    /// Receive a circle centered on the default viewport and let it pop in
    fn centered_object(session: &mut SketchSession, bridge: &OrthoBridge) -> ObjectId {
        let stroke = circle_stroke(Point2D::new(640.0, 360.0), 100.0, 24);
        let payload = PeerMessage::stroke_complete(&stroke).encode().unwrap();
        let Received::Created(id) = session.receive(&payload, bridge) else {
            panic!("stroke not applied");
        };
        settle_tweens(session);
        id
    }

    #[test]
    fn test_swipe_removes_object_under_palm() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let id = centered_object(&mut session, &bridge);

        // Palm center sits right of and below the index tip; this pose
        // lands it on the viewport center once shifted
        let start = palm_pose(Point2D::new(0.35, 0.33));
        let report = session.on_frame(Some(&start), DT, &bridge);
        assert_eq!(report.gesture.current, GestureKind::Palm);
        assert!(report.removed.is_none());

        let swept = translated(&start, Vector2D::new(0.1, 0.0));
        let report = session.on_frame(Some(&swept), DT, &bridge);
        assert_eq!(report.gesture.current, GestureKind::Swipe);
        assert_eq!(report.removed, Some(id));
        assert!(session.layout().is_empty());

        let disposals = session.drain_updates();
        assert!(disposals
            .iter()
            .any(|u| u.id == id && matches!(u.property, TargetProperty::Dispose { .. })));
    }

    #[test]
    fn test_poke_squishes_object_under_pointer() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let id = centered_object(&mut session, &bridge);

        let at = Point2D::new(0.5, 0.5);
        let rest = [Point3D::ORIGIN; LANDMARK_COUNT];
        let mut jabbed = rest;
        jabbed[INDEX_TIP].z = -0.1;

        session.on_frame(Some(&draw_pose(at).with_world(rest)), DT, &bridge);
        let report = session.on_frame(Some(&draw_pose(at).with_world(jabbed)), DT, &bridge);

        assert_eq!(report.gesture.current, GestureKind::Poke);
        assert!(report.removed.is_none());
        assert_eq!(session.layout().len(), 1);
        assert_eq!(session.layout().get(id).unwrap().squish_amount, 1.0);
        assert_eq!(session.capture().state(), CaptureState::Paused);
        assert!(session
            .drain_updates()
            .iter()
            .any(|u| u.id == id && matches!(u.property, TargetProperty::Squish { .. })));
    }

    #[test]
    fn test_garbage_payloads_are_ignored() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let stroke = circle_stroke(Point2D::new(640.0, 360.0), 100.0, 24);
        let payload = PeerMessage::stroke_complete(&stroke).encode().unwrap();
        session.receive(&payload, &bridge);

        assert_eq!(session.receive("{{{", &bridge), Received::Ignored);
        assert_eq!(session.receive(r#"{"type":"teleport"}"#, &bridge), Received::Ignored);
        let empty = r##"{"type":"stroke_complete","points":[],"color":"#ffffff","width":1.0,"closed":true}"##;
        assert_eq!(session.receive(empty, &bridge), Received::Ignored);

        let mut open = stroke.clone();
        open.closed = false;
        let open_payload = PeerMessage::stroke_complete(&open).encode().unwrap();
        assert_eq!(session.receive(&open_payload, &bridge), Received::Ignored);
        assert_eq!(session.layout().len(), 1);

        assert_eq!(session.receive(r#"{"type":"clear_all"}"#, &bridge), Received::Cleared(1));
    }

    #[test]
    fn test_colors_cycle_per_stroke() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let first = draw_circle(&mut session, &bridge, Point2D::new(0.3, 0.5), 0.1);
        session.on_frame(None, DT, &bridge);
        let second = draw_circle(&mut session, &bridge, Point2D::new(0.7, 0.5), 0.1);

        let color = |report: &FrameReport| match &report.outgoing[0] {
            PeerMessage::StrokeComplete { color, .. } => *color,
            other => panic!("unexpected {:?}", other),
        };
        assert_ne!(color(&first), color(&second));
    }

    #[test]
    fn test_tick_moves_objects() {
        let bridge = OrthoBridge::default();
        let mut session = session();
        let id = draw_circle(&mut session, &bridge, Point2D::new(0.5, 0.5), 0.1)
            .created
            .unwrap();
        let before = session.layout().get(id).unwrap().rotation;
        for _ in 0..30 {
            session.tick(1.0 / 60.0);
        }
        assert_ne!(session.layout().get(id).unwrap().rotation, before);
    }
}
