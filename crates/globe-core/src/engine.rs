//! The per-instance globe engine: owns the scene and all mutable state, and
//! exposes the operations the web frontend forwards from DOM events, timers
//! and the JS host.

use crate::capabilities::RendererCapabilities;
use crate::config::{RenderConfig, SpeedSlider};
use crate::geo::{vec3_to_lat_lng, GeoPoint};
use crate::interaction::{DragSettings, GestureEnd, PointerMachine};
use crate::lifecycle::{Teardown, TeardownReport};
use crate::markers::{Marker, MarkerHit, MarkerId, RebuildReport};
use crate::scene::SceneGraph;
use crate::selection::{SelectionCallback, SelectionHub, SelectionObserver, SubscriptionId};
use crate::solar::SolarLighting;
use crate::texture::TextureStatus;
use crate::timing::FpsMeter;
use chrono::{DateTime, Utc};
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    Base,
    EdgeHighlight,
    AntiAlias,
}

/// Fixed composition order for every frame.
pub const RENDER_PASSES: [RenderPass; 3] = [
    RenderPass::Base,
    RenderPass::EdgeHighlight,
    RenderPass::AntiAlias,
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// New FPS estimate if a sampling window closed on this frame.
    pub fps: Option<f32>,
    pub autorotated: bool,
    pub passes: &'static [RenderPass],
}

/// Snapshot shown in the debug overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugTelemetry {
    pub fps: f32,
    pub rotation_speed: f32,
    pub paused: bool,
    pub texture: TextureStatus,
    pub markers: usize,
    pub facing: GeoPoint,
    pub subsolar: GeoPoint,
}

impl DebugTelemetry {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {}", self.fps.round() as i32),
            format!("Rotation speed: {:.5}", self.rotation_speed),
            format!("Paused: {}", if self.paused { "yes" } else { "no" }),
        ];
        match self.texture {
            TextureStatus::Loaded {
                width,
                height,
                source,
            } => {
                lines.push(format!("Texture: loaded ({:?})", source));
                lines.push(format!("Image: {} x {}", width, height));
            }
            TextureStatus::Pending => lines.push("Texture: pending".to_string()),
            TextureStatus::Missing => lines.push("Texture: missing".to_string()),
        }
        lines.push(format!("Markers: {}", self.markers));
        lines.push(format!(
            "Facing: {:.1}, {:.1}",
            self.facing.lat, self.facing.lng
        ));
        lines.push(format!(
            "Sun: {:.1}, {:.1}",
            self.subsolar.lat, self.subsolar.lng
        ));
        lines
    }
}

#[derive(Debug)]
pub struct GlobeEngine {
    pub scene: SceneGraph,
    pub config: RenderConfig,
    pub capabilities: RendererCapabilities,
    pointer: PointerMachine,
    slider: SpeedSlider,
    fps: FpsMeter,
    selection: SelectionHub,
    texture_status: TextureStatus,
    torn_down: bool,
}

impl Default for GlobeEngine {
    fn default() -> Self {
        Self::new(RendererCapabilities::default())
    }
}

impl GlobeEngine {
    pub fn new(capabilities: RendererCapabilities) -> Self {
        let config = RenderConfig::default();
        Self {
            scene: SceneGraph::compose(),
            config,
            capabilities,
            pointer: PointerMachine::new(DragSettings::default()),
            slider: SpeedSlider::new(&config),
            fps: FpsMeter::new(),
            selection: SelectionHub::new(),
            texture_status: TextureStatus::Pending,
            torn_down: false,
        }
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Advance one display frame: sun, FPS, autorotation, then the pass list.
    pub fn tick(&mut self, now_ms: f64, utc: &DateTime<Utc>) -> Option<FrameReport> {
        if self.torn_down {
            return None;
        }
        self.refresh_sun(utc);
        let fps = self.fps.frame(now_ms);
        let autorotated = self.config.autorotates(self.pointer.is_dragging());
        if autorotated {
            self.scene.transforms.autorotate(self.config.rotation_speed);
        }
        Some(FrameReport {
            fps,
            autorotated,
            passes: &RENDER_PASSES,
        })
    }

    pub fn refresh_sun(&mut self, utc: &DateTime<Utc>) -> SolarLighting {
        self.scene.lighting = SolarLighting::compute(utc, &self.scene.transforms.globe);
        self.scene.lighting
    }

    // ---- pointer ----

    pub fn pointer_down(&mut self, pos: Vec2) {
        if self.torn_down {
            return;
        }
        self.pointer.pointer_down(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> Option<(f32, f32)> {
        if self.torn_down {
            return None;
        }
        self.pointer.pointer_move(pos, &mut self.scene.transforms)
    }

    /// Finish a gesture. Ending a drag relights the globe for its final
    /// orientation. A click over a marker selects it; drags never do.
    pub fn pointer_up(
        &mut self,
        pos: Vec2,
        viewport: Vec2,
        utc: &DateTime<Utc>,
    ) -> Option<MarkerHit> {
        if self.torn_down {
            return None;
        }
        if self.pointer.is_dragging() {
            self.refresh_sun(utc);
        }
        match self.pointer.pointer_up(pos) {
            GestureEnd::Click(at) => self.click(at, viewport),
            GestureEnd::Drag | GestureEnd::Ignored => None,
        }
    }

    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer.cancel()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    pub fn set_pitch_enabled(&mut self, enabled: bool) {
        self.pointer.settings.pitch_enabled = enabled;
    }

    /// Nearest marker under a canvas pixel, without side effects.
    pub fn pick(&self, pos: Vec2, viewport: Vec2) -> Option<MarkerHit> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let (origin, dir) = self.scene.camera.screen_to_world_ray(pos, viewport);
        if !origin.is_finite() || !dir.is_finite() {
            return None;
        }
        let globe = &self.scene.transforms.globe;
        self.scene
            .markers
            .pick_local(globe.to_local(origin), globe.to_local(dir))
    }

    /// Resolve a click: pulse the hit marker and notify the host.
    pub fn click(&mut self, pos: Vec2, viewport: Vec2) -> Option<MarkerHit> {
        let hit = self.pick(pos, viewport)?;
        self.scene.markers.begin_pulse(hit.id);
        log::info!(
            "[marker] selected {:.3}, {:.3}",
            hit.point.lat,
            hit.point.lng
        );
        self.selection.notify(hit.point);
        Some(hit)
    }

    /// Restore a pulsed marker. Stale ids (rebuilt or disposed) are ignored.
    pub fn end_pulse(&mut self, id: MarkerId) -> bool {
        self.scene.markers.end_pulse(id)
    }

    // ---- markers and selection ----

    pub fn set_markers(&mut self, points: Option<&[GeoPoint]>) -> RebuildReport {
        if self.torn_down {
            return RebuildReport::default();
        }
        let report = self.scene.set_markers(points);
        log::info!(
            "[marker] rebuilt: {} created, {} released, {} skipped",
            report.created,
            report.released,
            report.skipped
        );
        report
    }

    pub fn set_selected_point(&mut self, point: Option<GeoPoint>) -> bool {
        self.selection.set_selected(point)
    }

    #[inline]
    pub fn selected_point(&self) -> Option<GeoPoint> {
        self.selection.selected()
    }

    /// The marker matching the host's selected point, if one is built.
    pub fn selected_marker(&self) -> Option<&Marker> {
        let point = self.selection.selected()?;
        self.scene.markers.find_by_point(&point)
    }

    pub fn set_on_marker_click(&mut self, callback: Option<SelectionCallback>) {
        self.selection.set_on_marker_click(callback);
    }

    pub fn subscribe(&mut self, observer: SelectionObserver) -> SubscriptionId {
        self.selection.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.selection.unsubscribe(id)
    }

    // ---- controls ----

    pub fn slider_input(&mut self, value: f32) {
        self.slider.input(value, &mut self.config);
    }

    /// Slider released: commit the speed and refresh the sun.
    pub fn slider_commit(&mut self, value: f32, utc: &DateTime<Utc>) -> f32 {
        self.slider.input(value, &mut self.config);
        let speed = self.slider.commit(&mut self.config);
        self.refresh_sun(utc);
        speed
    }

    #[inline]
    pub fn slider_draft(&self) -> f32 {
        self.slider.draft()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.config.toggle_pause()
    }

    /// Toggle the debug overlay together with the sun helper.
    pub fn toggle_debug(&mut self) -> bool {
        let visible = self.config.toggle_debug();
        self.scene.sun_helper_visible = visible;
        visible
    }

    // ---- texture ----

    pub fn set_texture_status(&mut self, status: TextureStatus) {
        if status.is_loaded() {
            self.scene.install_map();
        }
        self.texture_status = status;
    }

    #[inline]
    pub fn texture_status(&self) -> TextureStatus {
        self.texture_status
    }

    pub fn telemetry(&self) -> DebugTelemetry {
        let globe = &self.scene.transforms.globe;
        let facing = vec3_to_lat_lng(globe.to_local(Vec3::Z));
        DebugTelemetry {
            fps: self.fps.fps(),
            rotation_speed: self.config.rotation_speed,
            paused: self.config.paused,
            texture: self.texture_status,
            markers: self.scene.markers.len(),
            facing,
            subsolar: self.scene.lighting.subsolar,
        }
    }

    /// Release everything the engine owns. Only the first call does work;
    /// `extra` runs the frontend's own steps (listeners, timers, GPU objects)
    /// after the engine's.
    pub fn teardown<'a>(
        &'a mut self,
        extra: impl FnOnce(Teardown<'a>) -> Teardown<'a>,
    ) -> Option<TeardownReport> {
        if self.torn_down {
            return None;
        }
        self.torn_down = true;
        let Self {
            scene,
            pointer,
            selection,
            ..
        } = self;
        let steps = Teardown::new()
            .step("pointer", move || {
                pointer.cancel();
                Ok(())
            })
            .step("selection", move || {
                selection.clear();
                Ok(())
            })
            .step("scene", move || {
                let released = scene.dispose();
                log::info!("[teardown] released {} scene resources", released);
                let live = scene.ledger.live();
                if live > 0 {
                    anyhow::bail!("{} resources still live", live);
                }
                Ok(())
            });
        Some(extra(steps).run())
    }
}
