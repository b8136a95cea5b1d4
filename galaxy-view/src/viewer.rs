//! Interactive galaxy viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the galaxy session (parameters,
//! scene, random source), the orbit camera and the egui point renderer, and
//! implements [`eframe::App`] to drive them once per frame.

use eframe::App;
use galaxy_core::{
    camera::OrbitCamera,
    color::Rgb,
    config::GalaxyParams,
    controls::{COLOR_CONTROLS, CONTROLS, Edit, color_value, numeric_value},
    error::GalaxyError,
    render_loop::{FrameTime, RenderLoop},
    session::GalaxySession,
    viewport::Viewport,
};
use glam::Vec2;

use crate::point_renderer::EguiPointRenderer;

/// Main application state for the galaxy viewer.
///
/// The per-frame update is:
/// 1. Build the control panel; widget changes are staged into the draft.
/// 2. Commit the draft once no pointer button is held and no field has
///    keyboard focus, regenerating the galaxy if anything changed.
/// 3. Track the canvas size, feed pointer input to the camera, tick the
///    render loop and paint the resulting mesh.
///
/// ### Fields
/// - `session` - Parameter store, scene and random source.
/// - `renderer` - Backend holding the uploaded point cloud.
/// - `camera` - Orbit camera moved by pointer input.
/// - `viewport` - Last known canvas size and pixel ratio.
/// - `render_loop` - Frame counter, clock and fps readout.
/// - `fatal` - Message of an unrecoverable render failure, shown modally.
pub struct Viewer {
    session: GalaxySession,
    renderer: EguiPointRenderer,
    camera: OrbitCamera,
    viewport: Viewport,
    render_loop: RenderLoop,
    fatal: Option<String>,
}

impl Viewer {
    /// Creates a viewer with the default galaxy already generated.
    ///
    /// ### Errors
    /// If the first generation cannot be uploaded.
    pub fn new() -> Result<Self, GalaxyError> {
        Self::from_session(GalaxySession::new(GalaxyParams::default())?)
    }

    fn from_session(mut session: GalaxySession) -> Result<Self, GalaxyError> {
        let mut renderer = EguiPointRenderer::default();
        session.regenerate(&mut renderer)?;

        // Placeholder surface until the first frame reports the real canvas.
        let mut viewport = Viewport::new(800.0, 600.0, 1.0);
        let mut camera = OrbitCamera::galaxy_default(viewport.aspect());
        viewport.resize(800.0, 600.0, 1.0, &mut camera, &mut renderer);

        Ok(Self {
            session,
            renderer,
            camera,
            viewport,
            render_loop: RenderLoop::new(),
            fatal: None,
        })
    }

    /// Helper to draw one slider bound to a numeric control.
    fn control_slider(&mut self, ui: &mut egui::Ui, index: usize) {
        let spec = CONTROLS[index];
        let Some(mut value) = numeric_value(self.session.store().draft(), spec.field) else {
            return;
        };

        let decimals = if spec.is_integer() {
            0
        } else {
            (-spec.step.log10()).ceil().max(0.0) as usize
        };
        let slider = egui::Slider::new(&mut value, spec.min..=spec.max)
            .text(spec.field.name())
            .step_by(spec.step)
            .max_decimals(decimals);

        if ui.add(slider).changed()
            && let Err(e) = self.session.stage(Edit::Number(spec.field, value))
        {
            tracing::warn!(error = %e, "could not stage edit");
        }
    }

    /// Builds the right-hand parameter panel.
    fn ui_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("controls_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Galaxy");
                ui.separator();

                for i in 0..CONTROLS.len() {
                    self.control_slider(ui, i);
                }

                ui.separator();
                for field in COLOR_CONTROLS {
                    let Some(color) = color_value(self.session.store().draft(), field) else {
                        continue;
                    };
                    let mut rgb = color.to_bytes();
                    ui.horizontal(|ui| {
                        let changed =
                            egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed();
                        ui.label(field.name());
                        if changed
                            && let Err(e) = self
                                .session
                                .stage(Edit::Color(field, Rgb::from_bytes(rgb)))
                        {
                            tracing::warn!(error = %e, "could not stage edit");
                        }
                    });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Reset to defaults").clicked() {
                        self.session.reset_to_defaults();
                    }
                    if ui.button("Regenerate").clicked() {
                        self.regenerate();
                    }
                });
            });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{:.0} fps", self.render_loop.fps()));
                ui.separator();
                ui.label(format!("generation {}", self.session.generations()));
                ui.label(format!("points = {}", self.session.scene().point_count()));
                ui.label(format!("drawn = {}", self.renderer.drawn()));
            });
        });
    }

    /// Shows the unrecoverable error, if any.
    fn ui_fatal(&self, ctx: &egui::Context) {
        let Some(message) = &self.fatal else {
            return;
        };
        egui::Window::new("Render error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message.as_str());
            });
    }

    fn regenerate(&mut self) {
        if let Err(e) = self.session.regenerate(&mut self.renderer) {
            self.fail(e);
        }
    }

    fn fail(&mut self, e: GalaxyError) {
        tracing::error!(error = %e, "galaxy generation failed");
        self.fatal = Some(e.to_string());
    }

    /// Commits staged edits once the user has let go of every widget.
    fn commit_finished_edits(&mut self, ctx: &egui::Context) {
        if !self.session.store().is_dirty() {
            return;
        }
        let interacting =
            ctx.input(|i| i.pointer.any_down()) || ctx.memory(|m| m.focused().is_some());
        if interacting {
            return;
        }

        match self.session.commit(&mut self.renderer) {
            Ok(_) => {}
            // Rejected drafts are already logged and rolled back by the store.
            Err(GalaxyError::Param(_)) => {}
            Err(e) => self.fail(e),
        }
    }

    /// Applies a canvas size or pixel density change.
    fn track_viewport(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        let device_ratio = ctx
            .native_pixels_per_point()
            .unwrap_or_else(|| ctx.pixels_per_point());
        let capped = galaxy_core::viewport::capped_pixel_ratio(device_ratio);

        let size = rect.size();
        if size.x != self.viewport.width
            || size.y != self.viewport.height
            || capped != self.viewport.pixel_ratio
        {
            self.viewport.resize(
                size.x,
                size.y,
                device_ratio,
                &mut self.camera,
                &mut self.renderer,
            );
        }
        self.renderer.set_origin(rect.min);
    }

    /// Maps pointer input on the canvas to the orbit controls.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let height = response.rect.height();
        let delta = response.drag_delta();
        let delta = Vec2::new(delta.x, delta.y);

        if response.dragged_by(egui::PointerButton::Primary) {
            self.camera.rotate_by_pixels(delta, height);
        } else if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan_by_pixels(delta, height);
        }

        if response.hovered() {
            let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                // Scrolling up moves closer.
                self.camera.zoom(0.95f32.powf(scroll / 50.0));
            }
        }
    }

    /// Builds the central canvas and draws the galaxy into it.
    fn ui_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.track_viewport(ctx, rect);
                self.handle_canvas_input(ctx, &response);

                let now = FrameTime(ctx.input(|i| i.time));
                self.render_loop.tick(
                    now,
                    &mut self.camera,
                    self.session.scene(),
                    &mut self.renderer,
                );

                painter.rect_filled(rect, 0.0, self.renderer.background());
                let mesh = self.renderer.take_mesh();
                if !mesh.is_empty() {
                    painter.add(egui::Shape::mesh(mesh));
                }
            });

        // Keep frames coming, like a display-refresh callback.
        ctx.request_repaint();
    }
}

impl App for Viewer {
    /// eframe callback that runs one frame of the viewer.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_controls_panel(ctx);
        self.commit_finished_edits(ctx);
        self.ui_status_bar(ctx);
        self.ui_canvas(ctx);
        self.ui_fatal(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::controls::Field;

    fn viewer() -> Viewer {
        let session = GalaxySession::with_seed(GalaxyParams::default(), 11).unwrap();
        Viewer::from_session(session).unwrap()
    }

    #[test]
    fn new_viewer_starts_with_default_galaxy_uploaded() {
        let viewer = viewer();
        assert_eq!(viewer.session.scene().point_count(), 10_000);
        assert_eq!(viewer.session.generations(), 1);
        assert_eq!(viewer.renderer.uploaded_count(), 1);
        assert!(viewer.fatal.is_none());
    }

    #[test]
    fn regenerate_replaces_upload_without_leaking() {
        let mut viewer = viewer();
        let before = viewer.session.scene().cloud_id();

        viewer.regenerate();
        viewer.regenerate();

        assert_ne!(viewer.session.scene().cloud_id(), before);
        assert_eq!(viewer.renderer.uploaded_count(), 1);
        assert_eq!(viewer.session.generations(), 3);
    }

    #[test]
    fn failed_generation_is_recorded_as_fatal() {
        let session = GalaxySession::with_seed(GalaxyParams::default(), 11).unwrap();
        let mut viewer = Viewer::from_session(session).unwrap();
        viewer.renderer = EguiPointRenderer::with_budget(100);

        viewer.regenerate();

        let message = viewer.fatal.as_deref().unwrap();
        assert!(message.contains("out of memory"), "{message}");
        assert_eq!(viewer.session.scene().point_count(), 0);
    }

    #[test]
    fn staged_edit_waits_for_commit() {
        let mut viewer = viewer();
        viewer
            .session
            .stage(Edit::Number(Field::Count, 300.0))
            .unwrap();
        assert_eq!(viewer.session.scene().point_count(), 10_000);

        assert!(viewer.session.commit(&mut viewer.renderer).unwrap());
        assert_eq!(viewer.session.scene().point_count(), 300);
    }

    /// Runs one egui frame that only evaluates the commit rule.
    fn run_frame(
        viewer: &mut Viewer,
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        before_commit: impl Fn(&egui::Context),
    ) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            before_commit(ctx);
            viewer.commit_finished_edits(ctx);
        });
    }

    fn primary_button(pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(20.0, 20.0),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn edit_is_committed_when_pointer_is_released() {
        let mut viewer = viewer();
        let ctx = egui::Context::default();
        viewer
            .session
            .stage(Edit::Number(Field::Count, 300.0))
            .unwrap();

        run_frame(&mut viewer, &ctx, vec![primary_button(true)], |_| {});
        assert_eq!(viewer.session.scene().point_count(), 10_000);
        assert_eq!(viewer.session.generations(), 1);

        run_frame(&mut viewer, &ctx, vec![primary_button(false)], |_| {});
        assert_eq!(viewer.session.scene().point_count(), 300);
        assert_eq!(viewer.session.generations(), 2);

        // Nothing left to commit on the following frame.
        run_frame(&mut viewer, &ctx, Vec::new(), |_| {});
        assert_eq!(viewer.session.generations(), 2);
    }

    #[test]
    fn edit_waits_while_a_field_has_focus() {
        let mut viewer = viewer();
        let ctx = egui::Context::default();
        let field = egui::Id::new("typed_value");
        viewer
            .session
            .stage(Edit::Number(Field::Branches, 8.0))
            .unwrap();

        run_frame(&mut viewer, &ctx, Vec::new(), |ctx| {
            ctx.memory_mut(|m| m.request_focus(field));
        });
        assert_eq!(viewer.session.store().committed().branches, 5);
        assert_eq!(viewer.session.generations(), 1);

        run_frame(&mut viewer, &ctx, Vec::new(), |ctx| {
            ctx.memory_mut(|m| m.surrender_focus(field));
        });
        assert_eq!(viewer.session.store().committed().branches, 8);
        assert_eq!(viewer.session.generations(), 2);
    }

    #[test]
    fn resize_follows_canvas_size() {
        let mut viewer = viewer();
        viewer.viewport.resize(
            1920.0,
            1080.0,
            3.0,
            &mut viewer.camera,
            &mut viewer.renderer,
        );
        assert_eq!(viewer.camera.aspect, 1920.0 / 1080.0);
        assert_eq!(viewer.viewport.pixel_ratio, 2.0);
    }
}
