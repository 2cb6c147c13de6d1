use std::sync::Arc;
use std::time::Instant;

use eframe::egui_glow;
use eframe::glow::{self, HasContext as _};
use egui::mutex::Mutex;
use glcourse_camera::{Camera, CameraMovement};
use glcourse_common::{AppConfig, AssetConfig};
use glcourse_input::{Action, FrameClock, MouseLook, MovementKeys};
use glcourse_render_glow::GlowGl;

use crate::scenes::{Chapter, Scene};

/// egui reports scroll in points; one wheel notch is about this many.
const SCROLL_POINTS_PER_NOTCH: f32 = 50.0;
const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];

const MOVEMENT_KEYS: [(egui::Key, CameraMovement); 5] = [
    (egui::Key::W, CameraMovement::Forward),
    (egui::Key::S, CameraMovement::Backward),
    (egui::Key::A, CameraMovement::Left),
    (egui::Key::D, CameraMovement::Right),
    (egui::Key::Space, CameraMovement::Up),
];

/// The active scene, shared with paint callbacks. `None` after a failed build or on exit.
type SharedScene = Arc<Mutex<Option<Box<dyn Scene>>>>;

pub struct DemoApp {
    gl: Arc<GlowGl>,
    assets: AssetConfig,
    /// Camera as configured, restored by "Reset camera".
    home: Camera,
    chapter: Chapter,
    scene: SharedScene,
    scene_error: Option<String>,
    camera: Camera,
    look: MouseLook,
    keys: MovementKeys,
    clock: FrameClock,
    started: Instant,
}

impl DemoApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        chapter: Chapter,
    ) -> anyhow::Result<Self> {
        let Some(gl) = cc.gl.clone() else {
            anyhow::bail!("eframe was started without the glow backend");
        };
        let home = Camera::from_config(&config.camera)?;
        let mut app = Self {
            gl: Arc::new(GlowGl::new(gl)),
            camera: home.clone(),
            home,
            assets: config.assets,
            chapter,
            scene: Arc::new(Mutex::new(None)),
            scene_error: None,
            look: MouseLook::new(),
            keys: MovementKeys::new(),
            clock: FrameClock::default().with_max_delta(0.25),
            started: Instant::now(),
        };
        app.switch_chapter(chapter);
        Ok(app)
    }

    fn switch_chapter(&mut self, chapter: Chapter) {
        self.chapter = chapter;
        let mut slot = self.scene.lock();
        // release the old scene's GPU objects before creating new ones
        *slot = None;
        match chapter.build(self.gl.clone(), &self.assets) {
            Ok(scene) => {
                *slot = Some(scene);
                self.scene_error = None;
            }
            Err(e) => {
                tracing::error!("chapter '{}' failed to load: {e:#}", chapter.title());
                self.scene_error = Some(format!("{e:#}"));
            }
        }
        self.keys.clear();
        self.look.release();
    }

    /// Turns this frame's egui input into actions.
    fn collect_actions(&mut self, ctx: &egui::Context, response: &egui::Response) -> Vec<Action> {
        let mut actions = Vec::new();

        if !ctx.wants_keyboard_input() {
            ctx.input(|i| {
                for (key, movement) in MOVEMENT_KEYS {
                    self.keys.set(movement, i.key_down(key));
                }
                self.keys.set(CameraMovement::Down, i.modifiers.ctrl);
                if i.key_pressed(egui::Key::Escape) {
                    actions.push(Action::Quit);
                }
            });
        }
        actions.extend(self.keys.actions());

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.look.press();
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.look.release();
        }
        if let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) {
            actions.extend(self.look.look_action(pos.x, pos.y));
        }

        if response.hovered() {
            let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                actions.push(Action::Zoom(scroll / SCROLL_POINTS_PER_NOTCH));
            }
        }
        actions
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        let mut selected = self.chapter;
        egui::SidePanel::left("chapters")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("glcourse");
                ui.separator();
                for chapter in Chapter::ALL {
                    ui.selectable_value(&mut selected, chapter, chapter.title());
                }
                ui.separator();

                match self.clock.fps() {
                    Some(fps) => ui.label(format!("FPS: {fps:.1}")),
                    None => ui.label("FPS: measuring"),
                };

                if self.chapter.uses_camera() {
                    let p = self.camera.position;
                    ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                    ui.label(format!(
                        "Yaw {:.1}°  Pitch {:.1}°  Zoom {:.1}°",
                        self.camera.yaw(),
                        self.camera.pitch(),
                        self.camera.zoom()
                    ));
                    if ui.button("Reset camera").clicked() {
                        self.camera = self.home.clone();
                    }
                    ui.small("WASD move, Space/Ctrl up/down, drag to look, scroll to zoom");
                }

                if let Some(err) = &self.scene_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
                if let Some(scene) = self.scene.lock().as_ref() {
                    for note in scene.notes() {
                        ui.colored_label(egui::Color32::YELLOW, note);
                    }
                }
            });
        if selected != self.chapter {
            self.switch_chapter(selected);
        }
    }

    fn paint_scene(&self, ui: &mut egui::Ui, rect: egui::Rect) {
        let aspect = rect.width() / rect.height().max(1.0);
        let time = self.started.elapsed().as_secs_f32();
        let frame = self.chapter.frame(&self.camera, time, aspect);
        let scene = self.scene.clone();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let gl = painter.gl();
                let [r, g, b] = CLEAR_COLOR;
                unsafe {
                    gl.enable(glow::DEPTH_TEST);
                    gl.clear_color(r, g, b, 1.0);
                    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
                }
                if let Some(scene) = scene.lock().as_mut() {
                    scene.paint(&frame);
                }
                // egui draws its own UI without depth testing
                unsafe { gl.disable(glow::DEPTH_TEST) };
            })),
        };
        ui.painter().add(callback);
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let delta_time = self.clock.tick();

        self.side_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

            for action in self.collect_actions(ctx, &response) {
                if action == Action::Quit {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                } else if self.chapter.uses_camera() {
                    action.apply_to_camera(&mut self.camera, delta_time);
                }
            }

            self.paint_scene(ui, rect);
        });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        // GPU objects must go while the context is still current
        self.scene.lock().take();
    }
}
