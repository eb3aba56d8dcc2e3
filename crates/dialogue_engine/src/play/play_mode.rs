//! Dialogue play mode
//!
//! Loads the scene, samples, font and script through an injected
//! [`AssetLoader`], then turns keyboard and pointer events into navigation
//! and draws the current node every frame.

use crate::assets::{AssetLoader, Scene, SoundSample};
use crate::config::PlayModeConfig;
use crate::dialogue::{validate, DialogueGraph};
use crate::foundation::math::Vec3;
use crate::input::{InputEvent, KeyCode, MouseButton};
use crate::render::TextRenderBackend;
use crate::text::{TextEngine, TextResult, TextSurface};
use crate::{Mode, ModeError};
use super::layout::DialogueLayout;
use super::navigation::DialogueNavigator;

/// Drawn in place of the dialogue when the current state names no node
pub const MISSING_NODE_MESSAGE: &str = "Dialogue node not found.";

/// Branching dialogue over a 3D scene
pub struct PlayMode<T: TextSurface> {
    config: PlayModeConfig,
    text: T,
    navigator: DialogueNavigator,
    scene: Scene,
    samples: Vec<SoundSample>,
    relative_mouse: bool,
}

impl<B: TextRenderBackend> PlayMode<TextEngine<B>> {
    /// Load every asset named by `config` and start at the script's start state
    ///
    /// # Arguments
    ///
    /// * `assets` - Source of the scene, samples, font and script
    /// * `backend` - GPU collaborator for the text engine
    /// * `config` - Asset names, layout, colours and gating rules
    ///
    /// # Errors
    ///
    /// Any asset, font or script load failure, or a scene without exactly
    /// one camera.
    pub fn new(assets: &mut dyn AssetLoader, backend: B, config: PlayModeConfig) -> Result<Self, ModeError> {
        let scene = assets.load_scene(&config.scene)?;
        let samples = config
            .samples
            .iter()
            .map(|name| assets.load_sample(name))
            .collect::<Result<Vec<_>, _>>()?;

        let font = assets.load_font(&config.font)?;
        let text = TextEngine::new(backend, font, config.font_pixel_size)?;

        let graph = DialogueGraph::load_from_file(assets.data_path(&config.script))?;

        Self::from_parts(config, text, graph, scene, samples)
    }
}

impl<T: TextSurface> PlayMode<T> {
    /// Assemble a play mode from already loaded parts
    ///
    /// # Errors
    ///
    /// [`AssetError::CameraCount`](crate::assets::AssetError::CameraCount)
    /// unless the scene has exactly one camera.
    pub fn from_parts(
        config: PlayModeConfig,
        text: T,
        graph: DialogueGraph,
        mut scene: Scene,
        samples: Vec<SoundSample>,
    ) -> Result<Self, ModeError> {
        scene.single_camera_mut()?;

        if config.validate_script {
            for issue in validate(&graph, &config.gating.end_sentinel) {
                log::warn!("Dialogue script: {}", issue);
            }
        }

        let navigator = DialogueNavigator::new(graph, config.gating.clone());
        log::info!(
            "Play mode ready: {} samples, starting at '{}'",
            samples.len(),
            navigator.state().cur_state
        );

        Ok(Self {
            config,
            text,
            navigator,
            scene,
            samples,
            relative_mouse: true,
        })
    }

    /// Layout of the current node for a window `viewport_width` pixels wide
    pub fn layout(&self, viewport_width: u32) -> Option<DialogueLayout> {
        let node = self.navigator.current_node()?;
        Some(DialogueLayout::compute(
            node,
            &self.text,
            &self.config.layout,
            viewport_width,
            &self.config.gating,
            self.navigator.is_unlocked(),
        ))
    }

    fn option_under_pointer(&self, y: f32, window_size: (u32, u32)) -> Option<usize> {
        self.layout(window_size.0)?.option_at(y)
    }

    fn draw_dialogue(&mut self, drawable_size: (u32, u32)) -> TextResult<()> {
        let palette = self.config.palette;
        let Some(layout) = self.layout(drawable_size.0) else {
            return self.text.draw_text(
                MISSING_NODE_MESSAGE,
                self.config.layout.margin_left,
                self.config.layout.start_y,
                Vec3::from(palette.missing),
            );
        };

        let body_color = Vec3::from(palette.body);
        for line in layout.body.iter().filter(|line| !line.text.is_empty()) {
            self.text.draw_text(&line.text, line.x, line.baseline, body_color)?;
        }

        let selected = self.navigator.selected();
        for row in &layout.options {
            let color = palette.option_color(row.index == selected);
            for line in row.lines.iter().filter(|line| !line.text.is_empty()) {
                self.text.draw_text(&line.text, line.x, line.baseline, color)?;
            }
        }
        Ok(())
    }

    /// Navigation state
    pub const fn navigator(&self) -> &DialogueNavigator {
        &self.navigator
    }

    /// Navigation state, mutably
    pub fn navigator_mut(&mut self) -> &mut DialogueNavigator {
        &mut self.navigator
    }

    /// The loaded scene
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Sound samples loaded with the scene
    pub fn samples(&self) -> &[SoundSample] {
        &self.samples
    }

    /// Text surface used for drawing
    pub const fn text(&self) -> &T {
        &self.text
    }

    /// Configuration in effect
    pub const fn config(&self) -> &PlayModeConfig {
        &self.config
    }

    /// Whether the host window should keep the pointer in relative mode
    pub const fn relative_mouse_mode(&self) -> bool {
        self.relative_mouse
    }

    /// Record the host window's pointer mode
    pub fn set_relative_mouse_mode(&mut self, relative: bool) {
        self.relative_mouse = relative;
    }
}

impl<T: TextSurface> Mode for PlayMode<T> {
    fn handle_event(&mut self, event: &InputEvent, window_size: (u32, u32)) -> bool {
        match *event {
            InputEvent::KeyDown(KeyCode::Escape) => {
                self.relative_mouse = false;
                true
            }
            InputEvent::KeyDown(KeyCode::Enter) => {
                self.navigator.confirm_selection();
                true
            }
            InputEvent::KeyDown(KeyCode::Up) => {
                self.navigator.move_selection(-1);
                true
            }
            InputEvent::KeyDown(KeyCode::Down) => {
                self.navigator.move_selection(1);
                true
            }
            InputEvent::MouseButtonDown { button: MouseButton::Left, y, .. } => {
                match self.option_under_pointer(y, window_size) {
                    Some(index) => {
                        self.navigator.select(index);
                        self.navigator.confirm_selection();
                        true
                    }
                    None => false,
                }
            }
            InputEvent::MouseMotion { y, .. } => match self.option_under_pointer(y, window_size) {
                Some(index) => self.navigator.select(index),
                None => false,
            },
            InputEvent::MouseButtonDown { .. } => false,
        }
    }

    fn draw(&mut self, drawable_size: (u32, u32)) -> Result<(), ModeError> {
        if let Ok(camera) = self.scene.single_camera_mut() {
            camera.set_aspect_from_size(drawable_size);
        }

        self.text.clear(self.config.palette.clear_color());
        self.text.begin(drawable_size)?;
        let drawn = self.draw_dialogue(drawable_size);
        self.text.end();
        drawn.map_err(ModeError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::assets::Camera;
    use crate::foundation::math::Vec4;
    use crate::text::testing::MonospaceShaper;
    use crate::text::{ClusterShaper, HbCluster};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Begin((u32, u32)),
        Text(String, f32, f32, Vec3),
        End,
    }

    /// Records draw calls; shapes with a 10px monospace grid
    struct RecordingSurface {
        shaper: MonospaceShaper,
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                shaper: MonospaceShaper::new(10.0),
                calls: Vec::new(),
            }
        }

        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Text(text, ..) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl ClusterShaper for RecordingSurface {
        fn shape_clusters(&self, text: &str) -> Vec<HbCluster> {
            self.shaper.shape_clusters(text)
        }
    }

    impl TextSurface for RecordingSurface {
        fn clear(&mut self, _color: Vec4) {
            self.calls.push(Call::Clear);
        }

        fn begin(&mut self, screen_px: (u32, u32)) -> TextResult<()> {
            self.calls.push(Call::Begin(screen_px));
            Ok(())
        }

        fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Vec3) -> TextResult<()> {
            self.calls.push(Call::Text(text.to_string(), x, baseline_y, color));
            Ok(())
        }

        fn end(&mut self) {
            self.calls.push(Call::End);
        }
    }

    const SCRIPT: &str = "\
start: intro
state: intro
text:
<<<
Hello there

traveller
>>>
option: [LOCKED]Open -> vault
option: Search -> end
option: Leave -> END
endstate
state: end
text:
<<<
A key.
>>>
option: Back -> intro
option: Nowhere -> missing
endstate
state: vault
endstate
";

    const WINDOW: (u32, u32) = (800, 600);

    fn scene_with_cameras(count: usize) -> Scene {
        let camera = Camera::perspective(Vec3::new(0.0, 2.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        Scene {
            cameras: vec![camera; count],
        }
    }

    fn play_mode() -> PlayMode<RecordingSurface> {
        PlayMode::from_parts(
            PlayModeConfig::default(),
            RecordingSurface::new(),
            DialogueGraph::parse(SCRIPT).unwrap(),
            scene_with_cameras(1),
            Vec::new(),
        )
        .unwrap()
    }

    fn click(y: f32) -> InputEvent {
        InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            x: 100.0,
            y,
        }
    }

    #[test]
    fn test_camera_count_is_checked() {
        for count in [0, 2] {
            let result = PlayMode::from_parts(
                PlayModeConfig::default(),
                RecordingSurface::new(),
                DialogueGraph::parse(SCRIPT).unwrap(),
                scene_with_cameras(count),
                Vec::new(),
            );
            assert!(matches!(
                result,
                Err(ModeError::Asset(crate::assets::AssetError::CameraCount(n))) if n == count
            ));
        }
    }

    #[test]
    fn test_draw_current_node() {
        let mut mode = play_mode();
        mode.draw(WINDOW).unwrap();

        let calls = &mode.text().calls;
        assert_eq!(calls[0], Call::Clear);
        assert_eq!(calls[1], Call::Begin(WINDOW));
        assert_eq!(calls.last(), Some(&Call::End));
        // Blank body line and blanked locked label are not drawn
        assert_eq!(mode.text().texts(), ["Hello there", "traveller", "Search", "Leave"]);

        // Option 0 is selected, so "Leave" uses the plain option colour
        let leave = calls.iter().find_map(|call| match call {
            Call::Text(text, x, y, color) if text == "Leave" => Some((*x, *y, *color)),
            _ => None,
        });
        let (x, y, color) = leave.unwrap();
        assert_relative_eq!(x, 92.0);
        // Body baselines 100, 142, 184, 226; options start at 298
        assert_relative_eq!(y, 298.0 + 2.0 * 42.0);
        assert_eq!(color, Vec3::zeros());
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut mode = play_mode();
        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), WINDOW));
        assert_eq!(mode.navigator().state().cur_state, "intro");

        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Down), WINDOW));
        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), WINDOW));
        assert_eq!(mode.navigator().state().cur_state, "end");
        assert!(mode.navigator().is_unlocked());

        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Up), WINDOW));
        assert_eq!(mode.navigator().selected(), 1);
    }

    #[test]
    fn test_click_selects_and_confirms() {
        let mut mode = play_mode();
        let layout = mode.layout(WINDOW.0).unwrap();
        let search = &layout.options[1];

        assert!(mode.handle_event(&click(search.top + 1.0), WINDOW));
        assert_eq!(mode.navigator().state().cur_state, "end");

        // Above the options nothing is hit
        assert!(!mode.handle_event(&click(10.0), WINDOW));
        assert_eq!(mode.navigator().state().cur_state, "end");
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut mode = play_mode();
        let y = mode.layout(WINDOW.0).unwrap().options[2].top + 1.0;
        let right = InputEvent::MouseButtonDown {
            button: MouseButton::Right,
            x: 100.0,
            y,
        };
        assert!(!mode.handle_event(&right, WINDOW));
        assert!(!mode.navigator().is_finished());
    }

    #[test]
    fn test_hover_only_selects() {
        let mut mode = play_mode();
        let y = mode.layout(WINDOW.0).unwrap().options[2].top + 5.0;

        assert!(mode.handle_event(&InputEvent::MouseMotion { x: 0.0, y }, WINDOW));
        assert_eq!(mode.navigator().selected(), 2);
        assert!(!mode.navigator().is_finished());
        assert!(!mode.handle_event(&InputEvent::MouseMotion { x: 0.0, y: 5.0 }, WINDOW));
        assert_eq!(mode.navigator().selected(), 2);
    }

    #[test]
    fn test_hit_test_matches_drawn_rows() {
        let mut mode = play_mode();
        mode.draw(WINDOW).unwrap();
        let drawn: Vec<(String, f32)> = mode
            .text()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(text, _, y, _) => Some((text.clone(), *y)),
                _ => None,
            })
            .collect();

        let layout = mode.layout(WINDOW.0).unwrap();
        for (text, baseline) in drawn.iter().filter(|(text, _)| text == "Search" || text == "Leave") {
            let expected = if text == "Search" { 1 } else { 2 };
            assert_eq!(layout.option_at(*baseline), Some(expected));
        }
    }

    #[test]
    fn test_missing_node_message() {
        let mut mode = play_mode();
        mode.handle_event(&InputEvent::KeyDown(KeyCode::Down), WINDOW);
        mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), WINDOW);
        mode.handle_event(&InputEvent::KeyDown(KeyCode::Down), WINDOW);
        mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), WINDOW);
        assert_eq!(mode.navigator().state().cur_state, "missing");

        assert!(mode.layout(WINDOW.0).is_none());
        assert!(!mode.handle_event(&click(300.0), WINDOW));
        assert!(!mode.handle_event(&InputEvent::MouseMotion { x: 0.0, y: 300.0 }, WINDOW));

        mode.draw(WINDOW).unwrap();
        assert_eq!(mode.text().texts(), [MISSING_NODE_MESSAGE]);
        assert!(mode.text().calls.contains(&Call::Text(
            MISSING_NODE_MESSAGE.to_string(),
            64.0,
            100.0,
            Vec3::new(1.0, 0.4, 0.4),
        )));
    }

    #[test]
    fn test_escape_releases_pointer() {
        let mut mode = play_mode();
        assert!(mode.relative_mouse_mode());
        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Escape), WINDOW));
        assert!(!mode.relative_mouse_mode());
        assert_eq!(mode.navigator().state().cur_state, "intro");
    }

    #[test]
    fn test_draw_updates_camera_aspect() {
        let mut mode = play_mode();
        mode.update(0.016);
        mode.draw((1600, 800)).unwrap();
        assert_relative_eq!(mode.scene().cameras[0].aspect, 2.0);
    }
}
