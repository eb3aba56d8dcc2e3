//! Play mode wired to on-disk assets and the headless backend

use std::path::Path;

use dialogue_engine::prelude::*;
use dialogue_engine::render::HeadlessCommand;
use dialogue_engine::text::{HbCluster, TextResult};
use dialogue_engine::foundation::math::{Vec3, Vec4};
use tempfile::TempDir;

const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

const SCRIPT: &str = "\
state: a
text:
<<<
Hello
>>>
option: Go -> b
option: Stay -> a
endstate
state: b
text:
<<<
Bye
>>>
option: Done -> END
endstate
";

/// Write a data directory holding everything the default config names
fn data_dir(font: &[u8]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let config = PlayModeConfig::default();
    let root = temp_dir.path();

    let mut scene = Scene::default();
    scene.cameras.push(Camera::perspective(Vec3::new(0.0, 3.0, 8.0), 60.0, 1.0, 0.1, 100.0));
    let scene = ron::ser::to_string(&scene).unwrap();
    std::fs::write(root.join(&config.scene), scene).unwrap();

    std::fs::write(root.join("dusty-floor.opus"), b"OggS\0\x02OpusHead").unwrap();
    std::fs::write(root.join("honk.wav"), b"RIFF\0\0\0\0WAVEfmt ").unwrap();
    std::fs::write(root.join(&config.font), font).unwrap();
    std::fs::write(root.join(&config.script), SCRIPT).unwrap();
    temp_dir
}

fn system_font() -> Option<Vec<u8>> {
    SYSTEM_FONTS.iter().find_map(|path| std::fs::read(path).ok())
}

#[test]
fn test_missing_scene_is_asset_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut assets = DirectoryAssets::new(temp_dir.path());

    let result = PlayMode::new(&mut assets, HeadlessBackend::new(), PlayModeConfig::default());
    assert!(matches!(result, Err(ModeError::Asset(AssetError::NotFound(_)))));
}

#[test]
fn test_bad_font_releases_gpu_resources() {
    let temp_dir = data_dir(&[0; 32]);
    let mut assets = DirectoryAssets::new(temp_dir.path());
    let mut backend = HeadlessBackend::new();

    let failed = matches!(
        PlayMode::new(&mut assets, &mut backend, PlayModeConfig::default()),
        Err(ModeError::Text(TextError::FontLoad(_)))
    );
    assert!(failed);
    assert_eq!(backend.live_programs(), 0);
    assert_eq!(backend.live_buffers(), 0);
}

#[test]
fn test_config_errors_convert() {
    fn load(path: &Path) -> Result<PlayModeConfig, ModeError> {
        Ok(PlayModeConfig::load_from_file(path)?)
    }
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(load(&temp_dir.path().join("play.toml")), Err(ModeError::Config(_))));
}

#[test]
fn test_end_to_end_with_system_font() {
    let Some(font) = system_font() else {
        return;
    };
    let temp_dir = data_dir(&font);
    let mut assets = DirectoryAssets::new(temp_dir.path());
    let mut backend = HeadlessBackend::new();
    {
        let mut mode = PlayMode::new(&mut assets, &mut backend, PlayModeConfig::default()).unwrap();
        assert_eq!(mode.samples().len(), 2);
        assert_eq!(mode.navigator().state().cur_state, "a");

        mode.draw((800, 600)).unwrap();
        let commands = mode.text().backend().commands();
        assert!(matches!(commands.first(), Some(HeadlessCommand::Clear(_))));
        assert!(matches!(commands.last(), Some(HeadlessCommand::EndPass)));
        assert!(mode.text().backend().quad_count() > 0);

        let go = mode.layout(800).unwrap().options[0].top + 2.0;
        let click = InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            x: 120.0,
            y: go,
        };
        assert!(mode.handle_event(&click, (800, 600)));
        assert_eq!(mode.navigator().state().cur_state, "b");

        assert!(mode.handle_event(&InputEvent::KeyDown(KeyCode::Enter), (800, 600)));
        assert!(mode.navigator().is_finished());
        mode.draw((800, 600)).unwrap();
    }
    assert_eq!(backend.live_textures(), 0);
    assert_eq!(backend.live_programs(), 0);
    assert_eq!(backend.live_buffers(), 0);
}

#[test]
fn test_missing_script_with_system_font() {
    let Some(font) = system_font() else {
        return;
    };
    let temp_dir = data_dir(&font);
    std::fs::remove_file(temp_dir.path().join("dialogues.txt")).unwrap();
    let mut assets = DirectoryAssets::new(temp_dir.path());

    let result = PlayMode::new(&mut assets, HeadlessBackend::new(), PlayModeConfig::default());
    assert!(matches!(result, Err(ModeError::Dialogue(_))));
}

/// Fixed-width surface counting drawn lines
struct CountingSurface {
    advance_px: f32,
    lines: usize,
}

impl ClusterShaper for CountingSurface {
    fn shape_clusters(&self, text: &str) -> Vec<HbCluster> {
        text.char_indices()
            .map(|(start, ch)| HbCluster {
                byte_start: start,
                byte_end: start + ch.len_utf8(),
                advance_px: self.advance_px,
                is_space: ch == ' ' || ch == '\t',
            })
            .collect()
    }
}

impl TextSurface for CountingSurface {
    fn clear(&mut self, _color: Vec4) {}

    fn begin(&mut self, _screen_px: (u32, u32)) -> TextResult<()> {
        Ok(())
    }

    fn draw_text(&mut self, _text: &str, _x: f32, _baseline_y: f32, _color: Vec3) -> TextResult<()> {
        self.lines += 1;
        Ok(())
    }

    fn end(&mut self) {}
}

#[test]
fn test_sample_script_on_custom_surface() {
    let script = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/dialogues.txt");
    let graph = DialogueGraph::load_from_file(script).unwrap();
    let mut scene = Scene::default();
    scene.cameras.push(Camera::perspective(Vec3::zeros(), 60.0, 1.0, 0.1, 10.0));

    let surface = CountingSurface {
        advance_px: 12.0,
        lines: 0,
    };
    let mut mode = PlayMode::from_parts(PlayModeConfig::default(), surface, graph, scene, Vec::new()).unwrap();

    // Narrow window: every row wraps onto several lines
    mode.draw((400, 300)).unwrap();
    let narrow = mode.text().lines;
    let layout = mode.layout(400).unwrap();
    assert!(layout.options.iter().all(|row| !row.lines.is_empty()));
    assert_eq!(layout.options[2].lines.len(), 1);

    for row in &layout.options {
        let middle = (row.top + row.bottom) / 2.0;
        assert_eq!(layout.option_at(middle), Some(row.index));
    }
    assert!(narrow > 4);
}
