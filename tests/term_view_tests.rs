//! Rendering engine snapshots into a framebuffer

use blockfall::engine::{Engine, Settings};
use blockfall::input::HeldKeys;
use blockfall::term::{FrameBuffer, GameView, Hud, Viewport};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut out = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            out.push(fb.get(x, y).map_or(' ', |c| c.ch));
        }
        out.push('\n');
    }
    out
}

fn count(fb: &FrameBuffer, ch: char) -> usize {
    fb.cells().iter().filter(|c| c.ch == ch).count()
}

#[test]
fn test_title_before_start() {
    let engine = Engine::new(Settings::default(), 1);
    let fb = GameView::default().render(
        &engine.snapshot(),
        &Hud { best_score: 1234 },
        Viewport::new(80, 24),
    );
    let text = screen_text(&fb);
    assert!(text.contains("BLOCKFALL"));
    assert!(text.contains("ENTER start"));
    assert!(text.contains("1234"));
    assert!(!text.contains("SCORE"));
}

#[test]
fn test_locked_piece_and_ghost_after_hard_drop() {
    let mut engine = Engine::new(Settings::default(), 99);
    engine.start(99);
    engine.tick(0, &HeldKeys::from_names(["Space"]));
    engine.tick(16, &HeldKeys::new());

    let view = GameView::default();
    let hud = Hud {
        best_score: engine.best_score(),
    };
    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&engine.snapshot(), &hud, Viewport::new(80, 24), &mut fb);

    // Two columns per cell. The new piece is still in the hidden rows.
    assert_eq!(count(&fb, '█'), 8);
    assert_eq!(count(&fb, '░'), 8);

    let text = screen_text(&fb);
    assert!(text.contains("SCORE"));
    assert!(text.contains("40"));
    assert!(text.contains("NEXT"));
    assert!(!text.contains("PAUSED"));
}

#[test]
fn test_hidden_ghost_is_not_drawn() {
    let mut settings = Settings::default();
    settings.ghost_visible = false;
    let mut engine = Engine::new(settings, 5);
    engine.start(5);

    let fb = GameView::default().render(&engine.snapshot(), &Hud::default(), Viewport::new(80, 24));
    assert_eq!(count(&fb, '░'), 0);
}

#[test]
fn test_pause_overlay() {
    let mut engine = Engine::new(Settings::default(), 5);
    engine.start(5);
    engine.tick(0, &HeldKeys::from_names(["p"]));
    assert!(engine.paused());

    let fb = GameView::default().render(&engine.snapshot(), &Hud::default(), Viewport::new(80, 24));
    assert!(screen_text(&fb).contains("PAUSED"));
}
