//! Frame description built from game state
//!
//! `Scene::compose` turns a `GameState` into draw commands in world units,
//! without touching the terminal. `Scene::paint` then rasterizes the commands
//! onto a framebuffer of any size.

use glam::Vec2;

use super::fb::{FrameBuffer, Rgb};
use crate::assets::{Assets, BannerFont};
use crate::sim::{Aabb, GameState, RunPhase};

/// Where a text overlay is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    /// Top-left corner in world units
    TopLeft(Vec2),
    /// Centered in the window
    Center,
}

/// A single drawing operation, in painter's order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect { rect: Aabb, color: Rgb },
    Sprite { rect: Aabb, tint: Rgb },
    Text { text: String, anchor: TextAnchor, color: Rgb },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// World extent mapped onto the whole framebuffer
    pub world: Vec2,
    pub clear: Rgb,
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    /// Describe the current frame: bird, pipes, then overlays
    pub fn compose<R>(state: &GameState<R>) -> Self {
        let rules = &state.ruleset;
        let layout = state.pipes.layout();
        let mut commands = Vec::with_capacity(2 + state.pipes.len() * 2 + 2);

        commands.push(DrawCmd::Sprite {
            rect: state.bird.bounds(),
            tint: rules.palette.bird,
        });

        for pipe in state.pipes.iter() {
            commands.push(DrawCmd::Rect {
                rect: pipe.top_rect(layout),
                color: rules.palette.pipe,
            });
            commands.push(DrawCmd::Rect {
                rect: pipe.bottom_rect(layout),
                color: rules.palette.pipe,
            });
        }

        if state.phase == RunPhase::Terminated {
            commands.push(DrawCmd::Text {
                text: rules.game_over_text.clone(),
                anchor: TextAnchor::Center,
                color: rules.palette.game_over,
            });
        }

        if rules.scoring {
            commands.push(DrawCmd::Text {
                text: format!("{} {}", rules.score_label, state.score),
                anchor: TextAnchor::TopLeft(rules.score_pos),
                color: rules.palette.score,
            });
        }

        Self {
            world: Vec2::new(rules.window_width, rules.window_height),
            clear: rules.palette.sky,
            commands,
        }
    }

    /// Rasterize onto `fb`, scaling the world to the framebuffer's size
    pub fn paint(&self, assets: &Assets, fb: &mut FrameBuffer) {
        fb.clear(self.clear);
        if fb.width() == 0 || fb.height() == 0 {
            return;
        }
        let proj = Projection::new(self.world, fb);

        for cmd in &self.commands {
            match cmd {
                DrawCmd::Rect { rect, color } => {
                    if let Some((x, y, w, h)) = proj.cells(rect) {
                        fb.fill_rect(x, y, w, h, *color);
                    }
                }
                DrawCmd::Sprite { rect, tint } => paint_sprite(&proj, assets, rect, *tint, fb),
                DrawCmd::Text {
                    text,
                    anchor,
                    color,
                } => paint_text(&proj, &assets.font, text, *anchor, *color, fb),
            }
        }
    }
}

/// World-to-cell mapping for one framebuffer size
#[derive(Debug, Clone, Copy)]
struct Projection {
    scale: Vec2,
    cols: u16,
    rows: u16,
}

impl Projection {
    fn new(world: Vec2, fb: &FrameBuffer) -> Self {
        let cols = fb.width();
        let rows = fb.height();
        Self {
            scale: Vec2::new(cols as f32 / world.x, rows as f32 / world.y),
            cols,
            rows,
        }
    }

    fn point(&self, p: Vec2) -> (i32, i32) {
        let s = p * self.scale;
        (s.x.round() as i32, s.y.round() as i32)
    }

    /// Visible cell range covered by a rect; non-empty rects cover at least one cell
    fn cells(&self, rect: &Aabb) -> Option<(u16, u16, u16, u16)> {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return None;
        }
        let (x0, y0) = self.point(rect.pos);
        let (mut x1, mut y1) = self.point(rect.pos + rect.size);
        x1 = x1.max(x0 + 1);
        y1 = y1.max(y0 + 1);

        let x0 = x0.clamp(0, self.cols as i32);
        let y0 = y0.clamp(0, self.rows as i32);
        let x1 = x1.clamp(0, self.cols as i32);
        let y1 = y1.clamp(0, self.rows as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
    }
}

/// Stretch the sprite over the bird's cells (nearest neighbor)
fn paint_sprite(proj: &Projection, assets: &Assets, rect: &Aabb, tint: Rgb, fb: &mut FrameBuffer) {
    let Some((x, y, w, h)) = proj.cells(rect) else {
        return;
    };
    let sprite = &assets.sprite;
    // Sample relative to the unclipped rect so a partly hidden bird keeps its shape
    let (ox, oy) = proj.point(rect.pos);
    let (ex, ey) = proj.point(rect.pos + rect.size);
    let full_w = (ex - ox).max(1) as usize;
    let full_h = (ey - oy).max(1) as usize;

    for cy in y..y + h {
        for cx in x..x + w {
            let u = (cx as i32 - ox).max(0) as usize;
            let v = (cy as i32 - oy).max(0) as usize;
            let sx = u * sprite.width() / full_w;
            let sy = v * sprite.height() / full_h;
            if let Some(ch) = sprite.glyph(sx, sy) {
                fb.put_glyph(cx, cy, ch, tint, true);
            }
        }
    }
}

/// Draw text with the banner font, or as plain characters when it does not fit
fn paint_text(
    proj: &Projection,
    font: &BannerFont,
    text: &str,
    anchor: TextAnchor,
    color: Rgb,
    fb: &mut FrameBuffer,
) {
    let banner = (font.measure(text), font.height());
    let plain = (text.chars().count(), 1);

    let place = |(w, h): (usize, usize)| -> Option<(u16, u16)> {
        let (x, y) = match anchor {
            TextAnchor::TopLeft(p) => proj.point(p),
            TextAnchor::Center => (
                (proj.cols as i32 - w as i32) / 2,
                (proj.rows as i32 - h as i32) / 2,
            ),
        };
        let fits = x >= 0
            && y >= 0
            && x as usize + w <= proj.cols as usize
            && y as usize + h <= proj.rows as usize;
        fits.then_some((x as u16, y as u16))
    };

    if let Some((x, y)) = place(banner) {
        let mut cx = x as usize;
        for ch in text.chars() {
            if let Some(glyph) = font.glyph(ch) {
                for gy in 0..font.height() {
                    for gx in 0..glyph.width() {
                        if let Some(c) = glyph.cell(gx, gy) {
                            fb.put_glyph((cx + gx) as u16, y + gy as u16, c, color, true);
                        }
                    }
                }
            }
            cx += font.advance(ch) + 1;
        }
        return;
    }

    let (x, y) = place(plain).unwrap_or_else(|| {
        let (x, y) = match anchor {
            TextAnchor::TopLeft(p) => proj.point(p),
            TextAnchor::Center => (0, proj.rows as i32 / 2),
        };
        (x.max(0) as u16, y.clamp(0, proj.rows as i32 - 1) as u16)
    });
    fb.put_str(x, y, text, color, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BannerFont, Sprite};
    use crate::ruleset::Ruleset;

    fn assets() -> Assets {
        Assets {
            sprite: Sprite::parse("<o>").unwrap(),
            font: BannerFont::parse("height 1\nglyph S\nS\n").unwrap(),
        }
    }

    #[test]
    fn test_compose_running_scored() {
        let state = GameState::new(Ruleset::scored(), 3);
        let scene = Scene::compose(&state);

        assert_eq!(scene.world, Vec2::new(800.0, 600.0));
        assert_eq!(scene.clear, Rgb::new(0, 0, 0));
        assert!(matches!(scene.commands[0], DrawCmd::Sprite { .. }));
        let rects = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { .. }))
            .count();
        assert_eq!(rects, 6);
        assert_eq!(
            scene.commands.last(),
            Some(&DrawCmd::Text {
                text: "Score 0".to_string(),
                anchor: TextAnchor::TopLeft(Vec2::new(20.0, 20.0)),
                color: Rgb::new(255, 255, 255),
            })
        );
    }

    #[test]
    fn test_compose_terminated_classic() {
        let mut state = GameState::new(Ruleset::classic(), 3);
        state.phase = RunPhase::Terminated;
        let scene = Scene::compose(&state);

        let texts: Vec<&DrawCmd> = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Text { .. }))
            .collect();
        assert_eq!(texts.len(), 1);
        assert!(matches!(
            texts[0],
            DrawCmd::Text { text, anchor: TextAnchor::Center, .. }
                if text == "Game Over! Press Space to Restart"
        ));
    }

    #[test]
    fn test_paint_scales_world_to_cells() {
        let scene = Scene {
            world: Vec2::new(800.0, 600.0),
            clear: Rgb::new(0, 255, 255),
            commands: vec![DrawCmd::Rect {
                rect: Aabb::from_xywh(400.0, 0.0, 80.0, 300.0),
                color: Rgb::new(0, 255, 0),
            }],
        };
        let mut fb = FrameBuffer::new(80, 30);
        scene.paint(&assets(), &mut fb);

        assert_eq!(fb.get(40, 0).unwrap().style.bg, Rgb::new(0, 255, 0));
        assert_eq!(fb.get(47, 14).unwrap().style.bg, Rgb::new(0, 255, 0));
        assert_eq!(fb.get(48, 14).unwrap().style.bg, Rgb::new(0, 255, 255));
        assert_eq!(fb.get(40, 15).unwrap().style.bg, Rgb::new(0, 255, 255));
    }

    #[test]
    fn test_offscreen_rect_is_clipped() {
        let scene = Scene {
            world: Vec2::new(800.0, 600.0),
            clear: Rgb::new(0, 0, 0),
            commands: vec![DrawCmd::Rect {
                rect: Aabb::from_xywh(-50.0, 0.0, 70.0, 600.0),
                color: Rgb::new(0, 255, 0),
            }],
        };
        let mut fb = FrameBuffer::new(80, 30);
        scene.paint(&assets(), &mut fb);

        assert_eq!(fb.get(0, 10).unwrap().style.bg, Rgb::new(0, 255, 0));
        assert_eq!(fb.get(2, 10).unwrap().style.bg, Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_sprite_stretched_over_bird() {
        let scene = Scene {
            world: Vec2::new(800.0, 600.0),
            clear: Rgb::new(0, 0, 0),
            commands: vec![DrawCmd::Sprite {
                rect: Aabb::from_xywh(100.0, 300.0, 60.0, 20.0),
                tint: Rgb::new(255, 200, 0),
            }],
        };
        let mut fb = FrameBuffer::new(80, 30);
        scene.paint(&assets(), &mut fb);

        // 60 world units -> 6 cells, each sprite column covers two
        assert_eq!(&fb.row_text(15)[10..16], "<<oo>>");
        assert_eq!(fb.get(10, 15).unwrap().style.fg, Rgb::new(255, 200, 0));
    }

    #[test]
    fn test_text_falls_back_to_plain_when_banner_too_wide() {
        let scene = Scene {
            world: Vec2::new(800.0, 600.0),
            clear: Rgb::new(0, 0, 0),
            commands: vec![DrawCmd::Text {
                text: "SSSS".to_string(),
                anchor: TextAnchor::TopLeft(Vec2::ZERO),
                color: Rgb::new(255, 255, 255),
            }],
        };

        let mut wide = FrameBuffer::new(20, 4);
        scene.paint(&assets(), &mut wide);
        assert_eq!(&wide.row_text(0)[..7], "S S S S");

        let mut narrow = FrameBuffer::new(5, 4);
        scene.paint(&assets(), &mut narrow);
        assert_eq!(narrow.row_text(0), "SSSS ");
    }

    #[test]
    fn test_center_anchor() {
        let scene = Scene {
            world: Vec2::new(800.0, 600.0),
            clear: Rgb::new(0, 0, 0),
            commands: vec![DrawCmd::Text {
                text: "S".to_string(),
                anchor: TextAnchor::Center,
                color: Rgb::new(255, 0, 0),
            }],
        };
        let mut fb = FrameBuffer::new(11, 5);
        scene.paint(&assets(), &mut fb);
        assert_eq!(fb.get(5, 2).unwrap().ch, 'S');
    }
}
