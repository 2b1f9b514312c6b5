//! Draw intents
//!
//! The simulation never touches pixels. Each frame it is flattened into a
//! list of [`DrawCmd`]s which the host's [`Renderer`] turns into real draw
//! calls.

use glam::Vec2;

use crate::sim::{GamePhase, GameState, HasHitBox, HitBox};

/// Logical sprite resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Title,
    Player,
    Shield,
    /// Sheet of asteroid variations
    Asteroids,
    Enemy,
    Laser,
    EnemyLaser,
    Explosion,
    PlayerExplosion,
    EnemyExplosion,
}

/// Overlay colors (RGBA)
pub const HITBOX_COLOR: [f32; 4] = [0.2, 1.0, 0.3, 1.0];
pub const VECTOR_COLOR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
pub const POS_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 1.0];

/// Length multiplier for the velocity overlay
pub const VECTOR_SCALE: f32 = 50.0;

/// A sprite placed on the field
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub sprite: SpriteId,
    /// Visual center
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation_deg: f32,
    /// `(row, col)` in the sprite's sheet
    pub frame: Option<(u32, u32)>,
    pub alpha: f32,
}

impl SpriteDraw {
    pub fn new(sprite: SpriteId, pos: Vec2, size: Vec2, rotation_deg: f32) -> Self {
        Self {
            sprite,
            pos,
            size,
            rotation_deg,
            frame: None,
            alpha: 1.0,
        }
    }

    pub fn frame(mut self, frame: (u32, u32)) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite(SpriteDraw),
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
    },
    Dot {
        pos: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Rectangle outline, top-left origin
    Rect {
        pos: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
}

/// Host drawing backend
pub trait Renderer {
    /// Start a frame for a field of `size`
    fn begin(&mut self, size: Vec2);
    fn draw(&mut self, cmd: &DrawCmd);
    /// Present the finished frame
    fn present(&mut self);
}

/// Push a whole frame through a renderer
pub fn render(state: &GameState, renderer: &mut impl Renderer) {
    renderer.begin(state.settings.field.size());
    for cmd in build_frame(state) {
        renderer.draw(&cmd);
    }
    renderer.present();
}

fn outline(hitbox: &HitBox) -> DrawCmd {
    DrawCmd::Rect {
        pos: Vec2::new(hitbox.x, hitbox.y),
        size: Vec2::new(hitbox.width, hitbox.height),
        color: HITBOX_COLOR,
    }
}

/// Flatten the current state into draw commands, back to front
pub fn build_frame(state: &GameState) -> Vec<DrawCmd> {
    let mut cmds = Vec::new();

    if state.phase == GamePhase::Title {
        let field = state.settings.field.size();
        cmds.push(DrawCmd::Sprite(SpriteDraw::new(
            SpriteId::Title,
            field * 0.5,
            field,
            0.0,
        )));
        return cmds;
    }

    let sheet_cols = state.settings.asteroids.sheet_cols;
    for a in state.asteroids.asteroids() {
        let draw = SpriteDraw::new(SpriteId::Asteroids, a.pos(), a.size(), a.angle());
        cmds.push(DrawCmd::Sprite(draw.frame(a.sheet_cell(sheet_cols))));
    }

    for e in state.enemies.enemies() {
        let draw = SpriteDraw::new(SpriteId::Enemy, e.pos(), e.size(), e.angle());
        cmds.push(DrawCmd::Sprite(draw));
    }

    for controller in [&state.projectiles, &state.enemy_projectiles] {
        let id = controller.kind().sprite;
        for p in controller.projectiles() {
            let draw = SpriteDraw::new(id, p.pos(), p.size(), p.angle());
            cmds.push(DrawCmd::Sprite(draw));
        }
    }

    let player = &state.player;
    if player.visible() {
        let draw = SpriteDraw::new(SpriteId::Player, player.pos(), player.size(), player.angle());
        cmds.push(DrawCmd::Sprite(draw.frame(player.frame())));
        if player.shield {
            let draw = SpriteDraw::new(SpriteId::Shield, player.pos(), player.size() * 1.2, 0.0);
            let alpha = if player.shield_flash { 1.0 } else { 0.5 };
            cmds.push(DrawCmd::Sprite(draw.alpha(alpha)));
        }
    }

    for x in state.explosions.explosions() {
        let draw = SpriteDraw::new(x.kind().sprite(), x.pos(), x.size(), x.rotation());
        cmds.push(DrawCmd::Sprite(draw.frame(x.frame())));
    }

    debug_overlays(state, &mut cmds);
    cmds
}

fn debug_overlays(state: &GameState, cmds: &mut Vec<DrawCmd>) {
    let debug = &state.settings.debug;
    let player = &state.player;

    if debug.show_boxes {
        if player.is_alive() {
            cmds.push(outline(player.hitbox()));
        }
        cmds.extend(state.asteroids.asteroids().iter().map(|a| outline(a.hitbox())));
        cmds.extend(state.enemies.enemies().iter().map(|e| outline(e.hitbox())));
        for controller in [&state.projectiles, &state.enemy_projectiles] {
            cmds.extend(controller.projectiles().iter().map(|p| outline(p.hitbox())));
        }
    }

    if debug.show_player_vector && player.is_alive() {
        cmds.push(DrawCmd::Line {
            from: player.pos(),
            to: player.pos() + player.vel() * VECTOR_SCALE,
            color: VECTOR_COLOR,
        });
    }

    if debug.show_pos {
        let dot = |pos| DrawCmd::Dot {
            pos,
            radius: 2.0,
            color: POS_COLOR,
        };
        cmds.push(dot(player.pos()));
        cmds.extend(state.asteroids.asteroids().iter().map(|a| dot(a.pos())));
        cmds.extend(state.enemies.enemies().iter().map(|e| dot(e.pos())));
    }
}
