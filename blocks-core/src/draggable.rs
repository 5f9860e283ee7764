use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::palette::{ColorId, ResourceHandle, resource_for};

/// Stacking order of a piece at rest.
pub const Z_NORMAL: i32 = 1;
/// Stacking order of a piece being dragged, above every resting piece.
pub const Z_RAISED: i32 = 2;

/// Pixel-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Grid slot identifier. Pieces hold this instead of a reference so the
/// board stays free to store its tiles however it likes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId {
    pub col: u32,
    pub row: u32,
}

impl CellId {
    pub const fn new(col: u32, row: u32) -> Self {
        CellId { col, row }
    }
}

/// What the host draws for a piece. `position` is the sprite centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub resource: ResourceHandle,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// Input delivered by the host, already reduced to drag semantics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    DragBegin { global: Point },
    DragMove { global: Point },
    DragEnd,
    /// Single press-style input that starts or ends a drag depending on the
    /// current phase.
    Toggle { global: Point },
}

impl InputEvent {
    /// Map a host event name to the drag input it stands for.
    pub fn from_host(name: &str, global: Point) -> Option<InputEvent> {
        match name {
            "touchstart" => Some(InputEvent::DragBegin { global }),
            "touchmove" | "pointermove" => Some(InputEvent::DragMove { global }),
            "touchend" | "touchendoutside" | "pointerup" | "pointerupoutside" => {
                Some(InputEvent::DragEnd)
            }
            "pointerdown" => Some(InputEvent::Toggle { global }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Select,
    Deselect,
    CheckCell,
}

/// Container side of a piece: receives selection and drop notifications.
pub trait Listener {
    fn on_select(&mut self, piece: &GameObject);
    fn on_deselect(&mut self, piece: &GameObject);
    fn on_check_cell(&mut self, piece: &GameObject);
}

/// Records notices in order; the board drains it after each dispatch.
impl Listener for Vec<Notice> {
    fn on_select(&mut self, _piece: &GameObject) {
        self.push(Notice::Select);
    }

    fn on_deselect(&mut self, _piece: &GameObject) {
        self.push(Notice::Deselect);
    }

    fn on_check_cell(&mut self, _piece: &GameObject) {
        self.push(Notice::CheckCell);
    }
}

/// One placeable block.
#[derive(Clone, Debug)]
pub struct GameObject {
    sprite: Sprite,
    color: ColorId,
    base_position: Point,
    drag_anchor: Point,
    size: f64,
    cell: Option<CellId>,
    phase: DragPhase,
}

impl GameObject {
    /// Place a new piece centred on grid slot (`x`, `y`) with cells of
    /// `size` pixels.
    pub fn new(x: u32, y: u32, size: f64, color: ColorId) -> Self {
        let centre = Point::new(
            size * f64::from(x) + size / 2.0,
            size * f64::from(y) + size / 2.0,
        );
        GameObject {
            sprite: Sprite {
                resource: resource_for(color),
                position: centre,
                width: size,
                height: size,
                z_index: Z_NORMAL,
            },
            color,
            base_position: centre,
            drag_anchor: Point::default(),
            size,
            cell: None,
            phase: DragPhase::Idle,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn position(&self) -> Point {
        self.sprite.position
    }

    pub fn base_position(&self) -> Point {
        self.base_position
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Move both the anchor and the sprite to an absolute position. The
    /// cell reference is left alone.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.base_position = Point::new(x, y);
        self.sprite.position = self.base_position;
    }

    pub fn set_cell(&mut self, cell: CellId) {
        self.cell = Some(cell);
    }

    pub fn clear_cell(&mut self) {
        self.cell = None;
    }

    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    pub fn color(&self) -> ColorId {
        self.color
    }

    /// Change color; the sprite texture follows in the same call.
    pub fn set_color(&mut self, color: ColorId) {
        log::debug!("set_color {color:?}");
        self.color = color;
        self.sprite.resource = resource_for(color);
    }

    /// Whether `p` falls inside the sprite's footprint.
    pub fn contains(&self, p: Point) -> bool {
        let half_w = self.sprite.width / 2.0;
        let half_h = self.sprite.height / 2.0;
        let c = self.sprite.position;
        (p.x - c.x).abs() <= half_w && (p.y - c.y).abs() <= half_h
    }

    /// Advance the drag state machine by one input.
    pub fn handle<L: Listener + ?Sized>(&mut self, event: InputEvent, listener: &mut L) {
        match event {
            InputEvent::DragBegin { global } => {
                debug_assert!(!self.is_dragging(), "drag began on a piece already dragging");
                self.begin_drag(global);
            }
            InputEvent::DragMove { global } => self.drag_to(global),
            InputEvent::DragEnd => {
                debug_assert!(self.is_dragging(), "drag ended on an idle piece");
                self.end_drag(listener);
            }
            InputEvent::Toggle { global } => {
                // select fires on both branches, including the one that ends
                // the drag and deselects right after
                listener.on_select(self);
                if self.is_dragging() {
                    self.end_drag(listener);
                } else {
                    self.begin_drag(global);
                }
            }
        }
    }

    fn begin_drag(&mut self, global: Point) {
        log::trace!("drag begin at ({}, {})", global.x, global.y);
        self.phase = DragPhase::Dragging;
        self.sprite.z_index = Z_RAISED;
        self.base_position = self.sprite.position;
        self.drag_anchor = global;
    }

    fn drag_to(&mut self, global: Point) {
        if !self.is_dragging() {
            return;
        }
        let delta = global - self.drag_anchor;
        self.sprite.position = self.base_position + delta;
    }

    fn end_drag<L: Listener + ?Sized>(&mut self, listener: &mut L) {
        log::trace!("drag end at ({}, {})", self.sprite.position.x, self.sprite.position.y);
        self.phase = DragPhase::Idle;
        self.sprite.z_index = Z_NORMAL;
        listener.on_deselect(self);
        listener.on_check_cell(self);
    }
}
