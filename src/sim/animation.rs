//! Sprite-sheet frame stepping
//!
//! Animations advance on simulation ticks, not on draw calls, so a paused
//! game also freezes its animations.

/// Walks a `cols` x `rows` sheet left to right, top to bottom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetAnimation {
    cols: u32,
    rows: u32,
    stagger: u32,
    looping: bool,
    col: u32,
    row: u32,
    ticks: u32,
    done: bool,
}

impl SheetAnimation {
    pub fn new(cols: u32, rows: u32, stagger: u32, looping: bool) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            stagger: stagger.max(1),
            looping,
            col: 0,
            row: 0,
            ticks: 0,
            done: false,
        }
    }

    /// Advance one tick. A one-shot animation stops on its last frame.
    pub fn step(&mut self) {
        if self.done {
            return;
        }
        self.ticks += 1;
        if self.ticks % self.stagger != 0 {
            return;
        }

        self.col += 1;
        if self.col < self.cols {
            return;
        }
        self.col = 0;
        self.row += 1;
        if self.row < self.rows {
            return;
        }

        if self.looping {
            self.row = 0;
        } else {
            self.row = self.rows - 1;
            self.col = self.cols - 1;
            self.done = true;
        }
    }

    /// Current `(row, col)` in the sheet
    pub fn frame(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Ticks a full one-shot playthrough takes
    pub fn duration_ticks(&self) -> u32 {
        self.cols * self.rows * self.stagger
    }
}

/// A run of frames on one row of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub row: u32,
    pub first: u32,
    pub last: u32,
    /// Ticks per frame
    pub stagger: u32,
}

/// Loops whichever clip is currently selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipPlayer {
    clip: Clip,
    col: u32,
    ticks: u32,
}

impl ClipPlayer {
    pub fn new(clip: Clip) -> Self {
        Self {
            clip,
            col: clip.first,
            ticks: 0,
        }
    }

    /// Switch clips; selecting the active clip again is a no-op
    pub fn set_clip(&mut self, clip: Clip) {
        if clip != self.clip {
            *self = Self::new(clip);
        }
    }

    pub fn clip(&self) -> Clip {
        self.clip
    }

    pub fn step(&mut self) {
        self.ticks += 1;
        if self.ticks % self.clip.stagger.max(1) == 0 {
            self.col = if self.col >= self.clip.last {
                self.clip.first
            } else {
                self.col + 1
            };
        }
    }

    pub fn frame(&self) -> (u32, u32) {
        (self.clip.row, self.col)
    }

    /// Ticks spent in the current clip
    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}
