//! Panel geometry
//!
//! Frames are rectangles in panel pixel coordinates, origin top-left.

/// Panel resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelSize {
    pub width: u16,
    pub height: u16,
}

impl PanelSize {
    /// ED028TC1 native resolution
    pub const ED028TC1: PanelSize = PanelSize {
        width: 480,
        height: 600,
    };

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of pixels on the panel
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Frame covering the whole panel
    pub const fn full_frame(&self) -> Frame {
        Frame::new(0, 0, self.width, self.height)
    }
}

/// Rectangle in panel pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Frame {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check the frame lies fully inside the panel
    pub const fn fits(&self, size: PanelSize) -> bool {
        self.right() <= size.width as u32 && self.bottom() <= size.height as u32
    }

    /// Check if a pixel lies inside the frame
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && (x as u32) < self.right() && y >= self.y && (y as u32) < self.bottom()
    }

    /// Smallest frame enclosing both frames
    ///
    /// Empty frames do not contribute.
    pub fn union(&self, other: &Frame) -> Frame {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Frame::new(x, y, (right - x as u32) as u16, (bottom - y as u32) as u16)
    }

    /// Smallest frame enclosing every frame in the list
    pub fn bounding(frames: &[Frame]) -> Option<Frame> {
        let mut iter = frames.iter().filter(|f| !f.is_empty());
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, f| acc.union(f)))
    }
}
