//! Image carousel position over a chart's ordered images.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advance, wrapping from the last image to the first.
    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    /// Step back, wrapping from the first image to the last.
    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jump to `index`; out-of-range targets are ignored.
    pub fn goto(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.index = index;
        true
    }

    /// Track a new image count. The position returns to the first image when
    /// it no longer exists.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }

    /// "2 / 5" style position label, `None` for a single image or none.
    pub fn counter(&self) -> Option<String> {
        (self.len > 1).then(|| format!("{} / {}", self.index + 1, self.len))
    }
}
