use crate::input::Point;

/// Cursor-coordinate label that only changes when the text would.
#[derive(Debug, Default)]
pub struct PositionDisplay {
    text: String,
    renders: usize,
}

impl PositionDisplay {
    pub fn format(p: Point) -> String {
        format!("Cursor: {p}")
    }

    /// Returns the new label when it differs from the shown one.
    pub fn observe(&mut self, p: Point) -> Option<&str> {
        let next = Self::format(p);
        if next == self.text {
            return None;
        }
        self.text = next;
        self.renders += 1;
        Some(&self.text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many times the label text has been replaced.
    pub fn renders(&self) -> usize {
        self.renders
    }
}
