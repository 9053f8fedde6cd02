use std::time::SystemTime;

/// Marks a window during which the host must not re-enter field conversion,
/// e.g. while it writes converted HTML back into the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafeBlock {
    start_time: Option<SystemTime>,
    active: bool,
}

impl SafeBlock {
    /// A block that has never been started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the block at `at`.
    pub fn start(&mut self, at: SystemTime) {
        self.start_time = Some(at);
        self.active = true;
    }

    /// Leave the block. The start time is kept.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Whether the block has been started and not ended.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the block was last started.
    pub fn start_time(&self) -> Option<SystemTime> {
        self.start_time
    }
}
