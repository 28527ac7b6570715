use tracing::debug;

pub const MINIMIZE_ICON: &str = "🗕";
pub const CLOSE_ICON: &str = "🗙";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Maximized,
}

/// Glyph for the maximize button: maximize when normal, restore when maximized.
pub fn max_button_icon(state: WindowState) -> &'static str {
    match state {
        WindowState::Normal => "🗖",
        WindowState::Maximized => "🗗",
    }
}

/// What the frameless title bar asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChromeRequest {
    Minimize,
    Maximize,
    Restore,
    /// Hands the move to the window manager until the button is released.
    StartDrag,
    Close,
}

/// Title-bar state for a window drawn without OS decorations.
#[derive(Debug, Default)]
pub struct ChromeController {
    state: WindowState,
    dragging: bool,
}

impl ChromeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn max_icon(&self) -> &'static str {
        max_button_icon(self.state)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts moving the window once per press; a maximized window stays put.
    pub fn press(&mut self) -> Option<ChromeRequest> {
        if self.state == WindowState::Maximized || self.dragging {
            return None;
        }
        self.dragging = true;
        Some(ChromeRequest::StartDrag)
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn double_click(&mut self) -> ChromeRequest {
        self.toggle_maximize()
    }

    pub fn toggle_maximize(&mut self) -> ChromeRequest {
        self.dragging = false;
        match self.state {
            WindowState::Normal => ChromeRequest::Maximize,
            WindowState::Maximized => ChromeRequest::Restore,
        }
    }

    /// Mirrors the viewport's real state, including changes made by the OS.
    pub fn sync(&mut self, maximized: bool) {
        let state = if maximized {
            WindowState::Maximized
        } else {
            WindowState::Normal
        };
        if state != self.state {
            debug!(?state, "window state changed");
            self.state = state;
        }
    }
}
