//! Scripted in-memory backend for exercising the reveal loop and the driver
//! without a real accessibility layer.
//!
//! Content lives in its own coordinate space; scrolling shifts it against
//! the fixed window frame. Forward scroll units (negative) move content up,
//! exposing what sits below the viewport.

use std::sync::Mutex;

use periscope::{
    AutomationError, ElementNode, Frame, Point, TraversalSnapshot, UiBackend,
};

/// One scripted element, positioned in content coordinates.
#[derive(Clone)]
pub struct MockElement {
    pub role: String,
    pub text: Option<String>,
    pub frame: Frame,
    pub depth: usize,
    /// The element only shows up in captures once this much content has
    /// scrolled past, simulating lazily materialized rows.
    pub appears_after_offset: f64,
}

impl MockElement {
    pub fn new(role: &str, frame: Frame) -> Self {
        Self {
            role: role.to_string(),
            text: None,
            frame,
            depth: 1,
            appears_after_offset: 0.0,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn appears_after(mut self, offset: f64) -> Self {
        self.appears_after_offset = offset;
        self
    }
}

#[derive(Default)]
pub struct MockState {
    /// How much content has scrolled past the top of the window.
    pub offset: f64,
    /// Vertical units of every posted scroll event, in posting order.
    pub scrolls: Vec<f64>,
    pub clicks: Vec<Point>,
    pub keys: Vec<String>,
    pub cursor_moves: Vec<Point>,
}

pub struct MockBackend {
    pub window: Frame,
    /// How many pixels of content one scroll unit moves.
    pub px_per_unit: f64,
    pub elements: Vec<MockElement>,
    pub cursor: Mutex<Point>,
    pub fail_clicks: bool,
    pub state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new(window: Frame, px_per_unit: f64, elements: Vec<MockElement>) -> Self {
        Self {
            window,
            px_per_unit,
            elements,
            cursor: Mutex::new(Point::new(0.0, 0.0)),
            fail_clicks: false,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_cursor(self, cursor: Point) -> Self {
        *self.cursor.lock().unwrap() = cursor;
        self
    }

    pub fn failing_clicks(mut self) -> Self {
        self.fail_clicks = true;
        self
    }

    pub fn scroll_count(&self) -> usize {
        self.state.lock().unwrap().scrolls.len()
    }
}

#[async_trait::async_trait]
impl UiBackend for MockBackend {
    fn window_frame(&self, _pid: u32) -> Result<Option<Frame>, AutomationError> {
        Ok(Some(self.window))
    }

    fn all_window_frames(&self, _pid: u32) -> Result<Vec<Frame>, AutomationError> {
        Ok(vec![self.window])
    }

    async fn capture_traversal(
        &self,
        _pid: u32,
        _only_visible: bool,
    ) -> Result<TraversalSnapshot, AutomationError> {
        let offset = self.state.lock().unwrap().offset;
        let mut nodes = vec![ElementNode::new("AXWindow").with_frame(self.window)];
        for element in &self.elements {
            if offset < element.appears_after_offset {
                continue;
            }
            let shifted = Frame::new(
                element.frame.x,
                element.frame.y - offset,
                element.frame.width,
                element.frame.height,
            );
            let mut node = ElementNode::new(element.role.as_str())
                .with_frame(shifted)
                .at_depth(element.depth);
            if let Some(ref text) = element.text {
                node = node.with_text(text.as_str());
            }
            nodes.push(node);
        }
        Ok(TraversalSnapshot::new(nodes))
    }

    fn post_scroll(
        &self,
        _point: Point,
        units_vertical: f64,
        _units_horizontal: f64,
    ) -> Result<(), AutomationError> {
        let mut state = self.state.lock().unwrap();
        state.scrolls.push(units_vertical);
        state.offset += -units_vertical * self.px_per_unit;
        Ok(())
    }

    fn post_click(&self, point: Point) -> Result<(), AutomationError> {
        if self.fail_clicks {
            return Err(AutomationError::PlatformError("click rejected".to_string()));
        }
        self.state.lock().unwrap().clicks.push(point);
        Ok(())
    }

    fn post_key(&self, key: &str) -> Result<(), AutomationError> {
        self.state.lock().unwrap().keys.push(key.to_string());
        Ok(())
    }

    fn cursor_position(&self) -> Result<Point, AutomationError> {
        Ok(*self.cursor.lock().unwrap())
    }

    fn set_cursor_position(&self, point: Point) -> Result<(), AutomationError> {
        *self.cursor.lock().unwrap() = point;
        self.state.lock().unwrap().cursor_moves.push(point);
        Ok(())
    }
}
