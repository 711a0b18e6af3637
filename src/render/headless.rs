//! Headless Renderer
//!
//! Keeps the last frame in memory and plays back a fixed key script. The
//! display "closes" after a set number of frames.

use tracing::debug;

use crate::game::input::KeyState;
use crate::render::frame::Frame;
use crate::render::RenderGateway;

/// In-memory [`RenderGateway`].
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Close after this many frames; `None` never closes.
    frame_limit: Option<u64>,
    /// Keys for frame `n` are `script[n % len]`.
    script: Vec<KeyState>,
    frames_drawn: u64,
    last_frame: Option<Frame>,
    /// Log a frame summary every N frames.
    log_every: Option<u64>,
}

impl HeadlessRenderer {
    /// Renderer that closes after `frame_limit` frames with no keys held.
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            frame_limit,
            ..Self::default()
        }
    }

    /// Replay `script` cyclically, one entry per polled frame.
    pub fn with_script(mut self, script: Vec<KeyState>) -> Self {
        self.script = script;
        self
    }

    /// Log a summary line every `every` frames.
    pub fn with_logging(mut self, every: u64) -> Self {
        self.log_every = (every > 0).then_some(every);
        self
    }

    /// Frames drawn so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}

impl RenderGateway for HeadlessRenderer {
    fn is_closed(&self) -> bool {
        self.frame_limit.is_some_and(|limit| self.frames_drawn >= limit)
    }

    fn poll_keys(&mut self) -> KeyState {
        if self.script.is_empty() {
            return KeyState::NONE;
        }
        self.script[(self.frames_drawn % self.script.len() as u64) as usize]
    }

    fn draw_frame(&mut self, frame: &Frame) {
        self.frames_drawn += 1;
        if let Some(every) = self.log_every {
            if self.frames_drawn % every == 0 {
                debug!(
                    "Frame {} ({}x{}): {}",
                    self.frames_drawn,
                    frame.width(),
                    frame.height(),
                    frame.row_text(frame.height() / 2).trim_end()
                );
            }
        }
        self.last_frame = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Direction;
    use crate::game::board::Board;
    use crate::render::frame::compose;

    #[test]
    fn test_closes_after_limit() {
        let board = Board::new(32, 32).unwrap();
        let frame = compose(&board, &[]);
        let mut renderer = HeadlessRenderer::new(Some(2));

        assert!(!renderer.is_closed());
        renderer.draw_frame(&frame);
        renderer.draw_frame(&frame);
        assert!(renderer.is_closed());
        assert_eq!(renderer.frames_drawn(), 2);
        assert_eq!(renderer.last_frame(), Some(&frame));
    }

    #[test]
    fn test_script_cycles_per_frame() {
        let board = Board::new(32, 32).unwrap();
        let frame = compose(&board, &[]);
        let mut renderer = HeadlessRenderer::new(None).with_script(vec![
            KeyState::only(Direction::Up),
            KeyState { left: true, up: true, ..KeyState::NONE },
        ]);

        assert_eq!(renderer.poll_direction(), Some(Direction::Up));
        renderer.draw_frame(&frame);
        assert_eq!(renderer.poll_direction(), Some(Direction::Left));
        renderer.draw_frame(&frame);
        assert_eq!(renderer.poll_direction(), Some(Direction::Up));
        assert!(!renderer.is_closed());
    }

    #[test]
    fn test_no_script_means_no_input() {
        let mut renderer = HeadlessRenderer::new(Some(1));
        assert_eq!(renderer.poll_direction(), None);
    }
}
