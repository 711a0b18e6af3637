//! Rendering
//!
//! The session builds a complete [`Frame`] every tick and hands it to a
//! [`RenderGateway`]. How the frame reaches a screen is the gateway's
//! business.
//!
//! - `frame`: 2:1 board compression, sidebar and palette slots
//! - `headless`: scripted gateway for the demo binary and tests

pub mod frame;
pub mod headless;

pub use frame::{compose, ColorSlot, Frame, FrameCell, Glyph, Symbol};
pub use headless::HeadlessRenderer;

use crate::core::grid::Direction;
use crate::game::input::KeyState;

/// Display and keyboard, as seen by the game loop.
pub trait RenderGateway {
    /// The display was closed; the loop stops.
    fn is_closed(&self) -> bool;

    /// Arrow keys held right now.
    fn poll_keys(&mut self) -> KeyState;

    /// Heading for this frame, resolved with the fixed key precedence.
    fn poll_direction(&mut self) -> Option<Direction> {
        self.poll_keys().direction()
    }

    /// Show a frame.
    fn draw_frame(&mut self, frame: &Frame);
}
