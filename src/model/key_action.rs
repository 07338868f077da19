//! Domain-level keyboard actions independent of key bindings.

/// What a key press means at a manual-advance gate.
///
/// The mapping from `crossterm::event::KeyEvent` to `KeyAction` is handled
/// by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Continue to the next presentation step. Default: any unbound key
    Advance,
    /// End the presentation early. Default: q/Esc/Ctrl+C
    Quit,
}
