//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Extra modifier accepted for form shortcuts alongside Ctrl
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Whether a key event carries a shortcut modifier
pub fn is_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | SHORTCUT_MODIFIER)
}

/// Next step shortcut display
#[cfg(target_os = "macos")]
pub const NEXT_SHORTCUT: &str = "Cmd+N";
#[cfg(not(target_os = "macos"))]
pub const NEXT_SHORTCUT: &str = "^N";

/// Previous step shortcut display
#[cfg(target_os = "macos")]
pub const PREV_SHORTCUT: &str = "Cmd+P";
#[cfg(not(target_os = "macos"))]
pub const PREV_SHORTCUT: &str = "^P";

/// Submit shortcut display
/// Ctrl+S works on all platforms
pub const SUBMIT_SHORTCUT: &str = "^S";

/// Remove file shortcut display
#[cfg(target_os = "macos")]
pub const REMOVE_FILE_SHORTCUT: &str = "Cmd+X";
#[cfg(not(target_os = "macos"))]
pub const REMOVE_FILE_SHORTCUT: &str = "^X";
