use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use iscroll_core::{InputEvent, Modality, PointerInput, WheelInput};

use crate::app::App;
use crate::host::TerminalHost;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    LineDown,
    LineUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    ToggleEnabled,
    Refresh,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::LineDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::LineUp,
        (KeyCode::Down, _) => Action::LineDown,
        (KeyCode::Up, _) => Action::LineUp,

        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::PageDown, _) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ScrollPageDown,

        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            // gg requires double press
            if app.pending_key == Some('g') {
                Action::JumpToTop
            } else {
                Action::PendingG
            }
        }
        (KeyCode::Char('G'), _) => Action::JumpToBottom,
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('e'), KeyModifiers::NONE) => Action::ToggleEnabled,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,

        _ => Action::None,
    }
}

/// Translate a terminal mouse event into a viewport notification
///
/// Left-button press/drag/release become a mouse gesture stream. Other
/// buttons still open a start so the viewport can reject them.
pub fn mouse_to_input(mouse: MouseEvent, host: &TerminalHost) -> Option<InputEvent> {
    let page = host.to_page(mouse.column, mouse.row);
    let pointer = PointerInput::new(Modality::Mouse, page.x, page.y);

    match mouse.kind {
        MouseEventKind::Down(button) => {
            Some(InputEvent::Start(pointer.with_button(button_index(button))))
        }
        MouseEventKind::Drag(MouseButton::Left) => Some(InputEvent::Move(pointer)),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::End(pointer)),
        MouseEventKind::ScrollDown => Some(wheel(0.0, 1.0)),
        MouseEventKind::ScrollUp => Some(wheel(0.0, -1.0)),
        MouseEventKind::ScrollRight => Some(wheel(1.0, 0.0)),
        MouseEventKind::ScrollLeft => Some(wheel(-1.0, 0.0)),
        _ => None,
    }
}

fn button_index(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
    }
}

fn wheel(delta_x: f64, delta_y: f64) -> InputEvent {
    InputEvent::Wheel(WheelInput { delta_x, delta_y })
}
