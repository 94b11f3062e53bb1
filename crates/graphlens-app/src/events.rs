//! UI events the controller understands

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    /// Closes the inspector.
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The query input changed.
    QueryEdited(String),
    /// Key press while the query input has focus.
    KeyDown { key: Key, ctrl: bool },
    RunClicked,
    ClearClicked,
    /// Preset query button: replaces the input and runs it.
    Action(String),
    TapNode(String),
    TapEdge(String),
    DoubleTapNode(String),
    TapBackground,
    CloseInspector,
}

impl UiEvent {
    /// Whether this event asks for the current query to run.
    pub fn is_run_trigger(&self) -> bool {
        matches!(
            self,
            UiEvent::RunClicked
                | UiEvent::Action(_)
                | UiEvent::KeyDown {
                    key: Key::Enter,
                    ctrl: true
                }
        )
    }
}
