#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    // User input
    Quit,
    Refresh,

    // Search box
    EditSearch,
    CancelSearch,
    SubmitSearch,
    InputChar(char),
    InputBackspace,

    // List navigation
    MoveUp,
    MoveDown,
    SelectFirst,
    SelectLast,
}
