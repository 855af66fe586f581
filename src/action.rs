use crate::fetch::BatchOutcome;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,

    // Grid navigation. Every one of these ends in a scroll signal.
    ScrollUp,
    ScrollDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Wheel(i8),
    Resize(u16, u16),

    // Fetching
    LoadNextBatch,
    BatchFinished(BatchOutcome),

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,

    // Selected entry
    OpenImage,
    YankImageUrl,

    None,
}

