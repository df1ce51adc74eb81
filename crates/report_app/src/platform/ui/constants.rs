pub const PROGRESS_BAR_WIDTH: usize = 30;
pub const PROGRESS_FILLED: char = '#';
pub const PROGRESS_EMPTY: char = '.';
pub const STEP_MESSAGE_INDENT: &str = "    ";
