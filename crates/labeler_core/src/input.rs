/// Operator input, decoded from raw key presses by the display backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Digit key `1..=9`.
    Digit(u8),
    /// Step back to the previous image.
    Back,
    /// Discard everything labeled this session.
    Abort,
    /// Persist now and end the session.
    Save,
    /// Anything else; ignored by the loop.
    Other,
}

impl InputEvent {
    /// Maps typed text to an event. Back and abort come from non-text keys.
    pub fn from_char(c: char) -> Self {
        match c {
            '1'..='9' => InputEvent::Digit(c as u8 - b'0'),
            's' | 'S' => InputEvent::Save,
            _ => InputEvent::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('1', InputEvent::Digit(1))]
    #[case('9', InputEvent::Digit(9))]
    #[case('0', InputEvent::Other)]
    #[case('s', InputEvent::Save)]
    #[case('S', InputEvent::Save)]
    #[case('x', InputEvent::Other)]
    fn from_char_decodes_keys(#[case] c: char, #[case] expected: InputEvent) {
        assert_eq!(InputEvent::from_char(c), expected);
    }
}
