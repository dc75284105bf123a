//! Keyboard navigation over the currently-displayed message list (spec
//! §4/§2, `MessageCursor`).

use mqtt_inspect_types::MessageId;

/// Coordinates keyboard navigation over the currently-displayed, ordered
/// message list. Wrap-around, index-based.
#[derive(Debug, Clone, Default)]
pub struct MessageCursor {
    messages: Vec<MessageId>,
    selected_index: isize,
}

impl MessageCursor {
    /// Point the cursor at a new ordered message list, resetting selection
    /// to the first entry (or -1 if empty).
    pub fn set_messages(&mut self, messages: Vec<MessageId>) {
        self.selected_index = if messages.is_empty() { -1 } else { 0 };
        self.messages = messages;
    }

    /// The message list currently being navigated.
    #[must_use]
    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }

    /// The currently selected message, if any.
    #[must_use]
    pub fn selected(&self) -> Option<MessageId> {
        if self.selected_index < 0 {
            None
        } else {
            self.messages.get(self.selected_index as usize).copied()
        }
    }

    /// The current index, or -1 if the list is empty.
    #[must_use]
    pub fn selected_index(&self) -> isize {
        self.selected_index
    }

    /// Move to the next message, wrapping to the first after the last. A
    /// no-op on an empty list.
    pub fn advance(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let len = self.messages.len() as isize;
        self.selected_index = (self.selected_index + 1).rem_euclid(len);
    }

    /// Move to the previous message, wrapping to the last before the
    /// first. A no-op on an empty list.
    pub fn retreat(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let len = self.messages.len() as isize;
        self.selected_index = (self.selected_index - 1).rem_euclid(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_around_on_empty_is_no_op() {
        let mut cursor = MessageCursor::default();
        cursor.advance();
        cursor.retreat();
        assert_eq!(cursor.selected_index(), -1);
        assert!(cursor.selected().is_none());
    }

    #[test]
    fn advance_and_retreat_wrap() {
        let mut cursor = MessageCursor::default();
        cursor.set_messages(vec![MessageId::new(1), MessageId::new(2), MessageId::new(3)]);
        assert_eq!(cursor.selected(), Some(MessageId::new(1)));
        cursor.retreat();
        assert_eq!(cursor.selected(), Some(MessageId::new(3)));
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.selected(), Some(MessageId::new(1)));
    }
}
