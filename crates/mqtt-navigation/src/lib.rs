//! mqtt-navigation: tiny stateful coordinators for keyboard navigation over
//! the topic match list and the currently-displayed message list. Both
//! wrap-around, index-based (spec §2/§3).

mod message_cursor;
mod search_context;

pub use message_cursor::MessageCursor;
pub use search_context::{SearchContext, TopicReference};
