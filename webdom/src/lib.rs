pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod listener;
pub mod node;
pub mod selector;

pub use document::Document;
pub use element::Element;
pub use error::{DomError, Result};
pub use event::{Event, EventType, Key};
pub use listener::{ListenerId, Subscription};
pub use node::NodeId;
pub use selector::Selector;
