use crate::node::NodeId;

/// Event types a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    TouchStart,
    KeyDown,
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// An event travelling from its target up to the document root.
///
/// Handlers receive `&mut Event` so they can suppress the default action or
/// stop propagation to ancestors. Other listeners registered on the current
/// node still run after `stop_propagation()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    /// Node the event was dispatched on.
    pub target: NodeId,
    /// Node whose listener is currently running.
    pub current_target: NodeId,
    /// For selector-delegated listeners, the matched node between `target`
    /// and `current_target`.
    pub delegate_target: Option<NodeId>,
    /// Key for `KeyDown` events.
    pub key: Option<Key>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventType, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            delegate_target: None,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn key_down(target: NodeId, key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventType::KeyDown, target)
        }
    }

    /// Suppress the default browser action for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching ancestors of the current node.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
