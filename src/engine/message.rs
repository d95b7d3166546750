#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Commands from the control thread that are not plain parameter values
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// Zero every delay line and loop filter
    Mute,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<EngineMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<EngineMessage> {
    fn pop(&mut self) -> Option<EngineMessage> {
        Consumer::pop(self).ok()
    }
}
