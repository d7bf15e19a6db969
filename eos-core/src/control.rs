//! The polling contract shared by every control.

use crate::gateway::MessageSink;

/// A physical control sampled once per poll-loop iteration.
///
/// `update` samples the control's own inputs, advances its state machine and
/// sends at most the messages its transitions call for. It never blocks
/// beyond the synchronous send. Controls that are not time based ignore
/// `now_ms`.
pub trait Control {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, now_ms: u64);
}
