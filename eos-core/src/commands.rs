//! One-shot console commands sent outside the poll loop.
//!
//! These build a single message and hand it to the sink. Input that does not
//! fit a bounded address or string argument is logged and dropped; nothing is
//! sent in that case.

use eos_proto::{CapacityError, MessageBuilder, OscMessage, SUBSCRIBE, UNSUBSCRIBE};

use crate::gateway::MessageSink;

/// Fader page configured by [`init_default_faders`].
pub const DEFAULT_FADER_PAGE: u8 = 1;
/// Fader count configured by [`init_default_faders`].
pub const DEFAULT_FADER_COUNT: u8 = 10;
/// Fader bank configured by [`init_default_faders`].
pub const DEFAULT_FADER_BANK: u8 = 1;

fn dispatch<S: MessageSink + ?Sized>(
    sink: &mut S,
    what: &str,
    message: Result<OscMessage, CapacityError>,
) {
    match message {
        Ok(message) => sink.send(&message),
        Err(_) => warn!("{} dropped: input too long", what),
    }
}

/// Add an address pattern to the console's outgoing filter (`/eos/filter/add`).
pub fn filter<S: MessageSink + ?Sized>(sink: &mut S, pattern: &str) {
    dispatch(
        sink,
        "filter",
        MessageBuilder::new("/eos/filter/add").string(pattern).build(),
    );
}

/// Ask the console to report changes of `parameter`.
pub fn subscribe<S: MessageSink + ?Sized>(sink: &mut S, parameter: &str) {
    dispatch(sink, "subscribe", subscription(parameter, SUBSCRIBE));
}

/// Stop reports for `parameter`.
pub fn unsubscribe<S: MessageSink + ?Sized>(sink: &mut S, parameter: &str) {
    dispatch(sink, "unsubscribe", subscription(parameter, UNSUBSCRIBE));
}

fn subscription(parameter: &str, state: i32) -> Result<OscMessage, CapacityError> {
    MessageBuilder::new("/eos/subscribe/param")
        .segment(parameter)
        .int(state)
        .build()
}

/// `/eos/ping` without argument.
pub fn ping<S: MessageSink + ?Sized>(sink: &mut S) {
    dispatch(sink, "ping", MessageBuilder::new("/eos/ping").build());
}

/// `/eos/ping` echoing `text` back from the console.
pub fn ping_with<S: MessageSink + ?Sized>(sink: &mut S, text: &str) {
    dispatch(
        sink,
        "ping",
        MessageBuilder::new("/eos/ping").string(text).build(),
    );
}

/// Append `text` to the command line (`/eos/cmd`).
pub fn command<S: MessageSink + ?Sized>(sink: &mut S, text: &str) {
    dispatch(
        sink,
        "command",
        MessageBuilder::new("/eos/cmd").string(text).build(),
    );
}

/// Clear the command line and enter `text` (`/eos/newcmd`).
pub fn new_command<S: MessageSink + ?Sized>(sink: &mut S, text: &str) {
    dispatch(
        sink,
        "new command",
        MessageBuilder::new("/eos/newcmd").string(text).build(),
    );
}

/// Switch the console user (`/eos/user`).
pub fn user<S: MessageSink + ?Sized>(sink: &mut S, id: i16) {
    dispatch(
        sink,
        "user",
        MessageBuilder::new("/eos/user").int(i32::from(id)).build(),
    );
}

/// Configure a fader bank: `/eos/fader/<bank>/config/<page>/<count>`.
pub fn init_faders<S: MessageSink + ?Sized>(sink: &mut S, page: u8, count: u8, bank: u8) {
    dispatch(
        sink,
        "fader config",
        MessageBuilder::new("/eos/fader")
            .number(bank)
            .segment("config")
            .number(page)
            .number(count)
            .build(),
    );
}

/// [`init_faders`] with page 1, ten faders, bank 1.
pub fn init_default_faders<S: MessageSink + ?Sized>(sink: &mut S) {
    init_faders(
        sink,
        DEFAULT_FADER_PAGE,
        DEFAULT_FADER_COUNT,
        DEFAULT_FADER_BANK,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSink;
    use eos_proto::OscArg;

    fn only(sink: &RecordingSink) -> OscMessage {
        let sent = sink.messages();
        assert_eq!(sent.len(), 1);
        sent[0].clone()
    }

    #[test]
    fn test_filter() {
        let mut sink = RecordingSink::new();
        filter(&mut sink, "/eos/out/param/*");
        let msg = only(&sink);
        assert_eq!(msg.address(), "/eos/filter/add");
        assert_eq!(msg.arg, OscArg::string("/eos/out/param/*").unwrap());
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let mut sink = RecordingSink::new();
        subscribe(&mut sink, "Pan");
        unsubscribe(&mut sink, "Pan");
        let sent = sink.messages();
        assert_eq!(sent[0].address(), "/eos/subscribe/param/Pan");
        assert_eq!(sent[0].arg, OscArg::Int(1));
        assert_eq!(sent[1].address(), "/eos/subscribe/param/Pan");
        assert_eq!(sent[1].arg, OscArg::Int(0));
    }

    #[test]
    fn test_ping() {
        let mut sink = RecordingSink::new();
        ping(&mut sink);
        ping_with(&mut sink, "hello");
        let sent = sink.messages();
        assert_eq!(sent[0].address(), "/eos/ping");
        assert_eq!(sent[0].arg, OscArg::None);
        assert_eq!(sent[1].arg, OscArg::string("hello").unwrap());
    }

    #[test]
    fn test_command_line() {
        let mut sink = RecordingSink::new();
        command(&mut sink, "Chan 1 At Full#");
        new_command(&mut sink, "Cue 5#");
        let sent = sink.messages();
        assert_eq!(sent[0].address(), "/eos/cmd");
        assert_eq!(sent[1].address(), "/eos/newcmd");
        assert_eq!(sent[1].arg, OscArg::string("Cue 5#").unwrap());
    }

    #[test]
    fn test_user() {
        let mut sink = RecordingSink::new();
        user(&mut sink, -1);
        let msg = only(&sink);
        assert_eq!(msg.address(), "/eos/user");
        assert_eq!(msg.arg, OscArg::Int(-1));
    }

    #[test]
    fn test_init_faders() {
        let mut sink = RecordingSink::new();
        init_default_faders(&mut sink);
        init_faders(&mut sink, 2, 20, 3);
        let sent = sink.messages();
        assert_eq!(sent[0].address(), "/eos/fader/1/config/1/10");
        assert_eq!(sent[0].arg, OscArg::None);
        assert_eq!(sent[1].address(), "/eos/fader/3/config/2/20");
    }

    #[test]
    fn test_overlong_input_is_dropped() {
        let mut sink = RecordingSink::new();
        let long = [b'x'; 200];
        let long = core::str::from_utf8(&long).unwrap();
        command(&mut sink, long);
        subscribe(&mut sink, long);
        assert_eq!(sink.len(), 0);
    }
}
