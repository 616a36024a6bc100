use ed25519_dalek::VerifyingKey;

use crate::types::Message;

/// Notification channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Sender,
    MessageReceived,
}

impl Channel {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::MessageReceived => "message-received",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Sender(VerifyingKey),
    MessageReceived(Message),
}

impl Event {
    #[must_use]
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Sender(_) => Channel::Sender,
            Self::MessageReceived(_) => Channel::MessageReceived,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub seq: u64,
    pub event: Event,
}

/// Append-only feed. Sequence numbers start at 0 and never repeat.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the pair emitted by one accepted submission, `sender` first.
    pub(crate) fn append_submission(&mut self, address: VerifyingKey, message: Message) {
        self.push(Event::Sender(address));
        self.push(Event::MessageReceived(message));
    }

    fn push(&mut self, event: Event) {
        let seq = self.records.len() as u64;
        self.records.push(EventRecord { seq, event });
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `seq >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).map_or(self.records.len(), |s| s.min(self.records.len()));
        &self.records[start..]
    }

    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records.iter().filter(move |r| r.event.channel() == channel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn submission_appends_sender_then_message() {
        let vk = SigningKey::from_bytes(&[3u8; 32]).verifying_key();
        let mut log = EventLog::new();
        log.append_submission(vk, Message::from(4u64));
        log.append_submission(vk, Message::from(32u64));
        let chans: Vec<Channel> = log.records().iter().map(|r| r.event.channel()).collect();
        assert_eq!(
            chans,
            vec![
                Channel::Sender,
                Channel::MessageReceived,
                Channel::Sender,
                Channel::MessageReceived,
            ]
        );
        let seqs: Vec<u64> = log.records().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
        assert_eq!(log.channel(Channel::MessageReceived).count(), 2);
        assert_eq!(log.since(3).len(), 1);
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn channel_names() {
        assert_eq!(Channel::Sender.name(), "sender");
        assert_eq!(Channel::MessageReceived.name(), "message-received");
    }
}
