use crate::domain::event::EventRecord;
use crate::error::{FaucetError, Result};
use std::io::Write;

/// Writes emitted events as JSON lines, one record per line.
pub struct EventWriter<W: Write> {
    sink: W,
}

impl<W: Write> EventWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a EventRecord>,
    ) -> Result<()> {
        for record in events {
            serde_json::to_writer(&mut self.sink, record)
                .map_err(|e| FaucetError::InternalError(Box::new(e)))?;
            self.sink.write_all(b"\n")?;
        }
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::Address;
    use crate::domain::event::LedgerEvent;
    use crate::domain::value::{Timestamp, Wei};

    #[test]
    fn test_write_events_as_json_lines() {
        let events = vec![
            EventRecord {
                seq: 0,
                at: Timestamp::new(100),
                caller: Address::ZERO,
                event: LedgerEvent::FundFaucet(Wei::new(5)),
            },
            EventRecord {
                seq: 1,
                at: Timestamp::new(101),
                caller: Address::ZERO,
                event: LedgerEvent::NextPossibleRequest(Timestamp::new(161)),
            },
        ];

        let mut out = Vec::new();
        EventWriter::new(&mut out).write_events(&events).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: EventRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, events[0]);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "NextPossibleRequest");
        assert_eq!(second["value"], 161);
    }
}
