use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::auth::User;

/// Layout used when rendering ledger timestamps. Zero-padded and ordered from
/// most to least significant field so rendered lines sort chronologically.
pub const BAN_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanHistoryEntry {
    pub executor_email: String,
    pub is_ban: bool,
    pub time: OffsetDateTime,
    pub reason: String,
}

impl BanHistoryEntry {
    pub fn ban(
        executor_email: impl Into<String>,
        reason: impl Into<String>,
        time: OffsetDateTime,
    ) -> Self {
        Self {
            executor_email: executor_email.into(),
            is_ban: true,
            time,
            reason: reason.into(),
        }
    }

    /// Unban events never carry a reason.
    pub fn unban(executor_email: impl Into<String>, time: OffsetDateTime) -> Self {
        Self {
            executor_email: executor_email.into(),
            is_ban: false,
            time,
            reason: String::new(),
        }
    }

    pub fn formatted_time(&self) -> String {
        let utc = self.time.to_offset(UtcOffset::UTC);
        utc.format(BAN_TIME_FORMAT)
            .unwrap_or_else(|_| utc.to_string())
    }

    pub fn render_line(&self) -> String {
        let action = if self.is_ban {
            format!("banned (reason: {})", self.reason)
        } else {
            "unbanned".to_string()
        };

        format!(
            "-- was {} at {} by {}\n",
            action,
            self.formatted_time(),
            self.executor_email
        )
    }
}

/// Append-only, chronologically ordered ban ledger owned by a [`User`].
///
/// Entries can be appended and read back but never edited, removed or
/// reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BanHistory(Vec<BanHistoryEntry>);

impl BanHistory {
    /// Rebuilds a ledger from stored entries, which must already be in
    /// insertion order.
    pub fn from_entries(entries: Vec<BanHistoryEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[BanHistoryEntry] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &BanHistoryEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&BanHistoryEntry> {
        self.0.last()
    }

    fn append(&mut self, entry: BanHistoryEntry) {
        self.0.push(entry);
    }

    pub fn render(&self) -> String {
        render_history(self.entries())
    }
}

pub fn render_history(entries: &[BanHistoryEntry]) -> String {
    entries.iter().map(BanHistoryEntry::render_line).collect()
}

impl User {
    /// Appends a ban or unban event to the ledger and sets `banned` to match.
    /// The reason of an unban event is always discarded.
    pub fn record_ban_event(
        &mut self,
        executor_email: &str,
        is_ban: bool,
        reason: &str,
        time: OffsetDateTime,
    ) {
        let entry = if is_ban {
            BanHistoryEntry::ban(executor_email, reason, time)
        } else {
            BanHistoryEntry::unban(executor_email, time)
        };

        self.banned = is_ban;
        self.ban_history.append(entry);
    }

    pub fn ban(&mut self, executor_email: &str, reason: &str, time: OffsetDateTime) {
        self.record_ban_event(executor_email, true, reason, time);
    }

    pub fn unban(&mut self, executor_email: &str, time: OffsetDateTime) {
        self.record_ban_event(executor_email, false, "", time);
    }
}
