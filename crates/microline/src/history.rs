#![forbid(unsafe_code)]

//! Circular command history.
//!
//! Records are stored back to back in a fixed `[u8; N]` ring, each one
//! followed by a NUL terminator:
//!
//! ```text
//!          head                      tail
//!           v                         v
//! [ .. r t \0 l s \0 e c h o  \0 . . . . . . r e b o o ]
//!      ^^^^^^ end of a record that wrapped around
//! ```
//!
//! `head` is the first byte of the oldest record and `tail` is where the
//! next record will be written. One byte is always left unused so that
//! `head == tail` unambiguously means "empty". A record therefore needs
//! `len + 1` free bytes and the largest storable record is `N - 2` bytes.
//!
//! All wraparound arithmetic lives in [`HistoryRing::wrap`] and the record
//! iterator; the rest of the module works with logical offsets.
//!
//! Navigation keeps a counter of how many records back from the newest the
//! user is looking at; `0` means "not navigating".

/// Direction of history navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards older records.
    Up,
    /// Towards newer records.
    Down,
}

/// One record inside the ring.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a, const N: usize> {
    ring: &'a [u8; N],
    start: usize,
    len: usize,
}

impl<const N: usize> Record<'_, N> {
    /// Payload length in bytes (terminator excluded).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Payload bytes in order, following the wrap.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| self.ring[(self.start + i) % N])
    }

    /// Copy the payload into `dst` and return the number of bytes copied.
    pub fn copy_to(&self, dst: &mut [u8]) -> usize {
        let mut copied = 0;
        for (slot, byte) in dst.iter_mut().zip(self.bytes()) {
            *slot = byte;
            copied += 1;
        }
        copied
    }

    /// Whether the payload equals `other`.
    #[must_use]
    pub fn eq_bytes(&self, other: &[u8]) -> bool {
        self.len == other.len() && self.bytes().zip(other.iter()).all(|(a, &b)| a == b)
    }
}

/// Fixed-capacity ring of NUL-terminated history records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRing<const N: usize> {
    ring: [u8; N],
    head: usize,
    tail: usize,
    nav: usize,
}

impl<const N: usize> Default for HistoryRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HistoryRing<N> {
    /// Longest payload that can ever be stored.
    pub const MAX_RECORD: usize = N.saturating_sub(2);

    /// Create an empty ring.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: [0; N],
            head: 0,
            tail: 0,
            nav: 0,
        }
    }

    #[inline]
    fn wrap(index: usize) -> usize {
        if index >= N { index - N } else { index }
    }

    /// Bytes occupied by records and their terminators.
    #[inline]
    #[must_use]
    pub fn used(&self) -> usize {
        (self.tail + N - self.head) % N.max(1)
    }

    /// Bytes available for new records (terminators included).
    #[inline]
    #[must_use]
    pub fn free(&self) -> usize {
        N.saturating_sub(1) - self.used()
    }

    /// Whether no record is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Current navigation depth (0 when not navigating).
    #[inline]
    #[must_use]
    pub fn nav_count(&self) -> usize {
        self.nav
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> Records<'_, N> {
        Records {
            ring: &self.ring,
            at: self.head,
            tail: self.tail,
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records().count()
    }

    /// The record `offset` steps back from the newest (`1` is the newest).
    #[must_use]
    pub fn record_at_offset(&self, offset: usize) -> Option<Record<'_, N>> {
        let count = self.record_count();
        if offset == 0 || offset > count {
            return None;
        }
        self.records().nth(count - offset)
    }

    /// Drop the oldest record. Returns `false` when the ring is empty.
    pub fn evict_oldest(&mut self) -> bool {
        let Some(oldest) = self.records().next() else {
            return false;
        };
        let next = Self::wrap(oldest.start + oldest.len + 1);
        crate::trace!(len = oldest.len, "history record evicted");
        self.head = next;
        true
    }

    /// Append `line` after the newest record, evicting as needed.
    ///
    /// Returns `false` when the line can never fit or contains a NUL byte.
    pub fn push(&mut self, line: &[u8]) -> bool {
        if line.len() > Self::MAX_RECORD || line.contains(&0) {
            return false;
        }
        while self.free() < line.len() + 1 {
            if !self.evict_oldest() {
                return false;
            }
        }
        for (i, &byte) in line.iter().enumerate() {
            self.ring[Self::wrap(self.tail + i)] = byte;
        }
        self.ring[Self::wrap(self.tail + line.len())] = 0;
        self.tail = Self::wrap(self.tail + line.len() + 1);
        true
    }

    /// Save a submitted line.
    ///
    /// Empty lines and lines longer than [`Self::MAX_RECORD`] are ignored.
    /// A line equal to the newest record is not stored again. Navigation
    /// restarts from the newest record in every case.
    pub fn save(&mut self, line: &[u8]) {
        if line.is_empty() || line.len() > Self::MAX_RECORD {
            return;
        }
        let duplicate = self
            .record_at_offset(1)
            .is_some_and(|newest| newest.eq_bytes(line));
        self.nav = 0;
        if duplicate {
            crate::trace!("history duplicate suppressed");
            return;
        }
        self.push(line);
    }

    /// Step through history.
    ///
    /// Returns the record to show, or `None` when the line should be
    /// blanked (nothing older, or stepped back down past the newest).
    pub fn navigate(&mut self, direction: Direction) -> Option<Record<'_, N>> {
        match direction {
            Direction::Up => {
                let count = self.record_count();
                if count < self.nav {
                    return None;
                }
                if self.nav < count {
                    self.nav += 1;
                }
            }
            Direction::Down => {
                if self.nav == 0 {
                    return None;
                }
                self.nav -= 1;
                if self.nav == 0 {
                    return None;
                }
            }
        }
        crate::trace!(depth = self.nav, "history navigation");
        self.record_at_offset(self.nav)
    }

    /// Forget every record.
    pub fn clear(&mut self) {
        self.ring = [0; N];
        self.head = 0;
        self.tail = 0;
        self.nav = 0;
    }
}

/// Iterator over stored records, oldest first.
#[derive(Debug, Clone)]
pub struct Records<'a, const N: usize> {
    ring: &'a [u8; N],
    at: usize,
    tail: usize,
}

impl<'a, const N: usize> Iterator for Records<'a, N> {
    type Item = Record<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at == self.tail {
            return None;
        }
        let start = self.at;
        let mut len = 0;
        while self.ring[(start + len) % N] != 0 {
            len += 1;
        }
        self.at = (start + len + 1) % N;
        Some(Record {
            ring: self.ring,
            start,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn collect<const N: usize>(ring: &HistoryRing<N>) -> Vec<Vec<u8>> {
        ring.records().map(|r| r.bytes().collect()).collect()
    }

    fn nav<const N: usize>(ring: &mut HistoryRing<N>, dir: Direction) -> Vec<u8> {
        ring.navigate(dir)
            .map(|r| r.bytes().collect())
            .unwrap_or_default()
    }

    #[test]
    fn empty_ring() {
        let ring = HistoryRing::<16>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.record_count(), 0);
        assert_eq!(ring.free(), 15);
        assert!(ring.record_at_offset(1).is_none());
    }

    #[test]
    fn save_and_order() {
        let mut ring = HistoryRing::<32>::new();
        ring.save(b"a");
        ring.save(b"bb");
        ring.save(b"ccc");
        assert_eq!(collect(&ring), [b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
        assert_eq!(ring.used(), 9);
        assert!(ring.record_at_offset(1).unwrap().eq_bytes(b"ccc"));
        assert!(ring.record_at_offset(3).unwrap().eq_bytes(b"a"));
        assert!(ring.record_at_offset(4).is_none());
    }

    #[test]
    fn duplicate_is_suppressed() {
        let mut ring = HistoryRing::<32>::new();
        ring.save(b"cmd1");
        ring.save(b"cmd1");
        assert_eq!(ring.record_count(), 1);
        ring.save(b"cmd2");
        ring.save(b"cmd1");
        assert_eq!(ring.record_count(), 3);
    }

    #[test]
    fn eviction_makes_room() {
        let mut ring = HistoryRing::<8>::new();
        ring.save(b"abc");
        ring.save(b"de");
        // 4 + 3 bytes used, 0 free: the next record must evict "abc".
        assert_eq!(ring.free(), 0);
        ring.save(b"f");
        assert_eq!(collect(&ring), [b"de".to_vec(), b"f".to_vec()]);
    }

    #[test]
    fn records_wrap_around() {
        let mut ring = HistoryRing::<8>::new();
        ring.save(b"abcde");
        ring.save(b"xyz");
        // "xyz" starts at index 6 and wraps to the front.
        assert_eq!(collect(&ring), [b"xyz".to_vec()]);
        let mut out = [0u8; 8];
        let n = ring.record_at_offset(1).unwrap().copy_to(&mut out);
        assert_eq!(&out[..n], b"xyz");
    }

    #[test]
    fn oversized_records_are_rejected() {
        let mut ring = HistoryRing::<8>::new();
        ring.save(b"1234567");
        assert!(ring.is_empty());
        ring.save(b"123456");
        assert_eq!(ring.record_count(), 1);
    }

    #[test]
    fn push_rejects_nul() {
        let mut ring = HistoryRing::<16>::new();
        assert!(!ring.push(b"a\0b"));
        assert!(ring.is_empty());
    }

    #[test]
    fn navigation_up_then_down() {
        let mut ring = HistoryRing::<32>::new();
        for line in [&b"a"[..], b"b", b"c"] {
            ring.save(line);
        }
        assert_eq!(nav(&mut ring, Direction::Up), b"c");
        assert_eq!(nav(&mut ring, Direction::Up), b"b");
        assert_eq!(nav(&mut ring, Direction::Up), b"a");
        // Stays on the oldest record.
        assert_eq!(nav(&mut ring, Direction::Up), b"a");
        assert_eq!(nav(&mut ring, Direction::Down), b"b");
        assert_eq!(nav(&mut ring, Direction::Down), b"c");
        assert_eq!(nav(&mut ring, Direction::Down), b"");
        assert_eq!(ring.nav_count(), 0);
        assert_eq!(nav(&mut ring, Direction::Down), b"");
    }

    #[test]
    fn navigation_on_empty_ring() {
        let mut ring = HistoryRing::<16>::new();
        assert!(ring.navigate(Direction::Up).is_none());
        assert!(ring.navigate(Direction::Down).is_none());
        assert_eq!(ring.nav_count(), 0);
    }

    #[test]
    fn save_resets_navigation() {
        let mut ring = HistoryRing::<32>::new();
        ring.save(b"a");
        ring.save(b"b");
        nav(&mut ring, Direction::Up);
        nav(&mut ring, Direction::Up);
        ring.save(b"b");
        assert_eq!(ring.nav_count(), 0);
        assert_eq!(nav(&mut ring, Direction::Up), b"b");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut ring = HistoryRing::<16>::new();
        ring.save(b"abc");
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.free(), 15);
    }
}
