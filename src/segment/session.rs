//! Per-speaker capture session state.
//!
//! A session tracks one speaker's utterance-in-progress: the append-only
//! buffer, the speaking flag, the pending-silence timer, and an epoch
//! counter that lets stale timer fires detect they are obsolete.

use tokio::task::JoinHandle;

/// State of one actively-tracked speaker.
///
/// Invariants:
/// - At most one pending-silence timer is armed at a time; arming a new one
///   always aborts the prior one first.
/// - `epoch` increments on every timer arm and every finalize. A fire whose
///   epoch no longer matches is stale: its timer was either replaced or its
///   utterance already finalized through another path. Aborting the timer
///   task alone is not enough, because a fire may already be queued.
#[derive(Debug, Default)]
pub(crate) struct SpeakerSession {
    /// Utterance buffer, append-only while capturing.
    buffer: Vec<u8>,
    /// Frames appended to the current buffer.
    frames: usize,
    /// True from the first speech signal or frame until finalize.
    speaking: bool,
    /// Generation counter; bumped on every timer arm and every finalize.
    epoch: u64,
    /// Pending silence timer, owned exclusively by this session.
    timer: Option<JoinHandle<()>>,
}

impl SpeakerSession {
    /// Begins (or resumes) capture.
    ///
    /// A fresh utterance starts with an empty buffer; a start signal that
    /// arrives while already capturing resumes into the same buffer.
    pub(crate) fn begin(&mut self) {
        if !self.speaking {
            self.buffer.clear();
            self.frames = 0;
            self.speaking = true;
        }
    }

    /// Appends a frame to the buffer unconditionally and marks the session
    /// as capturing (frames imply speech even without a start signal).
    pub(crate) fn append(&mut self, data: &[u8]) {
        self.speaking = true;
        self.buffer.extend_from_slice(data);
        self.frames += 1;
    }

    /// Returns true while an utterance is being captured.
    pub(crate) fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Current buffer size in bytes.
    pub(crate) fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Current epoch.
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bumps the epoch for a new timer arm and returns the value the timer
    /// must carry; any earlier fire becomes stale.
    pub(crate) fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Returns true if a timer armed at `epoch` is still current.
    pub(crate) fn is_live(&self, epoch: u64) -> bool {
        self.speaking && self.epoch == epoch
    }

    /// Installs a new pending-silence timer, aborting any prior one.
    pub(crate) fn arm(&mut self, timer: JoinHandle<()>) {
        self.cancel_timer();
        self.timer = Some(timer);
    }

    /// Returns true while a silence timer is armed.
    pub(crate) fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Aborts the pending timer, if any.
    pub(crate) fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Closes the utterance: returns the buffer, marks the session idle,
    /// bumps the epoch, and aborts any pending timer.
    pub(crate) fn finalize(&mut self) -> (Vec<u8>, usize) {
        self.cancel_timer();
        self.speaking = false;
        self.epoch += 1;
        let frames = self.frames;
        self.frames = 0;
        (std::mem::take(&mut self.buffer), frames)
    }
}

impl Drop for SpeakerSession {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_starts_fresh() {
        let mut session = SpeakerSession::default();
        assert!(!session.is_speaking());

        session.begin();
        assert!(session.is_speaking());
        assert_eq!(session.buffered_bytes(), 0);
    }

    #[test]
    fn test_begin_while_speaking_keeps_buffer() {
        let mut session = SpeakerSession::default();
        session.begin();
        session.append(b"audio");

        session.begin();
        assert_eq!(session.buffered_bytes(), 5);
    }

    #[test]
    fn test_append_marks_speaking() {
        let mut session = SpeakerSession::default();
        session.append(b"x");
        assert!(session.is_speaking());
        assert_eq!(session.buffered_bytes(), 1);
    }

    #[test]
    fn test_finalize_empties_buffer_and_bumps_epoch() {
        let mut session = SpeakerSession::default();
        session.begin();
        session.append(b"audio1");
        session.append(b"x");
        let armed_epoch = session.epoch();

        let (audio, frames) = session.finalize();
        assert_eq!(audio, b"audio1x");
        assert_eq!(frames, 2);
        assert!(!session.is_speaking());
        assert_eq!(session.buffered_bytes(), 0);
        assert!(!session.is_live(armed_epoch));
    }

    #[test]
    fn test_next_utterance_starts_clean() {
        let mut session = SpeakerSession::default();
        session.begin();
        session.append(b"first");
        let _ = session.finalize();

        session.begin();
        session.append(b"second");
        let (audio, _) = session.finalize();
        assert_eq!(audio, b"second");
    }

    #[test]
    fn test_is_live_requires_matching_epoch_and_speaking() {
        let mut session = SpeakerSession::default();
        session.begin();
        let epoch = session.epoch();
        assert!(session.is_live(epoch));
        assert!(!session.is_live(epoch + 1));

        let _ = session.finalize();
        assert!(!session.is_live(epoch));
    }

    #[test]
    fn test_advance_epoch_invalidates_prior_arm() {
        let mut session = SpeakerSession::default();
        session.begin();

        let first_arm = session.advance_epoch();
        assert!(session.is_live(first_arm));

        // A second arm makes any fire from the first timer stale.
        let second_arm = session.advance_epoch();
        assert!(!session.is_live(first_arm));
        assert!(session.is_live(second_arm));
    }

    #[tokio::test]
    async fn test_arm_replaces_prior_timer() {
        let mut session = SpeakerSession::default();
        session.begin();

        let first = tokio::spawn(std::future::pending::<()>());
        let second = tokio::spawn(std::future::pending::<()>());

        session.arm(first);
        session.arm(second);
        session.cancel_timer();
        // Both timers must be gone; cancel on an empty session is a no-op.
        session.cancel_timer();
    }
}
