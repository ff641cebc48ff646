//! Committed/draft container for speculative edits.
//!
//! A [`Sandbox`] holds a baseline value and, while a draft is open, a
//! second independently owned copy that receives every mutation. Commit
//! promotes the draft; discard drops it. Copies are deep clones, so nothing
//! done to a draft is visible through the baseline.
//!
//! Outside a draft the baseline is the committed value. Re-entering an
//! open draft moves the baseline to the draft, so from then on it may hold
//! edits that were never committed.

use tracing::debug;

/// Which slot is currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxMode {
    /// No draft open; the committed value is live.
    Committed,
    /// A draft is open and live.
    Draft,
}

impl SandboxMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Draft => "draft",
        }
    }
}

/// Sandbox transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    /// Commit or discard was called with no open draft.
    #[error("no draft is open")]
    NotInDraft,
}

/// Two-slot container: the baseline and an optional draft.
#[derive(Debug, Clone, PartialEq)]
pub struct Sandbox<T> {
    baseline: T,
    draft: Option<T>,
}

impl<T: Clone> Sandbox<T> {
    /// Start in committed mode with no draft.
    pub fn new(value: T) -> Self {
        Self {
            baseline: value,
            draft: None,
        }
    }

    pub fn mode(&self) -> SandboxMode {
        if self.draft.is_some() {
            SandboxMode::Draft
        } else {
            SandboxMode::Committed
        }
    }

    pub fn is_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// The value mutations currently apply to.
    pub fn live(&self) -> &T {
        self.draft.as_ref().unwrap_or(&self.baseline)
    }

    /// Mutable access to the live value.
    pub fn live_mut(&mut self) -> &mut T {
        match self.draft {
            Some(ref mut draft) => draft,
            None => &mut self.baseline,
        }
    }

    /// The value a discard would restore.
    pub fn baseline(&self) -> &T {
        &self.baseline
    }

    /// Open a draft copied from the live value.
    ///
    /// Calling this with a draft already open re-bases: the current draft
    /// becomes the baseline that a later discard returns to. Drafts never
    /// nest.
    pub fn enter_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!("re-basing open draft");
            self.baseline = draft;
        }
        self.draft = Some(self.baseline.clone());
        debug!("draft opened");
    }

    /// Promote the draft to the baseline.
    pub fn commit_draft(&mut self) -> Result<(), SandboxError> {
        let draft = self.draft.take().ok_or(SandboxError::NotInDraft)?;
        self.baseline = draft;
        debug!("draft committed");
        Ok(())
    }

    /// Drop the draft, restoring the baseline taken at [`Self::enter_draft`].
    pub fn discard_draft(&mut self) -> Result<(), SandboxError> {
        self.draft.take().ok_or(SandboxError::NotInDraft)?;
        debug!("draft discarded");
        Ok(())
    }
}

impl<T: Clone + Default> Default for Sandbox<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_committed() {
        let sandbox = Sandbox::new(vec![1]);
        assert_eq!(sandbox.mode(), SandboxMode::Committed);
        assert_eq!(sandbox.live(), &vec![1]);
    }

    #[test]
    fn test_discard_restores_snapshot() {
        let mut sandbox = Sandbox::new(vec![1, 2]);
        sandbox.enter_draft();
        sandbox.live_mut().push(3);
        sandbox.live_mut().retain(|v| *v != 1);
        assert_eq!(sandbox.live(), &vec![2, 3]);
        assert_eq!(sandbox.baseline(), &vec![1, 2]);

        sandbox.discard_draft().unwrap();
        assert_eq!(sandbox.mode(), SandboxMode::Committed);
        assert_eq!(sandbox.live(), &vec![1, 2]);
    }

    #[test]
    fn test_commit_keeps_draft() {
        let mut sandbox = Sandbox::new(vec![1]);
        sandbox.enter_draft();
        sandbox.live_mut().push(2);
        sandbox.commit_draft().unwrap();
        assert_eq!(sandbox.mode(), SandboxMode::Committed);
        assert_eq!(sandbox.live(), &vec![1, 2]);
        assert_eq!(sandbox.baseline(), &vec![1, 2]);
    }

    #[test]
    fn test_commit_then_discard_fails_and_keeps_commit() {
        let mut sandbox = Sandbox::new(vec![1]);
        sandbox.enter_draft();
        sandbox.live_mut().push(2);
        sandbox.commit_draft().unwrap();

        assert_eq!(sandbox.discard_draft(), Err(SandboxError::NotInDraft));
        assert_eq!(sandbox.live(), &vec![1, 2]);
    }

    #[test]
    fn test_transitions_outside_draft_fail() {
        let mut sandbox = Sandbox::new(0u8);
        assert_eq!(sandbox.commit_draft(), Err(SandboxError::NotInDraft));
        assert_eq!(sandbox.discard_draft(), Err(SandboxError::NotInDraft));
    }

    #[test]
    fn test_reentering_draft_rebases() {
        let mut sandbox = Sandbox::new(vec![1]);
        sandbox.enter_draft();
        sandbox.live_mut().push(2);

        // Second enter snapshots the current draft instead of stacking.
        sandbox.enter_draft();
        assert_eq!(sandbox.baseline(), &vec![1, 2]);
        sandbox.live_mut().push(3);
        sandbox.discard_draft().unwrap();

        assert_eq!(sandbox.live(), &vec![1, 2]);
        assert_eq!(sandbox.mode(), SandboxMode::Committed);
    }
}
