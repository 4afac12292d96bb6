//! Linear undo/redo history with debounced checkpoints

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period after which an edit becomes its own history entry
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(3000);

#[derive(Debug)]
struct HistoryState {
    history: Vec<String>,
    history_index: usize,
    is_applying_history: bool,
    last_input_time: Option<Instant>,
    input_timeout: Option<JoinHandle<()>>,
    pending_content: Option<String>,
    /// Bumped whenever the pending commit is replaced or cancelled
    generation: u64,
}

impl HistoryState {
    fn save_history_block(&mut self, content: String) {
        self.history.truncate(self.history_index + 1);
        self.history.push(content);
        self.history_index = self.history.len() - 1;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.input_timeout.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn flush_pending(&mut self) {
        self.cancel_pending();
        if let Some(content) = self.pending_content.take() {
            self.save_history_block(content);
        }
    }
}

/// Undo history of one editor instance
///
/// Inputs closer together than the debounce delay are coalesced: only the
/// last content of a burst is recorded, once the burst has been quiet for
/// the full delay. Timers run on the ambient tokio runtime.
#[derive(Debug)]
pub struct EditorHistory {
    state: Arc<Mutex<HistoryState>>,
    debounce: Duration,
}

impl EditorHistory {
    /// History seeded with a single snapshot
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_debounce(initial, DEFAULT_DEBOUNCE)
    }

    #[must_use]
    pub fn with_debounce(initial: impl Into<String>, debounce: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryState {
                history: vec![initial.into()],
                history_index: 0,
                is_applying_history: false,
                last_input_time: None,
                input_timeout: None,
                pending_content: None,
                generation: 0,
            })),
            debounce,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an edit
    ///
    /// Ignored while an undo or redo is being applied. Must be called from
    /// within a tokio runtime.
    pub fn handle_input(&self, content: impl Into<String>) {
        let content = content.into();
        let now = Instant::now();
        let mut state = self.lock();
        if state.is_applying_history {
            return;
        }

        let quiet = state
            .last_input_time
            .is_none_or(|last| now.duration_since(last) > self.debounce);
        state.last_input_time = Some(now);

        if quiet {
            state.flush_pending();
            state.save_history_block(content);
            return;
        }

        state.cancel_pending();
        state.pending_content = Some(content);
        let generation = state.generation;
        let weak = Arc::downgrade(&self.state);
        let delay = self.debounce;

        state.input_timeout = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation != generation {
                return;
            }
            state.input_timeout = None;
            if let Some(content) = state.pending_content.take() {
                state.save_history_block(content);
            }
        }));
    }

    /// Append an entry right away, dropping everything after the pointer
    pub fn save_history_block(&self, content: impl Into<String>) {
        self.lock().save_history_block(content.into());
    }

    /// Commit a pending debounced edit now
    pub fn flush(&self) {
        self.lock().flush_pending();
    }

    /// Step back one entry and hand it to `setter`
    ///
    /// A pending edit is committed first so it can be redone. Returns false
    /// at the oldest entry.
    pub fn undo<F>(&self, setter: F) -> bool
    where
        F: FnOnce(&str),
    {
        self.step(setter, |index, _| index.checked_sub(1))
    }

    /// Step forward one entry and hand it to `setter`; false at the newest entry
    pub fn redo<F>(&self, setter: F) -> bool
    where
        F: FnOnce(&str),
    {
        self.step(setter, |index, len| (index + 1 < len).then_some(index + 1))
    }

    fn step<F, M>(&self, setter: F, target: M) -> bool
    where
        F: FnOnce(&str),
        M: FnOnce(usize, usize) -> Option<usize>,
    {
        let content = {
            let mut state = self.lock();
            if state.is_applying_history {
                return false;
            }
            state.flush_pending();
            let Some(index) = target(state.history_index, state.history.len()) else {
                return false;
            };
            state.history_index = index;
            state.is_applying_history = true;
            state.history[index].clone()
        };

        // The setter may feed the content straight back into `handle_input`
        setter(&content);

        self.lock().is_applying_history = false;
        true
    }

    /// Cancel the pending debounced commit, discarding its content
    pub fn clear_timeout(&self) {
        let mut state = self.lock();
        state.cancel_pending();
        state.pending_content = None;
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.lock().history_index
    }

    #[must_use]
    pub fn current(&self) -> String {
        let state = self.lock();
        state.history[state.history_index].clone()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.lock().history_index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        let state = self.lock();
        state.history_index + 1 < state.history.len()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.lock().pending_content.is_some()
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Drop for EditorHistory {
    fn drop(&mut self) {
        self.lock().cancel_pending();
    }
}
