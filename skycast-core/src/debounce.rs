use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle, time};

/// Idle period after the last keystroke before a search fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1200);

/// Trailing-edge debouncer.
///
/// Each `feed` supersedes any pending delivery and restarts the idle timer;
/// only when the window elapses without a newer value does the most recent
/// value reach the sink. Superseded values never fire. Constructed once per
/// workflow lifetime so pending timers are owned, not leaked.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    sink: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(window: Duration, sink: UnboundedSender<T>) -> Self {
        Self { window, sink, pending: None }
    }

    /// Record a new value, superseding any value still waiting on the timer.
    pub fn feed(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let sink = self.sink.clone();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            time::sleep(window).await;
            let _ = sink.send(value);
        }));
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_idle_window() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW, tx);

        debouncer.feed("Astana".to_string());
        time::sleep(DEBOUNCE_WINDOW + Duration::from_millis(1)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("Astana"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_coalesce_to_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW, tx);

        debouncer.feed("Ast".to_string());
        time::sleep(Duration::from_millis(200)).await;
        debouncer.feed("Astana".to_string());

        time::sleep(DEBOUNCE_WINDOW + Duration::from_millis(1)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("Astana"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_window_elapses() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW, tx);

        debouncer.feed("Omsk".to_string());
        time::sleep(DEBOUNCE_WINDOW - Duration::from_millis(1)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_idle_periods_fire_separately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW, tx);

        debouncer.feed("Omsk".to_string());
        time::sleep(DEBOUNCE_WINDOW + Duration::from_millis(1)).await;
        debouncer.feed("Almaty".to_string());
        time::sleep(DEBOUNCE_WINDOW + Duration::from_millis(1)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("Omsk"));
        assert_eq!(rx.recv().await.as_deref(), Some("Almaty"));
    }
}
