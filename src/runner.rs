use crate::config::RewriteRequest;
use crate::errors::{Error, Result};
use crate::events::ProgressEvent;
use crate::rewriter::{RewriteSummary, TreeRewriter};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// A traversal running on its own worker thread.
///
/// Events arrive in the order the worker produced them. Drain them with
/// [`events`](RewriteRun::events), then call [`finish`](RewriteRun::finish)
/// exactly once to learn how the run ended.
pub struct RewriteRun {
    events: Receiver<ProgressEvent>,
    worker: JoinHandle<Result<RewriteSummary>>,
}

impl RewriteRun {
    /// A blocking iterator over progress events.
    ///
    /// It ends once the worker has finished or aborted and every event sent
    /// before that has been received.
    pub fn events(&self) -> mpsc::Iter<'_, ProgressEvent> {
        self.events.iter()
    }

    /// Waits for the worker and returns its outcome.
    ///
    /// Events not yet received are discarded.
    pub fn finish(self) -> Result<RewriteSummary> {
        let RewriteRun { events, worker } = self;
        let outcome = worker.join().map_err(|_| Error::WorkerPanicked)?;
        drop(events);
        outcome
    }

    /// Hands each event to `display`, then waits for the worker.
    ///
    /// The first `display` error ends the display only. The worker is still
    /// joined, and that error comes back next to the run's outcome.
    pub fn drain<E>(
        self,
        mut display: impl FnMut(&ProgressEvent) -> std::result::Result<(), E>,
    ) -> (Result<RewriteSummary>, Option<E>) {
        let mut display_error = None;
        for event in self.events() {
            if let Err(e) = display(&event) {
                display_error = Some(e);
                break;
            }
        }
        (self.finish(), display_error)
    }
}

/// Starts `rewriter` on a background thread for `request`.
///
/// The worker reports through an unbounded channel, so a slow listener never
/// holds up the traversal.
pub fn spawn(rewriter: TreeRewriter, request: RewriteRequest) -> Result<RewriteRun> {
    let (mut tx, rx) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("tree-rewriter".to_string())
        .spawn(move || rewriter.rewrite(&request, &mut tx))?;

    Ok(RewriteRun { events: rx, worker })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_events_arrive_in_order_then_run_finishes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("bin")).unwrap();
        fs::create_dir(root.join("FooApp")).unwrap();
        fs::write(root.join("FooApp").join("Foo.cs"), "Foo").unwrap();

        let request = RewriteRequest::new(root, "Foo", "Bar").unwrap();
        let run = spawn(TreeRewriter::default(), request).unwrap();
        let kinds: Vec<&str> = run.events().map(|e| e.kind()).collect();
        let summary = run.finish().unwrap();

        assert_eq!(
            kinds,
            vec![
                "started",
                "content_rewritten",
                "renamed",
                "renamed",
                "skipped_folder",
            ]
        );
        assert_eq!(summary.paths_renamed, 2);
        assert!(root.join("BarApp").join("Bar.cs").exists());
    }

    #[test]
    fn test_invalid_root_finishes_with_error() {
        let temp_dir = TempDir::new().unwrap();
        let request = RewriteRequest::new(temp_dir.path().join("missing"), "Foo", "Bar").unwrap();

        let run = spawn(TreeRewriter::default(), request).unwrap();
        let lines: Vec<String> = run.events().map(|e| e.to_string()).collect();

        assert_eq!(
            lines,
            vec!["ERROR: Path does not exist. Please select a valid path and try again"]
        );
        assert!(matches!(run.finish(), Err(Error::InvalidRoot(_))));
    }

    #[test]
    fn test_display_failure_still_finishes_the_run() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("Foo.cs"), "Foo").unwrap();
        fs::create_dir(root.join("FooLib")).unwrap();

        let request = RewriteRequest::new(root, "Foo", "Bar").unwrap();
        let run = spawn(TreeRewriter::default(), request).unwrap();
        let mut shown = 0;
        let (outcome, display_error) = run.drain(|_| {
            shown += 1;
            Err("stdout closed")
        });

        assert_eq!(shown, 1);
        assert_eq!(display_error, Some("stdout closed"));
        let summary = outcome.unwrap();
        assert_eq!(summary.paths_renamed, 2);
        assert!(root.join("Bar.cs").exists());
        assert!(root.join("BarLib").exists());
    }
}
