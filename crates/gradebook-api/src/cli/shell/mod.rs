//! `gradebook shell`: the interactive terminal client.
//!
//! The entry point builds exactly one controller and runs it once; all the
//! interaction lives in [`controller::TerminalController`].

pub mod controller;
pub mod input;
pub mod menu;
pub mod view;

use std::future::Future;

use anyhow::Result;

use crate::state::AppState;

use controller::TerminalController;

/// Something that owns the terminal until the user leaves.
pub trait Controller {
    fn run(self) -> impl Future<Output = Result<()>>;
}

/// Construct one controller and run it to completion.
pub async fn hand_off<C, F>(make: F) -> Result<()>
where
    C: Controller,
    F: FnOnce() -> C,
{
    make().run().await
}

/// Run the terminal client on stdin/stdout.
pub async fn open(state: &AppState) -> Result<()> {
    let gradebook = state.gradebook.clone();
    hand_off(move || TerminalController::stdio(gradebook)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingController {
        runs: Arc<AtomicUsize>,
    }

    impl Controller for CountingController {
        async fn run(self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_hand_off_constructs_and_runs_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        hand_off(|| {
            built.fetch_add(1, Ordering::SeqCst);
            CountingController { runs: runs.clone() }
        })
        .await
        .unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hand_off_propagates_run_error() {
        struct Failing;
        impl Controller for Failing {
            async fn run(self) -> Result<()> {
                anyhow::bail!("terminal closed")
            }
        }

        let err = hand_off(|| Failing).await.unwrap_err();
        assert_eq!(err.to_string(), "terminal closed");
    }
}
