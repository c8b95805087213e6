//! Speech recognition stand-ins.
//!
//! The continuous navigation listener is a task that forwards every
//! transcript to the handler loop and re-arms after each result, error or
//! silent end. Single-shot recognition resolves exactly one event.

use crate::app::AppEvent;
use sanad_common::SanadError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One completion of a recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Transcript(String),
    Error(String),
    /// Session ended without speech
    End,
}

impl Recognition {
    /// Surface text to recognition event; empty means silence
    pub fn from_utterance(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Recognition::End
        } else {
            Recognition::Transcript(text.to_string())
        }
    }
}

/// Resolve a single-shot recognition into the transcript
pub fn single_shot(result: Recognition) -> Result<String, SanadError> {
    match result {
        Recognition::Transcript(text) => Ok(text),
        Recognition::Error(reason) => Err(SanadError::External(reason)),
        Recognition::End => Err(SanadError::External("no speech detected".to_string())),
    }
}

/// Spawn the continuous navigation listener.
///
/// Runs until the utterance source closes or the event loop goes away.
pub fn spawn_continuous(
    mut utterances: mpsc::UnboundedReceiver<Recognition>,
    events: mpsc::UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Continuous navigation listener started");
        while let Some(result) = utterances.recv().await {
            match result {
                Recognition::Transcript(text) => {
                    if events.send(AppEvent::Navigate(text)).is_err() {
                        break;
                    }
                }
                Recognition::Error(reason) => warn!("Navigation recognition error: {}", reason),
                Recognition::End => debug!("Navigation recognition ended without speech"),
            }
            debug!("Re-arming navigation listener");
        }
        info!("Continuous navigation listener stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shot() {
        assert_eq!(
            single_shot(Recognition::from_utterance(" افتح ")).unwrap(),
            "افتح"
        );
        assert!(single_shot(Recognition::from_utterance("")).is_err());
        assert!(matches!(
            single_shot(Recognition::Error("network".into())),
            Err(SanadError::External(_))
        ));
    }

    #[tokio::test]
    async fn test_listener_survives_errors() {
        let (utter_tx, utter_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let handle = spawn_continuous(utter_rx, event_tx);

        utter_tx.send(Recognition::Error("aborted".into())).unwrap();
        utter_tx.send(Recognition::End).unwrap();
        utter_tx
            .send(Recognition::Transcript("الإعاقة السمعية".into()))
            .unwrap();
        utter_tx
            .send(Recognition::Transcript("الإعاقة البصرية".into()))
            .unwrap();

        for expected in ["الإعاقة السمعية", "الإعاقة البصرية"] {
            match event_rx.recv().await {
                Some(AppEvent::Navigate(text)) => assert_eq!(text, expected),
                other => panic!("unexpected event {:?}", other),
            }
        }

        drop(utter_tx);
        handle.await.unwrap();
    }
}
