//! Tracks the open editor dialogs and the fact fetched for each of them.

use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

use crate::{Error, dialog::FactClient, expense::Expense};

/// Identifies one opening of the editor dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogId(Uuid);

impl DialogId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fact for a dialog, `None` until the fetch has finished.
pub type FactReceiver = watch::Receiver<Option<String>>;

struct DialogSession {
    initial: Option<Expense>,
    fact: FactReceiver,
    fetch_task: JoinHandle<()>,
}

type OnClose = Arc<dyn Fn(DialogId) + Send + Sync>;

/// The open editor dialogs.
///
/// At most one dialog is open at a time: opening a dialog closes the others.
/// A dialog is removed when it closes, so the close callback runs once per dialog.
#[derive(Clone)]
pub struct DialogRegistry {
    sessions: Arc<Mutex<HashMap<DialogId, DialogSession>>>,
    on_close: OnClose,
}

impl DialogRegistry {
    /// Create a registry that calls `on_close` whenever a dialog closes.
    pub fn new(on_close: impl Fn(DialogId) + Send + Sync + 'static) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            on_close: Arc::new(on_close),
        }
    }

    /// Open a dialog, closing any other open dialog.
    ///
    /// `initial` is the expense being edited, or `None` for a new expense. The fact is fetched in
    /// the background so that it never delays the form.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        &self,
        initial: Option<Expense>,
        fact_client: &FactClient,
    ) -> Result<DialogId, Error> {
        let dialog_id = DialogId::generate();
        let (sender, receiver) = watch::channel(None);
        let fact_client = fact_client.clone();

        let fetch_task = tokio::spawn(async move {
            let fact = fact_client.fetch_or_fallback().await;
            // Fails only if the dialog closed in the meantime.
            let _ = sender.send(Some(fact));
        });

        let closed = {
            let mut sessions = self.lock()?;
            let closed: Vec<(DialogId, DialogSession)> = sessions.drain().collect();

            sessions.insert(
                dialog_id,
                DialogSession {
                    initial,
                    fact: receiver,
                    fetch_task,
                },
            );

            closed
        };

        for (closed_id, session) in closed {
            self.finish(closed_id, session);
        }

        tracing::debug!("Opened expense dialog {dialog_id}");

        Ok(dialog_id)
    }

    /// The expense the dialog was opened for, `None` for a new expense.
    ///
    /// # Errors
    /// Returns [Error::DialogClosed] if the dialog is not open.
    pub fn initial(&self, dialog_id: DialogId) -> Result<Option<Expense>, Error> {
        self.lock()?
            .get(&dialog_id)
            .map(|session| session.initial.clone())
            .ok_or(Error::DialogClosed)
    }

    /// A receiver for the dialog's fact.
    ///
    /// # Errors
    /// Returns [Error::DialogClosed] if the dialog is not open.
    pub fn fact_receiver(&self, dialog_id: DialogId) -> Result<FactReceiver, Error> {
        self.lock()?
            .get(&dialog_id)
            .map(|session| session.fact.clone())
            .ok_or(Error::DialogClosed)
    }

    /// Whether the dialog is still open.
    pub fn is_open(&self, dialog_id: DialogId) -> Result<bool, Error> {
        Ok(self.lock()?.contains_key(&dialog_id))
    }

    /// Close the dialog. Returns `false` if it was already closed.
    pub fn close(&self, dialog_id: DialogId) -> Result<bool, Error> {
        let session = self.lock()?.remove(&dialog_id);

        match session {
            Some(session) => {
                self.finish(dialog_id, session);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn finish(&self, dialog_id: DialogId, session: DialogSession) {
        session.fetch_task.abort();
        (self.on_close)(dialog_id);
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<DialogId, DialogSession>>, Error> {
        self.sessions.lock().map_err(|error| {
            tracing::error!("could not acquire dialog lock: {error}");
            Error::DialogLockError
        })
    }
}

impl Debug for DialogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = self
            .sessions
            .lock()
            .map(|sessions| sessions.len())
            .unwrap_or_default();

        f.debug_struct("DialogRegistry")
            .field("open_dialogs", &open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        Error,
        dialog::{FACT_FALLBACK, FactClient},
        expense::seed_expenses,
    };

    use super::{DialogId, DialogRegistry};

    fn unreachable_fact_client() -> FactClient {
        FactClient::new("http://127.0.0.1:9/fact")
    }

    fn recording_registry() -> (DialogRegistry, Arc<Mutex<Vec<DialogId>>>) {
        let closed = Arc::new(Mutex::new(Vec::new()));
        let recorder = closed.clone();
        let registry = DialogRegistry::new(move |dialog_id| {
            recorder.lock().unwrap().push(dialog_id);
        });

        (registry, closed)
    }

    #[tokio::test]
    async fn open_dialog_remembers_initial_expense() {
        let (registry, _) = recording_registry();
        let expense = seed_expenses().remove(1);

        let dialog_id = registry
            .open(Some(expense.clone()), &unreachable_fact_client())
            .unwrap();

        assert_eq!(registry.initial(dialog_id), Ok(Some(expense)));
        assert_eq!(registry.is_open(dialog_id), Ok(true));
    }

    #[tokio::test]
    async fn close_calls_on_close_exactly_once() {
        let (registry, closed) = recording_registry();
        let dialog_id = registry.open(None, &unreachable_fact_client()).unwrap();

        assert_eq!(registry.close(dialog_id), Ok(true));
        assert_eq!(registry.close(dialog_id), Ok(false));

        assert_eq!(*closed.lock().unwrap(), vec![dialog_id]);
        assert_eq!(registry.initial(dialog_id), Err(Error::DialogClosed));
    }

    #[tokio::test]
    async fn opening_a_dialog_closes_the_others() {
        let (registry, closed) = recording_registry();
        let first = registry.open(None, &unreachable_fact_client()).unwrap();

        let second = registry.open(None, &unreachable_fact_client()).unwrap();

        assert_eq!(*closed.lock().unwrap(), vec![first]);
        assert_eq!(registry.is_open(first), Ok(false));
        assert_eq!(registry.is_open(second), Ok(true));
    }

    #[tokio::test]
    async fn failed_fetch_publishes_fallback() {
        let (registry, _) = recording_registry();
        let dialog_id = registry.open(None, &unreachable_fact_client()).unwrap();
        let mut receiver = registry.fact_receiver(dialog_id).unwrap();

        let fact = receiver
            .wait_for(|fact| fact.is_some())
            .await
            .expect("Fetch task ended without sending a fact")
            .clone();

        assert_eq!(fact, Some(FACT_FALLBACK.to_owned()));
    }

    #[tokio::test]
    async fn closed_dialog_has_no_fact() {
        let (registry, _) = recording_registry();
        let dialog_id = registry.open(None, &unreachable_fact_client()).unwrap();

        registry.close(dialog_id).unwrap();

        assert!(matches!(
            registry.fact_receiver(dialog_id),
            Err(Error::DialogClosed)
        ));
    }
}
