//! The cart store: in-memory state plus write-through persistence.
//!
//! # Persistence model
//!
//! The store restores its state from storage once, when opened. After that,
//! every mutation updates the in-memory state synchronously and enqueues a
//! snapshot for the background writer, which persists snapshots in the
//! order the mutations happened. An empty cart removes the persisted entry
//! instead of writing an empty list, so a cleared cart and a never-used
//! cart look the same at the next restore.
//!
//! Write failures are logged and dropped; the in-memory cart is never
//! blocked or corrupted by the persistence layer. The user-visible impact
//! of a failed write is limited to the cart not surviving a restart.

use std::sync::{Arc, PoisonError, RwLock};

use go_marketplace_core::{CartItem, CartItemInput, CartState, Price, ProductId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::storage::{KeyValueStorage, PRODUCTS_KEY};

/// Messages consumed by the background writer task.
enum WriteCommand {
    /// Persist this snapshot, or remove the entry if the snapshot is empty.
    Persist(CartState),
    /// Reply once every previously enqueued write has been applied.
    Flush(oneshot::Sender<()>),
}

/// Handle to the cart state container.
///
/// Cloning is cheap; all clones share the same state and the same writer.
/// Construct one with [`CartStore::open`] at application start and pass it
/// to whichever components need cart access.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    state: RwLock<CartState>,
    writes: mpsc::UnboundedSender<WriteCommand>,
}

impl CartStore {
    /// Open a store over `storage`, restoring any persisted cart.
    ///
    /// Restoration happens exactly once, here. A missing entry, an
    /// unreadable backend, or a corrupt blob all produce an empty cart
    /// (with a warning logged for the latter two), so `open` always yields
    /// a usable store. The background writer is started before this
    /// returns.
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let state = restore(storage.as_ref()).await;
        let (writes, commands) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage, commands));

        Self {
            inner: Arc::new(CartStoreInner {
                state: RwLock::new(state),
                writes,
            }),
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn products(&self) -> CartState {
        self.read_state(Clone::clone)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.read_state(CartState::total_quantity)
    }

    /// Sum of `price * quantity` across all line items.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.read_state(CartState::subtotal)
    }

    /// Add one unit of a product to the cart.
    ///
    /// A product already in the cart gains one unit; a new product enters
    /// at quantity 1. Returns the new state; the matching write is issued
    /// separately and never blocks the caller.
    pub fn add_to_cart(&self, input: CartItemInput) -> CartState {
        self.mutate(|state| state.add(input))
    }

    /// Increase the quantity of the item with `id` by one unit.
    ///
    /// An id with no matching item leaves the cart unchanged; that is not
    /// an error.
    pub fn increment(&self, id: &ProductId) -> CartState {
        self.mutate(|state| {
            if !state.increment(id) {
                debug!(product_id = %id, "increment for id not in cart, state unchanged");
            }
        })
    }

    /// Decrease the quantity of the item with `id` by one unit, removing
    /// the item entirely when it reaches zero.
    ///
    /// An id with no matching item leaves the cart unchanged; that is not
    /// an error.
    pub fn decrement(&self, id: &ProductId) -> CartState {
        self.mutate(|state| {
            if !state.decrement(id) {
                debug!(product_id = %id, "decrement for id not in cart, state unchanged");
            }
        })
    }

    /// Wait until every write enqueued before this call has been applied.
    ///
    /// Short-lived consumers call this before exiting to make sure the
    /// last mutation reached storage. Long-lived consumers never need it;
    /// the writer keeps up on its own.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.inner.writes.send(WriteCommand::Flush(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }

    /// Apply a mutation under the write lock and enqueue the resulting
    /// snapshot for persistence. The snapshot is sent while the lock is
    /// still held (the send never blocks on an unbounded channel), so the
    /// channel sees snapshots in the same order the lock serialized the
    /// mutations and the last write to land is the last mutation. Readers
    /// see the new state as soon as the lock is released.
    fn mutate(&self, apply: impl FnOnce(&mut CartState)) -> CartState {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
        let snapshot = state.clone();

        if self
            .inner
            .writes
            .send(WriteCommand::Persist(snapshot.clone()))
            .is_err()
        {
            error!("cart writer task is gone, skipping persistence");
        }
        drop(state);

        snapshot
    }

    fn read_state<T>(&self, f: impl FnOnce(&CartState) -> T) -> T {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

/// Restore persisted state, treating every failure as an empty cart.
async fn restore(storage: &dyn KeyValueStorage) -> CartState {
    let blob = match storage.get(PRODUCTS_KEY).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return CartState::new(),
        Err(e) => {
            warn!(error = %e, "failed to read persisted cart, starting empty");
            return CartState::new();
        }
    };

    let items: Vec<CartItem> = match serde_json::from_str(&blob) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "persisted cart is corrupt, starting empty");
            return CartState::new();
        }
    };

    let total = items.len();
    let state = CartState::from_items(items);
    if state.len() < total {
        warn!(
            dropped = total - state.len(),
            "dropped invalid entries from persisted cart"
        );
    }
    state
}

/// Apply queued writes in order until the last store handle is dropped.
async fn run_writer(
    storage: Arc<dyn KeyValueStorage>,
    mut commands: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WriteCommand::Persist(snapshot) => {
                if let Err(e) = persist(storage.as_ref(), &snapshot).await {
                    error!(error = %e, "failed to persist cart");
                } else {
                    debug!(items = snapshot.len(), "persisted cart");
                }
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("cart writer stopped");
}

/// Write one snapshot through to storage. An empty cart removes the entry
/// rather than storing an empty list.
async fn persist(
    storage: &dyn KeyValueStorage,
    snapshot: &CartState,
) -> Result<(), StorageError> {
    if snapshot.is_empty() {
        storage.remove(PRODUCTS_KEY).await
    } else {
        let blob = serde_json::to_string(snapshot)?;
        storage.set(PRODUCTS_KEY, &blob).await
    }
}
