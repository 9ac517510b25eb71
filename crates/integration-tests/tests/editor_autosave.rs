//! Editor auto-save loop against a recording writer.
//!
//! Uses the paused tokio clock, so the debounce windows elapse instantly
//! and deterministically.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;

use ruche_admin::editor::{
    AUTOSAVE_DEBOUNCE, CloseOutcome, EditorSession, ProductDraft, ProductWriter, SaveOutcome,
};
use ruche_admin::tablestore::TableStoreError;
use ruche_core::{Product, ProductId};
use ruche_integration_tests::fixture_product;

/// Writer that records every persisted draft.
#[derive(Default)]
struct RecordingWriter {
    updates: Mutex<Vec<ProductDraft>>,
}

impl ProductWriter for RecordingWriter {
    fn create(
        &self,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send {
        async move {
            Ok(materialize(ProductId::generate(), &draft))
        }
    }

    fn update(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send {
        async move {
            self.updates.lock().unwrap().push(draft.clone());
            Ok(materialize(id, &draft))
        }
    }
}

fn materialize(id: ProductId, draft: &ProductDraft) -> Product {
    Product {
        id,
        name: draft.name.clone(),
        category: draft.category.clone(),
        price: draft.price,
        discount_price: draft.discount_price,
        image: draft.image.clone(),
        description: draft.description.clone(),
        rating: draft.rating,
        in_stock: draft.in_stock,
        featured: draft.featured,
    }
}

#[tokio::test(start_paused = true)]
async fn typing_burst_produces_a_single_autosave() {
    let writer = Arc::new(RecordingWriter::default());
    let stored = fixture_product("Chemise Ankara", "mode", 30, None, true);
    let session = EditorSession::edit(Arc::clone(&writer), &stored, true);

    // Simulated typing: one edit every 300ms, each within the quiet window.
    for (i, fragment) in ["Chemise A", "Chemise An", "Chemise Ankara deluxe"]
        .into_iter()
        .enumerate()
    {
        session
            .apply(move |d| {
                d.name = fragment.to_string();
                d.price = Decimal::new(30 + i as i64, 0);
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    tokio::time::sleep(AUTOSAVE_DEBOUNCE).await;
    tokio::task::yield_now().await;

    let updates = writer.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].name, "Chemise Ankara deluxe");
    assert!(!session.has_unsaved_changes().await);
}

#[tokio::test(start_paused = true)]
async fn separate_bursts_each_autosave() {
    let writer = Arc::new(RecordingWriter::default());
    let stored = fixture_product("Sac", "accessoires", 50, None, true);
    let session = EditorSession::edit(Arc::clone(&writer), &stored, true);

    session
        .apply(|d| d.price = Decimal::new(55, 0))
        .await
        .unwrap();
    tokio::time::sleep(AUTOSAVE_DEBOUNCE + Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    session
        .apply(|d| d.price = Decimal::new(60, 0))
        .await
        .unwrap();
    tokio::time::sleep(AUTOSAVE_DEBOUNCE + Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    let updates = writer.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].price, Decimal::new(60, 0));
}

#[tokio::test(start_paused = true)]
async fn disabling_autosave_stops_the_timer() {
    let writer = Arc::new(RecordingWriter::default());
    let stored = fixture_product("Pagne wax", "tissus", 35, None, true);
    let session = EditorSession::edit(Arc::clone(&writer), &stored, true);

    session
        .apply(|d| d.featured = true)
        .await
        .unwrap();
    session.set_autosave(false).await;

    tokio::time::sleep(AUTOSAVE_DEBOUNCE * 3).await;
    tokio::task::yield_now().await;

    assert!(writer.updates.lock().unwrap().is_empty());
    assert!(session.has_unsaved_changes().await);

    // The manual path still works.
    let outcome = session.save().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Updated(_)));
    assert!(!session.has_unsaved_changes().await);
}

#[tokio::test(start_paused = true)]
async fn create_dialog_requires_explicit_save_and_confirms_discard() {
    let writer = Arc::new(RecordingWriter::default());
    let session = EditorSession::create(Arc::clone(&writer), true);

    session
        .apply(|d| {
            d.name = "Collier de perles".to_string();
            d.category = "accessoires".to_string();
            d.price = Decimal::new(19, 0);
        })
        .await
        .unwrap();

    tokio::time::sleep(AUTOSAVE_DEBOUNCE * 2).await;
    tokio::task::yield_now().await;
    assert!(writer.updates.lock().unwrap().is_empty());

    // Abandoning the dialog asks for confirmation first.
    assert_eq!(session.close(false).await, CloseOutcome::ConfirmDiscard);
    assert!(session.is_open().await);

    // Saving commits and closes.
    let outcome = session.save().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert!(!session.is_open().await);
}
