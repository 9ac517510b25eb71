//! Image upload flow without a network: validation mints the object key,
//! the storage client shapes the public URL, the editor records it on the
//! working copy, and an explicit save persists it through the writer.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

use ruche_admin::config::ObjectStoreConfig;
use ruche_admin::editor::{EditorSession, ProductDraft, ProductWriter, SaveOutcome};
use ruche_admin::storage::ObjectStoreClient;
use ruche_admin::tablestore::TableStoreError;
use ruche_admin::upload::validate_image;
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
        async move { Ok(materialize(ProductId::generate(), &draft)) }
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

fn storage_client() -> ObjectStoreClient {
    ObjectStoreClient::new(&ObjectStoreConfig {
        url: "https://store.example.com".to_string(),
        api_key: SecretString::from("kJ8#mP2$vL9@nQ4!xR7z".to_string()),
        bucket: "images".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn accepted_upload_lands_on_the_draft_and_save_persists_it() {
    let storage = storage_client();

    // A 2 MB PNG passes validation and gets a fresh object key.
    let validated = validate_image("photo.png", "image/png", 2 * 1024 * 1024).unwrap();
    assert!(validated.key.ends_with(".png"));
    assert_eq!(validated.content_type, "image/png");

    let image_url = storage.public_url(&validated.key);
    assert_eq!(
        storage.object_key_from_url(&image_url).unwrap(),
        validated.key
    );

    let writer = Arc::new(RecordingWriter::default());
    let stored = fixture_product("Boubou brode", "mode", 75, None, true);
    let session = EditorSession::edit(Arc::clone(&writer), &stored, false);

    // The URL lands on the working copy only; nothing is written yet.
    let draft = session.set_image(image_url.clone()).await.unwrap();
    assert_eq!(draft.image, image_url);
    assert!(session.has_unsaved_changes().await);
    assert!(writer.updates.lock().unwrap().is_empty());

    // An explicit save persists the URL on the row.
    let outcome = session.save().await.unwrap();
    let SaveOutcome::Updated(product) = outcome else {
        panic!("expected an update");
    };
    assert_eq!(product.image, image_url);

    let updates = writer.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].image, image_url);
    assert!(!session.has_unsaved_changes().await);
}

#[test]
fn rejected_files_never_mint_a_key() {
    assert!(validate_image("notes.txt", "text/plain", 1024).is_err());
    assert!(validate_image("big.png", "image/png", 6 * 1024 * 1024).is_err());
}
