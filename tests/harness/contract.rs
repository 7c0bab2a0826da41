//! Macro-generated test suite for `CollectionService<Faq>` contract validation
//!
//! The `collection_service_tests!` macro generates a test module that checks
//! any `CollectionService<Faq>` implementation against the same contract:
//! create assigns ids, list keeps insertion order, update merges, missing
//! records are reported as not found, and a controller over the service
//! re-fetches after every mutation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//!
//! use harness::*;
//! use listview::storage::InMemoryCollection;
//!
//! collection_service_tests!(InMemoryCollection::<Faq>::new());
//! ```

/// Generate a `CollectionService<Faq>` conformance test suite
///
/// `$factory` is evaluated inside each async test, so it may `.await`.
#[macro_export]
macro_rules! collection_service_tests {
    ($factory:expr) => {
        mod collection_service_contract_tests {
            use super::*;
            use listview::core::{CollectionService, Mutation, Record};
            use listview::resources::Faq;
            use listview::view::{ListController, LoadState, NoticeKind, ViewEvent};
            use serde_json::json;

            async fn create(service: &impl CollectionService<Faq>, question: &str) -> Faq {
                match service
                    .create(json!({"question": question, "answer": "Yes"}))
                    .await
                    .unwrap()
                {
                    Mutation::Record(faq) => faq,
                    Mutation::Acknowledged => panic!("expected the created record"),
                }
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_then_list() {
                let service = $factory;
                let first = create(&service, "Do you ship abroad?").await;
                let second = create(&service, "Can I cancel?").await;

                assert!(!first.id().is_empty());
                assert_ne!(first.id(), second.id());
                assert!(first.created_at().is_some());

                let listed = service.list().await.unwrap();
                assert_eq!(listed, vec![first, second]);
            }

            #[tokio::test]
            async fn test_get_existing_and_missing() {
                let service = $factory;
                let created = create(&service, "Payment options?").await;

                let fetched = service.get(created.id()).await.unwrap();
                assert_eq!(fetched, Some(created));
                assert_eq!(service.get("missing-id").await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_update_merges_fields() {
                let service = $factory;
                let created = create(&service, "Refunds?").await;

                let updated = service
                    .update(created.id(), json!({"answer": "Within 7 days"}))
                    .await
                    .unwrap()
                    .into_record()
                    .unwrap();
                assert_eq!(updated.id(), created.id());
                assert_eq!(updated.question.as_deref(), Some("Refunds?"));
                assert_eq!(updated.answer.as_deref(), Some("Within 7 days"));

                let fetched = service.get(created.id()).await.unwrap().unwrap();
                assert_eq!(fetched.answer.as_deref(), Some("Within 7 days"));
            }

            #[tokio::test]
            async fn test_update_missing_is_not_found() {
                let service = $factory;
                let err = service.update("missing-id", json!({"answer": "x"})).await.unwrap_err();
                assert_eq!(err.error_code(), "FETCH_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_delete() {
                let service = $factory;
                let keep = create(&service, "Keep me").await;
                let gone = create(&service, "Delete me").await;

                service.delete(gone.id()).await.unwrap();
                assert_eq!(service.list().await.unwrap(), vec![keep]);

                let err = service.delete(gone.id()).await.unwrap_err();
                assert_eq!(err.error_code(), "FETCH_NOT_FOUND");
            }

            // ==================================================================
            // Controller over the service
            // ==================================================================

            #[tokio::test]
            async fn test_controller_refetches_after_mutations() {
                let controller = ListController::new($factory);
                controller.refresh().await.unwrap();
                assert_eq!(controller.snapshot().unwrap().load_state, LoadState::Loaded);
                assert_eq!(controller.snapshot().unwrap().pagination.total_items, 0);

                let created = controller
                    .create(json!({"question": "Bulk discounts?", "answer": "Above 1000 cards"}))
                    .await
                    .unwrap()
                    .into_record()
                    .unwrap();
                controller
                    .create(json!({"question": "Design help?", "answer": "Yes"}))
                    .await
                    .unwrap();

                let snapshot = controller.snapshot().unwrap();
                assert_eq!(snapshot.pagination.total_items, 2);
                assert_eq!(snapshot.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Success));

                controller.dispatch(ViewEvent::SetSearch("bulk".into())).unwrap();
                let snapshot = controller.snapshot().unwrap();
                assert_eq!(snapshot.items.len(), 1);
                assert_eq!(snapshot.items[0].id(), created.id());

                controller.delete(created.id()).await.unwrap();
                let snapshot = controller.snapshot().unwrap();
                assert!(snapshot.items.is_empty());
                assert_eq!(controller.read(|s| s.records().len()).unwrap(), 1);
            }

            #[tokio::test]
            async fn test_controller_failed_delete_sets_error_notice() {
                let controller = ListController::new($factory);
                controller.refresh().await.unwrap();

                assert!(controller.delete("missing-id").await.is_err());
                let notice = controller.snapshot().unwrap().notice.unwrap();
                assert_eq!(notice.kind, NoticeKind::Error);
                assert!(notice.message.starts_with("Failed to delete record"));
            }
        }
    };
}
