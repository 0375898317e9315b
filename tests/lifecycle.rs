//! Lifecycle tests for every resource kind, driven through the provider dispatch
//! against an in-memory Dremio.

mod common;

use common::FakeDremio;
use dremio_provider::dremio::models::{EntityTags, EntityWiki, Source};
use dremio_provider::plan::{apply_plan, Plan};
use dremio_provider::resource::{Operation, Provider};
use serde_json::{json, Value};

fn provider() -> Provider<FakeDremio> {
    Provider::new(FakeDremio::new())
}

fn detail(response: &dremio_provider::resource::Response) -> String {
    response
        .diagnostics
        .first()
        .map(|d| d.detail.clone())
        .unwrap_or_default()
}

mod space_and_folder_tests {
    use super::*;

    /// Create, read and delete a space
    #[tokio::test]
    async fn test_space_lifecycle() {
        let provider = provider();

        let created = provider
            .create("dremio_space", json!({ "name": "Analytics" }))
            .await;
        assert!(created.is_ok(), "{:?}", created.diagnostics);
        let id = created.id().unwrap().to_string();
        assert_eq!(created.state["name"], "Analytics");

        let read = provider.read("dremio_space", created.state.clone()).await;
        assert_eq!(read.id(), Some(id.as_str()));

        let deleted = provider.delete("dremio_space", read.state).await;
        assert!(deleted.is_ok());
        assert_eq!(deleted.id(), None);
        assert!(provider.client().state.lock().unwrap().spaces.is_empty());
    }

    /// A folder reads back its path and quoted query path
    #[tokio::test]
    async fn test_folder_create_sets_query_path() {
        let provider = provider();

        let created = provider
            .create("dremio_folder", json!({ "path": ["Analytics", "raw"] }))
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["path"], json!(["Analytics", "raw"]));
        assert_eq!(created.state["query_path"], "\"Analytics\".\"raw\"");
        assert_eq!(provider.client().calls(), vec!["new_folder", "get_folder"]);
    }

    /// An incoming id is ignored on create
    #[tokio::test]
    async fn test_create_ignores_stale_id() {
        let provider = provider();
        let created = provider
            .create("dremio_space", json!({ "id": "stale", "name": "Lake" }))
            .await;
        assert_ne!(created.id(), Some("stale"));
    }
}

mod dispatch_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_type_is_a_diagnostic() {
        let provider = provider();
        let response = provider.create("dremio_nope", json!({})).await;

        assert!(!response.is_ok());
        assert!(detail(&response).contains("unknown resource type 'dremio_nope'"));
        assert!(provider.client().calls().is_empty());
    }

    /// Immutable kinds reject update without calling the service
    #[tokio::test]
    async fn test_update_of_space_is_rejected() {
        let provider = provider();
        let response = provider
            .update("dremio_space", json!({ "id": "s1", "name": "Renamed" }))
            .await;

        assert!(!response.is_ok());
        assert!(detail(&response).contains("does not support in-place update"));
        assert!(provider.client().calls().is_empty());
        assert_eq!(response.state["id"], "s1");
    }

    /// A read of an entity deleted out of band clears the id without a diagnostic
    #[tokio::test]
    async fn test_read_of_missing_entity_clears_id() {
        let provider = provider();
        let response = provider
            .read("dremio_folder", json!({ "id": "gone", "path": ["a"] }))
            .await;

        assert!(response.is_ok());
        assert_eq!(response.id(), None);
        assert_eq!(response.state["path"], json!(["a"]));
    }

    /// Other read failures keep the id and report a diagnostic
    #[tokio::test]
    async fn test_read_transport_failure_keeps_id() {
        let provider = provider();
        provider.client().fail_next("get_space");

        let response = provider
            .read("dremio_space", json!({ "id": "s1", "name": "Lake" }))
            .await;

        assert!(!response.is_ok());
        assert_eq!(response.id(), Some("s1"));
        assert_eq!(response.diagnostics[0].summary, "Dremio request failed");
    }

    #[tokio::test]
    async fn test_schema_violations_stop_before_any_call() {
        let provider = provider();

        let missing = provider.create("dremio_space", json!({})).await;
        assert!(detail(&missing).contains("missing required attribute 'name'"));

        let unknown = provider
            .create("dremio_space", json!({ "name": "x", "colour": "red" }))
            .await;
        assert!(detail(&unknown).contains("unsupported attribute 'colour'"));

        let wrong_type = provider
            .create("dremio_folder", json!({ "path": "Analytics" }))
            .await;
        assert!(detail(&wrong_type).contains("attribute 'path' expected a list of a string"));

        assert!(provider.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_routes_by_operation() {
        let provider = provider();
        let created = provider
            .apply("dremio_space", Operation::Create, json!({ "name": "Lake" }))
            .await;
        let deleted = provider
            .apply("dremio_space", Operation::Delete, created.state)
            .await;
        assert!(deleted.is_ok());
        assert_eq!(deleted.id(), None);
    }
}

mod source_tests {
    use super::*;

    /// Defaults fill in on create; update sends every acceleration field
    #[tokio::test]
    async fn test_nas_source_create_then_update() {
        let provider = provider();

        let created = provider
            .create(
                "dremio_source_nas",
                json!({ "name": "lake", "mount_path": "/mnt/lake" }),
            )
            .await;
        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["auth_ttl_ms"], 3_600_000);
        assert_eq!(created.state["update_mode"], "PREFETCH_QUERIED");
        assert_eq!(created.state["acc_refresh_period_ms"], 10_800_000);
        assert_eq!(created.state["path"], json!(["lake"]));
        assert_eq!(created.state["mount_path"], "/mnt/lake");
        assert!(created.state.get("last_updated").is_none());

        let mut desired = created.state.clone();
        desired["description"] = json!("landing zone");
        desired["acc_never_refresh"] = json!(true);
        desired["acc_grace_period_ms"] = json!(60_000);

        let updated = provider.update("dremio_source_nas", desired).await;
        assert!(updated.is_ok(), "{:?}", updated.diagnostics);
        assert_eq!(updated.state["description"], "landing zone");
        assert_eq!(updated.state["acc_never_refresh"], true);
        assert!(updated.state["last_updated"].is_string());

        let state = provider.client().state.lock().unwrap();
        let spec = &state.source_updates[0];
        assert!(spec.acceleration_never_refresh);
        assert!(!spec.acceleration_never_expire);
        assert_eq!(spec.acceleration_grace_period_ms, 60_000);
        assert_eq!(spec.acceleration_refresh_period_ms, 10_800_000);
        assert_eq!(spec.config, json!({ "path": "/mnt/lake" }));
    }

    /// The generic source sends the password but never reads it back into `config`
    #[tokio::test]
    async fn test_generic_mssql_source() {
        let provider = provider();

        let created = provider
            .create(
                "dremio_source",
                json!({
                    "name": "crm",
                    "type": "MSSQL",
                    "config": {
                        "username": "sa",
                        "hostname": "db.internal",
                        "port": "1433",
                        "authentication_type": "MASTER"
                    },
                    "secure_config": { "password": "pw" }
                }),
            )
            .await;
        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["type"], "MSSQL");
        assert_eq!(created.state["config"]["hostname"], "db.internal");
        assert!(created.state["config"].get("password").is_none());

        let state = provider.client().state.lock().unwrap();
        let source = state.sources.values().next().unwrap();
        assert_eq!(source.config["password"], "pw");
        assert_eq!(source.config["authenticationType"], "MASTER");
    }

    #[tokio::test]
    async fn test_unsupported_source_type() {
        let provider = provider();
        let response = provider
            .create(
                "dremio_source",
                json!({ "name": "x", "type": "ORACLE", "config": {} }),
            )
            .await;
        assert!(detail(&response).contains("unsupported source type 'ORACLE'"));
        assert!(provider.client().calls().is_empty());
    }

    /// Reading a source of a type without a typed config keeps the configured block
    #[tokio::test]
    async fn test_read_unmodelled_source_keeps_config() {
        let provider = provider();
        provider.client().state.lock().unwrap().sources.insert(
            "s9".to_string(),
            Source {
                id: "s9".to_string(),
                name: "warehouse".to_string(),
                source_type: "ORACLE".to_string(),
                config: json!({ "hostname": "oracle.internal" }),
                ..Default::default()
            },
        );

        let response = provider
            .read(
                "dremio_source",
                json!({
                    "id": "s9",
                    "name": "warehouse",
                    "type": "ORACLE",
                    "config": { "hostname": "db.local", "port": "1521" }
                }),
            )
            .await;

        assert!(response.is_ok(), "{:?}", response.diagnostics);
        assert_eq!(response.state["type"], "ORACLE");
        assert_eq!(response.state["config"]["hostname"], "db.local");
        assert_eq!(response.state["config"]["port"], "1521");
    }

    /// The typed NAS resource refuses to adopt a source of another type
    #[tokio::test]
    async fn test_nas_read_rejects_other_type() {
        let provider = provider();
        let created = provider
            .create(
                "dremio_source",
                json!({
                    "name": "crm",
                    "type": "MSSQL",
                    "config": { "username": "sa", "hostname": "h", "port": "1", "authentication_type": "MASTER" }
                }),
            )
            .await;
        let id = created.id().unwrap();

        let read = provider
            .read("dremio_source_nas", json!({ "id": id, "name": "crm" }))
            .await;
        assert!(detail(&read).contains("Expected NAS type, found MSSQL"));
    }
}

mod dataset_tests {
    use super::*;

    fn lake(provider: &Provider<FakeDremio>) {
        provider.client().add_entity("src1", &["lake"], "source");
        provider
            .client()
            .add_physical_dataset("pds1", &["lake", "events"]);
    }

    /// Adopting a dataset sets its refresh policy and reads its fields
    #[tokio::test]
    async fn test_physical_dataset_adopts_existing() {
        let provider = provider();
        lake(&provider);

        let created = provider
            .create(
                "dremio_physical_dataset",
                json!({ "source_id": "src1", "relative_path": ["events"] }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.id(), Some("pds1"));
        assert_eq!(created.state["acc_method"], "FULL");
        assert_eq!(created.state["fields"][0], json!({ "name": "ts", "type": "TIMESTAMP" }));
        assert_eq!(created.state["query_path"], "\"lake\".\"events\"");

        let state = provider.client().state.lock().unwrap();
        let spec = &state.dataset_updates[0];
        assert!(spec.format.is_none());
        assert_eq!(
            spec.acceleration_refresh_policy.as_ref().unwrap().refresh_period_ms,
            10_800_000
        );
    }

    /// A failed policy write leaves the dataset unadopted
    #[tokio::test]
    async fn test_physical_dataset_policy_failure_keeps_no_id() {
        let provider = provider();
        lake(&provider);
        provider.client().fail_next("update_physical_dataset");

        let created = provider
            .create(
                "dremio_physical_dataset",
                json!({ "source_id": "src1", "relative_path": ["events"] }),
            )
            .await;

        assert_eq!(created.diagnostics.len(), 1);
        assert_eq!(created.id(), None);
        assert!(created.state["last_updated"].is_null());
        assert!(!provider
            .client()
            .calls()
            .contains(&"get_physical_dataset".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_refresh_method_is_rejected_before_any_call() {
        let provider = provider();
        lake(&provider);

        let response = provider
            .create(
                "dremio_physical_dataset",
                json!({ "source_id": "src1", "relative_path": ["events"], "acc_method": "SOMETIMES" }),
            )
            .await;

        assert!(detail(&response).contains("acc_method must be 'FULL' or 'INCREMENTAL'"));
        assert_eq!(response.id(), None);
        assert!(provider.client().calls().is_empty());
    }

    /// Deleting a physical dataset only clears its settings
    #[tokio::test]
    async fn test_physical_dataset_delete_resets_settings() {
        let provider = provider();
        lake(&provider);

        let created = provider
            .create(
                "dremio_physical_dataset",
                json!({ "source_id": "src1", "relative_path": ["events"] }),
            )
            .await;
        let deleted = provider
            .delete("dremio_physical_dataset", created.state)
            .await;

        assert!(deleted.is_ok());
        assert_eq!(deleted.id(), None);
        let state = provider.client().state.lock().unwrap();
        assert!(state.physical.contains_key("pds1"));
        assert_eq!(state.dataset_updates.last().unwrap(), &Default::default());
    }

    /// Promotion replaces the file id with the new dataset id
    #[tokio::test]
    async fn test_promote_file() {
        let provider = provider();
        provider.client().add_entity("src1", &["lake"], "source");
        provider
            .client()
            .add_entity("dremio:/lake/raw.csv", &["lake", "raw.csv"], "file");

        let created = provider
            .create(
                "dremio_promoted_dataset",
                json!({
                    "source_id": "src1",
                    "relative_path": ["raw.csv"],
                    "type": "Text",
                    "field_delimiter": ",",
                    "extract_header": true
                }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        let id = created.id().unwrap();
        assert_ne!(id, "dremio:/lake/raw.csv");
        assert_eq!(created.state["type"], "Text");
        assert_eq!(created.state["field_delimiter"], ",");
        assert_eq!(created.state["extract_header"], true);
        assert_eq!(created.state["path"], json!(["lake", "raw.csv"]));
        assert!(provider
            .client()
            .calls()
            .contains(&"new_physical_dataset".to_string()));
    }

    /// A virtual dataset lives under its parent's path
    #[tokio::test]
    async fn test_virtual_dataset_under_space() {
        let provider = provider();
        let space = provider
            .create("dremio_space", json!({ "name": "Analytics" }))
            .await;

        let created = provider
            .create(
                "dremio_virtual_dataset",
                json!({
                    "parent_id": space.id().unwrap(),
                    "name": "daily",
                    "sql": "SELECT 1",
                    "sql_context": ["Analytics"]
                }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["path"], json!(["Analytics", "daily"]));
        assert_eq!(created.state["query_path"], "\"Analytics\".\"daily\"");

        let mut desired = created.state.clone();
        desired["sql"] = json!("SELECT 2");
        let updated = provider.update("dremio_virtual_dataset", desired).await;
        assert_eq!(updated.state["sql"], "SELECT 2");
    }

    #[tokio::test]
    async fn test_virtual_dataset_with_unknown_parent() {
        let provider = provider();
        let response = provider
            .create(
                "dremio_virtual_dataset",
                json!({ "parent_id": "nope", "name": "daily", "sql": "SELECT 1" }),
            )
            .await;
        assert!(!response.is_ok());
        assert_eq!(response.diagnostics[0].summary, "Entity not found");
        assert_eq!(response.id(), None);
    }
}

mod reflection_tests {
    use super::*;

    #[tokio::test]
    async fn test_raw_reflection_defaults() {
        let provider = provider();
        let created = provider
            .create(
                "dremio_raw_reflection",
                json!({ "dataset_id": "pds1", "name": "raw", "display_fields": ["ts", "region"] }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["enabled"], true);
        assert_eq!(created.state["partition_distribution_strategy"], "CONSOLIDATED");
        assert_eq!(created.state["display_fields"], json!(["ts", "region"]));

        let deleted = provider.delete("dremio_raw_reflection", created.state).await;
        assert!(deleted.is_ok());
        assert!(provider.client().state.lock().unwrap().raw.is_empty());
    }

    /// The simplified form implies granularity and SUM measures
    #[tokio::test]
    async fn test_simple_aggregation_reflection() {
        let provider = provider();
        let created = provider
            .create(
                "dremio_aggr_reflection_simple",
                json!({
                    "dataset_id": "pds1",
                    "name": "by_region",
                    "dimension_fields": ["region"],
                    "date_dimension_fields": ["ts"],
                    "measure_fields": ["amount"]
                }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.state["dimension_fields"], json!(["region"]));
        assert_eq!(created.state["date_dimension_fields"], json!(["ts"]));
        assert_eq!(created.state["measure_fields"], json!(["amount"]));

        let state = provider.client().state.lock().unwrap();
        let stored = state.aggregations.values().next().unwrap();
        assert_eq!(stored.dimension_fields[0].granularity, "NORMAL");
        assert_eq!(stored.dimension_fields[1].granularity, "DATE");
        assert_eq!(stored.measure_fields[0].measure_type_list, vec!["SUM"]);
    }

    #[tokio::test]
    async fn test_aggregation_reflection_objects() {
        let provider = provider();
        let created = provider
            .create(
                "dremio_aggr_reflection",
                json!({
                    "dataset_id": "pds1",
                    "name": "agg",
                    "dimension_fields": [{ "name": "region", "granularity": "NORMAL" }],
                    "measure_fields": [{ "name": "amount", "measure": ["SUM", "COUNT"] }]
                }),
            )
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(
            created.state["measure_fields"][0]["measure"],
            json!(["COUNT", "SUM"])
        );
    }
}

mod collaboration_tests {
    use super::*;

    fn seed_tags(provider: &Provider<FakeDremio>, version: &str) {
        provider.client().state.lock().unwrap().tags.insert(
            "e1".to_string(),
            EntityTags {
                tags: vec!["old".to_string()],
                version: version.to_string(),
            },
        );
    }

    fn seed_wiki(provider: &Provider<FakeDremio>, version: i64) {
        provider.client().state.lock().unwrap().wikis.insert(
            "e1".to_string(),
            EntityWiki {
                text: "hello".to_string(),
                version,
            },
        );
    }

    /// First write on an entity goes out unversioned
    #[tokio::test]
    async fn test_tags_create_without_existing_tags() {
        let provider = provider();
        let created = provider
            .create("dremio_entity_tags", json!({ "entity_id": "e1", "tags": ["a", "b"] }))
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.id(), Some("e1"));
        assert_eq!(created.state["tags"], json!(["a", "b"]));
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.tag_writes[0].2, "");
    }

    /// Any failed version lookup is treated as "no tags yet"
    #[tokio::test]
    async fn test_tags_create_with_failing_lookup() {
        let provider = provider();
        provider.client().fail_next("get_entity_tags");

        let created = provider
            .create("dremio_entity_tags", json!({ "entity_id": "e1", "tags": ["a"] }))
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        let state = provider.client().state.lock().unwrap();
        assert_eq!(
            state.tag_writes[0],
            ("e1".to_string(), vec!["a".to_string()], String::new())
        );
    }

    /// A failed lookup on a tagged entity sends an unversioned write that the server rejects
    #[tokio::test]
    async fn test_tags_create_over_unreadable_tags_conflicts() {
        let provider = provider();
        seed_tags(&provider, "3");
        provider.client().fail_next("get_entity_tags");

        let created = provider
            .create("dremio_entity_tags", json!({ "entity_id": "e1", "tags": ["a"] }))
            .await;

        assert_eq!(created.diagnostics[0].summary, "Conflicting write");
        assert_eq!(created.id(), None);
    }

    /// Update writes with the version it just read
    #[tokio::test]
    async fn test_tags_update_uses_current_version() {
        let provider = provider();
        seed_tags(&provider, "7");

        let response = provider
            .update(
                "dremio_entity_tags",
                json!({ "id": "e1", "entity_id": "e1", "tags": ["x"] }),
            )
            .await;

        assert!(response.is_ok(), "{:?}", response.diagnostics);
        assert_eq!(response.state["tags"], json!(["x"]));
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.tag_writes[0].2, "7");
        assert_eq!(state.tags["e1"].version, "8");
    }

    /// A stale version surfaces as a conflict after a single write attempt
    #[tokio::test]
    async fn test_tags_update_with_stale_version() {
        let provider = provider();
        seed_tags(&provider, "7");
        provider.client().write_after_next("get_entity_tags");

        let response = provider
            .update(
                "dremio_entity_tags",
                json!({ "id": "e1", "entity_id": "e1", "tags": ["x"] }),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Conflicting write");
        assert_eq!(provider.client().count_calls("set_entity_tags"), 1);
        assert_eq!(provider.client().state.lock().unwrap().tags["e1"].tags, vec!["old"]);
    }

    #[tokio::test]
    async fn test_wiki_create_without_existing_wiki() {
        let provider = provider();
        let created = provider
            .create("dremio_entity_wiki", json!({ "entity_id": "e1", "text": "# Lake" }))
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        assert_eq!(created.id(), Some("e1"));
        assert_eq!(created.state["text"], "# Lake");
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.wiki_writes, vec![("e1".to_string(), "# Lake".to_string(), None)]);
        assert_eq!(state.wikis["e1"].version, 0);
    }

    /// An existing wiki at version 0 is still written with its version
    #[tokio::test]
    async fn test_wiki_create_over_existing_wiki() {
        let provider = provider();
        seed_wiki(&provider, 0);

        let created = provider
            .create("dremio_entity_wiki", json!({ "entity_id": "e1", "text": "new" }))
            .await;

        assert!(created.is_ok(), "{:?}", created.diagnostics);
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.wiki_writes[0].2, Some(0));
        assert_eq!(state.wikis["e1"].version, 1);
    }

    #[tokio::test]
    async fn test_wiki_update_at_version_zero() {
        let provider = provider();
        seed_wiki(&provider, 0);

        let response = provider
            .update(
                "dremio_entity_wiki",
                json!({ "id": "e1", "entity_id": "e1", "text": "new" }),
            )
            .await;

        assert!(response.is_ok(), "{:?}", response.diagnostics);
        assert_eq!(response.state["text"], "new");
        assert!(response.state["last_updated"].is_string());
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.wiki_writes, vec![("e1".to_string(), "new".to_string(), Some(0))]);
    }

    #[tokio::test]
    async fn test_wiki_update_with_stale_version() {
        let provider = provider();
        seed_wiki(&provider, 2);
        provider.client().write_after_next("get_entity_wiki");

        let response = provider
            .update(
                "dremio_entity_wiki",
                json!({ "id": "e1", "entity_id": "e1", "text": "new" }),
            )
            .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "Conflicting write");
        assert_eq!(provider.client().count_calls("set_entity_wiki"), 1);
        assert_eq!(provider.client().state.lock().unwrap().wikis["e1"].text, "hello");
    }

    /// Deleting a wiki writes empty text with the current version
    #[tokio::test]
    async fn test_wiki_delete_with_version() {
        let provider = provider();
        seed_wiki(&provider, 3);

        let deleted = provider
            .delete(
                "dremio_entity_wiki",
                json!({ "id": "e1", "entity_id": "e1", "text": "hello" }),
            )
            .await;

        assert!(deleted.is_ok());
        assert_eq!(deleted.id(), None);
        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.wiki_writes, vec![("e1".to_string(), String::new(), Some(3))]);
    }

    /// Without a readable wiki, delete just forgets the id
    #[tokio::test]
    async fn test_wiki_delete_without_wiki() {
        let provider = provider();
        let deleted = provider
            .delete(
                "dremio_entity_wiki",
                json!({ "id": "e1", "entity_id": "e1", "text": "hello" }),
            )
            .await;

        assert!(deleted.is_ok());
        assert_eq!(deleted.id(), None);
        assert!(provider.client().state.lock().unwrap().wiki_writes.is_empty());
    }
}

mod data_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_lookup_by_relative_path() {
        let provider = provider();
        provider.client().add_entity("src1", &["lake"], "source");
        provider
            .client()
            .add_entity("f1", &["lake", "raw"], "folder");

        let response = provider
            .read_data_source(
                "dremio_catalog",
                json!({ "parent_id": "src1", "relative_path": ["raw"] }),
            )
            .await;

        assert!(response.is_ok(), "{:?}", response.diagnostics);
        assert_eq!(response.id(), Some("f1"));
        assert_eq!(response.state["type"], "folder");
        assert_eq!(response.state["query_path"], "\"lake\".\"raw\"");
    }

    #[tokio::test]
    async fn test_catalog_lookup_needs_a_path() {
        let provider = provider();
        let response = provider.read_data_source("dremio_catalog", json!({})).await;
        assert!(detail(&response).contains("expected either an absolute path or a parent reference"));
    }

    /// Deleting the catalog resource leaves the entity alone
    #[tokio::test]
    async fn test_catalog_resource_delete_only_forgets() {
        let provider = provider();
        provider.client().add_entity("s1", &["Samples"], "space");

        let created = provider
            .create("dremio_catalog", json!({ "absolute_path": ["Samples"] }))
            .await;
        assert_eq!(created.id(), Some("s1"));

        let deleted = provider.delete("dremio_catalog", created.state).await;
        assert_eq!(deleted.id(), None);
        assert!(provider.client().state.lock().unwrap().catalog.contains_key("s1"));
    }

    #[tokio::test]
    async fn test_summary_lists_top_level_entries() {
        let provider = provider();
        provider.client().add_entity("a", &["Alpha"], "space");
        provider.client().add_entity("b", &["Beta"], "source");
        provider.client().add_entity("c", &["Beta", "inner"], "folder");

        let response = provider.read_data_source("dremio_summary", json!({})).await;

        assert!(response.is_ok(), "{:?}", response.diagnostics);
        assert!(response.id().is_some());
        let ids: Vec<&str> = response.state["summary"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|item| item["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

mod plan_tests {
    use super::*;

    /// Named steps feed later steps through `${name.attribute}`
    #[tokio::test]
    async fn test_plan_with_references() {
        let provider = provider();
        let plan = Plan::parse(
            r##"
steps:
  - name: analytics
    resource: dremio_space
    config: { name: Analytics }
  - name: readme
    resource: dremio_entity_wiki
    config:
      entity_id: "${analytics.id}"
      text: "# Analytics"
  - name: readme
    resource: dremio_entity_wiki
    op: delete
  - name: analytics
    resource: dremio_space
    op: delete
"##,
        )
        .unwrap();

        let outcomes = apply_plan(&provider, &plan).await.unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.response.is_ok()));
        let space_id = outcomes[0].response.id().unwrap().to_string();
        assert_eq!(outcomes[1].response.id(), Some(space_id.as_str()));
        assert_eq!(outcomes[3].response.state["id"], Value::Null);

        let state = provider.client().state.lock().unwrap();
        assert_eq!(state.wiki_writes[0].0, space_id);
        assert_eq!(state.wiki_writes[1].1, "");
        assert!(state.spaces.is_empty());
    }

    #[tokio::test]
    async fn test_plan_stops_at_first_failure() {
        let provider = provider();
        let plan = Plan::parse(
            r#"
steps:
  - resource: dremio_space
    config: {}
  - resource: dremio_space
    config: { name: Never }
"#,
        )
        .unwrap();

        let outcomes = apply_plan(&provider, &plan).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].response.is_ok());
        assert!(provider.client().calls().is_empty());
    }
}
