use crud_resolver::{
    classify::{SqlClassifier, SqlDialect},
    config::{Config, EngineConfig},
    engine::CrudEngine,
    graph::{DataAccessConvention, ReachabilityResolver},
    matcher::MappingMatcher,
    model::{BatchJob, CallEdge, CrudLink, Endpoint, Facts, Operation, SqlMapping}
};

fn sample_facts() -> Facts {
    Facts {
        endpoints:    vec![
            Endpoint::new("get", "/users", "UserController", "list", "com.example.api"),
            Endpoint::new("POST", "/users", "UserController", "create", "com.example.api"),
            Endpoint::new("DELETE", "/users/{id}", "UserController", "remove", "com.example.api"),
            Endpoint::new("GET", "/health", "HealthController", "ping", "com.example.ops"),
        ],
        call_edges:   vec![
            CallEdge::new("UserController", "list", "UserService", "findAll"),
            CallEdge::new("UserService", "findAll", "UserMapper", "selectAll"),
            CallEdge::new("UserController", "create", "UserService", "create"),
            CallEdge::new("UserService", "create", "AccountMapper", "insert"),
            CallEdge::new("UserService", "create", "AuditDao", "record"),
            CallEdge::new("UserController", "remove", "UserService", "remove"),
            CallEdge::new("UserService", "remove", "SessionMapper", "deleteWithSessions"),
        ],
        sql_mappings: vec![
            SqlMapping::new(
                "com.example.mapper.UserMapper",
                "selectAll",
                Operation::Unknown,
                Some("SELECT u.id, r.name FROM users u JOIN roles r ON u.role_id = r.id"),
                &[]
            ),
            SqlMapping::new(
                "com.example.mapper.AccountMapper",
                "insert",
                Operation::Unknown,
                Some("INSERT INTO users (name) VALUES (#{name})"),
                &[]
            ),
            SqlMapping::new(
                "com.example.dao.AuditDao",
                "record",
                Operation::Insert,
                None,
                &["audit_log"]
            ),
            SqlMapping::new(
                "SessionMapper",
                "deleteWithSessions",
                Operation::Delete,
                None,
                &["users", "sessions", "users"]
            ),
        ],
        batch_jobs:   vec![BatchJob::new("NightlyCleanup", "cleanup", "com.example.batch")],
    }
}

fn link_tuples(links: &[CrudLink]) -> Vec<(String, String, char)> {
    let mut out: Vec<_> = links
        .iter()
        .map(|l| {
            (
                format!("{} {}", l.endpoint().http_method, l.endpoint().url_path),
                l.table().to_string(),
                l.crud_code()
            )
        })
        .collect();
    out.sort();
    out
}

#[test]
fn test_end_to_end_links() {
    let report = CrudEngine::default().run(&sample_facts());
    let links = link_tuples(&report.links);
    assert_eq!(
        links,
        [
            ("DELETE /users/{id}".to_string(), "sessions".to_string(), 'D'),
            ("DELETE /users/{id}".to_string(), "users".to_string(), 'D'),
            ("GET /users".to_string(), "roles".to_string(), 'S'),
            ("GET /users".to_string(), "users".to_string(), 'S'),
            ("POST /users".to_string(), "audit_log".to_string(), 'I'),
            ("POST /users".to_string(), "users".to_string(), 'I'),
        ]
    );
}

#[test]
fn test_run_statistics() {
    let report = CrudEngine::default().run(&sample_facts());
    let stats = &report.stats;
    assert_eq!(stats.endpoints_analyzed, 4);
    assert_eq!(stats.endpoints_skipped, 0);
    assert_eq!(stats.endpoints_without_terminals, 1);
    assert_eq!(stats.endpoints_with_links, 3);
    assert_eq!(stats.distinct_tables, 4);
    assert_eq!(stats.links, 6);
    assert_eq!(stats.mappings_prepared, 4);
    assert_eq!(stats.mappings_dropped, 0);
    assert_eq!(stats.graph_edges, 7);
    assert_eq!(stats.tier_hits.get("exact"), Some(&1));
    assert_eq!(stats.tier_hits.get("simple-name"), Some(&3));
    assert_eq!(stats.tier_hits.get("containment"), Some(&0));
}

#[test]
fn test_http_method_is_upper_cased() {
    let mut facts = sample_facts();
    facts.endpoints[0] = Endpoint {
        http_method: "get".into(),
        ..facts.endpoints[0].clone()
    };
    let report = CrudEngine::default().run(&facts);
    assert!(report.links.iter().any(|l| l.endpoint().http_method == "GET"));
    assert!(report.links.iter().all(|l| l.endpoint().http_method != "get"));
}

#[test]
fn test_batch_jobs_reported_not_traversed() {
    let mut facts = sample_facts();
    facts
        .call_edges
        .push(CallEdge::new("NightlyCleanup", "cleanup", "AccountMapper", "insert"));
    let report = CrudEngine::default().run(&facts);
    assert_eq!(report.batch_jobs.len(), 1);
    assert_eq!(report.stats.links, 6);
}

#[test]
fn test_mapping_without_sql_is_dropped() {
    let mut facts = sample_facts();
    facts.sql_mappings.push(SqlMapping::new(
        "UserMapper",
        "mystery",
        Operation::Unknown,
        None,
        &[]
    ));
    let report = CrudEngine::default().run(&facts);
    assert_eq!(report.dropped_mappings.len(), 1);
    assert_eq!(report.dropped_mappings[0].mapping, "UserMapper#mystery");
    assert_eq!(report.stats.mappings_dropped, 1);
    assert_eq!(report.stats.links, 6);
}

#[test]
fn test_supplied_operation_wins_over_classification() {
    let facts = Facts {
        endpoints:    vec![Endpoint::new("GET", "/x", "C", "m", "")],
        call_edges:   vec![CallEdge::new("C", "m", "XMapper", "run")],
        sql_mappings: vec![SqlMapping::new(
            "XMapper",
            "run",
            Operation::Update,
            Some("SELECT * FROM things"),
            &[]
        )],
        batch_jobs:   vec![]
    };
    let report = CrudEngine::default().run(&facts);
    assert_eq!(report.links.len(), 1);
    assert_eq!(report.links[0].crud_code(), 'U');
    assert_eq!(report.links[0].table(), "things");
}

#[test]
fn test_fallback_fills_missing_operation() {
    let facts = Facts {
        endpoints:    vec![Endpoint::new("GET", "/x", "C", "m", "")],
        call_edges:   vec![CallEdge::new("C", "m", "XMapper", "run")],
        sql_mappings: vec![SqlMapping::new(
            "XMapper",
            "run",
            Operation::Unknown,
            Some("TRUNCATE TABLE things"),
            &["things"]
        )],
        batch_jobs:   vec![]
    };
    let report = CrudEngine::default().run(&facts);
    assert_eq!(report.links.len(), 1);
    assert_eq!(report.links[0].crud_code(), 'S');
    assert_eq!(report.links[0].table(), "things");
    assert_eq!(report.stats.mappings_unknown, 0);
}

#[test]
fn test_no_links_is_not_an_error() {
    let facts = Facts {
        endpoints: vec![Endpoint::new("GET", "/x", "C", "m", "")],
        ..Facts::default()
    };
    let report = CrudEngine::default().run(&facts);
    assert!(report.is_empty());
    assert_eq!(report.stats.endpoints_without_terminals, 1);
}

#[test]
fn test_empty_facts() {
    let report = CrudEngine::default().run(&Facts::default());
    assert!(report.is_empty());
    assert_eq!(report.stats.endpoints_analyzed, 0);
}

#[test]
fn test_package_filter() {
    let settings = EngineConfig {
        include_packages: vec!["com.example".to_string()],
        exclude_packages: vec!["com.example.ops".to_string()],
        ..EngineConfig::default()
    };
    let engine = CrudEngine::default().with_settings(settings);
    let report = engine.run(&sample_facts());
    assert_eq!(report.stats.endpoints_analyzed, 3);
    assert_eq!(report.stats.endpoints_skipped, 1);
    assert_eq!(report.stats.endpoints_without_terminals, 0);
}

#[test]
fn test_parallel_matches_sequential() {
    let facts = sample_facts();
    let parallel = CrudEngine::default().with_parallel(true).run(&facts);
    let sequential = CrudEngine::default().with_parallel(false).run(&facts);
    assert_eq!(parallel.links, sequential.links);
    assert_eq!(parallel.stats, sequential.stats);
}

#[test]
fn test_idempotent_runs() {
    let facts = sample_facts();
    let engine = CrudEngine::default();
    let first = link_tuples(&engine.run(&facts).links);
    let second = link_tuples(&engine.run(&facts).links);
    assert_eq!(first, second);
}

#[test]
fn test_disabled_tiers_from_config() {
    let mut config = Config::default();
    config.matcher.disabled = vec!["simple-name".to_string(), "loose-suffix".to_string()];
    let report = CrudEngine::from_config(&config).run(&sample_facts());
    assert_eq!(report.stats.tier_hits.get("simple-name"), None);
    assert!(report.stats.tier_hits.get("containment").copied().unwrap_or(0) > 0);
}

#[test]
fn test_custom_components() {
    let engine = CrudEngine::new(
        SqlClassifier::new(SqlDialect::MySQL),
        ReachabilityResolver::new(DataAccessConvention::with_suffixes(["Store"])),
        MappingMatcher::new()
    );
    let facts = Facts {
        endpoints:    vec![Endpoint::new("GET", "/x", "C", "m", "")],
        call_edges:   vec![CallEdge::new("C", "m", "ThingStore", "load")],
        sql_mappings: vec![SqlMapping::new(
            "ThingStore",
            "load",
            Operation::Unknown,
            Some("SELECT * FROM things"),
            &[]
        )],
        batch_jobs:   vec![]
    };
    let report = engine.run(&facts);
    assert_eq!(report.links.len(), 1);
    assert_eq!(engine.classifier().dialect(), SqlDialect::MySQL);
}
