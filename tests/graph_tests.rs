use crud_resolver::{
    graph::{CallGraph, DataAccessConvention, ReachabilityResolver},
    model::{CallEdge, Endpoint}
};

fn endpoint(class: &str, method: &str) -> Endpoint {
    Endpoint::new("GET", "/test", class, method, "com.example")
}

fn resolver() -> ReachabilityResolver {
    ReachabilityResolver::new(DataAccessConvention::default())
}

#[test]
fn test_build_collapses_duplicate_edges() {
    let edges = [
        CallEdge::new("A", "a", "B", "b"),
        CallEdge::new("A", "a", "B", "b"),
        CallEdge::new("A", "a", "C", "c"),
    ];
    let graph = CallGraph::build(&edges);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.caller_count(), 1);
    assert_eq!(graph.node_count(), 3);
    let successors: Vec<&str> = graph.successors("A#a").map(|s| s.as_str()).collect();
    assert_eq!(successors, ["B#b", "C#c"]);
}

#[test]
fn test_build_empty() {
    let graph = CallGraph::build(&[]);
    assert!(graph.is_empty());
    assert_eq!(graph.successors("A#a").count(), 0);
}

#[test]
fn test_convention_suffixes() {
    let convention = DataAccessConvention::default();
    assert!(convention.is_data_access("UserMapper"));
    assert!(convention.is_data_access("OrderRepository"));
    assert!(convention.is_data_access("com.example.AuditDao"));
    assert!(!convention.is_data_access("UserService"));
    assert!(!convention.is_data_access("MapperFactory"));
}

#[test]
fn test_custom_convention() {
    let convention = DataAccessConvention::with_suffixes(["Store", ""]);
    assert_eq!(convention.suffixes().len(), 1);
    assert!(convention.is_data_access("UserStore"));
    assert!(!convention.is_data_access("UserMapper"));
}

#[test]
fn test_no_outgoing_edges_yields_empty_set() {
    let graph = CallGraph::build(&[CallEdge::new("X", "x", "UserMapper", "find")]);
    let reach = resolver().resolve(&graph, &endpoint("Lonely", "call"));
    assert!(reach.terminals.is_empty());
    assert_eq!(reach.visited, 1);
}

#[test]
fn test_cycle_terminates() {
    let edges = [
        CallEdge::new("A", "run", "B", "run"),
        CallEdge::new("B", "run", "C", "run"),
        CallEdge::new("C", "run", "A", "run"),
        CallEdge::new("C", "run", "UserDao", "load"),
    ];
    let graph = CallGraph::build(&edges);
    let reach = resolver().resolve(&graph, &endpoint("A", "run"));
    let terminals: Vec<&str> = reach.terminals.iter().map(|t| t.as_str()).collect();
    assert_eq!(terminals, ["UserDao#load"]);
    assert_eq!(reach.visited, 4);
}

#[test]
fn test_long_intermediate_chain() {
    let edges = [
        CallEdge::new("A", "m", "B", "m"),
        CallEdge::new("B", "m", "C", "m"),
        CallEdge::new("C", "m", "D", "m"),
        CallEdge::new("D", "m", "Mapper", "m"),
    ];
    let graph = CallGraph::build(&edges);
    let reach = resolver().resolve(&graph, &endpoint("A", "m"));
    assert_eq!(reach.terminals.len(), 1);
    assert!(reach.terminals.contains("Mapper#m"));
}

#[test]
fn test_terminals_keep_expanding() {
    let edges = [
        CallEdge::new("Controller", "list", "UserRepository", "findAll"),
        CallEdge::new("UserRepository", "findAll", "RoleMapper", "selectRoles"),
    ];
    let graph = CallGraph::build(&edges);
    let reach = resolver().resolve(&graph, &endpoint("Controller", "list"));
    assert!(reach.terminals.contains("UserRepository#findAll"));
    assert!(reach.terminals.contains("RoleMapper#selectRoles"));
}

#[test]
fn test_start_node_is_not_a_terminal() {
    let edges = [CallEdge::new("UserMapper", "a", "UserMapper", "b")];
    let graph = CallGraph::build(&edges);
    let reach = resolver().resolve(&graph, &endpoint("UserMapper", "a"));
    assert!(!reach.terminals.contains("UserMapper#a"));
    assert!(reach.terminals.contains("UserMapper#b"));
}

#[test]
fn test_diamond_reaches_terminal_once() {
    let edges = [
        CallEdge::new("A", "m", "B", "m"),
        CallEdge::new("A", "m", "C", "m"),
        CallEdge::new("B", "m", "OrderMapper", "insert"),
        CallEdge::new("C", "m", "OrderMapper", "insert"),
    ];
    let graph = CallGraph::build(&edges);
    let reach = resolver().resolve(&graph, &endpoint("A", "m"));
    assert_eq!(reach.terminals.len(), 1);
    assert_eq!(reach.visited, 4);
}

#[test]
fn test_result_independent_of_edge_order() {
    let mut edges = vec![
        CallEdge::new("A", "m", "B", "m"),
        CallEdge::new("A", "m", "UserMapper", "x"),
        CallEdge::new("B", "m", "OrderDao", "y"),
        CallEdge::new("B", "m", "A", "m"),
    ];
    let forward = resolver().resolve(&CallGraph::build(&edges), &endpoint("A", "m"));
    edges.reverse();
    let backward = resolver().resolve(&CallGraph::build(&edges), &endpoint("A", "m"));

    let mut f: Vec<_> = forward.terminals.into_iter().collect();
    let mut b: Vec<_> = backward.terminals.into_iter().collect();
    f.sort();
    b.sort();
    assert_eq!(f, b);
}

#[test]
fn test_max_depth_limits_expansion() {
    let edges = [
        CallEdge::new("A", "m", "B", "m"),
        CallEdge::new("B", "m", "C", "m"),
        CallEdge::new("C", "m", "UserMapper", "m"),
    ];
    let graph = CallGraph::build(&edges);

    let shallow = resolver().with_max_depth(2).resolve(&graph, &endpoint("A", "m"));
    assert!(shallow.terminals.is_empty());
    assert!(shallow.truncated);

    let deep = resolver().with_max_depth(3).resolve(&graph, &endpoint("A", "m"));
    assert!(deep.terminals.contains("UserMapper#m"));

    let unlimited = resolver().with_max_depth(0).resolve(&graph, &endpoint("A", "m"));
    assert!(unlimited.terminals.contains("UserMapper#m"));
    assert!(!unlimited.truncated);
}
