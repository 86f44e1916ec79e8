use orgtree::embed::{HashingEmbedder, NullEmbedder};
use orgtree::evaluation::DEFAULT_CYCLE_LIMIT;
use orgtree::graph::{Connection, Employee, EmployeeId, ManagerAssignment, Prediction};
use orgtree::inference::{AcyclicAssignmentEngine, CandidatePair, RootSource};
use orgtree::persistence::write_predictions_to;
use orgtree::{audit_cycles, evaluate, seniority_rank, HierarchyPipeline, OrgTreeConfig, RootConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;

const TITLES_BY_DEPTH: [&str; 5] = [
    "Chief Executive Officer",
    "VP of Engineering",
    "Director of Platform",
    "Engineering Manager",
    "Software Engineer",
];

/// A random tree-shaped organisation with social ties along reporting lines plus noise
fn synthetic_org(size: usize, seed: u64) -> (Vec<Employee>, Vec<Connection>, Vec<Prediction>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut employees = vec![Employee::new(1, TITLES_BY_DEPTH[0]).with_summary("Leads the company")];
    let mut depth = vec![0usize];
    let mut truth = vec![Prediction::new(1, ManagerAssignment::Root)];
    let mut connections = Vec::new();

    for id in 2..=size as i64 {
        // pick a manager among earlier employees that are not at the deepest level
        let manager = loop {
            let candidate = rng.gen_range(1..id);
            if depth[(candidate - 1) as usize] < TITLES_BY_DEPTH.len() - 1 {
                break candidate;
            }
        };
        let d = depth[(manager - 1) as usize] + 1;
        depth.push(d);
        let team = ["payments", "search", "infra", "mobile"][rng.gen_range(0..4)];
        employees.push(
            Employee::new(id, TITLES_BY_DEPTH[d])
                .with_summary(format!("Works on {} systems", team))
                .with_location(["Berlin", "Paris"][rng.gen_range(0..2)]),
        );
        truth.push(Prediction::new(id, ManagerAssignment::Manager(EmployeeId(manager))));
        connections.push(Connection::new(id, manager));
        if rng.gen_bool(0.5) {
            connections.push(Connection::new(id, rng.gen_range(1..id)));
        }
    }

    (employees, connections, truth)
}

fn pipeline(embedder: Arc<dyn orgtree::Embedder>) -> HierarchyPipeline {
    HierarchyPipeline::new(OrgTreeConfig::default(), embedder)
}

#[test]
fn test_seniority_table() {
    let table = [
        ("Chief Technology Officer", 7),
        ("VP of Sales", 6),
        ("Director of Engineering", 5),
        ("Engineering Manager", 4),
        ("Senior Engineer", 3),
        ("Software Engineer", 2),
        ("Associate Analyst", 1),
        ("", 2),
    ];
    for (title, rank) in table {
        assert_eq!(seniority_rank(title).level(), rank, "title {:?}", title);
    }
}

#[tokio::test]
async fn test_synthetic_org_is_acyclic_with_one_manager_each() {
    let (employees, connections, truth) = synthetic_org(300, 7);
    let embedder = Arc::new(HashingEmbedder::new(64).unwrap());
    let outcome = pipeline(embedder).run(&employees, &connections).await.unwrap();

    // one row per employee, input order
    assert_eq!(outcome.predictions.len(), employees.len());
    for (prediction, employee) in outcome.predictions.iter().zip(&employees) {
        assert_eq!(prediction.employee_id, employee.id);
    }

    let audit = audit_cycles(&outcome.predictions, DEFAULT_CYCLE_LIMIT);
    assert!(audit.is_acyclic(), "cycles: {:?}", audit.cycles);
    assert_eq!(audit.dangling_managers, 0);

    // every chain ends at the root or an unresolved employee
    let managers: HashMap<EmployeeId, ManagerAssignment> = outcome
        .predictions
        .iter()
        .map(|p| (p.employee_id, p.manager_id))
        .collect();
    for start in managers.keys() {
        let mut current = *start;
        let mut steps = 0;
        while let Some(ManagerAssignment::Manager(next)) = managers.get(&current) {
            current = *next;
            steps += 1;
            assert!(steps <= employees.len());
        }
    }

    assert_eq!(outcome.report.root, Some(EmployeeId(1)));
    assert_eq!(outcome.report.root_source, RootSource::Inferred);
    assert_eq!(outcome.report.unresolved, 0);

    let report = evaluate(&outcome.predictions, &truth).unwrap();
    assert_eq!(report.evaluable, employees.len() - 1);
    // reporting-line ties plus seniority make the true manager the usual winner
    assert!(report.accuracy > 0.4, "accuracy {}", report.accuracy);
}

#[tokio::test]
async fn test_runs_are_byte_identical() {
    let (employees, connections, _) = synthetic_org(200, 11);
    let embedder: Arc<dyn orgtree::Embedder> = Arc::new(HashingEmbedder::new(128).unwrap());

    let mut outputs = Vec::new();
    for _ in 0..3 {
        let outcome = pipeline(Arc::clone(&embedder)).run(&employees, &connections).await.unwrap();
        let mut csv = Vec::new();
        write_predictions_to(&mut csv, &outcome.predictions).unwrap();
        outputs.push(csv);
    }
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[tokio::test]
async fn test_peers_fall_back_to_each_other() {
    // two engineers who only know each other
    let employees = vec![Employee::new(10, "Software Engineer"), Employee::new(20, "Data Engineer")];
    let connections = vec![Connection::new(10, 20)];
    let outcome = pipeline(Arc::new(NullEmbedder)).run(&employees, &connections).await.unwrap();

    assert_eq!(outcome.report.scoring.fallback_pools, 2);
    // equal scores: the smaller employee id is assigned first, the reverse edge would cycle
    assert_eq!(
        outcome.predictions,
        vec![
            Prediction::new(10, ManagerAssignment::Manager(EmployeeId(20))),
            Prediction::new(20, ManagerAssignment::Unresolved),
        ]
    );
    assert_eq!(outcome.report.assignment.rejected_cycle, 1);
}

#[tokio::test]
async fn test_isolated_and_root_tier_employees() {
    let employees = vec![
        Employee::new(1, "Chief Technology Officer"),
        Employee::new(2, "Chief Operating Officer"),
        Employee::new(3, "Designer"),
    ];
    let connections = vec![Connection::new(1, 2), Connection::new(1, 1), Connection::new(2, 1)];
    let outcome = pipeline(Arc::new(NullEmbedder)).run(&employees, &connections).await.unwrap();

    assert_eq!(outcome.report.graph.self_loops, 1);
    assert_eq!(outcome.report.graph.duplicate_connections, 1);
    assert_eq!(outcome.report.graph.isolated_employees, 1);
    // two root-tier titles and no chief executive: nothing is inferred
    assert_eq!(outcome.report.root_source, RootSource::None);
    assert!(outcome
        .predictions
        .iter()
        .all(|p| p.manager_id == ManagerAssignment::Unresolved));
}

#[tokio::test]
async fn test_forced_root_is_idempotent_and_keeps_output_acyclic() {
    let (employees, connections, _) = synthetic_org(120, 3);
    let config = OrgTreeConfig {
        root: RootConfig {
            employee_id: Some(EmployeeId(40)),
            infer_from_title: true,
        },
        ..OrgTreeConfig::default()
    };
    let outcome = HierarchyPipeline::new(config, Arc::new(NullEmbedder))
        .run(&employees, &connections)
        .await
        .unwrap();

    let root_rows: Vec<_> = outcome
        .predictions
        .iter()
        .filter(|p| p.manager_id == ManagerAssignment::Root)
        .collect();
    assert_eq!(root_rows.len(), 1);
    assert_eq!(root_rows[0].employee_id, EmployeeId(40));

    let mut again = outcome.predictions.clone();
    orgtree::inference::apply_root_override(&mut again, EmployeeId(40));
    assert_eq!(again, outcome.predictions);

    assert!(audit_cycles(&outcome.predictions, DEFAULT_CYCLE_LIMIT).is_acyclic());
}

#[test]
fn test_greedy_order_commits_lower_score_when_higher_would_cycle() {
    let (a, b, c) = (1, 2, 3);
    let pairs = vec![
        CandidatePair::new(b, a, 1.0),
        CandidatePair::new(a, b, 0.9),
        CandidatePair::new(a, c, 0.5),
    ];
    let assignment = AcyclicAssignmentEngine::new().assign(pairs);

    assert_eq!(assignment.hierarchy.manager_of(EmployeeId(a)), Some(EmployeeId(c)));
    assert_eq!(assignment.hierarchy.manager_of(EmployeeId(b)), Some(EmployeeId(a)));
    assert!(!assignment.hierarchy.is_assigned(EmployeeId(c)));
}
