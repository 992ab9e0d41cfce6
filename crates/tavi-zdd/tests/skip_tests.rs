//! Skip directives on a server/task placement problem.
//!
//! Five servers occupy the high levels, twenty tasks (four per server) the
//! low ones. A task may only be selected if its server is; once a server is
//! known unselected, its remaining task levels are vacuous and the
//! specification jumps across them. The skipping and non-skipping renditions
//! must produce identical diagrams.

use std::sync::atomic::{AtomicUsize, Ordering};
use tavi_zdd::{Child, ConstraintSpec, IntState, Violation, Zdd};

const SERVERS: u32 = 5;
const TASKS_PER_SERVER: u32 = 4;
const TASKS: u32 = SERVERS * TASKS_PER_SERVER;
const VARS: u32 = SERVERS + TASKS;

/// Level layout: servers on `TASKS+1..=VARS` (decided first), tasks on
/// `1..=TASKS`. Task `t` belongs to server index `(t - 1) / TASKS_PER_SERVER`.
struct ServerTaskSpec {
    skip_enabled: bool,
    skips: AtomicUsize,
    levels_skipped: AtomicUsize,
}

impl ServerTaskSpec {
    fn new(skip_enabled: bool) -> Self {
        Self {
            skip_enabled,
            skips: AtomicUsize::new(0),
            levels_skipped: AtomicUsize::new(0),
        }
    }

    fn skip_count(&self) -> usize {
        self.skips.load(Ordering::Relaxed)
    }

    fn levels_skipped(&self) -> usize {
        self.levels_skipped.load(Ordering::Relaxed)
    }
}

fn task_cpu(task: u32) -> i64 {
    10 + (task % 5) as i64 * 5
}

fn task_mem(task: u32) -> i64 {
    20 + (task % 3) as i64 * 10
}

impl ConstraintSpec for ServerTaskSpec {
    type State = IntState;

    fn variables(&self) -> u32 {
        VARS
    }

    fn initial_state(&self) -> IntState {
        // server flags, total cpu, total memory
        IntState::zeros(SERVERS as usize + 2)
    }

    fn child(&self, state: &IntState, level: u32, take: bool) -> Result<Child<IntState>, Violation> {
        let mut next = state.clone();

        if level > TASKS {
            let server = (level - TASKS - 1) as usize;
            if take {
                next.values[server] = 1;
            }
            return Ok(Child::State(next));
        }

        let task = level;
        let server = ((task - 1) / TASKS_PER_SERVER) as usize;

        if take {
            if next.values[server] == 0 {
                return Err(Violation);
            }
            next.values[SERVERS as usize] += task_cpu(task);
            next.values[SERVERS as usize + 1] += task_mem(task);
            return Ok(Child::State(next));
        }

        if self.skip_enabled && next.values[server] == 0 {
            // Remaining tasks of this server sit on levels down to the
            // bottom of its block; everything in between is vacuous.
            let block_low = server as u32 * TASKS_PER_SERVER + 1;
            let skip_to = block_low - 1;
            if level > block_low {
                self.skips.fetch_add(1, Ordering::Relaxed);
                self.levels_skipped
                    .fetch_add((level - 1 - skip_to) as usize, Ordering::Relaxed);
                return Ok(Child::Skip {
                    state: next,
                    skip_to,
                });
            }
        }

        Ok(Child::State(next))
    }

    fn is_valid(&self, _: &IntState) -> bool {
        true
    }
}

fn costs() -> Vec<f64> {
    let mut costs = vec![0.0; VARS as usize + 1];
    for level in 1..=VARS {
        costs[level as usize] = if level > TASKS {
            1.0 // enabling a server costs
        } else {
            -(level as f64) // placing a task pays
        };
    }
    costs
}

/// Σ_{j=0..5} C(5,j) · 2^(4j) = 17^5: each selected server frees four task
/// choices, unselected servers pin theirs to zero.
const EXPECTED_COUNT: u64 = 1_419_857;

#[test]
fn skipping_spec_counts_correctly() {
    let spec = ServerTaskSpec::new(true);
    let mut zdd = Zdd::new(VARS);
    zdd.build(&spec).unwrap();

    assert_eq!(zdd.count().unwrap(), EXPECTED_COUNT);
    assert!(spec.skip_count() > 0, "no skip directive was exercised");
    assert!(spec.levels_skipped() >= spec.skip_count());
}

#[test]
fn skipping_and_expanding_yield_the_same_diagram() {
    let with_skip = ServerTaskSpec::new(true);
    let without_skip = ServerTaskSpec::new(false);

    let mut a = Zdd::new(VARS);
    let mut b = Zdd::new(VARS);
    a.build(&with_skip).unwrap();
    b.build(&without_skip).unwrap();

    assert!(with_skip.skip_count() > 0);
    assert_eq!(without_skip.skip_count(), 0);

    // The skipped levels reduce away under zero-suppression, so both
    // constructions store the same nodes in the same order.
    assert_eq!(a.root(), b.root());
    assert_eq!(a.size(), b.size());
    assert_eq!(a.count().unwrap(), b.count().unwrap());

    let costs = costs();
    assert_eq!(a.k_best(5, &costs).unwrap(), b.k_best(5, &costs).unwrap());
}

#[test]
fn best_solutions_respect_server_dependencies() {
    let spec = ServerTaskSpec::new(true);
    let mut zdd = Zdd::new(VARS);
    zdd.build(&spec).unwrap();

    for solution in zdd.k_best(8, &costs()).unwrap() {
        let servers: Vec<u32> = solution
            .variables
            .iter()
            .filter(|&&v| v > TASKS)
            .map(|&v| v - TASKS - 1)
            .collect();
        for &v in solution.variables.iter().filter(|&&v| v <= TASKS) {
            let server = (v - 1) / TASKS_PER_SERVER;
            assert!(
                servers.contains(&server),
                "task {} selected without server {}",
                v,
                server
            );
        }
    }
}
