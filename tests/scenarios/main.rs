//! Behaviour scenarios using cucumber-rs (Gherkin).

use std::thread;

use cucumber::{given, then, when, World};

use rbkv::utils::bootstrap::init_tracing;
use rbkv::{Color, ConcurrentTree, DuplicatePolicy, TreeConfig, TreeError};

/// Scenario state: the tree under test and the outcome of the last step.
#[derive(World)]
#[world(init = Self::new)]
pub struct TreeWorld {
    tree: Option<ConcurrentTree<String, i64>>,
    last_insert: Option<Result<Option<i64>, TreeError>>,
    released: Option<usize>,
}

impl std::fmt::Debug for TreeWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWorld")
            .field("tree", &self.tree)
            .field("last_insert", &self.last_insert)
            .finish()
    }
}

impl TreeWorld {
    fn new() -> Self {
        Self {
            tree: None,
            last_insert: None,
            released: None,
        }
    }

    fn tree(&self) -> &ConcurrentTree<String, i64> {
        self.tree.as_ref().expect("no tree in this scenario")
    }
}

// Step implementations

#[given("an empty tree")]
fn given_empty_tree(world: &mut TreeWorld) {
    world.tree = Some(ConcurrentTree::new());
}

#[given("the tree rejects duplicate keys")]
fn given_rejecting_tree(world: &mut TreeWorld) {
    world.tree = Some(ConcurrentTree::with_config(TreeConfig {
        duplicate_policy: DuplicatePolicy::Reject,
        ..TreeConfig::default()
    }));
}

#[when(expr = "I insert {string} with value {int}")]
fn when_insert(world: &mut TreeWorld, key: String, value: i64) {
    world.last_insert = Some(world.tree().insert(key, value));
}

#[when(expr = "I insert keys {int} through {int} in ascending order")]
fn when_insert_ascending(world: &mut TreeWorld, from: i64, to: i64) {
    let tree = world.tree();
    for n in from..=to {
        // Zero-padded so string order matches numeric order.
        tree.insert(format!("{n:06}"), n).unwrap();
    }
}

#[when(expr = "I delete {string}")]
fn when_delete(world: &mut TreeWorld, key: String) {
    world.tree().delete(key.as_str());
}

#[when(expr = "{int} threads each insert {int} distinct keys")]
fn when_threads_insert(world: &mut TreeWorld, threads: usize, per_thread: usize) {
    let tree = world.tree();
    thread::scope(|s| {
        for t in 0..threads {
            s.spawn(move || {
                for i in 0..per_thread {
                    tree.insert(format!("t{t:03}-{i:06}"), i as i64).unwrap();
                }
            });
        }
    });
}

#[when("I destroy the tree")]
fn when_destroy(world: &mut TreeWorld) {
    let tree = world.tree.take().expect("no tree to destroy");
    world.released = Some(tree.destroy());
}

#[then(expr = "looking up {string} returns {int}")]
fn then_lookup_returns(world: &mut TreeWorld, key: String, value: i64) {
    assert_eq!(world.tree().lookup(key.as_str()), Some(value));
}

#[then(expr = "looking up {string} finds nothing")]
fn then_lookup_absent(world: &mut TreeWorld, key: String) {
    assert_eq!(world.tree().lookup(key.as_str()), None);
}

#[then(expr = "the keys in order are {string}")]
fn then_keys_in_order(world: &mut TreeWorld, keys: String) {
    let actual: Vec<String> = world.tree().snapshot().into_iter().map(|(k, _)| k).collect();
    let expected: Vec<&str> = keys.split(',').collect();
    assert_eq!(actual, expected);
}

#[then("the root is black")]
fn then_root_black(world: &mut TreeWorld) {
    assert_eq!(world.tree().root_color(), Some(Color::Black));
}

#[then("the tree is a valid red-black tree")]
fn then_valid(world: &mut TreeWorld) {
    if let Err(violation) = world.tree().validate() {
        panic!("invariant violated: {violation}");
    }
}

#[then(expr = "the tree holds {int} entries")]
fn then_holds(world: &mut TreeWorld, count: usize) {
    assert_eq!(world.tree().len(), count);
}

#[then("the height is within the red-black bound")]
fn then_height_bound(world: &mut TreeWorld) {
    let tree = world.tree();
    let bound = 2.0 * ((tree.len() + 1) as f64).log2();
    assert!(
        (tree.height() as f64) <= bound,
        "height {} exceeds {}",
        tree.height(),
        bound
    );
}

#[then(expr = "the insert replaced value {int}")]
fn then_insert_replaced(world: &mut TreeWorld, previous: i64) {
    assert_eq!(world.last_insert, Some(Ok(Some(previous))));
}

#[then("the insert is rejected as a duplicate")]
fn then_insert_rejected(world: &mut TreeWorld) {
    assert_eq!(world.last_insert, Some(Err(TreeError::DuplicateKey)));
}

#[then(expr = "{int} entries were released")]
fn then_released(world: &mut TreeWorld, count: usize) {
    assert_eq!(world.released, Some(count));
}

#[tokio::main]
async fn main() {
    init_tracing();
    TreeWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/scenarios/features")
        .await;
}
