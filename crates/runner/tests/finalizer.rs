//! End-to-end finalizer tests over channels.

use tokio::sync::mpsc;

use vantage_dag::MemoryDag;
use vantage_runner::Finalizer;
use vantage_types::{BlockHash, ValidatorId, WeightMap};

fn validator(name: &[u8]) -> ValidatorId {
    ValidatorId::new(name)
}

fn equal_weights() -> WeightMap {
    [
        (validator(b"alice"), 10),
        (validator(b"bob"), 10),
        (validator(b"carol"), 10),
    ]
    .into_iter()
    .collect()
}

/// The chain x ← b1 ← c1 ← a2 on top of genesis: everyone votes for x and
/// the last block completes mutual coverage at quorum 18.
fn finalizing_chain() -> (MemoryDag, BlockHash, BlockHash, Vec<BlockHash>) {
    let mut dag = MemoryDag::new();
    let genesis = dag.genesis(validator(b"genesis"), equal_weights());
    let x = dag.add_block(validator(b"alice"), vec![genesis], vec![genesis]);
    let b1 = dag.add_block(validator(b"bob"), vec![x], vec![x]);
    let c1 = dag.add_block(validator(b"carol"), vec![b1], vec![b1]);
    let a2 = dag.add_block(validator(b"alice"), vec![c1], vec![c1, x]);
    (dag, genesis, x, vec![x, b1, c1, a2])
}

#[test]
fn process_advances_the_lfb_on_finalization() {
    let (dag, genesis, x, blocks) = finalizing_chain();
    let mut finalizer = Finalizer::new(dag, genesis, 0.1).unwrap();
    assert_eq!(finalizer.last_finalized(), genesis);

    let mut finalized = Vec::new();
    for block in &blocks {
        if let Some(result) = finalizer.process(block).unwrap() {
            finalized.push(result);
        }
    }

    assert_eq!(finalized.len(), 1);
    assert_eq!(finalized[0].consensus_value, x);
    assert_eq!(finalizer.last_finalized(), x);
}

#[tokio::test]
async fn the_loop_reports_finalized_values_in_stream_order() {
    let (dag, genesis, x, blocks) = finalizing_chain();
    let finalizer = Finalizer::new(dag, genesis, 0.1).unwrap();

    let (block_tx, block_rx) = mpsc::channel(16);
    let (finalized_tx, mut finalized_rx) = mpsc::channel(16);
    let handle = tokio::spawn(finalizer.run(block_rx, finalized_tx));

    for block in blocks {
        block_tx.send(block).await.unwrap();
    }
    drop(block_tx);

    let finalized = finalized_rx.recv().await.expect("one finalization");
    assert_eq!(finalized.consensus_value, x);
    assert_eq!(finalized.weight, 30);
    assert!(finalized_rx.recv().await.is_none());

    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn the_loop_stops_cleanly_when_the_stream_closes() {
    let (dag, genesis, _, _) = finalizing_chain();
    let finalizer = Finalizer::new(dag, genesis, 0.1).unwrap();

    let (block_tx, block_rx) = mpsc::channel::<BlockHash>(1);
    let (finalized_tx, _finalized_rx) = mpsc::channel(1);
    drop(block_tx);

    finalizer.run(block_rx, finalized_tx).await.unwrap();
}

#[tokio::test]
async fn dag_failures_abort_the_loop() {
    let (dag, genesis, _, _) = finalizing_chain();
    let finalizer = Finalizer::new(dag, genesis, 0.1).unwrap();

    let (block_tx, block_rx) = mpsc::channel(1);
    let (finalized_tx, _finalized_rx) = mpsc::channel(1);

    block_tx.send(BlockHash::hash(b"never added")).await.unwrap();
    drop(block_tx);

    let error = finalizer.run(block_rx, finalized_tx).await.unwrap_err();
    assert!(matches!(
        error,
        vantage_finality::FinalityError::Dag(_)
    ));
}
