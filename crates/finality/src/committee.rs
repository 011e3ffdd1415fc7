//! Committee pruning.
//!
//! Given the round's voting matrix and a candidate block, find the maximal
//! set of supporters that is *mutually convinced*: every member must
//! observe, within its own panorama, first-level-zero votes for the
//! candidate carrying at least the quorum weight. Members that fall short
//! are pruned, which can push other members below quorum, so the step
//! iterates until nothing changes. The fixed point is unique: pruning is
//! monotone in the mask, and each pass evaluates every row against the
//! mask the pass started with.

use tracing::trace;
use vantage_types::{BlockHash, Weight};

use crate::matrix::VotingMatrix;

/// Run the pruning loop for `candidate`.
///
/// Returns the committee member indices (ascending) and their total
/// weight, or `None` when no quorum subset survives. The initial mask is
/// the candidate's supporters: validators whose recorded first-level-zero
/// vote names `candidate`.
pub(crate) fn find_committee(
    matrix: &VotingMatrix,
    candidate: &BlockHash,
) -> Option<(Vec<usize>, Weight)> {
    let n = matrix.len();

    let mut mask = vec![false; n];
    let mut approximation_weight: Weight = 0;
    for i in 0..n {
        if supports(matrix, i, candidate) {
            mask[i] = true;
            approximation_weight += matrix.weight(i);
        }
    }

    if approximation_weight < matrix.quorum() || approximation_weight == 0 {
        trace!(
            candidate = %candidate,
            weight = approximation_weight,
            quorum = matrix.quorum(),
            "supporters cannot reach quorum"
        );
        return None;
    }

    loop {
        let mut pruned = false;
        let mut surviving = mask.clone();
        let mut surviving_weight: Weight = 0;

        for i in (0..n).filter(|&i| mask[i]) {
            // Weight of supporters whose commitment to the candidate is
            // visible from i's perspective. Only validators still in the
            // pass-start mask count.
            let vote_sum: Weight = (0..n)
                .filter(|&j| mask[j])
                .filter(|&j| {
                    matrix
                        .first_zero_vote(j)
                        .is_some_and(|vote| vote.dag_level <= matrix.level(i, j))
                })
                .map(|j| matrix.weight(j))
                .sum();

            if vote_sum >= matrix.quorum() {
                surviving_weight += matrix.weight(i);
            } else {
                surviving[i] = false;
                pruned = true;
            }
        }

        if !pruned {
            let members: Vec<usize> = (0..n).filter(|&i| mask[i]).collect();
            return Some((members, surviving_weight));
        }
        if surviving_weight < matrix.quorum() {
            return None;
        }
        mask = surviving;
    }
}

fn supports(matrix: &VotingMatrix, index: usize, candidate: &BlockHash) -> bool {
    matrix
        .first_zero_vote(index)
        .is_some_and(|vote| vote.value == *candidate)
}
