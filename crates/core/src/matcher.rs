//! Matcher module - connected run discovery
//!
//! A match grows from a seed cell: the seed joins a match when at least two
//! same-colored cells continue its row (left + right) or its column (up + down),
//! looking at most two cells in each direction. Every cell pulled into a match
//! is scanned the same way, so crossing and chained runs (L, T, plus shapes)
//! end up in one match.
//!
//! State is two call-local bitmaps over cell indices:
//! - `claimed`: the cell already belongs to a match found in this call
//! - `expanded`: the cell has already been scanned
//!
//! Nothing is kept on the grid between calls.

use arrayvec::ArrayVec;

use crate::types::MIN_MATCH_LEN;

/// Maximum cells inspected in one direction from the scanned cell.
const REACH: usize = 2;

/// Read-only view the matcher needs from a board.
pub(crate) trait ColorBoard {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Color at a flat index, `None` for an empty cell.
    fn color_at(&self, idx: usize) -> Option<u8>;
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Same-colored cells continuing `idx` along `axis`, both directions combined.
fn line_run<B: ColorBoard>(board: &B, idx: usize, color: u8, axis: Axis) -> ArrayVec<usize, 4> {
    let width = board.width();
    let (row, col) = (idx / width, idx % width);
    let mut run = ArrayVec::new();

    for backwards in [true, false] {
        for step in 1..=REACH {
            let (r, c) = match (axis, backwards) {
                (Axis::Horizontal, true) if col >= step => (row, col - step),
                (Axis::Horizontal, false) if col + step < width => (row, col + step),
                (Axis::Vertical, true) if row >= step => (row - step, col),
                (Axis::Vertical, false) if row + step < board.height() => (row + step, col),
                _ => break,
            };
            let neighbor = r * width + c;
            if board.color_at(neighbor) != Some(color) {
                break;
            }
            run.push(neighbor);
        }
    }

    run
}

/// Find every match reachable from `seeds`.
///
/// Returns one index list per match, in seed order. Seeds that are empty,
/// already claimed, or not part of a run produce nothing.
pub(crate) fn discover<B: ColorBoard>(board: &B, seeds: &[usize]) -> Vec<Vec<usize>> {
    let size = board.width() * board.height();
    let mut claimed = vec![false; size];
    let mut expanded = vec![false; size];
    let mut matches = Vec::new();

    for &seed in seeds {
        if seed >= size || claimed[seed] || board.color_at(seed).is_none() {
            continue;
        }

        let mut members = Vec::new();
        let mut work = vec![seed];

        while let Some(idx) = work.pop() {
            if expanded[idx] {
                continue;
            }
            expanded[idx] = true;

            let Some(color) = board.color_at(idx) else {
                continue;
            };

            let mut added: ArrayVec<usize, 9> = ArrayVec::new();
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let run = line_run(board, idx, color, axis);
                if run.len() + 1 < MIN_MATCH_LEN {
                    continue;
                }
                for cell in run {
                    if !claimed[cell] {
                        claimed[cell] = true;
                        added.push(cell);
                    }
                }
            }
            if !added.is_empty() && !claimed[idx] {
                claimed[idx] = true;
                added.push(idx);
            }

            members.extend_from_slice(&added);
            work.extend_from_slice(&added);
        }

        if !members.is_empty() {
            matches.push(members);
        }
    }

    matches
}
