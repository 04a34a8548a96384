//! Heap sort tracer producing the operation log the visualizer replays.
//!
//! Each sift-down step first highlights the children of the current node,
//! then the node together with its larger child, and swaps them when the
//! child is larger. Extraction swaps the root into the settled tail and
//! shrinks the active length.

use super::TraceRecorder;
use crate::replay::OperationLog;

/// Heap sort `values` ascending, recording every step.
pub fn heap_sort_trace(values: &[i64]) -> OperationLog {
    let mut recorder = TraceRecorder::new(values);
    let n = values.len();

    for i in (0..n / 2).rev() {
        sift_down(&mut recorder, i, n);
    }

    for end in (1..n).rev() {
        recorder.swap(0, end);
        if end == 1 {
            // The last two elements settle together.
            recorder.change_active_length(-2);
        } else {
            recorder.change_active_length(-1);
            sift_down(&mut recorder, 0, end);
        }
    }

    recorder.finish()
}

fn sift_down(recorder: &mut TraceRecorder, mut node: usize, heap_len: usize) {
    loop {
        let left = 2 * node + 1;
        if left >= heap_len {
            return;
        }
        let right = left + 1;
        recorder.focus(left, right);

        let data = recorder.data();
        let child = if right < heap_len && data[right] > data[left] {
            right
        } else {
            left
        };
        recorder.focus(node, child);

        if recorder.data()[child] > recorder.data()[node] {
            recorder.swap(node, child);
            node = child;
        } else {
            return;
        }
    }
}
