//! Myers' diff for line-by-line comparison
//!
//! Produces an edit script of delete/insert/equal operations between two
//! sequences, and groups contiguous runs of changes into unified-diff
//! hunks with surrounding context.

use derive_new::new;
use std::fmt::Display;

/// Number of unchanged context lines kept around each hunk.
const HUNK_CONTEXT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

impl<T> Edit<T>
where
    T: Clone + Into<String>,
{
    pub fn as_string(&self) -> String {
        match self {
            Edit::Delete { value } => format!("-{}", value.clone().into()),
            Edit::Insert { value } => format!("+{}", value.clone().into()),
            Edit::Equal { value } => format!(" {}", value.clone().into()),
        }
    }
}

impl<T> Display for Edit<T>
where
    T: Clone + Into<String>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// One unified-diff hunk: a run of changes plus surrounding context
///
/// `a_start`/`b_start` are 1-based line numbers (0 when the hunk is empty
/// on that side, per unified-diff convention).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    a_start: usize,
    b_start: usize,
    a_size: usize,
    b_size: usize,
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Group an edit script into hunks
    ///
    /// Changes separated by more than `2 * HUNK_CONTEXT` unchanged lines
    /// land in separate hunks; closer changes share one hunk.
    pub fn build(edits: Vec<Edit<T>>) -> Vec<Hunk<T>> {
        // line counters before each edit, so hunk offsets can be derived
        // from any slice start
        let mut a_before = Vec::with_capacity(edits.len());
        let mut b_before = Vec::with_capacity(edits.len());
        let (mut a_line, mut b_line) = (0usize, 0usize);
        for edit in &edits {
            a_before.push(a_line);
            b_before.push(b_line);
            match edit {
                Edit::Delete { .. } => a_line += 1,
                Edit::Insert { .. } => b_line += 1,
                Edit::Equal { .. } => {
                    a_line += 1;
                    b_line += 1;
                }
            }
        }

        let changes = edits
            .iter()
            .enumerate()
            .filter(|(_, edit)| !matches!(edit, Edit::Equal { .. }))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        if changes.is_empty() {
            return Vec::new();
        }

        let mut clusters = Vec::new();
        let (mut first, mut last) = (changes[0], changes[0]);
        for &change in &changes[1..] {
            if change - last - 1 <= 2 * HUNK_CONTEXT {
                last = change;
            } else {
                clusters.push((first, last));
                (first, last) = (change, change);
            }
        }
        clusters.push((first, last));

        clusters
            .into_iter()
            .map(|(first, last)| {
                let lo = first.saturating_sub(HUNK_CONTEXT);
                let hi = usize::min(last + HUNK_CONTEXT, edits.len() - 1);
                let hunk_edits = edits[lo..=hi].to_vec();

                let a_size = hunk_edits
                    .iter()
                    .filter(|edit| !matches!(edit, Edit::Insert { .. }))
                    .count();
                let b_size = hunk_edits
                    .iter()
                    .filter(|edit| !matches!(edit, Edit::Delete { .. }))
                    .count();

                Hunk {
                    a_start: if a_size == 0 { a_before[lo] } else { a_before[lo] + 1 },
                    b_start: if b_size == 0 { b_before[lo] } else { b_before[lo] + 1 },
                    a_size,
                    b_size,
                    edits: hunk_edits,
                }
            })
            .collect()
    }

    pub fn a_start(&self) -> usize {
        self.a_start
    }

    pub fn b_start(&self) -> usize {
        self.b_start
    }

    pub fn a_size(&self) -> usize {
        self.a_size
    }

    pub fn b_size(&self) -> usize {
        self.b_size
    }

    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    /// Unified-diff hunk header, e.g. `@@ -1,9 +1,6 @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start, self.a_size, self.b_start, self.b_size
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> MyersDiff<'d, T> {
    fn compute_shortest_edit(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (n + m) as usize;

        let mut v = vec![0; 2 * offset + 1];
        v[offset] = 0; // v[0] = 0

        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                let mut x = if k == -d {
                    // we could have only come from k+1, thus an insertion
                    v[idx + 1]
                } else if k == d {
                    // we could have only come from k-1, thus a deletion
                    v[idx - 1] + 1
                } else {
                    // we could have come from either k-1 (deletion) or k+1 (insertion)
                    let x_del = v[idx - 1] + 1;
                    let x_ins = v[idx + 1];
                    if x_del > x_ins { x_del } else { x_ins }
                };

                let mut y = x - k;
                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    // snake
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    fn backtrack(&self) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let offset = (x + y) as usize;
        let mut edit_path = Vec::new();

        let trace = self.compute_shortest_edit();

        for (d, v) in trace.iter().enumerate().rev() {
            let k = x - y;

            let prev_k = if k == -(d as isize) {
                k + 1
            } else if k == (d as isize) {
                k - 1
            } else {
                let k_del = k - 1;
                let k_ins = k + 1;
                if v[(offset as isize + k_del) as usize] + 1 > v[(offset as isize + k_ins) as usize]
                {
                    k_del
                } else {
                    k_ins
                }
            };

            let prev_x = v[(offset as isize + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                edit_path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                edit_path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        edit_path
    }

    /// The full edit script transforming `a` into `b`
    pub fn diff(&self) -> Vec<Edit<T>> {
        // two empty sequences have no edit graph to walk
        if self.a.is_empty() && self.b.is_empty() {
            return Vec::new();
        }

        let mut diff = Vec::new();

        let path = self.backtrack();

        for (prev_x, prev_y, x, y) in path {
            if x == prev_x {
                // Insert: only y increased
                if prev_y < self.b.len() as isize {
                    diff.push(Edit::Insert {
                        value: self.b[prev_y as usize].clone(),
                    });
                }
            } else if y == prev_y {
                // Delete: only x increased
                if prev_x < self.a.len() as isize {
                    diff.push(Edit::Delete {
                        value: self.a[prev_x as usize].clone(),
                    });
                }
            } else {
                // Equal: both increased (diagonal move)
                if prev_x < self.a.len() as isize {
                    diff.push(Edit::Equal {
                        value: self.a[prev_x as usize].clone(),
                    });
                }
            }
        }

        diff.reverse();
        diff
    }

    /// The edit script grouped into unified-diff hunks
    pub fn flatten_diff(&self) -> Vec<Hunk<T>> {
        Hunk::build(self.diff())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn string_inputs() -> (Vec<char>, Vec<char>) {
        ("abcabba".chars().collect(), "cbabac".chars().collect())
    }

    #[fixture]
    fn file_inputs() -> (Vec<&'static str>, Vec<&'static str>) {
        (
            vec!["line1", "line2", "line3", "line4"],
            vec!["line2", "line3_modified", "line4", "line5"],
        )
    }

    #[rstest]
    fn test_diff_strings(string_inputs: (Vec<char>, Vec<char>)) {
        let (a, b) = string_inputs;
        let result = MyersDiff::new(&a, &b).diff();
        let expected = vec![
            Edit::Delete { value: 'a' },
            Edit::Delete { value: 'b' },
            Edit::Equal { value: 'c' },
            Edit::Insert { value: 'b' },
            Edit::Equal { value: 'a' },
            Edit::Equal { value: 'b' },
            Edit::Delete { value: 'b' },
            Edit::Equal { value: 'a' },
            Edit::Insert { value: 'c' },
        ];

        assert_eq!(result, expected);
    }

    #[rstest]
    fn test_diff_files(file_inputs: (Vec<&'static str>, Vec<&'static str>)) {
        let (a, b) = file_inputs;
        let result = MyersDiff::new(&a, &b).diff();
        let expected = vec![
            Edit::Delete { value: "line1" },
            Edit::Equal { value: "line2" },
            Edit::Delete { value: "line3" },
            Edit::Insert {
                value: "line3_modified",
            },
            Edit::Equal { value: "line4" },
            Edit::Insert { value: "line5" },
        ];

        assert_eq!(result, expected);
    }

    #[rstest]
    fn empty_sequences_diff_to_nothing() {
        let empty: Vec<&str> = Vec::new();

        assert!(MyersDiff::new(&empty, &empty).diff().is_empty());
        assert!(MyersDiff::new(&empty, &empty).flatten_diff().is_empty());
    }

    #[rstest]
    fn equal_sequences_produce_no_hunks() {
        let lines = vec!["same", "lines", "here"];
        assert!(MyersDiff::new(&lines, &lines).flatten_diff().is_empty());
    }

    #[rstest]
    fn nearby_changes_share_a_hunk(file_inputs: (Vec<&'static str>, Vec<&'static str>)) {
        let (a, b) = file_inputs;
        let hunks = MyersDiff::new(&a, &b).flatten_diff();

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -1,4 +1,4 @@");
    }

    #[rstest]
    fn distant_changes_split_into_separate_hunks() {
        let a = vec![
            "fn main() {",
            "    let s = String::new();",
            "    std::io::stdin().read_line(&mut s).unwrap();",
            "    for i in 0..1000000000 {",
            "        println!(\"{}\",  s);",
            "    }",
            "",
            "    println!(\"Done\");",
            "",
            "    let tx = std::thread::spawn(move || {",
            "        for i in 0..10 {",
            "            println!(\"Thread: {}\", i);",
            "        }",
            "    });",
            "",
            "    tx.join().unwrap();",
            "",
            "    println!(\"All threads completed\");",
            "}",
        ];
        let b = vec![
            "fn main() {",
            "    let s = String::new();",
            "    std::io::stdin().read_line(&mut s).unwrap();",
            "",
            "    println!(\"Done\");",
            "",
            "    let tx = std::thread::spawn(move || {",
            "        for i in 0..10 {",
            "            println!(\"Thread: {}\", i);",
            "        }",
            "    });",
            "",
            "    if let Err(e) = tx.join() {",
            "        eprintln!(\"Thread error: {}\", e);",
            "    }",
            "",
            "    println!(\"All threads completed\");",
            "}",
        ];

        let hunks = MyersDiff::new(&a, &b).flatten_diff();

        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].header(), "@@ -1,9 +1,6 @@");
        assert_eq!(hunks[1].header(), "@@ -13,7 +10,9 @@");
    }

    #[rstest]
    fn pure_insertion_into_empty_sequence() {
        let a: Vec<&str> = Vec::new();
        let b = vec!["new", "content"];
        let hunks = MyersDiff::new(&a, &b).flatten_diff();

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -0,0 +1,2 @@");
    }

    #[rstest]
    fn pure_deletion_to_empty_sequence() {
        let a = vec!["old", "content"];
        let b: Vec<&str> = Vec::new();
        let hunks = MyersDiff::new(&a, &b).flatten_diff();

        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].header(), "@@ -1,2 +0,0 @@");
    }

    fn replay<T: Clone>(edits: &[Edit<T>]) -> (Vec<T>, Vec<T>) {
        let mut a = Vec::new();
        let mut b = Vec::new();
        for edit in edits {
            match edit {
                Edit::Delete { value } => a.push(value.clone()),
                Edit::Insert { value } => b.push(value.clone()),
                Edit::Equal { value } => {
                    a.push(value.clone());
                    b.push(value.clone());
                }
            }
        }
        (a, b)
    }

    proptest! {
        #[test]
        fn edit_script_replays_both_sides_exactly(
            a in proptest::collection::vec("[a-c]{0,3}", 0..24),
            b in proptest::collection::vec("[a-c]{0,3}", 0..24),
        ) {
            let edits = MyersDiff::new(&a, &b).diff();
            let (replayed_a, replayed_b) = replay(&edits);

            prop_assert_eq!(replayed_a, a);
            prop_assert_eq!(replayed_b, b);
        }
    }
}
