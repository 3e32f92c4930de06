// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Per-subject student queues.
//!
//! The distribution engine never touches students directly; it draws
//! [`StudentIndex`] values from a [`SubjectQueues`] built once per day pool.
//! Construction groups the pool by subject code, shuffles each group
//! independently with the injected generator (removing residual input-order
//! bias), and orders groups by descending size. Largest-first ordering keeps
//! filler subjects available when the round-robin approaches a hall's
//! capacity limit.
//!
//! The `sweep` operation is the adjacency-avoidance primitive: one pass takes
//! at most one student from each non-empty group, so no two students taken in
//! the same sweep share a subject.

use proctor_model::index::StudentIndex;
use proctor_model::record::Student;
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct SubjectGroup {
    code: String,
    members: VecDeque<StudentIndex>,
}

/// Ordered per-subject queues over a day pool.
///
/// Indices refer to positions in the pool slice the queues were built from.
#[derive(Debug, Clone)]
pub struct SubjectQueues {
    groups: Vec<SubjectGroup>,
}

impl SubjectQueues {
    /// Builds queues from a day pool.
    ///
    /// Groups appear in descending size order; ties keep the order in which
    /// their subject first occurs in the pool (the underlying sort is stable).
    /// Each group is shuffled independently with `rng`.
    pub fn build<R: Rng + ?Sized>(pool: &[Student], rng: &mut R) -> Self {
        let mut by_code: FxHashMap<&str, usize> = FxHashMap::default();
        let mut groups: Vec<(String, Vec<StudentIndex>)> = Vec::new();

        for (position, student) in pool.iter().enumerate() {
            let group = *by_code
                .entry(student.subject_code.as_str())
                .or_insert_with(|| {
                    groups.push((student.subject_code.clone(), Vec::new()));
                    groups.len() - 1
                });
            groups[group].1.push(StudentIndex::new(position));
        }

        for (_, members) in &mut groups {
            members.shuffle(rng);
        }
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        Self {
            groups: groups
                .into_iter()
                .map(|(code, members)| SubjectGroup {
                    code,
                    members: members.into(),
                })
                .collect(),
        }
    }

    /// Returns the number of students still queued.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    /// Returns `true` if no students remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.members.is_empty())
    }

    /// Returns the number of subject groups (including drained ones).
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns the subject codes in group order.
    pub fn subject_codes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.code.as_str())
    }

    /// Runs one round-robin sweep: takes at most one student from each
    /// non-empty group, appending to `out` in group order.
    ///
    /// Returns the number of students taken; `0` means the queues are
    /// exhausted.
    pub fn sweep_into(&mut self, out: &mut Vec<StudentIndex>) -> usize {
        let mut taken = 0;
        for group in &mut self.groups {
            if let Some(student) = group.members.pop_front() {
                out.push(student);
                taken += 1;
            }
        }
        taken
    }

    /// Drains every remaining student in group order (first group front to
    /// back, then the next group, and so on).
    pub fn drain(&mut self) -> Vec<StudentIndex> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.members.drain(..))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn student(register: &str, subject: &str) -> Student {
        Student {
            register_number: register.to_owned(),
            student_name: String::new(),
            subject_code: subject.to_owned(),
            subject_name: String::new(),
        }
    }

    fn pool(subjects: &[&str]) -> Vec<Student> {
        subjects
            .iter()
            .enumerate()
            .map(|(i, s)| student(&format!("R{i}"), s))
            .collect()
    }

    #[test]
    fn test_groups_ordered_largest_first_stable_ties() {
        let p = pool(&["MA", "CS", "CS", "PH", "CS", "MA"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let q = SubjectQueues::build(&p, &mut rng);

        let codes: Vec<&str> = q.subject_codes().collect();
        // CS (3) first; MA (2) and PH (1) follow; MA first saw the pool
        // before PH and sizes differ, so the order is fully determined.
        assert_eq!(codes, vec!["CS", "MA", "PH"]);
        assert_eq!(q.len(), 6);
        assert_eq!(q.num_groups(), 3);
    }

    #[test]
    fn test_equal_sized_ties_keep_first_seen_order() {
        let p = pool(&["PH", "CS", "PH", "CS"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let q = SubjectQueues::build(&p, &mut rng);
        let codes: Vec<&str> = q.subject_codes().collect();
        assert_eq!(codes, vec!["PH", "CS"]);
    }

    #[test]
    fn test_sweep_takes_one_per_group() {
        let p = pool(&["CS", "CS", "MA", "PH"]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut q = SubjectQueues::build(&p, &mut rng);

        let mut out = Vec::new();
        assert_eq!(q.sweep_into(&mut out), 3);
        // One per subject, subjects distinct within a sweep.
        let subjects: Vec<&str> = out.iter().map(|s| p[s.get()].subject_code.as_str()).collect();
        assert_eq!(subjects, vec!["CS", "MA", "PH"]);

        assert_eq!(q.sweep_into(&mut out), 1);
        assert_eq!(q.sweep_into(&mut out), 0);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_sweeps_cover_pool_exactly_once() {
        let p = pool(&["CS", "CS", "MA", "MA", "PH", "CS"]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut q = SubjectQueues::build(&p, &mut rng);

        let mut out = Vec::new();
        while q.sweep_into(&mut out) > 0 {}

        let mut positions: Vec<usize> = out.iter().map(|s| s.get()).collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..p.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_drain_yields_group_order() {
        let p = pool(&["CS", "CS", "CS", "MA"]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut q = SubjectQueues::build(&p, &mut rng);

        let drained = q.drain();
        assert_eq!(drained.len(), 4);
        assert!(q.is_empty());
        // The last drained student is the sole MA member.
        assert_eq!(p[drained[3].get()].subject_code, "MA");
    }

    #[test]
    fn test_same_seed_same_order() {
        let p = pool(&["CS", "CS", "CS", "CS", "MA", "MA"]);
        let build = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut q = SubjectQueues::build(&p, &mut rng);
            q.drain()
        };
        assert_eq!(build(42), build(42));
    }

    #[test]
    fn test_empty_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut q = SubjectQueues::build(&[], &mut rng);
        assert!(q.is_empty());
        assert_eq!(q.num_groups(), 0);
        let mut out = Vec::new();
        assert_eq!(q.sweep_into(&mut out), 0);
    }
}
