use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

use super::{
    edit_graph::{Cell, Edit},
    nw::{SimpleLattice, NW},
    nw_affine::{AffineLattice, State, LAYERS},
    Aligner, Lattice, Seq,
};
use crate::{
    alignment::Alignment,
    error::{AlignError, SeqId},
    generate::setup_sequences,
    scoring::{AffineCost, LinearCost, Score, ScoringModel, SubstitutionMatrix, ALPH},
    to_string,
};

fn test_sequences(
) -> itertools::Product<std::slice::Iter<'static, usize>, std::slice::Iter<'static, f32>> {
    let ns = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 20, 30, 40];
    let es = &[0.0, 0.05, 0.10, 0.20, 0.30, 0.50, 1.0];
    ns.iter().cartesian_product(es)
}

/// At most this many alignments are checked per pair; highly tied pairs have exponentially many.
const MAX_CHECKED: usize = 2000;

fn tracks(alignments: impl IntoIterator<Item = Alignment>) -> Vec<(String, String)> {
    alignments
        .into_iter()
        .map(|a| (a.track1(), a.track2()))
        .collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|&(x, y)| (x.to_string(), y.to_string()))
        .collect()
}

/// Every alignment of `a` and `b`, optimal or not.
fn all_alignments(a: Seq, b: Seq) -> Vec<Alignment> {
    fn rec(a: Seq, b: Seq, i: usize, j: usize, path: &mut Vec<Edit>, out: &mut Vec<Alignment>) {
        if i == a.len() && j == b.len() {
            out.push(Alignment::new(path.clone()));
            return;
        }
        if i < a.len() && j < b.len() {
            path.push(Edit::Sub(a[i], b[j]));
            rec(a, b, i + 1, j + 1, path, out);
            path.pop();
        }
        if j < b.len() {
            path.push(Edit::Ins(b[j]));
            rec(a, b, i, j + 1, path, out);
            path.pop();
        }
        if i < a.len() {
            path.push(Edit::Del(a[i]));
            rec(a, b, i + 1, j, path, out);
            path.pop();
        }
    }
    let mut out = vec![];
    rec(a, b, 0, 0, &mut vec![], &mut out);
    out
}

/// The optimal score and the set of optimal alignments, by exhaustive search.
fn brute_force(a: Seq, b: Seq, cm: &impl ScoringModel) -> (Score, FxHashSet<Alignment>) {
    let scored = all_alignments(a, b)
        .into_iter()
        .map(|aln| (aln.score(cm).unwrap(), aln))
        .collect_vec();
    let best = scored.iter().map(|(s, _)| *s).max().unwrap();
    let optimal = scored
        .into_iter()
        .filter(|(s, _)| *s == best)
        .map(|(_, aln)| aln)
        .collect();
    (best, optimal)
}

fn random_seq(n: usize, rng: &mut impl Rng) -> Vec<u8> {
    (0..n).map(|_| ALPH[rng.gen_range(0..4)]).collect()
}

/// Checks the properties every emitted alignment must have:
/// - the tracks reconstruct the inputs,
/// - the alignment scores the optimum under the model,
/// - no alignment is emitted twice.
fn check_alignments(a: Seq, b: Seq, lattice: &impl Lattice, cm: &impl ScoringModel) -> usize {
    let score = lattice.score().unwrap();
    let mut seen = FxHashSet::default();
    for aln in lattice.alignments().take(MAX_CHECKED) {
        assert_eq!(aln.track1().replace('-', ""), to_string(a));
        assert_eq!(aln.track2().replace('-', ""), to_string(b));
        assert_eq!(
            aln.score(cm).unwrap(),
            score,
            "\na == {}\nb == {}\n{aln}",
            to_string(a),
            to_string(b)
        );
        assert!(seen.insert(aln), "duplicate alignment");
    }
    assert!(!seen.is_empty());
    seen.len()
}

/// Every incoming edge is tied-optimal, and every tied-optimal transition is an incoming edge.
fn check_simple_cells(a: Seq, b: Seq, lattice: &SimpleLattice, cm: &LinearCost) {
    for i in 0..=a.len() {
        for j in 0..=b.len() {
            let cell = lattice.cell(i, j);
            if i == 0 && j == 0 {
                assert_eq!(cell, &Cell::origin());
                continue;
            }
            let mut candidates = vec![];
            if i > 0 && j > 0 {
                let s = cm.sub.score(a[i - 1], b[j - 1]).unwrap();
                candidates.push((lattice.index(i - 1, j - 1), s));
            }
            if j > 0 {
                candidates.push((lattice.index(i, j - 1), cm.gap));
            }
            if i > 0 {
                candidates.push((lattice.index(i - 1, j), cm.gap));
            }
            let cells = lattice.cells();
            let values = candidates
                .iter()
                .map(|&(p, d)| cells[p].score.unwrap() + d)
                .collect_vec();
            let best = *values.iter().max().unwrap();
            assert_eq!(cell.score, Some(best));
            let expected = candidates
                .iter()
                .zip(&values)
                .filter(|(_, v)| **v == best)
                .map(|(&(p, _), _)| p)
                .collect_vec();
            assert_eq!(
                cell.incoming.iter().map(|e| e.parent).collect_vec(),
                expected
            );
        }
    }
}

mod simple {
    use super::*;

    fn align(a: &str, b: &str) -> (Option<Score>, Vec<(String, String)>) {
        align_with(a, b, &LinearCost::default())
    }

    fn align_with(a: &str, b: &str, cm: &LinearCost) -> (Option<Score>, Vec<(String, String)>) {
        let lattice = SimpleLattice::build(a.as_bytes(), b.as_bytes(), cm).unwrap();
        (lattice.score(), tracks(lattice.alignments()))
    }

    #[test]
    fn single_optimal_alignment() {
        let expected = pairs(&[("TACGATGA", "TCCGAT-A")]);
        assert_eq!(align("TACGATGA", "TCCGATA"), (Some(15), expected.clone()));

        // With a match score of 1 the same alignment scores 3.
        let cm = LinearCost::new(SubstitutionMatrix::match_mismatch(1, -1), -2);
        assert_eq!(align_with("TACGATGA", "TCCGATA", &cm), (Some(3), expected));
    }

    #[test]
    fn many_optimal_alignments() {
        let (score, alignments) = align("TCCGATA", "ACGACGA");
        assert_eq!(score, Some(6));
        assert_eq!(
            alignments,
            pairs(&[
                ("TCCGA-TA", "-ACGACGA"),
                ("TCCGA-TA", "A-CGACGA"),
                ("TCCGA-TA", "AC-GACGA"),
                ("TCCGAT-A", "-ACGACGA"),
                ("TCCGAT-A", "A-CGACGA"),
                ("TCCGAT-A", "AC-GACGA"),
            ])
        );
    }

    #[test]
    fn split_gaps_are_tied() {
        assert_eq!(
            align("ATGTGACGA", "ATACGA"),
            (
                Some(12),
                pairs(&[("ATGTGACGA", "A--T-ACGA"), ("ATGTGACGA", "AT---ACGA")])
            )
        );
    }

    #[test]
    fn gap_placement_ties() {
        let (score, alignments) = align("TTATT", "TT");
        assert_eq!(score, Some(0));
        assert_eq!(
            alignments.into_iter().map(|(_, b)| b).sorted().collect_vec(),
            vec!["---TT", "-T--T", "-T-T-", "T---T", "T--T-", "TT---"]
        );
    }

    #[test]
    fn empty_sequences() {
        assert_eq!(align("", ""), (Some(0), pairs(&[("", "")])));
        assert_eq!(align("", "ACGT"), (Some(-8), pairs(&[("----", "ACGT")])));
        assert_eq!(align("ACG", ""), (Some(-6), pairs(&[("ACG", "---")])));
    }

    #[test]
    fn invalid_symbol() {
        let cm = LinearCost::default();
        assert_eq!(
            NW::new(cm).score(b"ACGU", b"ACGT"),
            Err(AlignError::InvalidSymbol {
                seq: SeqId::First,
                pos: 3,
                symbol: 'U'
            })
        );
    }

    #[test]
    fn tied_optimal_edges() {
        let cm = LinearCost::default();
        for (&n, &e) in test_sequences() {
            let (ref a, ref b) = setup_sequences(n, e);
            let lattice = SimpleLattice::build(a, b, &cm).unwrap();
            check_simple_cells(a, b, &lattice, &cm);
        }
    }

    #[test]
    fn alignments_are_optimal_and_distinct() {
        let cm = LinearCost::default();
        for (&n, &e) in test_sequences() {
            let (ref a, ref b) = setup_sequences(n, e);
            let lattice = SimpleLattice::build(a, b, &cm).unwrap();
            check_alignments(a, b, &lattice, &cm);
        }
    }

    #[test]
    fn symmetric() {
        let aligner = NW::new(LinearCost::default());
        for (&n, &e) in test_sequences() {
            let (ref a, ref b) = setup_sequences(n, e);
            assert_eq!(aligner.score(a, b), aligner.score(b, a));
        }
    }

    #[test]
    fn matches_brute_force() {
        let cm = LinearCost::new(SubstitutionMatrix::match_mismatch(2, -1), -1);
        let rng = &mut ChaCha8Rng::seed_from_u64(2718);
        for _ in 0..300 {
            let a = random_seq(rng.gen_range(0..=6), rng);
            let b = random_seq(rng.gen_range(0..=6), rng);
            let lattice = SimpleLattice::build(&a, &b, &cm).unwrap();
            let (best, optimal) = brute_force(&a, &b, &cm);
            assert_eq!(lattice.score(), Some(best));
            assert_eq!(lattice.alignments().collect::<FxHashSet<_>>(), optimal);
        }
    }
}

mod affine {
    use super::*;

    fn align(a: &str, b: &str) -> (Option<Score>, Vec<(String, String)>) {
        let lattice =
            AffineLattice::build(a.as_bytes(), b.as_bytes(), &AffineCost::default()).unwrap();
        (lattice.score(), tracks(lattice.alignments()))
    }

    #[test]
    fn single_optimal_alignment() {
        assert_eq!(
            align("TACGATGA", "TCCGATA"),
            (Some(14), pairs(&[("TACGATGA", "TCCGAT-A")]))
        );
    }

    #[test]
    fn many_optimal_alignments() {
        let (score, alignments) = align("TCCGATA", "ACGACGA");
        assert_eq!(score, Some(4));
        assert_eq!(
            alignments.into_iter().sorted().collect_vec(),
            pairs(&[
                ("TCCGA-TA", "-ACGACGA"),
                ("TCCGA-TA", "A-CGACGA"),
                ("TCCGA-TA", "AC-GACGA"),
                ("TCCGAT-A", "-ACGACGA"),
                ("TCCGAT-A", "A-CGACGA"),
                ("TCCGAT-A", "AC-GACGA"),
            ])
        );
    }

    #[test]
    fn long_gap_is_not_split() {
        assert_eq!(
            align("ATGTGACGA", "ATACGA"),
            (Some(13), pairs(&[("ATGTGACGA", "AT---ACGA")]))
        );
    }

    #[test]
    fn single_gap_run() {
        let lattice = AffineLattice::build(b"TTATT", b"TT", &AffineCost::default()).unwrap();
        assert_eq!(lattice.score(), Some(1));
        let alignments = lattice.alignments().collect_vec();
        assert_eq!(
            alignments.iter().map(|a| a.track2()).sorted().collect_vec(),
            vec!["---TT", "T---T", "TT---"]
        );
        for aln in &alignments {
            assert_eq!(aln.gap_runs(), vec![3]);
        }
    }

    /// Optimal alignments ending in different layers are all reported.
    #[test]
    fn terminals_in_several_layers() {
        let lattice = AffineLattice::build(b"TTATT", b"TT", &AffineCost::default()).unwrap();
        assert_eq!(lattice.terminals().len(), 2);
        let last_edits = lattice
            .alignments()
            .map(|a| a.edits.last().copied())
            .collect_vec();
        assert_eq!(
            last_edits,
            vec![
                Some(Edit::Sub(b'T', b'T')),
                Some(Edit::Sub(b'T', b'T')),
                Some(Edit::Del(b'T'))
            ]
        );
    }

    #[test]
    fn empty_sequences() {
        assert_eq!(align("", ""), (Some(0), pairs(&[("", "")])));
        assert_eq!(align("", "ACGT"), (Some(-6), pairs(&[("----", "ACGT")])));
        assert_eq!(align("ACG", ""), (Some(-5), pairs(&[("ACG", "---")])));
    }

    #[test]
    fn fewer_alignments_than_simple() {
        let a = b"ATGTGACGA";
        let b = b"ATACGA";
        let simple = NW::new(LinearCost::default()).align(a, b).unwrap().1;
        let affine = NW::new(AffineCost::default()).align(a, b).unwrap().1;
        assert!(affine.len() < simple.len());
    }

    #[test]
    fn alignments_are_optimal_and_distinct() {
        let cm = AffineCost::default();
        for (&n, &e) in test_sequences() {
            let (ref a, ref b) = setup_sequences(n, e);
            let lattice = AffineLattice::build(a, b, &cm).unwrap();
            check_alignments(a, b, &lattice, &cm);
        }
    }

    #[test]
    fn symmetric() {
        let aligner = NW::new(AffineCost::default());
        for (&n, &e) in test_sequences() {
            let (ref a, ref b) = setup_sequences(n, e);
            assert_eq!(aligner.score(a, b), aligner.score(b, a));
        }
    }

    #[test]
    fn idempotent() {
        let (a, b) = setup_sequences(30, 0.3);
        let lattice = AffineLattice::build(&a, &b, &AffineCost::default()).unwrap();
        let first = lattice.alignments().take(MAX_CHECKED).collect_vec();
        let second = lattice.alignments().take(MAX_CHECKED).collect_vec();
        assert_eq!(first, second);
    }

    /// Reachable cells only have reachable parents, and unreachable cells have none.
    #[test]
    fn unreachable_states_have_no_edges() {
        let (a, b) = setup_sequences(15, 0.3);
        let lattice = AffineLattice::build(&a, &b, &AffineCost::default()).unwrap();
        let cells = lattice.cells();
        for i in 0..=a.len() {
            for j in 0..=b.len() {
                for layer in LAYERS {
                    let cell = lattice.cell(State::new(i, j, layer));
                    if cell.is_reachable() {
                        assert!(cell.incoming.iter().all(|e| cells[e.parent].is_reachable()));
                    } else {
                        assert!(cell.incoming.is_empty());
                    }
                }
            }
        }
    }

    /// Exhaustive check of the score and the exact set of optimal alignments,
    /// including the first diagonal step out of the origin.
    #[test]
    fn matches_brute_force() {
        let models = [
            AffineCost::default(),
            AffineCost::new(SubstitutionMatrix::match_mismatch(1, -1), -5, -1),
            AffineCost::new(SubstitutionMatrix::match_mismatch(2, -3), -1, -2),
            // Open bonus: gaps prefer being split.
            AffineCost::new(SubstitutionMatrix::match_mismatch(3, -1), 1, -2),
        ];
        let rng = &mut ChaCha8Rng::seed_from_u64(31415);
        for cm in &models {
            for _ in 0..200 {
                let a = random_seq(rng.gen_range(0..=6), rng);
                let b = random_seq(rng.gen_range(0..=6), rng);
                let lattice = AffineLattice::build(&a, &b, cm).unwrap();
                let (best, optimal) = brute_force(&a, &b, cm);
                assert_eq!(
                    lattice.score(),
                    Some(best),
                    "\na == {}\nb == {}",
                    to_string(&a),
                    to_string(&b)
                );
                let found = lattice.alignments().collect_vec();
                assert_eq!(found.len(), optimal.len());
                assert_eq!(found.into_iter().collect::<FxHashSet<_>>(), optimal);
            }
        }
    }
}
