use anyhow::{bail, Result};
use std::fmt;

/// Longest query (contig) the aligner accepts.
pub const MAX_QUERY_LEN: usize = 2000;
/// Longest reference region the aligner accepts.
pub const MAX_REF_LEN: usize = 5000;

const NEG_INF: i32 = -300_000_000;

const DIR_NONE: u8 = 0;
const DIR_UP: u8 = 1;
const DIR_DIAG: u8 = 2;
const DIR_LEFT: u8 = 3;

/// Alignment scoring parameters (affine gaps: a run of g gap bases costs
/// `gap_open` once plus `gap_extend` per extension).
#[derive(Debug, Clone, Copy)]
pub struct Scoring {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring {
            match_score: 8,
            mismatch_penalty: -32,
            gap_open: -48,
            gap_extend: -1,
        }
    }
}

/// Result of one semi-global alignment. `ref_start..=ref_end` is the
/// 1-based inclusive reference span consumed by the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub best_score: i32,
    pub second_best_score: i32,
    pub ref_start: usize,
    pub ref_end: usize,
    pub cigar: String,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.best_score, self.second_best_score, self.ref_start, self.ref_end, self.cigar
        )
    }
}

/// Three-level dynamic program: M (match/mismatch), I (insertion in the
/// query), D (deletion in the query), each with its own backtrace plane.
struct Matrices {
    cols: usize,
    m: Vec<i32>,
    i: Vec<i32>,
    d: Vec<i32>,
    bt_m: Vec<u8>,
    bt_i: Vec<u8>,
    bt_d: Vec<u8>,
}

impl Matrices {
    fn new(rows: usize, cols: usize) -> Self {
        let size = rows * cols;
        Matrices {
            cols,
            m: vec![0; size],
            i: vec![0; size],
            d: vec![0; size],
            bt_m: vec![DIR_NONE; size],
            bt_i: vec![DIR_NONE; size],
            bt_d: vec![DIR_NONE; size],
        }
    }

    #[inline]
    fn at(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }
}

/// Align `query` end-to-end against `reference` with free leading and
/// trailing reference gaps.
///
/// Tie-breaks are fixed: gap extension beats gap opening, match/mismatch
/// beats closing an insertion, which beats closing a deletion.
pub fn align(query: &[u8], reference: &[u8], scoring: &Scoring) -> Result<Alignment> {
    if query.is_empty() || reference.is_empty() {
        bail!("Cannot align empty sequences");
    }
    if query.len() > MAX_QUERY_LEN {
        bail!("Query length {} exceeds {}", query.len(), MAX_QUERY_LEN);
    }
    if reference.len() > MAX_REF_LEN {
        bail!(
            "Reference length {} exceeds {}",
            reference.len(),
            MAX_REF_LEN
        );
    }

    let mut mat = Matrices::new(query.len() + 1, reference.len() + 1);
    populate(query, reference, scoring, &mut mat);
    Ok(backtrack(query.len(), reference.len(), &mat))
}

fn populate(query: &[u8], reference: &[u8], scoring: &Scoring, mat: &mut Matrices) {
    let rows = query.len();
    let cols = reference.len();

    // Query must be fully consumed: column 0 pays for leading query bases
    for r in 1..=rows {
        let penalty = scoring.gap_open + r as i32 * scoring.gap_extend;
        let idx = mat.at(r, 0);
        mat.i[idx] = penalty;
        mat.m[idx] = penalty;
        mat.d[idx] = penalty;
    }

    // Leading reference gap is free on the M level
    for c in 0..=cols {
        let penalty = scoring.gap_open + c as i32 * scoring.gap_extend;
        let idx = mat.at(0, c);
        mat.i[idx] = penalty;
        mat.m[idx] = 0;
        mat.d[idx] = penalty;
    }

    for r in 1..=rows {
        for c in 1..=cols {
            let idx = mat.at(r, c);
            let up = mat.at(r - 1, c);
            let left = mat.at(r, c - 1);
            let diag = mat.at(r - 1, c - 1);

            // Insertion level
            let insert_ext = mat.i[up] + scoring.gap_extend;
            let insert_open = mat.m[up] + scoring.gap_open;
            if insert_ext >= insert_open {
                mat.i[idx] = insert_ext;
                mat.bt_i[idx] = DIR_UP;
            } else {
                mat.i[idx] = insert_open;
                mat.bt_i[idx] = DIR_DIAG;
            }

            // Deletion level
            let delete_ext = mat.d[left] + scoring.gap_extend;
            let delete_open = mat.m[left] + scoring.gap_open;
            if delete_ext >= delete_open {
                mat.d[idx] = delete_ext;
                mat.bt_d[idx] = DIR_LEFT;
            } else {
                mat.d[idx] = delete_open;
                mat.bt_d[idx] = DIR_DIAG;
            }

            // Match/mismatch level
            let step = if query[r - 1] == reference[c - 1] {
                scoring.match_score
            } else {
                scoring.mismatch_penalty
            };
            let base_match = mat.m[diag] + step;
            let insert_close = mat.i[idx];
            let delete_close = mat.d[idx];
            if base_match >= insert_close && base_match >= delete_close {
                mat.m[idx] = base_match;
                mat.bt_m[idx] = DIR_DIAG;
            } else if insert_close >= delete_close {
                mat.m[idx] = insert_close;
                mat.bt_m[idx] = DIR_UP;
            } else {
                mat.m[idx] = delete_close;
                mat.bt_m[idx] = DIR_LEFT;
            }
        }
    }
}

#[derive(Clone, Copy)]
struct CigarElem {
    op: u8,
    len: usize,
}

fn push_op(op: u8, elems: &mut Vec<CigarElem>) {
    match elems.last_mut() {
        Some(last) if last.op == op => last.len += 1,
        _ => elems.push(CigarElem { op, len: 1 }),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Level {
    M,
    I,
    D,
}

fn backtrack(rows: usize, cols: usize, mat: &Matrices) -> Alignment {
    // Best endpoint along the final M row; the runner-up register is not
    // demoted when a new best is found, matching the scan the realigner
    // tunes against
    let mut best_col = 0usize;
    let mut best_score = NEG_INF;
    let mut second_best_score = NEG_INF;
    for c in 1..=cols {
        let score = mat.m[mat.at(rows, c)];
        if score > best_score {
            best_col = c;
            best_score = score;
        } else if score > second_best_score {
            second_best_score = score;
        }
    }

    let mut r = rows;
    let mut c = best_col;
    let ref_end = c;
    let mut level = Level::M;
    let mut elems: Vec<CigarElem> = Vec::new();

    while r > 0 && c > 0 {
        let dir = match level {
            Level::M => mat.bt_m[mat.at(r, c)],
            Level::I => mat.bt_i[mat.at(r, c)],
            Level::D => mat.bt_d[mat.at(r, c)],
        };
        match dir {
            DIR_DIAG => {
                match level {
                    Level::M => {
                        r -= 1;
                        c -= 1;
                        push_op(b'M', &mut elems);
                    }
                    // Closing a gap consumes nothing further
                    Level::I => r -= 1,
                    Level::D => c -= 1,
                }
                level = Level::M;
            }
            DIR_LEFT => {
                if level == Level::D {
                    c -= 1;
                }
                level = Level::D;
                push_op(b'D', &mut elems);
            }
            DIR_UP => {
                if level == Level::I {
                    r -= 1;
                }
                level = Level::I;
                push_op(b'I', &mut elems);
            }
            _ => break,
        }
    }

    let mut cigar = String::with_capacity(elems.len() * 4);
    for elem in elems.iter().rev() {
        cigar.push_str(&elem.len.to_string());
        cigar.push(elem.op as char);
    }

    Alignment {
        best_score,
        second_best_score,
        ref_start: c + 1,
        ref_end,
        cigar,
    }
}
