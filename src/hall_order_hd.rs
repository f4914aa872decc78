//! Halo minimum degree and minimum fill elimination
//!
//! The elimination works on a quotient graph made of variables and elements. Eliminating a
//! variable turns it into an element whose variables are the reach of the pivot; elements
//! adjacent to the pivot are absorbed by the new element. Halo variables take part in degree
//! computations but are never eliminated. Indistinguishable non-halo variables are merged into
//! supervariables.
//!
//! The result describes an elimination forest: every eliminated principal variable points to the
//! pivot whose element absorbed its own, and every merged variable points to the variable it was
//! merged into.

use std::collections::HashMap;

use crate::defs::Gnum;
use crate::error::{inconsistent, Result};
use crate::pqueue::GnumQueue;

/// Score minimized by the pivot choice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HallScore {
    /// external degree
    Degree,
    /// approximate number of fill entries
    Fill,
}

/// Quotient graph before elimination
///
/// Variables are numbered from 0, non-halo variables first; elements are numbered after the
/// variables.
#[derive(Clone, Debug, Default)]
pub struct HallGraph {
    pub vnohnbr: usize,
    /// variable neighbors of every variable, halo ones included
    pub vartab: Vec<Vec<usize>>,
    /// variables of every initial element
    pub elmtab: Vec<Vec<usize>>,
}

/// Raw elimination forest of the non-halo variables
#[derive(Clone, Debug, Default)]
pub struct HallOrder {
    /// supervariable weight of principal variables, 0 for merged ones
    pub nvtab: Vec<Gnum>,
    /// father of every variable, -1 for roots
    pub fathtab: Vec<Gnum>,
    /// weighted size of the reach of principal variables when eliminated
    pub degrtab: Vec<Gnum>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HallState {
    Var,
    /// merged into another variable
    Secondary,
    Elem,
    /// absorbed element
    Dead,
}

struct HallWork {
    vnohnbr: usize,
    varnbr: usize,
    statab: Vec<HallState>,
    nvtab: Vec<Gnum>,
    fathtab: Vec<Gnum>,
    degrtab: Vec<Gnum>,
    /// variables adjacent to a variable, or variables of an element
    adjtab: Vec<Vec<usize>>,
    /// elements adjacent to a variable
    elmtab: Vec<Vec<usize>>,
    marktab: Vec<usize>,
    markval: usize,
}

impl HallWork {
    fn new(graph: HallGraph) -> Self {
        let varnbr = graph.vartab.len();
        let nodenbr = varnbr + graph.elmtab.len();
        let mut elmtab = vec![Vec::new(); nodenbr];
        for (k, vars) in graph.elmtab.iter().enumerate() {
            for &v in vars {
                elmtab[v].push(varnbr + k);
            }
        }
        let mut adjtab = graph.vartab;
        adjtab.extend(graph.elmtab);
        let mut statab = vec![HallState::Var; varnbr];
        statab.resize(nodenbr, HallState::Elem);
        Self {
            vnohnbr: graph.vnohnbr,
            varnbr,
            statab,
            nvtab: vec![1; nodenbr],
            fathtab: vec![-1; nodenbr],
            degrtab: vec![0; nodenbr],
            adjtab,
            elmtab,
            marktab: vec![0; nodenbr],
            markval: 0,
        }
    }

    fn new_mark(&mut self) -> usize {
        self.markval += 1;
        self.markval
    }

    /// Weighted size of the reach of variable `i`, `i` excluded
    fn reach(&mut self, i: usize) -> Gnum {
        let mark = self.new_mark();
        self.marktab[i] = mark;
        let mut degr = 0;
        for &j in &self.adjtab[i] {
            if self.statab[j] == HallState::Var && self.marktab[j] != mark {
                self.marktab[j] = mark;
                degr += self.nvtab[j];
            }
        }
        for &e in &self.elmtab[i] {
            if self.statab[e] != HallState::Elem {
                continue;
            }
            for &j in &self.adjtab[e] {
                if self.statab[j] == HallState::Var && self.marktab[j] != mark {
                    self.marktab[j] = mark;
                    degr += self.nvtab[j];
                }
            }
        }
        degr
    }

    fn score(&self, kind: HallScore, degr: Gnum, cdeg: Gnum) -> Gnum {
        match kind {
            HallScore::Degree => degr,
            HallScore::Fill => degr * (degr - 1) / 2 - cdeg * (cdeg - 1).max(0) / 2,
        }
    }

    /// Mark `e` as absorbed by pivot `p`
    fn absorb(&mut self, e: usize, p: usize) {
        self.statab[e] = HallState::Dead;
        if e < self.varnbr {
            self.fathtab[e] = p as Gnum;
        }
    }

    /*************************************************************************/
    /* Eliminate pivot `p` and update the variables of its new element */
    /*************************************************************************/
    fn eliminate(&mut self, p: usize, kind: HallScore, queue: &mut GnumQueue) {
        let mark = self.new_mark();
        self.marktab[p] = mark;

        let mut lp = Vec::new();
        for &j in &self.adjtab[p] {
            if self.statab[j] == HallState::Var && self.marktab[j] != mark {
                self.marktab[j] = mark;
                lp.push(j);
            }
        }
        let elmlist: Vec<usize> =
            self.elmtab[p].iter().copied().filter(|&e| self.statab[e] == HallState::Elem).collect();
        for &e in &elmlist {
            for &j in &self.adjtab[e] {
                if self.statab[j] == HallState::Var && self.marktab[j] != mark {
                    self.marktab[j] = mark;
                    lp.push(j);
                }
            }
            self.absorb(e, p);
        }
        self.statab[p] = HallState::Elem;
        self.degrtab[p] = lp.iter().map(|&j| self.nvtab[j]).sum();
        self.adjtab[p] = lp.clone();
        self.elmtab[p].clear();

        /* Prune covered variables and dead elements */
        for &i in &lp {
            let (statab, marktab) = (&self.statab, &self.marktab);
            self.elmtab[i].retain(|&e| statab[e] == HallState::Elem && e != p);
            self.adjtab[i].retain(|&j| statab[j] == HallState::Var && marktab[j] != mark);
        }

        /* Aggressive absorption of elements covered by the new one */
        for &i in &lp {
            for k in 0..self.elmtab[i].len() {
                let e = self.elmtab[i][k];
                if self.statab[e] != HallState::Elem || self.marktab[e] == mark {
                    continue;
                }
                self.marktab[e] = mark;
                let covered = self.adjtab[e]
                    .iter()
                    .all(|&j| self.statab[j] != HallState::Var || self.marktab[j] == mark);
                if covered {
                    self.absorb(e, p);
                }
            }
        }
        for &i in &lp {
            let statab = &self.statab;
            self.elmtab[i].retain(|&e| statab[e] == HallState::Elem);
            self.elmtab[i].push(p);
        }

        /* Merge indistinguishable non-halo variables */
        let mut keytab: HashMap<(Vec<usize>, Vec<usize>), usize> = HashMap::new();
        for &i in &lp {
            if i >= self.vnohnbr {
                continue;
            }
            self.elmtab[i].sort_unstable();
            self.adjtab[i].sort_unstable();
            let key = (self.elmtab[i].clone(), self.adjtab[i].clone());
            match keytab.get(&key) {
                Some(&j) => {
                    self.nvtab[j] += self.nvtab[i];
                    self.nvtab[i] = 0;
                    self.fathtab[i] = j as Gnum;
                    self.statab[i] = HallState::Secondary;
                    queue.remove(i);
                }
                None => {
                    keytab.insert(key, i);
                }
            }
        }

        /* New scores */
        let lpsize = self.degrtab[p];
        for &i in &lp {
            if i >= self.vnohnbr || self.statab[i] != HallState::Var {
                continue;
            }
            let degr = self.reach(i);
            let score = self.score(kind, degr, lpsize - self.nvtab[i]);
            queue.upsert(i, score);
        }
    }
}

/*************************************************************************/
/* Order the non-halo variables of `graph` by minimum degree or minimum
   fill elimination */
/*************************************************************************/
pub fn hall_order_hd(graph: HallGraph, kind: HallScore) -> Result<HallOrder> {
    let vnohnbr = graph.vnohnbr;
    if vnohnbr > graph.vartab.len() {
        inconsistent!("{vnohnbr} non-halo variables out of {}", graph.vartab.len());
    }
    let mut work = HallWork::new(graph);
    let mut queue = GnumQueue::new(vnohnbr);
    for i in 0..vnohnbr {
        let degr = work.reach(i);
        let score = work.score(kind, degr, 0);
        queue.insert(i, score);
    }
    let mut elimnbr = 0;
    while let Some(p) = queue.get_top() {
        work.eliminate(p, kind, &mut queue);
        elimnbr += 1;
    }

    let principals = work.nvtab[..vnohnbr].iter().filter(|&&nv| nv > 0).count();
    if principals != elimnbr
        || work.statab[..vnohnbr].iter().any(|&s| s == HallState::Var)
        || work.nvtab[..vnohnbr].iter().sum::<Gnum>() != vnohnbr as Gnum
    {
        inconsistent!("elimination left {vnohnbr} variables in an invalid state");
    }

    work.nvtab.truncate(vnohnbr);
    work.fathtab.truncate(vnohnbr);
    work.degrtab.truncate(vnohnbr);
    Ok(HallOrder { nvtab: work.nvtab, fathtab: work.fathtab, degrtab: work.degrtab })
}
