//! Vertex FM separator refinement
//!
//! A move takes a separator vertex into part 0 or part 1 and pulls its neighbors of the other
//! part into the separator. Two queues, one per destination part, order the separator vertices
//! by the separator load increase of their move. Moves are made even when they do not pay off,
//! up to a bound, and the pass is rolled back to its best prefix.

use crate::based::BasedVec;
use crate::defs::{Gnum, GraphPart, SEPARATE_BAL_DEFAULT};
use crate::error::Result;
use crate::pqueue::GnumQueue;
use crate::vgraph::Vgraph;

#[derive(Clone, Debug, StratParams)]
pub struct VgraphSeparateFmParam {
    /// number of unprofitable moves in a row before a pass stops
    #[strat(name = "move")]
    pub movenbr: Gnum,
    /// maximum number of passes
    #[strat(name = "pass")]
    pub passnbr: Gnum,
    /// allowed load imbalance, relative to the total load
    #[strat(name = "bal")]
    pub deltrat: f64,
}

impl Default for VgraphSeparateFmParam {
    fn default() -> Self {
        Self { movenbr: 200, passnbr: 10, deltrat: SEPARATE_BAL_DEFAULT }
    }
}

/// Separator load increase when separator vertex `v` moves to part `to`
fn fm_key(grafptr: &Vgraph, v: Gnum, to: GraphPart) -> Gnum {
    let s = &grafptr.s;
    let other = 1 - to;
    let load: Gnum =
        s.neighbors(v).iter().filter(|&&u| grafptr.parttax[u] == other).map(|&u| s.velo(u)).sum();
    load - s.velo(v)
}

/// State of the best prefix of a pass
#[derive(Clone, Copy)]
pub(crate) struct FmBest {
    pub compload: [Gnum; 3],
    pub movenum: usize,
}

impl FmBest {
    fn dlt(&self) -> Gnum {
        (self.compload[0] - self.compload[1]).abs()
    }

    /// Whether `compload` is a better state than `self` under balance bound `maxdlt`
    pub fn improved_by(&self, compload: &[Gnum; 3], maxdlt: Gnum) -> bool {
        let dlt = (compload[0] - compload[1]).abs();
        if self.dlt() > maxdlt {
            return dlt < self.dlt();
        }
        dlt <= maxdlt && (compload[2], dlt) < (self.compload[2], self.dlt())
    }
}

/*************************************************************************/
/* Refine the separator of `grafptr` in place */
/*************************************************************************/
pub fn vgraph_separate_fm(grafptr: &mut Vgraph, paraptr: &VgraphSeparateFmParam) -> Result<()> {
    let vertnbr = grafptr.s.vertnbr as usize;
    if vertnbr == 0 {
        return Ok(());
    }
    let baseval = grafptr.s.baseval;
    let maxdlt = ((paraptr.deltrat * grafptr.s.velosum as f64).ceil() as Gnum).max(1);

    let mut queues = [GnumQueue::new(vertnbr), GnumQueue::new(vertnbr)];
    let mut locktax = BasedVec::try_from_elem(baseval, false, vertnbr)?;
    let mut undotab: Vec<(Gnum, GraphPart)> = Vec::new();
    let mut changed: Vec<Gnum> = Vec::new();

    for _ in 0..paraptr.passnbr.max(1) {
        queues[0].reset();
        queues[1].reset();
        locktax.fill(false);
        undotab.clear();
        for &v in &grafptr.frontab {
            let idx = (v - baseval) as usize;
            queues[0].insert(idx, fm_key(grafptr, v, 0));
            queues[1].insert(idx, fm_key(grafptr, v, 1));
        }

        let mut best = FmBest { compload: grafptr.compload, movenum: 0 };
        let mut failnbr = 0;
        loop {
            /* Pick the cheapest acceptable move */
            let dlt = grafptr.compload[0] - grafptr.compload[1];
            let mut pick: Option<(Gnum, GraphPart, Gnum, Gnum)> = None;
            for to in 0..2u8 {
                let queue = &queues[to as usize];
                let (Some(idx), Some(key)) = (queue.see_top_val(), queue.see_top_key()) else {
                    continue;
                };
                let v = baseval + idx as Gnum;
                let velo = grafptr.s.velo(v);
                let diff = 2 * velo + key;
                let dltnew = if to == 0 { dlt + diff } else { dlt - diff };
                if dltnew.abs() > maxdlt && dltnew.abs() >= dlt.abs() {
                    continue;
                }
                let better = match pick {
                    None => true,
                    Some((_, _, pkey, pdlt)) => (key, dltnew.abs()) < (pkey, pdlt.abs()),
                };
                if better {
                    pick = Some((v, to, key, dltnew));
                }
            }
            let Some((v, to, _, _)) = pick else {
                break;
            };

            /* Move v and pull its neighbors of the other part into the separator */
            let other = 1 - to;
            let idx = (v - baseval) as usize;
            queues[0].remove(idx);
            queues[1].remove(idx);
            locktax[v] = true;
            undotab.push((v, 2));
            let velo = grafptr.s.velo(v);
            grafptr.parttax[v] = to;
            grafptr.compload[to as usize] += velo;
            grafptr.compload[2] -= velo;
            changed.clear();
            changed.push(v);
            for e in grafptr.s.adj(v) {
                let u = grafptr.s.edgetax[e];
                if grafptr.parttax[u] != other {
                    continue;
                }
                undotab.push((u, other));
                grafptr.parttax[u] = 2;
                let uvelo = grafptr.s.velo(u);
                grafptr.compload[other as usize] -= uvelo;
                grafptr.compload[2] += uvelo;
                changed.push(u);
                if !locktax[u] {
                    let uidx = (u - baseval) as usize;
                    queues[0].insert(uidx, fm_key(grafptr, u, 0));
                    queues[1].insert(uidx, fm_key(grafptr, u, 1));
                }
            }

            /* Separator neighbors of changed vertices get new keys */
            for &x in &changed {
                for e in grafptr.s.adj(x) {
                    let w = grafptr.s.edgetax[e];
                    let widx = (w - baseval) as usize;
                    if grafptr.parttax[w] == 2 && queues[0].contains(widx) {
                        queues[0].update(widx, fm_key(grafptr, w, 0));
                        queues[1].update(widx, fm_key(grafptr, w, 1));
                    }
                }
            }
            grafptr.comploaddlt = grafptr.compload[0] - grafptr.compload[1];

            if best.improved_by(&grafptr.compload, maxdlt) {
                best = FmBest { compload: grafptr.compload, movenum: undotab.len() };
                failnbr = 0;
            } else {
                failnbr += 1;
                if failnbr > paraptr.movenbr {
                    break;
                }
            }
        }

        /* Roll back to the best prefix */
        while undotab.len() > best.movenum {
            if let Some((x, part)) = undotab.pop() {
                grafptr.parttax[x] = part;
            }
        }
        grafptr.compload = best.compload;
        grafptr.comploaddlt = best.compload[0] - best.compload[1];
        grafptr.update();
        if best.movenum == 0 {
            break;
        }
    }
    Ok(())
}
