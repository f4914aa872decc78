//! Element-move FM separator refinement
//!
//! A move takes an element bordering the separator to the other part; the parts of its nodes
//! follow from the parts of their elements. Two queues, one per destination part, order the
//! candidate elements by the separator load increase of their move. Moves are made even when
//! they do not pay off, up to a bound, and the pass is rolled back to its best prefix.

use crate::based::BasedVec;
use crate::defs::{Gnum, GraphPart, SEPARATE_BAL_DEFAULT};
use crate::error::Result;
use crate::pqueue::GnumQueue;
use crate::vgraph_separate_fm::FmBest;
use crate::vmesh::{vmesh_node_part, Vmesh};

#[derive(Clone, Debug, StratParams)]
pub struct VmeshSeparateFmParam {
    /// number of unprofitable moves in a row before a pass stops
    #[strat(name = "move")]
    pub movenbr: Gnum,
    #[strat(name = "pass")]
    pub passnbr: Gnum,
    /// allowed load imbalance, relative to the total node load
    #[strat(name = "bal")]
    pub deltrat: f64,
}

impl Default for VmeshSeparateFmParam {
    fn default() -> Self {
        Self { movenbr: 200, passnbr: 10, deltrat: SEPARATE_BAL_DEFAULT }
    }
}

/// Counts of part 0 and part 1 elements of every node
struct FmCounts {
    cnttax: BasedVec<[Gnum; 2]>,
}

impl FmCounts {
    fn fill(&mut self, meshptr: &Vmesh) {
        for n in meshptr.m.node_range() {
            let mut cnt = [0; 2];
            for &e in meshptr.m.neighbors(n) {
                cnt[meshptr.parttax[e] as usize] += 1;
            }
            self.cnttax[n] = cnt;
        }
    }

    /// Node load change of every part if element `e` changes part
    fn delta(&self, meshptr: &Vmesh, e: Gnum) -> [Gnum; 3] {
        let from = meshptr.parttax[e] as usize;
        let mut delta = [0; 3];
        for &n in meshptr.m.neighbors(e) {
            let mut cnt = self.cnttax[n];
            let before = vmesh_node_part(cnt);
            cnt[from] -= 1;
            cnt[1 - from] += 1;
            let after = vmesh_node_part(cnt);
            if before != after {
                let w = meshptr.m.vnlo(n);
                delta[before as usize] -= w;
                delta[after as usize] += w;
            }
        }
        delta
    }
}

/// Whether element `e` adjoins a separator node
fn fm_border(meshptr: &Vmesh, e: Gnum) -> bool {
    meshptr.m.neighbors(e).iter().any(|&n| meshptr.parttax[n] == 2)
}

/*************************************************************************/
/* Refine the separator of `meshptr` in place. Node parts are first made
   to follow element parts. */
/*************************************************************************/
pub fn vmesh_separate_fm(meshptr: &mut Vmesh, paraptr: &VmeshSeparateFmParam) -> Result<()> {
    let velmnbr = meshptr.m.velmnbr as usize;
    if velmnbr == 0 {
        return Ok(());
    }
    let velmbas = meshptr.m.velmbas;
    let maxdlt = ((paraptr.deltrat * meshptr.m.vnlosum as f64).ceil() as Gnum).max(1);

    meshptr.update_nodes();
    let mut counts = FmCounts {
        cnttax: BasedVec::try_from_elem(meshptr.m.vnodbas, [0; 2], meshptr.m.vnodnbr as usize)?,
    };
    let mut queues = [GnumQueue::new(velmnbr), GnumQueue::new(velmnbr)];
    let mut locktax = BasedVec::try_from_elem(velmbas, false, velmnbr)?;
    let mut undotab: Vec<(Gnum, GraphPart)> = Vec::new();

    for _ in 0..paraptr.passnbr.max(1) {
        counts.fill(meshptr);
        queues[0].reset();
        queues[1].reset();
        locktax.fill(false);
        undotab.clear();
        for e in meshptr.m.elem_range() {
            if fm_border(meshptr, e) {
                let to = 1 - meshptr.parttax[e] as usize;
                queues[to].insert((e - velmbas) as usize, counts.delta(meshptr, e)[2]);
            }
        }

        let mut best = FmBest { compload: meshptr.ncmpload, movenum: 0 };
        let mut failnbr = 0;
        loop {
            let dlt = meshptr.ncmpload[0] - meshptr.ncmpload[1];
            let mut pick: Option<(Gnum, [Gnum; 3], Gnum, Gnum)> = None;
            for queue in &queues {
                let (Some(idx), Some(key)) = (queue.see_top_val(), queue.see_top_key()) else {
                    continue;
                };
                let e = velmbas + idx as Gnum;
                let delta = counts.delta(meshptr, e);
                let dltnew = dlt + delta[0] - delta[1];
                if dltnew.abs() > maxdlt && dltnew.abs() >= dlt.abs() {
                    continue;
                }
                let better = match pick {
                    None => true,
                    Some((_, _, pkey, pdlt)) => (key, dltnew.abs()) < (pkey, pdlt.abs()),
                };
                if better {
                    pick = Some((e, delta, key, dltnew));
                }
            }
            let Some((e, delta, _, _)) = pick else {
                break;
            };

            let from = meshptr.parttax[e];
            let to = 1 - from;
            queues[to as usize].remove((e - velmbas) as usize);
            locktax[e] = true;
            undotab.push((e, from));
            meshptr.parttax[e] = to;
            for k in meshptr.m.adj(e) {
                let n = meshptr.m.edgetax[k];
                let cnt = &mut counts.cnttax[n];
                cnt[from as usize] -= 1;
                cnt[to as usize] += 1;
                meshptr.parttax[n] = vmesh_node_part(*cnt);
            }
            for i in 0..3 {
                meshptr.ncmpload[i] += delta[i];
            }
            meshptr.ncmploaddlt = meshptr.ncmpload[0] - meshptr.ncmpload[1];

            /* Elements around the moved one get new keys */
            for k in meshptr.m.adj(e) {
                let n = meshptr.m.edgetax[k];
                for l in meshptr.m.adj(n) {
                    let f = meshptr.m.edgetax[l];
                    if locktax[f] {
                        continue;
                    }
                    let fidx = (f - velmbas) as usize;
                    let fto = 1 - meshptr.parttax[f] as usize;
                    if fm_border(meshptr, f) {
                        queues[fto].upsert(fidx, counts.delta(meshptr, f)[2]);
                    } else if queues[fto].contains(fidx) {
                        queues[fto].remove(fidx);
                    }
                }
            }

            if best.improved_by(&meshptr.ncmpload, maxdlt) {
                best = FmBest { compload: meshptr.ncmpload, movenum: undotab.len() };
                failnbr = 0;
            } else {
                failnbr += 1;
                if failnbr > paraptr.movenbr {
                    break;
                }
            }
        }

        /* Roll back to the best prefix; node parts follow */
        while undotab.len() > best.movenum {
            if let Some((e, part)) = undotab.pop() {
                meshptr.parttax[e] = part;
            }
        }
        meshptr.update_nodes();
        if best.movenum == 0 {
            break;
        }
    }
    Ok(())
}
