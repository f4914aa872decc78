//! Greedy mesh growing separation
//!
//! Part 1 is grown element by element from a random seed element. The element of part 0 whose
//! move least increases the separator load is moved first; a node leaves part 0 for the
//! separator when one of its elements moves, and joins part 1 when its last element of part 0
//! moves. Growing stops when the next move would worsen the node load balance.

use fastrand::Rng;

use crate::based::BasedVec;
use crate::defs::{Gnum, RANDOM_SEED};
use crate::error::Result;
use crate::pqueue::GnumQueue;
use crate::vmesh::{Vmesh, VmeshStore};

#[derive(Clone, Debug, StratParams)]
pub struct VmeshSeparateGgParam {
    /// number of growing passes
    #[strat(name = "pass")]
    pub passnbr: Gnum,
}

impl Default for VmeshSeparateGgParam {
    fn default() -> Self {
        Self { passnbr: 5 }
    }
}

/// Node loads of all parts after element `e` of part 0 moves to part 1
///
/// `ncnttax` counts the part 0 elements of every node.
fn gg_move_loads(meshptr: &Vmesh, ncnttax: &BasedVec<Gnum>, e: Gnum) -> [Gnum; 3] {
    let mut load = meshptr.ncmpload;
    for &n in meshptr.m.neighbors(e) {
        let w = meshptr.m.vnlo(n);
        match (meshptr.parttax[n], ncnttax[n]) {
            (0, 1) => {
                load[0] -= w;
                load[1] += w;
            }
            (0, _) => {
                load[0] -= w;
                load[2] += w;
            }
            (2, 1) => {
                load[2] -= w;
                load[1] += w;
            }
            _ => {}
        }
    }
    load
}

fn gg_key(meshptr: &Vmesh, ncnttax: &BasedVec<Gnum>, e: Gnum) -> Gnum {
    gg_move_loads(meshptr, ncnttax, e)[2] - meshptr.ncmpload[2]
}

fn gg_seed(meshptr: &Vmesh, rng: &mut Rng) -> Option<Gnum> {
    let m = &meshptr.m;
    let start = rng.i64(0..m.velmnbr);
    (0..m.velmnbr)
        .map(|i| m.velmbas + (start + i) % m.velmnbr)
        .find(|&e| meshptr.parttax[e] == 0)
}

fn gg_pass(
    meshptr: &mut Vmesh,
    ncnttax: &mut BasedVec<Gnum>,
    queue: &mut GnumQueue,
    rng: &mut Rng,
) {
    let velmbas = meshptr.m.velmbas;
    meshptr.zero();
    for n in meshptr.m.node_range() {
        ncnttax[n] = meshptr.m.degree(n);
    }
    queue.reset();

    loop {
        let e = match queue.get_top() {
            Some(i) => velmbas + i as Gnum,
            None => match gg_seed(meshptr, rng) {
                Some(e) => e,
                None => break,
            },
        };
        let load = gg_move_loads(meshptr, ncnttax, e);
        let dltnew = load[0] - load[1];
        if dltnew.abs() > meshptr.ncmploaddlt.abs() {
            break;
        }

        meshptr.parttax[e] = 1;
        meshptr.ncmpload = load;
        meshptr.ncmploaddlt = dltnew;
        for k in meshptr.m.adj(e) {
            let n = meshptr.m.edgetax[k];
            ncnttax[n] -= 1;
            meshptr.parttax[n] = if ncnttax[n] == 0 { 1 } else { 2 };
        }
        for k in meshptr.m.adj(e) {
            let n = meshptr.m.edgetax[k];
            for l in meshptr.m.adj(n) {
                let f = meshptr.m.edgetax[l];
                if meshptr.parttax[f] == 0 {
                    queue.upsert((f - velmbas) as usize, gg_key(meshptr, ncnttax, f));
                }
            }
        }
    }
    meshptr.update();
}

pub fn vmesh_separate_gg(meshptr: &mut Vmesh, paraptr: &VmeshSeparateGgParam) -> Result<()> {
    if meshptr.m.velmnbr == 0 {
        return Ok(());
    }
    let mut rng = Rng::with_seed(RANDOM_SEED ^ meshptr.levlnum as u64);
    let mut queue = GnumQueue::new(meshptr.m.velmnbr as usize);
    let mut ncnttax = BasedVec::try_from_elem(meshptr.m.vnodbas, 0, meshptr.m.vnodnbr as usize)?;
    let mut best: Option<VmeshStore> = None;
    for _ in 0..paraptr.passnbr.max(1) {
        gg_pass(meshptr, &mut ncnttax, &mut queue, &mut rng);
        if best.as_ref().map_or(true, |b| meshptr.quality() < b.quality()) {
            best = Some(meshptr.store());
        }
    }
    if let Some(best) = best {
        meshptr.restore(&best);
    }
    Ok(())
}
