//! Greedy graph growing separation
//!
//! Part 1 is grown from a random seed vertex. At every step the separator vertex whose move to
//! part 1 least increases the separator load is moved, and its part 0 neighbors join the
//! separator. Growing stops when the next move would worsen the balance. The best of several
//! passes, each from its own seed, is kept.

use fastrand::Rng;

use crate::defs::{Gnum, RANDOM_SEED};
use crate::error::Result;
use crate::pqueue::GnumQueue;
use crate::vgraph::{Vgraph, VgraphStore};

#[derive(Clone, Debug, StratParams)]
pub struct VgraphSeparateGgParam {
    /// number of growing passes
    #[strat(name = "pass")]
    pub passnbr: Gnum,
}

impl Default for VgraphSeparateGgParam {
    fn default() -> Self {
        Self { passnbr: 5 }
    }
}

/// Increase of the separator load if separator vertex `v` moves to part 1
fn gg_key(grafptr: &Vgraph, v: Gnum) -> Gnum {
    let s = &grafptr.s;
    let load: Gnum =
        s.neighbors(v).iter().filter(|&&u| grafptr.parttax[u] == 0).map(|&u| s.velo(u)).sum();
    load - s.velo(v)
}

/// Random vertex of part 0, if any
fn gg_seed(grafptr: &Vgraph, rng: &mut Rng) -> Option<Gnum> {
    let s = &grafptr.s;
    let start = rng.i64(0..s.vertnbr);
    (0..s.vertnbr)
        .map(|i| s.baseval + (start + i) % s.vertnbr)
        .find(|&v| grafptr.parttax[v] == 0)
}

fn gg_pass(grafptr: &mut Vgraph, queue: &mut GnumQueue, rng: &mut Rng) {
    let baseval = grafptr.s.baseval;
    grafptr.zero();
    queue.reset();

    loop {
        let v = match queue.get_top() {
            Some(i) => baseval + i as Gnum,
            None => {
                let Some(seed) = gg_seed(grafptr, rng) else {
                    break;
                };
                let velo = grafptr.s.velo(seed);
                grafptr.parttax[seed] = 2;
                grafptr.compload[0] -= velo;
                grafptr.compload[2] += velo;
                grafptr.comploaddlt -= velo;
                seed
            }
        };

        let velo = grafptr.s.velo(v);
        let movload = gg_key(grafptr, v) + velo;
        let dltnew = grafptr.comploaddlt - movload - velo;
        if dltnew.abs() > grafptr.comploaddlt.abs() {
            break;
        }

        grafptr.parttax[v] = 1;
        grafptr.compload[1] += velo;
        grafptr.compload[2] -= velo;
        grafptr.compload[0] -= movload;
        grafptr.compload[2] += movload;
        grafptr.comploaddlt = dltnew;
        for e in grafptr.s.adj(v) {
            let u = grafptr.s.edgetax[e];
            if grafptr.parttax[u] != 0 {
                continue;
            }
            grafptr.parttax[u] = 2;
            let key = gg_key(grafptr, u);
            queue.insert((u - baseval) as usize, key);
            let uvelo = grafptr.s.velo(u);
            for f in grafptr.s.adj(u) {
                let w = grafptr.s.edgetax[f];
                let w_idx = (w - baseval) as usize;
                if grafptr.parttax[w] == 2 && queue.contains(w_idx) {
                    let key = queue.see_key(w_idx);
                    queue.update(w_idx, key - uvelo);
                }
            }
        }
    }
    grafptr.update();
}

pub fn vgraph_separate_gg(grafptr: &mut Vgraph, paraptr: &VgraphSeparateGgParam) -> Result<()> {
    if grafptr.s.vertnbr == 0 {
        return Ok(());
    }
    let mut rng = Rng::with_seed(RANDOM_SEED ^ grafptr.levlnum as u64);
    let mut queue = GnumQueue::new(grafptr.s.vertnbr as usize);
    let mut best: Option<VgraphStore> = None;
    for _ in 0..paraptr.passnbr.max(1) {
        gg_pass(grafptr, &mut queue, &mut rng);
        if best.as_ref().map_or(true, |b| grafptr.quality() < b.quality()) {
            best = Some(grafptr.store());
        }
    }
    if let Some(best) = best {
        grafptr.restore(&best);
    }
    Ok(())
}
