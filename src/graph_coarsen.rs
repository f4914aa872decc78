//! Graph coarsening by vertex matching
//!
//! Every fine vertex is matched with at most one unmatched neighbor; each pair, or unmatched
//! vertex, becomes one coarse vertex whose load is the sum of the fine loads. Arcs between the
//! members of two coarse vertices are merged into one coarse arc carrying the sum of their loads.

use fastrand::Rng;
use log::trace;

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, COARSEN_MAXLOAD_FACTOR, GNUM_NONE};
use crate::error::Result;
use crate::graph::Graph;
use crate::strat::strat_case;

strat_case! {
    /// Matching heuristic
    pub enum MatchType {
        /// heaviest edge first
        Heavy = 'h',
        /// first eligible neighbor from a random position
        Random = 'r',
    }
}

/// Outcome of one coarsening step
#[derive(Debug)]
pub enum Coarsening<T> {
    /// coarse structure, and coarse vertex of every fine vertex
    Built { coarse: T, coartax: BasedVec<Gnum> },
    /// the fine structure is small enough, or would not shrink enough
    ThresholdReached,
}

/// Heaviest-or-random matching of the vertices of `fine`, in random order
fn graph_match(
    fine: &Graph,
    maxload: Gnum,
    kind: MatchType,
    rng: &mut Rng,
) -> Result<BasedVec<Gnum>> {
    let baseval = fine.baseval;
    let mut matetax = BasedVec::try_from_elem(baseval, GNUM_NONE, fine.vertnbr as usize)?;
    let mut permtab: Vec<Gnum> = fine.vert_range().collect();
    rng.shuffle(&mut permtab);

    for &v in &permtab {
        if matetax[v] != GNUM_NONE {
            continue;
        }
        let velo = fine.velo(v);
        let adj = fine.adj(v);
        let degr = adj.end - adj.start;
        let mut best = GNUM_NONE;
        let mut bestload = -1;
        let start = match kind {
            MatchType::Random if degr > 0 => rng.i64(0..degr),
            _ => 0,
        };
        for i in 0..degr {
            let e = adj.start + (start + i) % degr.max(1);
            let u = fine.edgetax[e];
            if matetax[u] != GNUM_NONE || velo + fine.velo(u) > maxload {
                continue;
            }
            let edlo = fine.edlo(e);
            if edlo > bestload {
                best = u;
                bestload = edlo;
                if kind == MatchType::Random {
                    break;
                }
            }
        }
        if best == GNUM_NONE {
            matetax[v] = v;
        } else {
            matetax[v] = best;
            matetax[best] = v;
        }
    }
    Ok(matetax)
}

/*************************************************************************/
/* Coarsen `fine` once. Coarsening stops when the graph has no more than
   `coarnbr` vertices, or when the coarse graph would keep more than
   `coarrat` of the fine vertices. */
/*************************************************************************/
pub fn graph_coarsen(
    fine: &Graph,
    coarnbr: Gnum,
    coarrat: f64,
    kind: MatchType,
    rng: &mut Rng,
) -> Result<Coarsening<Graph>> {
    if fine.vertnbr <= coarnbr.max(1) {
        return Ok(Coarsening::ThresholdReached);
    }
    let baseval = fine.baseval;
    let maxload =
        ((fine.velosum as f64 / coarnbr.max(1) as f64) * COARSEN_MAXLOAD_FACTOR).ceil() as Gnum;
    let matetax = graph_match(fine, maxload.max(2), kind, rng)?;

    let mut coartax = BasedVec::try_from_elem(baseval, GNUM_NONE, fine.vertnbr as usize)?;
    let mut multtab: Vec<[Gnum; 2]> = try_vec(fine.vertnbr as usize)?;
    for v in fine.vert_range() {
        if coartax[v] != GNUM_NONE {
            continue;
        }
        let c = baseval + multtab.len() as Gnum;
        coartax[v] = c;
        coartax[matetax[v]] = c;
        multtab.push([v, matetax[v]]);
    }
    let coarvertnbr = multtab.len() as Gnum;
    if coarvertnbr as f64 > coarrat * fine.vertnbr as f64 {
        trace!("coarsening stops: {} -> {coarvertnbr} vertices", fine.vertnbr);
        return Ok(Coarsening::ThresholdReached);
    }

    /* Build the coarse adjacency, merging parallel arcs */
    let mut coarverttab = try_vec(multtab.len())?;
    let mut coarvendtab = try_vec(multtab.len())?;
    let mut coarvelotab = try_vec(multtab.len())?;
    let mut coaredgetab: Vec<Gnum> = try_vec(fine.edgenbr as usize)?;
    let mut coaredlotab: Vec<Gnum> = try_vec(fine.edgenbr as usize)?;
    let mut htab = BasedVec::try_from_elem(baseval, GNUM_NONE, multtab.len())?;
    for (i, mult) in multtab.iter().enumerate() {
        let c = baseval + i as Gnum;
        let edgefirst = coaredgetab.len();
        coarverttab.push(baseval + edgefirst as Gnum);
        let members: &[Gnum] = if mult[0] == mult[1] { &mult[..1] } else { &mult[..] };
        let mut velo = 0;
        for &v in members {
            velo += fine.velo(v);
            for e in fine.adj(v) {
                let cu = coartax[fine.edgetax[e]];
                if cu == c {
                    continue;
                }
                let pos = htab[cu];
                if pos != GNUM_NONE && pos as usize >= edgefirst {
                    coaredlotab[pos as usize] += fine.edlo(e);
                } else {
                    htab[cu] = coaredgetab.len() as Gnum;
                    coaredgetab.push(cu);
                    coaredlotab.push(fine.edlo(e));
                }
            }
        }
        coarvelotab.push(velo);
        coarvendtab.push(baseval + coaredgetab.len() as Gnum);
    }
    coaredgetab.shrink_to_fit();
    coaredlotab.shrink_to_fit();

    let coarse = Graph::from_parts(
        baseval,
        BasedVec::new(baseval, coarverttab),
        BasedVec::new(baseval, coarvendtab),
        BasedVec::new(baseval, coaredgetab),
        Some(BasedVec::new(baseval, coarvelotab)),
        Some(BasedVec::new(baseval, coaredlotab)),
    );
    trace!("coarsened {} -> {} vertices", fine.vertnbr, coarse.vertnbr);
    Ok(Coarsening::Built { coarse, coartax })
}
