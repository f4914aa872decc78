//! Mesh coarsening by element and node matching
//!
//! Elements are matched with the neighboring element sharing the most nodes, and nodes with the
//! neighboring node sharing the most elements. Every pair, or unmatched vertex, becomes one
//! coarse vertex carrying the sum of the fine loads; the adjacency of a coarse vertex is the
//! image of the adjacencies of its members. A separation of the coarse mesh therefore projects
//! onto a valid separation of the fine mesh.

use std::ops::Range;

use fastrand::Rng;
use log::trace;

use crate::based::{try_vec, BasedVec};
use crate::defs::{Gnum, COARSEN_MAXLOAD_FACTOR, GNUM_NONE};
use crate::error::Result;
use crate::graph_coarsen::Coarsening;
use crate::mesh::Mesh;

/// Match the vertices of `vertrng` with vertices of the same kind sharing the most neighbors
fn mesh_match(
    fine: &Mesh,
    vertrng: Range<Gnum>,
    load: impl Fn(Gnum) -> Gnum,
    maxload: Gnum,
    rng: &mut Rng,
) -> Result<BasedVec<Gnum>> {
    let mut matetax =
        BasedVec::try_from_elem(vertrng.start, GNUM_NONE, (vertrng.end - vertrng.start) as usize)?;
    let mut cnttax = BasedVec::try_from_elem(vertrng.start, 0 as Gnum, matetax.len())?;
    let mut permtab: Vec<Gnum> = vertrng.collect();
    rng.shuffle(&mut permtab);

    let mut candtab: Vec<Gnum> = Vec::new();
    for &v in &permtab {
        if matetax[v] != GNUM_NONE {
            continue;
        }
        let velo = load(v);
        candtab.clear();
        for &w in fine.neighbors(v) {
            for &u in fine.neighbors(w) {
                if u == v || matetax[u] != GNUM_NONE || velo + load(u) > maxload {
                    continue;
                }
                if cnttax[u] == 0 {
                    candtab.push(u);
                }
                cnttax[u] += 1;
            }
        }
        let mut best = GNUM_NONE;
        let mut bestcnt = 0;
        for &u in &candtab {
            if cnttax[u] > bestcnt {
                best = u;
                bestcnt = cnttax[u];
            }
            cnttax[u] = 0;
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

/// Number the pairs of `matetax` from `coarbas`; returns the members of every coarse vertex
fn mesh_number(
    matetax: &BasedVec<Gnum>,
    coarbas: Gnum,
    coartax: &mut BasedVec<Gnum>,
) -> Result<Vec<[Gnum; 2]>> {
    let mut multtab = try_vec(matetax.len())?;
    for v in matetax.range() {
        if coartax[v] != GNUM_NONE {
            continue;
        }
        let c = coarbas + multtab.len() as Gnum;
        coartax[v] = c;
        coartax[matetax[v]] = c;
        multtab.push([v, matetax[v]]);
    }
    Ok(multtab)
}

/*************************************************************************/
/* Coarsen `fine` once. Coarsening stops when the mesh has no more than
   `coarnbr` nodes, or when the coarse mesh would keep more than `coarrat`
   of the fine nodes. The coarse mesh numbers its elements first. */
/*************************************************************************/
pub fn mesh_coarsen(
    fine: &Mesh,
    coarnbr: Gnum,
    coarrat: f64,
    rng: &mut Rng,
) -> Result<Coarsening<Mesh>> {
    if fine.vnodnbr <= coarnbr.max(1) {
        return Ok(Coarsening::ThresholdReached);
    }
    let baseval = fine.baseval;
    let cap = |sum: Gnum| {
        (((sum as f64 / coarnbr.max(1) as f64) * COARSEN_MAXLOAD_FACTOR).ceil() as Gnum).max(2)
    };
    let elemmate = mesh_match(fine, fine.elem_range(), |e| fine.velo(e), cap(fine.velosum), rng)?;
    let nodemate = mesh_match(fine, fine.node_range(), |n| fine.vnlo(n), cap(fine.vnlosum), rng)?;

    let mut coartax =
        BasedVec::try_from_elem(baseval, GNUM_NONE, (fine.velmnbr + fine.vnodnbr) as usize)?;
    let elemmult = mesh_number(&elemmate, baseval, &mut coartax)?;
    let coarvnodbas = baseval + elemmult.len() as Gnum;
    let nodemult = mesh_number(&nodemate, coarvnodbas, &mut coartax)?;
    if nodemult.len() as f64 > coarrat * fine.vnodnbr as f64 {
        trace!("mesh coarsening stops: {} -> {} nodes", fine.vnodnbr, nodemult.len());
        return Ok(Coarsening::ThresholdReached);
    }

    /* Coarse adjacency, elements then nodes, without duplicates */
    let coarvertnbr = elemmult.len() + nodemult.len();
    let mut coarverttab = try_vec(coarvertnbr)?;
    let mut coarvendtab = try_vec(coarvertnbr)?;
    let mut coaredgetab: Vec<Gnum> = try_vec(fine.edgenbr as usize)?;
    let mut htab = BasedVec::try_from_elem(baseval, GNUM_NONE, coarvertnbr)?;
    for (i, mult) in elemmult.iter().chain(nodemult.iter()).enumerate() {
        let c = baseval + i as Gnum;
        coarverttab.push(baseval + coaredgetab.len() as Gnum);
        let members: &[Gnum] = if mult[0] == mult[1] { &mult[..1] } else { &mult[..] };
        for &v in members {
            for &w in fine.neighbors(v) {
                let cw = coartax[w];
                if htab[cw] != c {
                    htab[cw] = c;
                    coaredgetab.push(cw);
                }
            }
        }
        coarvendtab.push(baseval + coaredgetab.len() as Gnum);
    }
    coaredgetab.shrink_to_fit();

    let pairload = |mult: &[Gnum; 2], load: Gnum, mateload: Gnum| {
        if mult[0] == mult[1] { load } else { load + mateload }
    };
    let coarvelotab = elemmult
        .iter()
        .map(|m| pairload(m, fine.velo(m[0]), fine.velo(m[1])))
        .collect();
    let coarvnlotab = nodemult
        .iter()
        .map(|m| pairload(m, fine.vnlo(m[0]), fine.vnlo(m[1])))
        .collect();

    let coarse = Mesh::from_parts(
        baseval,
        elemmult.len() as Gnum,
        nodemult.len() as Gnum,
        true,
        coarverttab,
        coarvendtab,
        coaredgetab,
        Some(coarvelotab),
        Some(coarvnlotab),
    )?;
    trace!(
        "coarsened mesh {}/{} -> {}/{} elements/nodes",
        fine.velmnbr,
        fine.vnodnbr,
        coarse.velmnbr,
        coarse.vnodnbr
    );
    Ok(Coarsening::Built { coarse, coartax })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::RANDOM_SEED;

    #[test]
    fn coarse_grid_is_consistent() {
        let fine = Mesh::grid2(1, 10, 10).unwrap();
        let mut rng = Rng::with_seed(RANDOM_SEED);
        let Coarsening::Built { coarse, coartax } = mesh_coarsen(&fine, 10, 0.8, &mut rng).unwrap()
        else {
            panic!("grid mesh should coarsen");
        };
        coarse.check().unwrap();
        assert_eq!(coarse.velosum, fine.velosum);
        assert_eq!(coarse.vnlosum, fine.vnlosum);
        assert!(coarse.vnodnbr <= 96 && coarse.vnodnbr >= 61);
        for e in fine.elem_range() {
            assert!(coarse.is_elem(coartax[e]));
            for &n in fine.neighbors(e) {
                assert!(coarse.neighbors(coartax[e]).contains(&coartax[n]));
            }
        }
        for n in fine.node_range() {
            assert!(!coarse.is_elem(coartax[n]));
        }
    }

    #[test]
    fn small_meshes_reach_threshold() {
        let fine = Mesh::grid2(0, 2, 2).unwrap();
        let mut rng = Rng::with_seed(RANDOM_SEED);
        assert!(matches!(
            mesh_coarsen(&fine, 9, 0.8, &mut rng).unwrap(),
            Coarsening::ThresholdReached
        ));
        // four nodes pair up into two at best
        let fine = Mesh::grid2(0, 1, 1).unwrap();
        assert!(matches!(
            mesh_coarsen(&fine, 1, 0.4, &mut rng).unwrap(),
            Coarsening::ThresholdReached
        ));
    }
}
