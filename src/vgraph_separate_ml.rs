//! Multilevel graph separation
//!
//! The graph is coarsened until it is small enough, the coarsest graph is separated with the
//! low-level strategy, and the separator is projected back level by level, each projection
//! being refined with the ascending strategy.

use fastrand::Rng;
use log::{trace, warn};

use crate::based::BasedVec;
use crate::defs::{Gnum, COARSEN_RAT_DEFAULT, COARSEN_VERT_DEFAULT, RANDOM_SEED};
use crate::error::{Result, ScotchError};
use crate::graph_coarsen::{graph_coarsen, Coarsening, MatchType};
use crate::strat::Strat;
use crate::vgraph::Vgraph;
use crate::vgraph_separate_st::{vgraph_separate_st, VgraphSeparate};

#[derive(Clone, Debug, StratParams)]
pub struct VgraphSeparateMlParam {
    /// vertex count under which coarsening stops
    #[strat(name = "vert")]
    pub coarnbr: Gnum,
    /// coarsening ratio above which coarsening stops
    #[strat(name = "rat")]
    pub coarrat: f64,
    #[strat(name = "type")]
    pub coartype: MatchType,
    /// strategy for the coarsest graph
    #[strat(name = "low")]
    pub stratlow: Strat<VgraphSeparate>,
    /// strategy applied after each projection
    #[strat(name = "asc")]
    pub stratasc: Strat<VgraphSeparate>,
}

impl Default for VgraphSeparateMlParam {
    fn default() -> Self {
        Self {
            coarnbr: COARSEN_VERT_DEFAULT,
            coarrat: COARSEN_RAT_DEFAULT,
            coartype: MatchType::Heavy,
            stratlow: VgraphSeparate::grow_refine(),
            stratasc: VgraphSeparate::refine(),
        }
    }
}

/// Project the separation of `coargraf` onto `finegraf`, or zero `finegraf` without coarse graph
pub fn vgraph_separate_ml_uncoarsen(
    finegraf: &mut Vgraph,
    coarse: Option<(&mut Vgraph, &BasedVec<Gnum>)>,
) {
    let Some((coargraf, coartax)) = coarse else {
        finegraf.zero();
        return;
    };

    let mut frontab = std::mem::take(&mut coargraf.frontab);
    frontab.clear();
    let mut compsize0 = 0;
    let mut compsize1 = 0;
    for v in finegraf.s.vert_range() {
        let part = coargraf.parttax[coartax[v]];
        finegraf.parttax[v] = part;
        match part {
            0 => compsize0 += 1,
            1 => compsize1 += 1,
            _ => frontab.push(v),
        }
    }
    finegraf.compload = coargraf.compload;
    finegraf.comploaddlt = coargraf.comploaddlt;
    finegraf.compsize = [compsize0, compsize1];
    finegraf.fronnbr = frontab.len() as Gnum;
    finegraf.frontab = frontab;
}

fn vgraph_separate_ml2(
    finegraf: &mut Vgraph,
    paraptr: &VgraphSeparateMlParam,
    rng: &mut Rng,
) -> Result<()> {
    let coarsening =
        graph_coarsen(&finegraf.s, paraptr.coarnbr, paraptr.coarrat, paraptr.coartype, rng)
            .and_then(|c| match c {
                Coarsening::Built { coarse, coartax } => {
                    Ok(Some((Vgraph::new(coarse)?, coartax)))
                }
                Coarsening::ThresholdReached => Ok(None),
            });
    match coarsening {
        Ok(Some((mut coargraf, coartax))) => {
            coargraf.levlnum = finegraf.levlnum + 1;
            // the frontier array travels down the levels
            let mut frontab = std::mem::take(&mut finegraf.frontab);
            frontab.clear();
            coargraf.frontab = frontab;
            trace!("level {}: {} vertices", coargraf.levlnum, coargraf.s.vertnbr);
            vgraph_separate_ml2(&mut coargraf, paraptr, rng)?;
            vgraph_separate_ml_uncoarsen(finegraf, Some((&mut coargraf, &coartax)));
            vgraph_separate_st(finegraf, &paraptr.stratasc)
        }
        Ok(None) => {
            vgraph_separate_ml_uncoarsen(finegraf, None);
            vgraph_separate_st(finegraf, &paraptr.stratlow)
        }
        Err(ScotchError::OutOfMemory) => {
            warn!("coarsening out of memory at level {}, separating directly", finegraf.levlnum);
            vgraph_separate_ml_uncoarsen(finegraf, None);
            vgraph_separate_st(finegraf, &paraptr.stratlow)
        }
        Err(err) => Err(err),
    }
}

pub fn vgraph_separate_ml(grafptr: &mut Vgraph, paraptr: &VgraphSeparateMlParam) -> Result<()> {
    let levlnum = grafptr.levlnum;
    let mut rng = Rng::with_seed(RANDOM_SEED ^ levlnum as u64);
    let o = vgraph_separate_ml2(grafptr, paraptr, &mut rng);
    grafptr.levlnum = levlnum;
    o
}
