//! Multilevel mesh separation
//!
//! Same scheme as multilevel graph separation, coarsening the mesh by element and node matching.

use fastrand::Rng;
use log::{trace, warn};

use crate::based::BasedVec;
use crate::defs::{Gnum, COARSEN_RAT_DEFAULT, COARSEN_VERT_DEFAULT, RANDOM_SEED};
use crate::error::{Result, ScotchError};
use crate::graph_coarsen::Coarsening;
use crate::mesh_coarsen::mesh_coarsen;
use crate::strat::Strat;
use crate::vmesh::Vmesh;
use crate::vmesh_separate_st::{vmesh_separate_st, VmeshSeparate};

#[derive(Clone, Debug, StratParams)]
pub struct VmeshSeparateMlParam {
    /// node count under which coarsening stops
    #[strat(name = "vnod")]
    pub coarnbr: Gnum,
    #[strat(name = "rat")]
    pub coarrat: f64,
    #[strat(name = "low")]
    pub stratlow: Strat<VmeshSeparate>,
    #[strat(name = "asc")]
    pub stratasc: Strat<VmeshSeparate>,
}

impl Default for VmeshSeparateMlParam {
    fn default() -> Self {
        Self {
            coarnbr: COARSEN_VERT_DEFAULT,
            coarrat: COARSEN_RAT_DEFAULT,
            stratlow: VmeshSeparate::grow_refine(),
            stratasc: VmeshSeparate::refine(),
        }
    }
}

/// Project the separation of `coarmesh` onto `finemesh`, or zero `finemesh` without coarse mesh
pub fn vmesh_separate_ml_uncoarsen(
    finemesh: &mut Vmesh,
    coarse: Option<(&mut Vmesh, &BasedVec<Gnum>)>,
) {
    let Some((coarmesh, coartax)) = coarse else {
        finemesh.zero();
        return;
    };

    let mut frontab = std::mem::take(&mut coarmesh.frontab);
    frontab.clear();
    let mut ecmpsize = [0; 2];
    for e in finemesh.m.elem_range() {
        let part = coarmesh.parttax[coartax[e]];
        finemesh.parttax[e] = part;
        ecmpsize[part as usize] += 1;
    }
    let mut ncmpsize = [0; 2];
    for n in finemesh.m.node_range() {
        let part = coarmesh.parttax[coartax[n]];
        finemesh.parttax[n] = part;
        match part {
            0 | 1 => ncmpsize[part as usize] += 1,
            _ => frontab.push(n),
        }
    }
    finemesh.ecmpsize = ecmpsize;
    finemesh.ncmpload = coarmesh.ncmpload;
    finemesh.ncmploaddlt = coarmesh.ncmploaddlt;
    finemesh.ncmpsize = ncmpsize;
    finemesh.fronnbr = frontab.len() as Gnum;
    finemesh.frontab = frontab;
}

fn vmesh_separate_ml2(
    finemesh: &mut Vmesh,
    paraptr: &VmeshSeparateMlParam,
    rng: &mut Rng,
) -> Result<()> {
    let coarsening = mesh_coarsen(&finemesh.m, paraptr.coarnbr, paraptr.coarrat, rng).and_then(
        |c| match c {
            Coarsening::Built { coarse, coartax } => Ok(Some((Vmesh::new(coarse)?, coartax))),
            Coarsening::ThresholdReached => Ok(None),
        },
    );
    match coarsening {
        Ok(Some((mut coarmesh, coartax))) => {
            coarmesh.levlnum = finemesh.levlnum + 1;
            let mut frontab = std::mem::take(&mut finemesh.frontab);
            frontab.clear();
            coarmesh.frontab = frontab;
            trace!(
                "level {}: {} elements, {} nodes",
                coarmesh.levlnum,
                coarmesh.m.velmnbr,
                coarmesh.m.vnodnbr
            );
            vmesh_separate_ml2(&mut coarmesh, paraptr, rng)?;
            vmesh_separate_ml_uncoarsen(finemesh, Some((&mut coarmesh, &coartax)));
            vmesh_separate_st(finemesh, &paraptr.stratasc)
        }
        Ok(None) => {
            vmesh_separate_ml_uncoarsen(finemesh, None);
            vmesh_separate_st(finemesh, &paraptr.stratlow)
        }
        Err(ScotchError::OutOfMemory) => {
            warn!(
                "mesh coarsening out of memory at level {}, separating directly",
                finemesh.levlnum
            );
            vmesh_separate_ml_uncoarsen(finemesh, None);
            vmesh_separate_st(finemesh, &paraptr.stratlow)
        }
        Err(err) => Err(err),
    }
}

pub fn vmesh_separate_ml(meshptr: &mut Vmesh, paraptr: &VmeshSeparateMlParam) -> Result<()> {
    let levlnum = meshptr.levlnum;
    let mut rng = Rng::with_seed(RANDOM_SEED ^ levlnum as u64);
    let o = vmesh_separate_ml2(meshptr, paraptr, &mut rng);
    meshptr.levlnum = levlnum;
    o
}
