//! Nested dissection ordering of a halo mesh
//!
//! The elements and non-halo nodes are separated by a mesh separation strategy. The separator
//! nodes are ordered last, in a submesh made of them and their elements; both parts are ordered
//! first by recursion, separator nodes becoming part of their halo.

use log::debug;

use crate::defs::Gnum;
use crate::error::Result;
use crate::hmesh::Hmesh;
use crate::hmesh_order_st::{hmesh_order_st, HmeshOrder};
use crate::order::{CblkType, Order, OrderCblk};
use crate::strat::Strat;
use crate::vmesh::Vmesh;
use crate::vmesh_separate_st::{vmesh_separate_st, VmeshSeparate, VmeshSeparateMethod};

#[derive(Clone, Debug, StratParams)]
pub struct HmeshOrderNdParam {
    /// separation strategy
    #[strat(name = "sep")]
    pub sepstrat: Strat<VmeshSeparate>,
    /// ordering strategy of leaves
    #[strat(name = "ole")]
    pub ordstratlea: Strat<HmeshOrder>,
    /// ordering strategy of separators
    #[strat(name = "ose")]
    pub ordstratsep: Strat<HmeshOrder>,
}

impl Default for HmeshOrderNdParam {
    fn default() -> Self {
        Self {
            sepstrat: Strat::method(VmeshSeparateMethod::Ml(Default::default())),
            ordstratlea: HmeshOrder::min_fill(),
            ordstratsep: HmeshOrder::simple(),
        }
    }
}

pub fn hmesh_order_nd(
    meshptr: &Hmesh,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HmeshOrderNdParam,
) -> Result<()> {
    if meshptr.vnohnbr == 0 {
        return Ok(());
    }

    let mut vspmeshdat = Vmesh::new(meshptr.mesh_view()?)?;
    vspmeshdat.levlnum = meshptr.levlnum;
    vmesh_separate_st(&mut vspmeshdat, &paraptr.sepstrat)?;
    debug!(
        "level {}: node parts {} / {}, separator {} (load {})",
        meshptr.levlnum,
        vspmeshdat.ncmpsize[0],
        vspmeshdat.ncmpsize[1],
        vspmeshdat.fronnbr,
        vspmeshdat.ncmpload[2]
    );

    if vspmeshdat.ncmpsize[0] == 0 || vspmeshdat.ncmpsize[1] == 0 {
        drop(vspmeshdat);
        return hmesh_order_st(meshptr, ordeptr, ordenum, cblkptr, &paraptr.ordstratlea);
    }

    let [n0, n1] = vspmeshdat.ncmpsize;
    let n2 = vspmeshdat.fronnbr;
    if n2 > 0 {
        ordeptr.split(cblkptr, CblkType::Nested, &[n0, n1, n2]);
    } else {
        ordeptr.split(cblkptr, CblkType::Nested, &[n0, n1]);
    }

    if n2 > 0 {
        let indmeshdat = meshptr.induce_sepa(&vspmeshdat.parttax)?;
        hmesh_order_st(
            &indmeshdat,
            ordeptr,
            ordenum + n0 + n1,
            &mut cblkptr.cblktab[2],
            &paraptr.ordstratsep,
        )?;
    }

    let mut partnum = ordenum;
    for (i, n) in [n0, n1].into_iter().enumerate() {
        let indmeshdat = meshptr.induce_part(&vspmeshdat.parttax, i as u8)?;
        hmesh_order_nd(&indmeshdat, ordeptr, partnum, &mut cblkptr.cblktab[i], paraptr)?;
        partnum += n;
    }
    Ok(())
}
