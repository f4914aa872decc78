//! Mesh ordering through the nodal graph
//!
//! The halo nodal graph of the mesh is ordered with a graph ordering strategy. Halo nodes become
//! halo vertices, so that the ordering sees the same boundary.

use crate::defs::Gnum;
use crate::error::Result;
use crate::hgraph_order_st::{hgraph_order_st, HgraphOrder, HgraphOrderMethod};
use crate::hmesh::Hmesh;
use crate::order::{Order, OrderCblk};
use crate::strat::Strat;

#[derive(Clone, Debug, StratParams)]
pub struct HmeshOrderGrParam {
    /// graph ordering strategy
    #[strat(name = "strat")]
    pub stratptr: Strat<HgraphOrder>,
}

impl Default for HmeshOrderGrParam {
    fn default() -> Self {
        Self { stratptr: Strat::method(HgraphOrderMethod::Nd(Default::default())) }
    }
}

pub fn hmesh_order_gr(
    meshptr: &Hmesh,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HmeshOrderGrParam,
) -> Result<()> {
    let grafdat = meshptr.nodal_hgraph()?;
    hgraph_order_st(&grafdat, ordeptr, ordenum, cblkptr, &paraptr.stratptr)
}
