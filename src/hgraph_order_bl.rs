//! Block splitting: order with a strategy, then split the column blocks that are too large

use crate::defs::Gnum;
use crate::error::{invalid, Result};
use crate::hgraph::Hgraph;
use crate::hgraph_order_st::{hgraph_order_st, HgraphOrder};
use crate::order::{Order, OrderCblk};
use crate::strat::Strat;

#[derive(Clone, Debug, StratParams)]
pub struct HgraphOrderBlParam {
    #[strat(name = "strat")]
    pub strat: Strat<HgraphOrder>,
    /// minimum size of the resulting blocks
    #[strat(name = "cmin")]
    pub cblkmin: Gnum,
}

impl Default for HgraphOrderBlParam {
    fn default() -> Self {
        Self { strat: HgraphOrder::simple(), cblkmin: 16 }
    }
}

pub fn hgraph_order_bl(
    grafptr: &Hgraph,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HgraphOrderBlParam,
) -> Result<()> {
    if paraptr.cblkmin <= 0 {
        invalid!("invalid minimum block size {}", paraptr.cblkmin);
    }
    hgraph_order_st(grafptr, ordeptr, ordenum, cblkptr, &paraptr.strat)?;
    ordeptr.split_blocks(cblkptr, paraptr.cblkmin);
    Ok(())
}
