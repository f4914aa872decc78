//! Block splitting of a mesh ordering

use crate::defs::Gnum;
use crate::error::{invalid, Result};
use crate::hmesh::Hmesh;
use crate::hmesh_order_st::{hmesh_order_st, HmeshOrder};
use crate::order::{Order, OrderCblk};
use crate::strat::Strat;

#[derive(Clone, Debug, StratParams)]
pub struct HmeshOrderBlParam {
    #[strat(name = "strat")]
    pub strat: Strat<HmeshOrder>,
    /// minimum size of the resulting blocks
    #[strat(name = "cmin")]
    pub cblkmin: Gnum,
}

impl Default for HmeshOrderBlParam {
    fn default() -> Self {
        Self { strat: HmeshOrder::simple(), cblkmin: 16 }
    }
}

pub fn hmesh_order_bl(
    meshptr: &Hmesh,
    ordeptr: &mut Order,
    ordenum: Gnum,
    cblkptr: &mut OrderCblk,
    paraptr: &HmeshOrderBlParam,
) -> Result<()> {
    if paraptr.cblkmin <= 0 {
        invalid!("invalid minimum block size {}", paraptr.cblkmin);
    }
    hmesh_order_st(meshptr, ordeptr, ordenum, cblkptr, &paraptr.strat)?;
    ordeptr.split_blocks(cblkptr, paraptr.cblkmin);
    Ok(())
}
