//! Simple ordering: non-halo vertices in increasing order

use crate::defs::Gnum;
use crate::error::Result;
use crate::hgraph::Hgraph;
use crate::order::Order;

pub fn hgraph_order_si(grafptr: &Hgraph, ordeptr: &mut Order, ordenum: Gnum) -> Result<()> {
    let baseval = grafptr.s.baseval;
    for v in grafptr.vnoh_range() {
        ordeptr.peritab[ordenum + v - baseval] = grafptr.s.vnum(v);
    }
    Ok(())
}
